use crate::{
    foundation::core::{Line, Point, Rgba8},
    foundation::error::GridResult,
    grid::classify::{Level, classify},
    grid::config::{DashStyle, GridConfig, Projection},
};

/// Pen widths of orthogonal cell, group and cluster lines.
const ORTHO_WIDTHS: [f64; 3] = [1.0, 1.0, 2.0];
/// Pen widths of isometric cell, group and cluster diagonals.
const ISO_WIDTHS: [f64; 3] = [1.0, 1.0, 1.6];
/// Pen widths of isometric reference lines, by the tier of their index.
const REFERENCE_WIDTHS: [f64; 3] = [1.0, 1.0, 2.0];
/// Alpha factor (out of 255) applied to reference lines that fall between group lines.
pub const REFERENCE_MINOR_ALPHA: u8 = 85;

fn level_slot(level: Level) -> usize {
    match level {
        Level::Cell => 0,
        Level::Group => 1,
        Level::Cluster => 2,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Edge treatment used when rasterizing a stroke pass.
pub enum Smoothing {
    /// Axis-aligned strokes snapped to whole pixel rows/columns, no edge blending.
    Crisp,
    /// Anti-aliased coverage.
    AntiAlias,
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Immutable pen for one stroke pass.
pub struct LineStyle {
    /// Stroke width in pixels.
    pub width: f64,
    /// Straight-alpha stroke color.
    pub color: Rgba8,
    /// Dash pattern, phased from each segment's own start point.
    pub dash: DashStyle,
    /// Edge treatment.
    pub smoothing: Smoothing,
}

impl LineStyle {
    /// Dash/gap lengths in pixels for this pen.
    pub fn dash_lengths(&self) -> Vec<f64> {
        self.dash
            .pattern()
            .iter()
            .map(|m| m * self.width)
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// What a stroke pass draws.
pub enum LineKind {
    /// Cell, group or cluster lines styled from the configured palette.
    Grid(Level),
    /// Isometric vertical reference lines; the level selects width/opacity tiering.
    Reference(Level),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Direction family of a segment.
pub enum Orientation {
    /// Constant x, spanning the full height.
    Vertical,
    /// Constant y, spanning the full width.
    Horizontal,
    /// Isometric diagonal anchored on the left edge.
    DiagonalLeft,
    /// Isometric diagonal anchored on the right edge.
    DiagonalRight,
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// One line segment emitted by the compiler.
pub struct Segment {
    /// Line index `i` the segment was generated from.
    pub index: u32,
    /// Direction family.
    pub orientation: Orientation,
    /// Endpoints in composed-buffer coordinates, `p0` is the dash phase origin.
    pub line: Line,
}

#[derive(Clone, Debug)]
/// Segments that share one pen.
pub struct StrokePass {
    /// Classification of every segment in the pass.
    pub kind: LineKind,
    /// Pen used for all segments.
    pub style: LineStyle,
    /// Segments in emission order.
    pub segments: Vec<Segment>,
}

#[derive(Clone, Debug)]
/// Backend-agnostic description of one composed grid image.
///
/// The plan is a background fill followed by stroke passes executed in order; later passes
/// paint over earlier ones.
pub struct GridPlan {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Fill applied before the first pass.
    pub background: Rgba8,
    /// Stroke passes, bottom layer first.
    pub passes: Vec<StrokePass>,
}

impl GridPlan {
    /// Every segment with its classification, in drawing order.
    pub fn segments(&self) -> impl Iterator<Item = (LineKind, &Segment)> + '_ {
        self.passes
            .iter()
            .flat_map(|p| p.segments.iter().map(move |s| (p.kind, s)))
    }

    /// Total number of segments across all passes.
    pub fn segment_count(&self) -> usize {
        self.passes.iter().map(|p| p.segments.len()).sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Iteration bounds of the orthogonal layout.
pub struct OrthoCounts {
    /// Vertical line indices `[0, vertical)`, derived from the width.
    pub vertical: u32,
    /// Horizontal line indices `[0, horizontal)`, derived from the height.
    pub horizontal: u32,
}

impl OrthoCounts {
    /// Compute the mirrored half-extents for `config`.
    pub fn for_config(config: &GridConfig) -> Self {
        let half = |extent: u32| (f64::from(extent) / config.cell_size_px / 2.0).ceil() as u32;
        Self {
            vertical: half(config.width),
            horizontal: half(config.height),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Derived quantities of the isometric layout.
pub struct IsoMetrics {
    /// `sin(60deg) / sin(30deg)`, the horizontal run of a diagonal per unit of vertical drop.
    pub sine_helper: f64,
    /// Height extended so diagonals reach the far corner.
    pub adjusted_height: f64,
    /// Diagonal indices `[1, diagonal_count)`.
    pub diagonal_count: u32,
    /// Reference line indices `[0, reference_count)`.
    pub reference_count: u32,
}

impl IsoMetrics {
    /// Compute the isometric bounds for `config`.
    pub fn for_config(config: &GridConfig) -> Self {
        let rad30 = 30f64.to_radians();
        let rad60 = 60f64.to_radians();
        let sine_helper = rad60.sin() / rad30.sin();
        let width = f64::from(config.width);
        let adjusted_height = f64::from(config.height) + width * rad30.sin() / rad60.sin();
        Self {
            sine_helper,
            adjusted_height,
            diagonal_count: (adjusted_height / config.cell_size_px).ceil() as u32,
            reference_count: (width / (config.cell_size_px * sine_helper)).ceil() as u32,
        }
    }
}

/// Compile a validated [`GridConfig`] into a [`GridPlan`].
#[tracing::instrument(skip(config), fields(width = config.width, height = config.height, projection = ?config.projection))]
pub fn compile_grid(config: &GridConfig) -> GridResult<GridPlan> {
    config.validate()?;

    let passes = match config.projection {
        Projection::Orthogonal => orthogonal_passes(config),
        Projection::Isometric => isometric_passes(config),
    };

    let plan = GridPlan {
        width: config.width,
        height: config.height,
        background: config.background,
        passes,
    };
    tracing::debug!(
        passes = plan.passes.len(),
        segments = plan.segment_count(),
        "compiled grid plan"
    );
    Ok(plan)
}

fn push_pass(passes: &mut Vec<StrokePass>, kind: LineKind, style: LineStyle, segs: Vec<Segment>) {
    if !segs.is_empty() {
        passes.push(StrokePass {
            kind,
            style,
            segments: segs,
        });
    }
}

fn orthogonal_passes(config: &GridConfig) -> Vec<StrokePass> {
    let counts = OrthoCounts::for_config(config);
    let center = config.center();
    let (w, h) = (f64::from(config.width), f64::from(config.height));
    let step = config.cell_size_px;

    let vertical = |index: u32, x: f64| Segment {
        index,
        orientation: Orientation::Vertical,
        line: Line::new(Point::new(x, 0.0), Point::new(x, h)),
    };
    let horizontal = |index: u32, y: f64| Segment {
        index,
        orientation: Orientation::Horizontal,
        line: Line::new(Point::new(0.0, y), Point::new(w, y)),
    };

    let mut passes = Vec::with_capacity(Level::ALL.len());
    for level in Level::ALL {
        let level_style = config.level_style(level);
        let style = LineStyle {
            width: ORTHO_WIDTHS[level_slot(level)],
            color: level_style.color,
            dash: level_style.dash,
            smoothing: Smoothing::Crisp,
        };

        let mut segs = Vec::new();
        for i in 0..counts.vertical {
            if classify(i, config.cells_per_group, config.groups_per_cluster) != level {
                continue;
            }
            if i == 0 {
                segs.push(vertical(i, center.x));
            } else {
                let d = step * f64::from(i);
                segs.push(vertical(i, center.x + d));
                segs.push(vertical(i, center.x - d));
            }
        }
        for i in 0..counts.horizontal {
            if classify(i, config.cells_per_group, config.groups_per_cluster) != level {
                continue;
            }
            if i == 0 {
                segs.push(horizontal(i, center.y));
            } else {
                let d = step * f64::from(i);
                segs.push(horizontal(i, center.y + d));
                segs.push(horizontal(i, center.y - d));
            }
        }
        push_pass(&mut passes, LineKind::Grid(level), style, segs);
    }
    passes
}

fn isometric_passes(config: &GridConfig) -> Vec<StrokePass> {
    let metrics = IsoMetrics::for_config(config);
    let center = config.center();
    let (w, h) = (f64::from(config.width), f64::from(config.height));
    let step = config.cell_size_px;

    let mut passes = Vec::with_capacity(Level::ALL.len() * 2);

    // Tiers never share an x position, so tier-by-tier drawing equals index-order drawing.
    let reference_spacing = step / 2.0 * metrics.sine_helper;
    let vertical = |index: u32, x: f64| Segment {
        index,
        orientation: Orientation::Vertical,
        line: Line::new(Point::new(x, 0.0), Point::new(x, h)),
    };
    for tier in Level::ALL {
        let color = match tier {
            Level::Cell => config.iso_vertical_color.scale_alpha(REFERENCE_MINOR_ALPHA),
            Level::Group | Level::Cluster => config.iso_vertical_color,
        };
        let style = LineStyle {
            width: REFERENCE_WIDTHS[level_slot(tier)],
            color,
            dash: DashStyle::Solid,
            smoothing: Smoothing::Crisp,
        };

        let mut segs = Vec::new();
        for i in 0..metrics.reference_count {
            if classify(i, config.cells_per_group, config.groups_per_cluster) != tier {
                continue;
            }
            if i == 0 {
                segs.push(vertical(i, center.x));
            } else {
                let d = reference_spacing * f64::from(i);
                segs.push(vertical(i, center.x + d));
                segs.push(vertical(i, center.x - d));
            }
        }
        push_pass(&mut passes, LineKind::Reference(tier), style, segs);
    }

    for level in Level::ALL {
        let level_style = config.level_style(level);
        let style = LineStyle {
            width: ISO_WIDTHS[level_slot(level)],
            color: level_style.color,
            dash: level_style.dash,
            smoothing: Smoothing::AntiAlias,
        };

        let mut segs = Vec::new();
        for i in 1..metrics.diagonal_count {
            if classify(i, config.cells_per_group, config.groups_per_cluster) != level {
                continue;
            }
            let drop = step * f64::from(i);
            let run = drop * metrics.sine_helper;
            segs.push(Segment {
                index: i,
                orientation: Orientation::DiagonalLeft,
                line: Line::new(Point::new(0.0, drop), Point::new(run, 0.0)),
            });
            segs.push(Segment {
                index: i,
                orientation: Orientation::DiagonalRight,
                line: Line::new(Point::new(w, drop), Point::new(w - run, 0.0)),
            });
        }
        push_pass(&mut passes, LineKind::Grid(level), style, segs);
    }
    passes
}

#[cfg(test)]
#[path = "../../tests/unit/compile/plan.rs"]
mod tests;
