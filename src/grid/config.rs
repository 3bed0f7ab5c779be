use xxhash_rust::xxh3::Xxh3;

use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{GraphPaperError, GridResult};
use crate::grid::classify::{Level, cluster_period};

/// Smallest cell pitch the composer accepts.
pub const MIN_CELL_SIZE_PX: f64 = 2.0;
/// Largest cell pitch the composer accepts.
pub const MAX_CELL_SIZE_PX: f64 = 100.0;
/// Upper bound for `cells_per_group` and `groups_per_cluster`.
pub const MAX_PERIOD: u32 = 10;
/// Largest composed surface edge (the CPU rasterizer addresses pixels with `u16`).
pub const MAX_SURFACE_EDGE: u32 = u16::MAX as u32;

/// Axis arrangement of the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// Vertical and horizontal lines mirrored about the center.
    #[default]
    Orthogonal,
    /// Vertical reference lines plus two families of 30-degree diagonals.
    Isometric,
}

/// Stroke pattern of one grid level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashStyle {
    /// Continuous stroke.
    #[default]
    Solid,
    /// Long dashes.
    Dashed,
    /// Dots.
    Dotted,
}

impl DashStyle {
    /// Dash/gap lengths in multiples of the pen width. Empty means continuous.
    pub fn pattern(self) -> &'static [f64] {
        match self {
            Self::Solid => &[],
            Self::Dashed => &[3.0, 1.0],
            Self::Dotted => &[1.0, 1.0],
        }
    }
}

/// Color and dash pattern of one grid level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct LevelStyle {
    /// Resolved straight-alpha line color.
    pub color: Rgba8,
    /// Dash pattern.
    pub dash: DashStyle,
}

/// Fully resolved, immutable grid description.
///
/// Every pixel of the composed buffer is a function of this value alone.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GridConfig {
    /// Pixel pitch of the finest grid.
    pub cell_size_px: f64,
    /// Cell lines between two group lines.
    pub cells_per_group: u32,
    /// Group lines between two cluster lines.
    pub groups_per_cluster: u32,
    /// Orthogonal or isometric layout.
    pub projection: Projection,
    /// Style of cell lines.
    pub cell: LevelStyle,
    /// Style of group lines.
    pub group: LevelStyle,
    /// Style of cluster lines.
    pub cluster: LevelStyle,
    /// Color of the vertical reference lines (isometric only).
    pub iso_vertical_color: Rgba8,
    /// Fill color applied before any line is drawn. May be fully transparent.
    pub background: Rgba8,
    /// Width of the rasterized region in pixels.
    pub width: u32,
    /// Height of the rasterized region in pixels.
    pub height: u32,
}

impl GridConfig {
    /// A 10px orthogonal grid with 5 cells per group and 2 groups per cluster, black lines on a
    /// transparent background.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cell_size_px: 10.0,
            cells_per_group: 5,
            groups_per_cluster: 2,
            projection: Projection::Orthogonal,
            cell: LevelStyle {
                color: Rgba8::BLACK,
                dash: DashStyle::Dotted,
            },
            group: LevelStyle {
                color: Rgba8::BLACK,
                dash: DashStyle::Dashed,
            },
            cluster: LevelStyle {
                color: Rgba8::BLACK,
                dash: DashStyle::Solid,
            },
            iso_vertical_color: Rgba8::new(127, 127, 127, 255),
            background: Rgba8::transparent(),
            width,
            height,
        }
    }

    /// Style configured for `level`.
    pub fn level_style(&self, level: Level) -> LevelStyle {
        match level {
            Level::Cell => self.cell,
            Level::Group => self.group,
            Level::Cluster => self.cluster,
        }
    }

    /// Lines between two consecutive cluster lines.
    pub fn cluster_period(&self) -> u32 {
        cluster_period(self.cells_per_group, self.groups_per_cluster)
    }

    /// Center of the rasterized region, the mirror axis of every symmetric line family.
    pub fn center(&self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Reject configurations the composer cannot render.
    pub fn validate(&self) -> GridResult<()> {
        if !self.cell_size_px.is_finite() {
            return Err(GraphPaperError::config("cell_size_px must be finite"));
        }
        if !(MIN_CELL_SIZE_PX..=MAX_CELL_SIZE_PX).contains(&self.cell_size_px) {
            return Err(GraphPaperError::config(format!(
                "cell_size_px must be in [{MIN_CELL_SIZE_PX}, {MAX_CELL_SIZE_PX}], got {}",
                self.cell_size_px
            )));
        }
        if !(1..=MAX_PERIOD).contains(&self.cells_per_group) {
            return Err(GraphPaperError::config(format!(
                "cells_per_group must be in [1, {MAX_PERIOD}], got {}",
                self.cells_per_group
            )));
        }
        if !(1..=MAX_PERIOD).contains(&self.groups_per_cluster) {
            return Err(GraphPaperError::config(format!(
                "groups_per_cluster must be in [1, {MAX_PERIOD}], got {}",
                self.groups_per_cluster
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(GraphPaperError::config(format!(
                "grid size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_SURFACE_EDGE || self.height > MAX_SURFACE_EDGE {
            return Err(GraphPaperError::config(format!(
                "grid size {}x{} exceeds {MAX_SURFACE_EDGE}px per edge",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Stable 64-bit digest of every field, used to skip recomposition of identical configs.
    pub fn fingerprint(&self) -> u64 {
        fn color(h: &mut Xxh3, c: Rgba8) {
            h.update(&[c.r, c.g, c.b, c.a]);
        }
        fn level(h: &mut Xxh3, s: LevelStyle) {
            color(h, s.color);
            h.update(&[s.dash as u8]);
        }

        let mut h = Xxh3::new();
        h.update(&self.cell_size_px.to_bits().to_le_bytes());
        h.update(&self.cells_per_group.to_le_bytes());
        h.update(&self.groups_per_cluster.to_le_bytes());
        h.update(&[self.projection as u8]);
        level(&mut h, self.cell);
        level(&mut h, self.group);
        level(&mut h, self.cluster);
        color(&mut h, self.iso_vertical_color);
        color(&mut h, self.background);
        h.update(&self.width.to_le_bytes());
        h.update(&self.height.to_le_bytes());
        h.digest()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/config.rs"]
mod tests;
