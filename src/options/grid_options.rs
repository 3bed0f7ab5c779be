use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{GraphPaperError, GridResult};
use crate::grid::config::{DashStyle, GridConfig, LevelStyle, Projection};

/// Smallest cell size the option layer offers.
pub const MIN_OPTION_CELL_SIZE: u32 = 10;
/// Largest cell size the option layer offers.
pub const MAX_OPTION_CELL_SIZE: u32 = 100;

/// Colors supplied by the host environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Palette {
    /// Foreground color.
    pub primary: Rgba8,
    /// Background color.
    pub secondary: Rgba8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: Rgba8::BLACK,
            secondary: Rgba8::WHITE,
        }
    }
}

/// Layout offered to the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphType {
    /// Square cells.
    #[default]
    Standard,
    /// 30/60-degree diagonals with vertical reference lines.
    Isometric,
}

/// Source of the cell line color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellColorChoice {
    /// Palette primary color.
    Primary,
    /// Explicit color.
    Custom(Rgba8),
}

/// Source of a group, cluster or reference line color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedColorChoice {
    /// Same color as the cell lines.
    Cell,
    /// Palette primary color.
    Primary,
    /// Explicit color.
    Custom(Rgba8),
}

/// Source of the background fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundChoice {
    /// Leave the background transparent.
    None,
    /// Palette secondary color.
    Secondary,
    /// Explicit color.
    Custom(Rgba8),
}

impl CellColorChoice {
    /// Return `true` for [`CellColorChoice::Custom`].
    pub fn is_custom(self) -> bool {
        matches!(self, Self::Custom(_))
    }

    fn resolve(self, palette: &Palette) -> Rgba8 {
        match self {
            Self::Primary => palette.primary,
            Self::Custom(c) => c,
        }
    }
}

impl DerivedColorChoice {
    /// Return `true` for [`DerivedColorChoice::Custom`].
    pub fn is_custom(self) -> bool {
        matches!(self, Self::Custom(_))
    }

    fn resolve(self, palette: &Palette, cell: Rgba8) -> Rgba8 {
        match self {
            Self::Cell => cell,
            Self::Primary => palette.primary,
            Self::Custom(c) => c,
        }
    }
}

impl BackgroundChoice {
    /// Return `true` for [`BackgroundChoice::Custom`].
    pub fn is_custom(self) -> bool {
        matches!(self, Self::Custom(_))
    }

    fn resolve(self, palette: &Palette) -> Rgba8 {
        match self {
            Self::None => Rgba8::transparent(),
            Self::Secondary => palette.secondary,
            Self::Custom(c) => c,
        }
    }
}

/// Host-side option state, as edited in the effect dialog.
///
/// Every field has a default, so a partial JSON document is a valid option set.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Standard or isometric layout.
    pub graph_type: GraphType,
    /// Cell size in pixels.
    pub cell_size: u32,
    /// Cells per group.
    pub group_size: u32,
    /// Groups per cluster.
    pub cluster_size: u32,
    /// Dash pattern of cell lines.
    pub cell_line_style: DashStyle,
    /// Dash pattern of group lines.
    pub group_line_style: DashStyle,
    /// Dash pattern of cluster lines.
    pub cluster_line_style: DashStyle,
    /// Cell line color source.
    pub cell_color: CellColorChoice,
    /// Group line color source.
    pub group_color: DerivedColorChoice,
    /// Cluster line color source.
    pub cluster_color: DerivedColorChoice,
    /// Isometric vertical reference line color source.
    pub iso_vertical_color: DerivedColorChoice,
    /// Background source.
    pub background: BackgroundChoice,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self::with_palette_defaults(&Palette::default())
    }
}

impl GridOptions {
    /// Initial option state for a host whose environment colors are `palette`.
    ///
    /// Custom colors start at the primary color for lines, the primary/secondary average for
    /// the isometric reference lines and the secondary color for the background.
    pub fn with_palette_defaults(palette: &Palette) -> Self {
        Self {
            graph_type: GraphType::Standard,
            cell_size: 10,
            group_size: 5,
            cluster_size: 2,
            cell_line_style: DashStyle::Dotted,
            group_line_style: DashStyle::Dashed,
            cluster_line_style: DashStyle::Solid,
            cell_color: CellColorChoice::Custom(palette.primary),
            group_color: DerivedColorChoice::Cell,
            cluster_color: DerivedColorChoice::Cell,
            iso_vertical_color: DerivedColorChoice::Custom(Rgba8::average(
                palette.primary,
                palette.secondary,
            )),
            background: BackgroundChoice::Custom(palette.secondary),
        }
    }

    /// Parse options from JSON, filling missing fields from [`GridOptions::default`].
    pub fn from_reader<R: std::io::Read>(r: R) -> GridResult<Self> {
        Self::from_reader_with_defaults(r, &Palette::default())
    }

    /// Parse options from JSON, filling missing fields from
    /// [`GridOptions::with_palette_defaults`] for `palette`.
    ///
    /// The document must be a JSON object; its keys replace the palette defaults one by one.
    pub fn from_reader_with_defaults<R: std::io::Read>(
        r: R,
        palette: &Palette,
    ) -> GridResult<Self> {
        let patch: serde_json::Value = serde_json::from_reader(r)
            .map_err(|e| GraphPaperError::serde(format!("parse grid options JSON: {e}")))?;
        let serde_json::Value::Object(patch) = patch else {
            return Err(GraphPaperError::serde("grid options JSON must be an object"));
        };

        let mut merged = serde_json::to_value(Self::with_palette_defaults(palette))
            .map_err(|e| GraphPaperError::serde(format!("encode default grid options: {e}")))?;
        if let serde_json::Value::Object(fields) = &mut merged {
            fields.extend(patch);
        }
        serde_json::from_value(merged)
            .map_err(|e| GraphPaperError::serde(format!("parse grid options JSON: {e}")))
    }

    /// Parse options from a JSON file on disk, with [`GridOptions::default`] for missing fields.
    pub fn from_path(path: impl AsRef<Path>) -> GridResult<Self> {
        Self::from_path_with_defaults(path, &Palette::default())
    }

    /// Parse options from a JSON file on disk, with the defaults of `palette` for missing fields.
    pub fn from_path_with_defaults(path: impl AsRef<Path>, palette: &Palette) -> GridResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            GraphPaperError::serde(format!("open grid options JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader_with_defaults(BufReader::new(f), palette)
    }

    /// Return `true` when the isometric layout is selected.
    pub fn is_isometric(&self) -> bool {
        self.graph_type == GraphType::Isometric
    }

    /// Resolve every color choice against `palette` and build the composer configuration for a
    /// `width x height` region.
    pub fn resolve(&self, palette: &Palette, width: u32, height: u32) -> GridResult<GridConfig> {
        if !(MIN_OPTION_CELL_SIZE..=MAX_OPTION_CELL_SIZE).contains(&self.cell_size) {
            return Err(GraphPaperError::config(format!(
                "cell_size must be in [{MIN_OPTION_CELL_SIZE}, {MAX_OPTION_CELL_SIZE}], got {}",
                self.cell_size
            )));
        }

        let cell = self.cell_color.resolve(palette);
        let config = GridConfig {
            cell_size_px: f64::from(self.cell_size),
            cells_per_group: self.group_size,
            groups_per_cluster: self.cluster_size,
            projection: match self.graph_type {
                GraphType::Standard => Projection::Orthogonal,
                GraphType::Isometric => Projection::Isometric,
            },
            cell: LevelStyle {
                color: cell,
                dash: self.cell_line_style,
            },
            group: LevelStyle {
                color: self.group_color.resolve(palette, cell),
                dash: self.group_line_style,
            },
            cluster: LevelStyle {
                color: self.cluster_color.resolve(palette, cell),
                dash: self.cluster_line_style,
            },
            iso_vertical_color: self.iso_vertical_color.resolve(palette, cell),
            background: self.background.resolve(palette),
            width,
            height,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/options/grid_options.rs"]
mod tests;
