//! Graph paper grid renderer.
//!
//! A grid is described by an immutable [`GridConfig`]. Rendering happens in two steps:
//!
//! - [`compose`] rasterizes the whole grid once into a premultiplied [`ComposedBuffer`]
//! - [`paint`] / [`paint_parallel`] bilinearly resample that buffer into destination tiles,
//!   translated by a selection origin and cancellable per row
//!
//! [`GridSession`] ties the two together for hosts that reconfigure and repaint repeatedly, and
//! [`GridOptions`] resolves host option state into a [`GridConfig`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Stroke plan compilation.
pub mod compile;
/// Grid parameters.
pub mod grid;
/// Host option boundary.
pub mod options;
/// Rasterization and resampling.
pub mod render;
/// Session-oriented rendering.
pub mod session;

pub use crate::foundation::core::{Line, PixelRect, Point, Rgba8, Rgba8Premul};
pub use crate::foundation::error::{GraphPaperError, GridResult};

pub use crate::compile::plan::{
    GridPlan, IsoMetrics, LineKind, LineStyle, Orientation, OrthoCounts, Segment, Smoothing,
    StrokePass, compile_grid,
};
pub use crate::grid::classify::{Level, classify};
pub use crate::grid::config::{DashStyle, GridConfig, LevelStyle, Projection};
pub use crate::options::grid_options::{
    BackgroundChoice, CellColorChoice, DerivedColorChoice, GraphType, GridOptions, Palette,
};
pub use crate::options::rules::{OptionField, enablement, is_enabled};
pub use crate::render::backend::{ComposedBuffer, GridBackend, Surface, compose};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::sample::bilinear_sample;
pub use crate::render::tiles::{
    CancelCheck, CancelFn, CancelToken, NeverCancel, PaintOutcome, PaintStats, TileOpts, Vec2,
    bands, paint, paint_parallel,
};
pub use crate::session::grid_session::{GridSession, SessionStats};
