//! Rasterization and resampling of composed grids.

/// Composed buffer, destination surface and backend trait.
pub mod backend;
/// `vello_cpu` rasterizer.
pub mod cpu;
/// Bilinear sampling.
pub mod sample;
/// Tiled, cancellable, parallel resampling.
pub mod tiles;
