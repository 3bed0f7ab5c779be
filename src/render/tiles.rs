use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::foundation::core::PixelRect;
use crate::foundation::error::{GraphPaperError, GridResult};
use crate::render::backend::{ComposedBuffer, Surface};
use crate::render::sample::bilinear_sample;

pub use kurbo::Vec2;

/// Cooperative cancellation flag polled by the resampler at the start of every row.
pub trait CancelCheck: Sync {
    /// Return `true` once painting should stop.
    fn is_cancelled(&self) -> bool;
}

impl CancelCheck for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

/// Never cancels.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverCancel;

impl CancelCheck for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Adapter for poll closures supplied by the host.
pub struct CancelFn<F>(pub F);

impl<F> CancelCheck for CancelFn<F>
where
    F: Fn() -> bool + Sync,
{
    fn is_cancelled(&self) -> bool {
        (self.0)()
    }
}

/// Shareable cancellation flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every paint observing this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Clear a previous cancellation so the token can drive the next frame.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

impl CancelCheck for CancelToken {
    fn is_cancelled(&self) -> bool {
        self.0.is_cancelled()
    }
}

/// Result of painting one tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaintOutcome {
    /// Every row of the tile was written.
    Completed {
        /// Rows written.
        rows_painted: u32,
    },
    /// Cancellation was observed; rows after `rows_painted` were left untouched.
    Cancelled {
        /// Rows written before the flag was seen.
        rows_painted: u32,
    },
}

impl PaintOutcome {
    /// Rows written by the call.
    pub fn rows_painted(self) -> u32 {
        match self {
            Self::Completed { rows_painted } | Self::Cancelled { rows_painted } => rows_painted,
        }
    }

    /// Return `true` when the call stopped early.
    pub fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Banding and threading controls for [`paint_parallel`].
#[derive(Clone, Debug)]
pub struct TileOpts {
    /// Rows per band; each band is one unit of parallel work.
    pub band_rows: u32,
    /// Optional explicit worker thread count. `None` uses the global rayon pool.
    pub threads: Option<usize>,
}

impl Default for TileOpts {
    fn default() -> Self {
        Self {
            band_rows: 64,
            threads: None,
        }
    }
}

/// Aggregated counters for a banded paint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaintStats {
    /// Bands the region was split into.
    pub tiles_total: u64,
    /// Bands painted to completion.
    pub tiles_completed: u64,
    /// Bands that observed cancellation.
    pub tiles_cancelled: u64,
    /// Rows written across all bands.
    pub rows_painted: u64,
}

impl PaintStats {
    /// Return `true` when no band was cut short.
    pub fn is_complete(&self) -> bool {
        self.tiles_cancelled == 0 && self.tiles_completed == self.tiles_total
    }

    fn record(mut self, outcome: PaintOutcome) -> Self {
        self.tiles_total += 1;
        self.rows_painted += u64::from(outcome.rows_painted());
        if outcome.is_cancelled() {
            self.tiles_cancelled += 1;
        } else {
            self.tiles_completed += 1;
        }
        self
    }

    fn merge(self, other: Self) -> Self {
        Self {
            tiles_total: self.tiles_total + other.tiles_total,
            tiles_completed: self.tiles_completed + other.tiles_completed,
            tiles_cancelled: self.tiles_cancelled + other.tiles_cancelled,
            rows_painted: self.rows_painted + other.rows_painted,
        }
    }
}

/// Resample `composed` into `tile` of `dst`.
///
/// Destination pixel `(x, y)` receives `bilinear_sample(composed, x - origin.x, y - origin.y)`.
/// The tile is clipped to the destination bounds. Cancellation is polled before every row.
pub fn paint(
    dst: &mut Surface,
    composed: &ComposedBuffer,
    origin: Vec2,
    tile: PixelRect,
    cancel: &dyn CancelCheck,
) -> GridResult<PaintOutcome> {
    dst.validate()?;
    let tile = tile.intersect(dst.bounds());
    if tile.is_empty() {
        return Ok(PaintOutcome::Completed { rows_painted: 0 });
    }

    let stride = dst.stride();
    let start = tile.y as usize * stride;
    let end = tile.bottom() as usize * stride;
    let outcome = paint_rows(&mut dst.data[start..end], stride, tile, composed, origin, cancel);
    if outcome.is_cancelled() {
        tracing::debug!(?tile, rows = outcome.rows_painted(), "tile paint cancelled");
    }
    Ok(outcome)
}

/// Split `region` into full-width bands of `band_rows` rows.
pub fn bands(region: PixelRect, band_rows: u32) -> Vec<PixelRect> {
    let band_rows = band_rows.max(1);
    let mut out = Vec::new();
    let mut y = region.y;
    while y < region.bottom() {
        let h = band_rows.min(region.bottom() - y);
        out.push(PixelRect::new(region.x, y, region.width, h));
        y += h;
    }
    out
}

/// Resample `composed` into `region` of `dst`, painting disjoint row bands in parallel.
///
/// Produces the same pixels as calling [`paint`] on every band of [`bands`] in order.
pub fn paint_parallel(
    dst: &mut Surface,
    composed: &ComposedBuffer,
    origin: Vec2,
    region: PixelRect,
    opts: &TileOpts,
    cancel: &dyn CancelCheck,
) -> GridResult<PaintStats> {
    if opts.band_rows == 0 {
        return Err(GraphPaperError::validation("band_rows must be >= 1"));
    }
    dst.validate()?;
    let region = region.intersect(dst.bounds());
    if region.is_empty() {
        return Ok(PaintStats::default());
    }

    let stride = dst.stride();
    let start = region.y as usize * stride;
    let end = region.bottom() as usize * stride;
    let rows = &mut dst.data[start..end];
    let band_rows = opts.band_rows;

    let mut run = move || {
        rows.par_chunks_mut(stride * band_rows as usize)
            .enumerate()
            .map(|(i, band)| {
                let y = region.y + i as u32 * band_rows;
                let height = (band.len() / stride) as u32;
                let tile = PixelRect::new(region.x, y, region.width, height);
                let outcome = paint_rows(band, stride, tile, composed, origin, cancel);
                tracing::trace!(band = i, rows = outcome.rows_painted(), "band painted");
                PaintStats::default().record(outcome)
            })
            .reduce(PaintStats::default, PaintStats::merge)
    };

    let stats = match opts.threads {
        Some(n) => build_thread_pool(n)?.install(run),
        None => run(),
    };
    tracing::debug!(
        tiles = stats.tiles_total,
        cancelled = stats.tiles_cancelled,
        rows = stats.rows_painted,
        "parallel paint finished"
    );
    Ok(stats)
}

/// Paint `tile` into `rows`, whose first byte is the start of destination row `tile.y`.
fn paint_rows(
    rows: &mut [u8],
    stride: usize,
    tile: PixelRect,
    composed: &ComposedBuffer,
    origin: Vec2,
    cancel: &dyn CancelCheck,
) -> PaintOutcome {
    let mut painted = 0u32;
    for (ry, row) in rows.chunks_exact_mut(stride).enumerate() {
        if cancel.is_cancelled() {
            return PaintOutcome::Cancelled {
                rows_painted: painted,
            };
        }
        let sy = f64::from(tile.y + ry as u32) - origin.y;
        for x in tile.x..tile.right() {
            let sx = f64::from(x) - origin.x;
            let px = bilinear_sample(composed, sx, sy).to_array();
            let i = x as usize * 4;
            row[i..i + 4].copy_from_slice(&px);
        }
        painted += 1;
    }
    PaintOutcome::Completed {
        rows_painted: painted,
    }
}

fn build_thread_pool(threads: usize) -> GridResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(GraphPaperError::validation(
            "tile threading 'threads' must be >= 1 when set",
        ));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| {
            GraphPaperError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}"))
        })
}

#[cfg(test)]
#[path = "../../tests/unit/render/tiles.rs"]
mod tests;
