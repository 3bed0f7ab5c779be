use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::foundation::core::PixelRect;
use crate::foundation::error::GridResult;
use crate::grid::config::GridConfig;
use crate::render::backend::{ComposedBuffer, GridBackend, Surface};
use crate::render::cpu::CpuBackend;
use crate::render::tiles::{
    CancelCheck, PaintOutcome, PaintStats, TileOpts, Vec2, paint, paint_parallel,
};

/// Compose/skip counters of a [`GridSession`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Configurations actually composed, including the initial one.
    pub composes: u64,
    /// Reconfigurations skipped because the fingerprint was unchanged.
    pub compose_skips: u64,
}

struct Current {
    config: GridConfig,
    fingerprint: u64,
    generation: u64,
    buffer: Arc<ComposedBuffer>,
}

/// Compose-once, paint-many owner of the current grid image.
///
/// Painting works from an `Arc` snapshot taken up front, so a concurrent [`reconfigure`]
/// never changes the pixels an in-flight paint reads. A replacement buffer is composed outside
/// the lock and swapped in atomically. The session keeps one [`CpuBackend`], so recomposition
/// reuses its render context while the size stays the same.
///
/// [`reconfigure`]: GridSession::reconfigure
pub struct GridSession {
    backend: Mutex<CpuBackend>,
    current: RwLock<Current>,
    composes: AtomicU64,
    compose_skips: AtomicU64,
}

impl GridSession {
    /// Compose `config` as generation 1.
    #[tracing::instrument(skip(config), fields(width = config.width, height = config.height))]
    pub fn new(config: GridConfig) -> GridResult<Self> {
        let mut backend = CpuBackend::new();
        let buffer = Arc::new(backend.compose(&config)?);
        let fingerprint = config.fingerprint();
        Ok(Self {
            backend: Mutex::new(backend),
            current: RwLock::new(Current {
                config,
                fingerprint,
                generation: 1,
                buffer,
            }),
            composes: AtomicU64::new(1),
            compose_skips: AtomicU64::new(0),
        })
    }

    /// Switch to `config`, recomposing only when it differs from the current one.
    ///
    /// Returns `true` when a new buffer was swapped in. On error the current generation is kept.
    #[tracing::instrument(skip(self, config), fields(width = config.width, height = config.height))]
    pub fn reconfigure(&self, config: GridConfig) -> GridResult<bool> {
        let fingerprint = config.fingerprint();
        if self.read().fingerprint == fingerprint {
            self.compose_skips.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("configuration unchanged, compose skipped");
            return Ok(false);
        }

        let buffer = {
            let mut backend = self.backend.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::new(backend.compose(&config)?)
        };
        self.composes.fetch_add(1, Ordering::Relaxed);

        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if current.fingerprint == fingerprint {
            // Another caller installed the same configuration while we composed.
            return Ok(false);
        }
        current.config = config;
        current.fingerprint = fingerprint;
        current.generation += 1;
        current.buffer = buffer;
        tracing::debug!(generation = current.generation, "composed buffer replaced");
        Ok(true)
    }

    /// Buffer of the current generation.
    pub fn snapshot(&self) -> Arc<ComposedBuffer> {
        Arc::clone(&self.read().buffer)
    }

    /// Generation counter, starting at 1 and bumped on every swap.
    pub fn generation(&self) -> u64 {
        self.read().generation
    }

    /// Configuration of the current generation.
    pub fn config(&self) -> GridConfig {
        self.read().config.clone()
    }

    /// Counters accumulated since construction.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            composes: self.composes.load(Ordering::Relaxed),
            compose_skips: self.compose_skips.load(Ordering::Relaxed),
        }
    }

    /// Paint one tile of `dst` from the current generation.
    pub fn paint_tile(
        &self,
        dst: &mut Surface,
        origin: Vec2,
        tile: PixelRect,
        cancel: &dyn CancelCheck,
    ) -> GridResult<PaintOutcome> {
        let buffer = self.snapshot();
        paint(dst, &buffer, origin, tile, cancel)
    }

    /// Paint `region` of `dst` from the current generation in parallel bands.
    pub fn paint_region_parallel(
        &self,
        dst: &mut Surface,
        origin: Vec2,
        region: PixelRect,
        opts: &TileOpts,
        cancel: &dyn CancelCheck,
    ) -> GridResult<PaintStats> {
        let buffer = self.snapshot();
        paint_parallel(dst, &buffer, origin, region, opts, cancel)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Current> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/grid_session.rs"]
mod tests;
