use crate::{
    compile::plan::{GridPlan, compile_grid},
    foundation::core::{PixelRect, Rgba8Premul},
    foundation::error::{GraphPaperError, GridResult},
    grid::config::GridConfig,
};

/// A fully composed grid image.
///
/// Pixels are **premultiplied** RGBA8, tightly packed, row-major. The buffer is read-only once
/// produced; a configuration change produces a new buffer instead of mutating this one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposedBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ComposedBuffer {
    /// Wrap premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> GridResult<Self> {
        if width == 0 || height == 0 {
            return Err(GraphPaperError::validation(
                "composed buffer must have a non-zero size",
            ));
        }
        check_len(width, height, data.len(), "composed buffer")?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bounds anchored at the origin.
    pub fn bounds(&self) -> PixelRect {
        PixelRect::from_size(self.width, self.height)
    }

    /// Pixel at integer coordinates clamped into the buffer.
    pub fn pixel_clamped(&self, x: i64, y: i64) -> Rgba8Premul {
        let cx = x.clamp(0, i64::from(self.width) - 1) as usize;
        let cy = y.clamp(0, i64::from(self.height) - 1) as usize;
        let i = (cy * self.width as usize + cx) * 4;
        Rgba8Premul::from_array([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}

/// Caller-owned destination image the resampler writes into.
///
/// Pixels are premultiplied RGBA8, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes.
    pub data: Vec<u8>,
}

impl Surface {
    /// Fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Bounds anchored at the origin.
    pub fn bounds(&self) -> PixelRect {
        PixelRect::from_size(self.width, self.height)
    }

    /// Pixel at `(x, y)`, `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8Premul> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some(Rgba8Premul::from_array([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]))
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }

    pub(crate) fn validate(&self) -> GridResult<()> {
        check_len(self.width, self.height, self.data.len(), "destination surface")
    }
}

fn check_len(width: u32, height: u32, len: usize, what: &str) -> GridResult<()> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| GraphPaperError::validation(format!("{what} size overflow")))?;
    if len != expected {
        return Err(GraphPaperError::validation(format!(
            "{what} expects {expected} bytes for {width}x{height}, got {len}"
        )));
    }
    Ok(())
}

/// A rasterizer that turns a compiled [`GridPlan`] into a [`ComposedBuffer`].
pub trait GridBackend {
    /// Execute `plan` and read back the composed pixels.
    fn rasterize(&mut self, plan: &GridPlan) -> GridResult<ComposedBuffer>;

    /// Compile and rasterize `config` in one step.
    fn compose(&mut self, config: &GridConfig) -> GridResult<ComposedBuffer> {
        let plan = compile_grid(config)?;
        self.rasterize(&plan)
    }
}

/// Compose `config` with a fresh CPU backend.
///
/// Deterministic: identical configurations produce bit-identical buffers. Invalid
/// configurations are rejected before any pixels are produced.
pub fn compose(config: &GridConfig) -> GridResult<ComposedBuffer> {
    crate::render::cpu::CpuBackend::new().compose(config)
}
