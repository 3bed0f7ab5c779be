use crate::compile::plan::{GridPlan, LineStyle, Orientation, Segment, Smoothing, StrokePass};
use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{GraphPaperError, GridResult};
use crate::render::backend::{ComposedBuffer, GridBackend};

/// CPU backend powered by `vello_cpu` for stroke rasterization.
///
/// The render context is kept between calls and reused while the surface size stays the same.
#[derive(Default)]
pub struct CpuBackend {
    ctx: Option<vello_cpu::RenderContext>,
}

impl CpuBackend {
    /// Create a backend with no cached render context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Size of the cached render context, `None` before the first rasterization.
    pub fn cached_size(&self) -> Option<(u16, u16)> {
        self.ctx.as_ref().map(|ctx| (ctx.width(), ctx.height()))
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> GridResult<R>,
    ) -> GridResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }
}

impl GridBackend for CpuBackend {
    #[tracing::instrument(skip(self, plan), fields(width = plan.width, height = plan.height))]
    fn rasterize(&mut self, plan: &GridPlan) -> GridResult<ComposedBuffer> {
        let width = surface_edge(plan.width, "width")?;
        let height = surface_edge(plan.height, "height")?;

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        self.with_ctx_mut(width, height, |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

            if plan.background.a > 0 {
                ctx.set_paint(color_to_cpu(plan.background));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(plan.width),
                    f64::from(plan.height),
                ));
            }

            for pass in &plan.passes {
                draw_pass(ctx, pass);
            }

            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;

        ComposedBuffer::from_premul_rgba8(
            plan.width,
            plan.height,
            pixmap.data_as_u8_slice().to_vec(),
        )
    }
}

fn surface_edge(v: u32, what: &str) -> GridResult<u16> {
    v.try_into()
        .map_err(|_| GraphPaperError::config(format!("surface {what} exceeds u16: {v}")))
}

fn draw_pass(ctx: &mut vello_cpu::RenderContext, pass: &StrokePass) {
    if pass.style.color.a == 0 {
        return;
    }
    ctx.set_paint(color_to_cpu(pass.style.color));
    ctx.set_stroke(stroke_for(&pass.style));
    for seg in &pass.segments {
        let (p0, p1) = segment_endpoints(seg, &pass.style);
        let mut path = vello_cpu::kurbo::BezPath::new();
        path.move_to(point_to_cpu(p0));
        path.line_to(point_to_cpu(p1));
        ctx.stroke_path(&path);
    }
}

fn stroke_for(style: &LineStyle) -> vello_cpu::kurbo::Stroke {
    let stroke =
        vello_cpu::kurbo::Stroke::new(style.width).with_caps(vello_cpu::kurbo::Cap::Butt);
    let dashes = style.dash_lengths();
    if dashes.is_empty() {
        stroke
    } else {
        stroke.with_dashes(0.0, dashes)
    }
}

/// Endpoints as drawn; crisp axis-aligned segments are moved onto the pixel grid.
pub(crate) fn segment_endpoints(seg: &Segment, style: &LineStyle) -> (Point, Point) {
    let (p0, p1) = (seg.line.p0, seg.line.p1);
    if style.smoothing != Smoothing::Crisp {
        return (p0, p1);
    }
    match seg.orientation {
        Orientation::Vertical => {
            let x = snap_to_pixel_grid(p0.x, style.width);
            (Point::new(x, p0.y), Point::new(x, p1.y))
        }
        Orientation::Horizontal => {
            let y = snap_to_pixel_grid(p0.y, style.width);
            (Point::new(p0.x, y), Point::new(p1.x, y))
        }
        Orientation::DiagonalLeft | Orientation::DiagonalRight => (p0, p1),
    }
}

/// Center coordinate at which a stroke of `width` covers whole pixels.
///
/// Odd widths sit on a pixel center, even widths on a pixel edge.
pub(crate) fn snap_to_pixel_grid(c: f64, width: f64) -> f64 {
    let w = width.round().max(1.0) as i64;
    if w % 2 == 1 { c.floor() + 0.5 } else { c.round() }
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
