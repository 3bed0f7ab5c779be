use crate::foundation::core::Rgba8Premul;
use crate::render::backend::ComposedBuffer;

/// Bilinearly sample `src` at fractional pixel coordinates.
///
/// Pixel `(i, j)` sits at integer coordinates, so integer inputs return the exact source pixel.
/// Coordinates outside the buffer clamp to the nearest edge; NaN is treated as 0.
pub fn bilinear_sample(src: &ComposedBuffer, x: f64, y: f64) -> Rgba8Premul {
    let max_x = f64::from(src.width() - 1);
    let max_y = f64::from(src.height() - 1);
    let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, max_x) };
    let y = if y.is_nan() { 0.0 } else { y.clamp(0.0, max_y) };

    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let p00 = src.pixel_clamped(x0, y0);
    if fx == 0.0 && fy == 0.0 {
        return p00;
    }
    let p10 = src.pixel_clamped(x0 + 1, y0);
    let p01 = src.pixel_clamped(x0, y0 + 1);
    let p11 = src.pixel_clamped(x0 + 1, y0 + 1);

    let w00 = (1.0 - fx) * (1.0 - fy);
    let w10 = fx * (1.0 - fy);
    let w01 = (1.0 - fx) * fy;
    let w11 = fx * fy;

    let (a, b, c, d) = (p00.to_array(), p10.to_array(), p01.to_array(), p11.to_array());
    let mut out = [0u8; 4];
    for i in 0..4 {
        let v = f64::from(a[i]) * w00
            + f64::from(b[i]) * w10
            + f64::from(c[i]) * w01
            + f64::from(d[i]) * w11;
        out[i] = v.round().clamp(0.0, 255.0) as u8;
    }
    Rgba8Premul::from_array(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/sample.rs"]
mod tests;
