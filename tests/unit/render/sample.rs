use super::*;

fn buffer_2x2() -> ComposedBuffer {
    #[rustfmt::skip]
    let data = vec![
        0, 0, 0, 0,         200, 100, 0, 200,
        0, 0, 100, 100,     255, 255, 255, 255,
    ];
    ComposedBuffer::from_premul_rgba8(2, 2, data).unwrap()
}

#[test]
fn integer_coordinates_return_exact_pixels() {
    let buf = buffer_2x2();
    for y in 0..2 {
        for x in 0..2 {
            assert_eq!(
                bilinear_sample(&buf, f64::from(x), f64::from(y)),
                buf.pixel_clamped(i64::from(x), i64::from(y))
            );
        }
    }
}

#[test]
fn midpoint_blends_neighbors() {
    let buf = buffer_2x2();
    let px = bilinear_sample(&buf, 0.5, 0.0);
    assert_eq!(px.to_array(), [100, 50, 0, 100]);

    let center = bilinear_sample(&buf, 0.5, 0.5);
    // (0 + 200 + 0 + 255) / 4 = 113.75
    assert_eq!(center.r, 114);
    // (0 + 200 + 100 + 255) / 4 = 138.75
    assert_eq!(center.a, 139);
}

#[test]
fn out_of_bounds_clamps_to_edges() {
    let buf = buffer_2x2();
    assert_eq!(bilinear_sample(&buf, -5.0, -5.0), buf.pixel_clamped(0, 0));
    assert_eq!(bilinear_sample(&buf, 40.0, -1.0), buf.pixel_clamped(1, 0));
    assert_eq!(bilinear_sample(&buf, 1.7, 9.0), buf.pixel_clamped(1, 1));
    assert_eq!(bilinear_sample(&buf, -0.5, 1.0), buf.pixel_clamped(0, 1));
    assert_eq!(
        bilinear_sample(&buf, f64::INFINITY, f64::NEG_INFINITY),
        buf.pixel_clamped(1, 0)
    );
    assert_eq!(bilinear_sample(&buf, f64::NAN, f64::NAN), buf.pixel_clamped(0, 0));
}

#[test]
fn single_pixel_buffer_is_constant() {
    let buf = ComposedBuffer::from_premul_rgba8(1, 1, vec![9, 8, 7, 255]).unwrap();
    for (x, y) in [(0.0, 0.0), (0.3, 0.9), (-2.0, 3.0)] {
        assert_eq!(bilinear_sample(&buf, x, y).to_array(), [9, 8, 7, 255]);
    }
}
