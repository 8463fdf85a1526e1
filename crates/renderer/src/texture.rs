//! CPU texture sampling shared by the rasteriser and the effect passes.

use image::{Rgba, RgbaImage};

/// Bilinear sample at normalised `(u, v)` with edge clamping. `v` grows
/// downwards. Channels are returned in the 0..=255 range.
pub(crate) fn sample_bilinear(image: &RgbaImage, u: f32, v: f32) -> [f32; 4] {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return [0.0; 4];
    }

    let x = u * width as f32 - 0.5;
    let y = v * height as f32 - 0.5;
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;

    let max_x = width as i64 - 1;
    let max_y = height as i64 - 1;
    let clamp_x = |value: i64| value.clamp(0, max_x) as u32;
    let clamp_y = |value: i64| value.clamp(0, max_y) as u32;
    let ix = x0 as i64;
    let iy = y0 as i64;
    let (left, right) = (clamp_x(ix), clamp_x(ix + 1));
    let (top, bottom) = (clamp_y(iy), clamp_y(iy + 1));

    let tl = image.get_pixel(left, top).0;
    let tr = image.get_pixel(right, top).0;
    let bl = image.get_pixel(left, bottom).0;
    let br = image.get_pixel(right, bottom).0;

    let mut out = [0.0; 4];
    for channel in 0..4 {
        let upper = tl[channel] as f32 * (1.0 - fx) + tr[channel] as f32 * fx;
        let lower = bl[channel] as f32 * (1.0 - fx) + br[channel] as f32 * fx;
        out[channel] = upper * (1.0 - fy) + lower * fy;
    }
    out
}

/// Normalised coordinate of the centre of pixel `(x, y)`.
pub(crate) fn pixel_center(x: u32, y: u32, width: u32, height: u32) -> [f32; 2] {
    [
        (x as f32 + 0.5) / width as f32,
        (y as f32 + 0.5) / height as f32,
    ]
}

pub(crate) fn to_rgba8(color: [f32; 4]) -> Rgba<u8> {
    Rgba(color.map(|channel| channel.round().clamp(0.0, 255.0) as u8))
}
