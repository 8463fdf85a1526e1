use image::RgbaImage;

use super::{EffectUniforms, ImageEffect};
use crate::texture::sample_bilinear;

/// Horizontal red/blue displacement at full progress.
pub const CHANNEL_SPREAD: f32 = 0.1;

/// Sample points for the red, green and blue channels.
pub fn channel_sample_points(uv: [f32; 2], progress: f32) -> [[f32; 2]; 3] {
    let shift = progress * CHANNEL_SPREAD;
    [[uv[0] + shift, uv[1]], uv, [uv[0] - shift, uv[1]]]
}

/// Chromatic split: red and blue are read from opposite sides of green.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelSplit;

impl ImageEffect for ChannelSplit {
    fn name(&self) -> &'static str {
        "channel-split"
    }

    fn shade(&self, source: &RgbaImage, uv: [f32; 2], uniforms: &EffectUniforms) -> [f32; 4] {
        let [red_at, green_at, blue_at] = channel_sample_points(uv, uniforms.progress);
        let red = sample_bilinear(source, red_at[0], red_at[1]);
        let green = sample_bilinear(source, green_at[0], green_at[1]);
        let blue = sample_bilinear(source, blue_at[0], blue_at[1]);
        [red[0], green[1], blue[2], 255.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::test_images::gradient;

    fn uniforms(progress: f32) -> EffectUniforms {
        EffectUniforms {
            progress,
            ..EffectUniforms::default()
        }
    }

    #[test]
    fn zero_progress_is_identity() {
        let source = gradient(30, 12);
        let output = ChannelSplit.apply(&source, &uniforms(0.0));
        assert_eq!(output, source);
    }

    #[test]
    fn full_progress_separates_red_and_blue_by_two_tenths() {
        let [red, green, blue] = channel_sample_points([0.4, 0.7], 1.0);
        assert!((red[0] - blue[0] - 0.2).abs() < 1e-6);
        assert_eq!(green, [0.4, 0.7]);
        assert_eq!(red[1], 0.7);
        assert_eq!(blue[1], 0.7);
    }

    #[test]
    fn alpha_is_forced_opaque() {
        let source = RgbaImage::from_pixel(8, 8, image::Rgba([10, 20, 30, 40]));
        let output = ChannelSplit.apply(&source, &uniforms(0.5));
        assert!(output.pixels().all(|pixel| pixel.0 == [10, 20, 30, 255]));
    }

    #[test]
    fn full_progress_pulls_red_from_the_right() {
        // 20 px wide: spread 0.1 is two pixels
        let source = gradient(20, 4);
        let output = ChannelSplit.apply(&source, &uniforms(1.0));
        let pixel = output.get_pixel(10, 1);
        assert_eq!(pixel[0], source.get_pixel(12, 1)[0]);
        assert_eq!(pixel[1], source.get_pixel(10, 1)[1]);
        assert_eq!(pixel[2], source.get_pixel(8, 1)[2]);
    }
}
