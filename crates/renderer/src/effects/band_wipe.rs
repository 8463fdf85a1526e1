use image::RgbaImage;

use super::{EffectUniforms, ImageEffect};
use crate::texture::sample_bilinear;

/// Leftward sampling shift per horizontal quarter at full progress.
pub const BAND_SHIFTS: [f32; 4] = [0.0, 0.25, 0.35, 0.65];

fn band_index(x: f32) -> usize {
    if x < 0.25 {
        0
    } else if x < 0.5 {
        1
    } else if x < 0.75 {
        2
    } else {
        3
    }
}

/// Horizontal amount subtracted from the sample coordinate at `x`.
pub fn band_offset(x: f32, progress: f32) -> f32 {
    BAND_SHIFTS[band_index(x)] * progress
}

/// Curtain reveal: later quarters of the image slide further than earlier ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BandWipe;

impl ImageEffect for BandWipe {
    fn name(&self) -> &'static str {
        "band-wipe"
    }

    fn shade(&self, source: &RgbaImage, uv: [f32; 2], uniforms: &EffectUniforms) -> [f32; 4] {
        let x = uv[0] - band_offset(uv[0], uniforms.progress);
        sample_bilinear(source, x, uv[1])
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
        let source = gradient(40, 10);
        let output = BandWipe.apply(&source, &uniforms(0.0));
        assert_eq!(output, source);
    }

    #[test]
    fn last_band_shifts_furthest_at_full_progress() {
        let offsets: Vec<f32> = [0.1, 0.3, 0.6, 0.9]
            .iter()
            .map(|&x| band_offset(x, 1.0))
            .collect();
        assert_eq!(offsets, vec![0.0, 0.25, 0.35, 0.65]);
        let largest = offsets.iter().cloned().fold(f32::MIN, f32::max);
        assert_eq!(largest, offsets[3]);
    }

    #[test]
    fn band_edges_belong_to_the_upper_band() {
        assert_eq!(band_offset(0.25, 1.0), 0.25);
        assert_eq!(band_offset(0.5, 1.0), 0.35);
        assert_eq!(band_offset(0.75, 1.0), 0.65);
        assert_eq!(band_offset(0.2499, 1.0), 0.0);
    }

    #[test]
    fn first_band_is_untouched_at_any_progress() {
        let source = gradient(40, 10);
        let output = BandWipe.apply(&source, &uniforms(1.0));
        for y in 0..10 {
            for x in 0..10 {
                assert_eq!(output.get_pixel(x, y), source.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn shifted_band_samples_to_the_left() {
        // 40 px wide: pixel 30 sits in band 3 and reads 0.65 * 40 = 26 px left
        let source = gradient(40, 10);
        let output = BandWipe.apply(&source, &uniforms(1.0));
        assert_eq!(output.get_pixel(30, 4), source.get_pixel(4, 4));
    }
}
