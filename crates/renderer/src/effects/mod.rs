//! Full-screen image effects applied after the scene render.
//!
//! Each effect is a pure per-pixel function of the source image and its
//! [`EffectUniforms`]. The set is closed: [`Effect`] lists every stage the
//! pipeline can hold, and [`EffectPass`] pairs one with its uniform values.

mod band_wipe;
mod channel_split;

use image::RgbaImage;

use crate::texture::{pixel_center, to_rgba8};

pub use band_wipe::{band_offset, BandWipe, BAND_SHIFTS};
pub use channel_split::{channel_sample_points, ChannelSplit, CHANNEL_SPREAD};

/// Uniform block shared by both effects.
///
/// Only `progress` feeds the shading. `output_size` mirrors the pipeline
/// size, and `center`, `angle`, `scale` and `texel_grid` are carried so the
/// set matches the shader uniform block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectUniforms {
    /// 0 is the identity, 1 the full effect.
    pub progress: f32,
    pub center: [f32; 2],
    pub angle: f32,
    pub scale: f32,
    /// Nominal texel grid size.
    pub texel_grid: [f32; 2],
    /// Size of the image this pass writes, kept in sync with the pipeline.
    pub output_size: (u32, u32),
}

impl Default for EffectUniforms {
    fn default() -> Self {
        Self {
            progress: 0.0,
            center: [0.5, 0.5],
            angle: 1.57,
            scale: 1.0,
            texel_grid: [256.0, 256.0],
            output_size: (1, 1),
        }
    }
}

/// Capability every pipeline stage after the scene render provides.
pub trait ImageEffect {
    fn name(&self) -> &'static str;

    /// Colour for the output pixel at normalised `uv`, channels in 0..=255.
    fn shade(&self, source: &RgbaImage, uv: [f32; 2], uniforms: &EffectUniforms) -> [f32; 4];

    fn apply(&self, source: &RgbaImage, uniforms: &EffectUniforms) -> RgbaImage {
        let (width, height) = source.dimensions();
        RgbaImage::from_fn(width, height, |x, y| {
            let uv = pixel_center(x, y, width, height);
            to_rgba8(self.shade(source, uv, uniforms))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    BandWipe,
    ChannelSplit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    BandWipe(BandWipe),
    ChannelSplit(ChannelSplit),
}

impl Effect {
    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::BandWipe(_) => EffectKind::BandWipe,
            Effect::ChannelSplit(_) => EffectKind::ChannelSplit,
        }
    }
}

impl From<EffectKind> for Effect {
    fn from(kind: EffectKind) -> Self {
        match kind {
            EffectKind::BandWipe => Effect::BandWipe(BandWipe),
            EffectKind::ChannelSplit => Effect::ChannelSplit(ChannelSplit),
        }
    }
}

impl ImageEffect for Effect {
    fn name(&self) -> &'static str {
        match self {
            Effect::BandWipe(effect) => effect.name(),
            Effect::ChannelSplit(effect) => effect.name(),
        }
    }

    fn shade(&self, source: &RgbaImage, uv: [f32; 2], uniforms: &EffectUniforms) -> [f32; 4] {
        match self {
            Effect::BandWipe(effect) => effect.shade(source, uv, uniforms),
            Effect::ChannelSplit(effect) => effect.shade(source, uv, uniforms),
        }
    }
}

/// An effect and the uniform values it is currently driven with.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectPass {
    effect: Effect,
    uniforms: EffectUniforms,
}

impl EffectPass {
    pub fn new(kind: EffectKind, output_size: (u32, u32)) -> Self {
        Self {
            effect: kind.into(),
            uniforms: EffectUniforms {
                output_size,
                ..EffectUniforms::default()
            },
        }
    }

    pub fn kind(&self) -> EffectKind {
        self.effect.kind()
    }

    pub fn uniforms(&self) -> &EffectUniforms {
        &self.uniforms
    }

    pub fn set_progress(&mut self, progress: f32) {
        self.uniforms.progress = progress;
    }

    pub fn set_output_size(&mut self, size: (u32, u32)) {
        self.uniforms.output_size = size;
    }

    pub fn apply(&self, source: &RgbaImage) -> RgbaImage {
        self.effect.apply(source, &self.uniforms)
    }
}
