use image::RgbaImage;

use crate::camera::PerspectiveCamera;
use crate::effects::{EffectKind, EffectPass};
use crate::raster::render_scene;
use crate::scene::SceneModel;

/// Fixed effect order applied after the scene render.
pub const EFFECT_ORDER: [EffectKind; 2] = [EffectKind::BandWipe, EffectKind::ChannelSplit];

/// Offscreen size for a viewport at `render_scale`, at least 1 px per axis.
pub fn scaled_size((width, height): (u32, u32), render_scale: f32) -> (u32, u32) {
    let scale = |value: u32| ((value as f32 * render_scale).round() as u32).max(1);
    (scale(width), scale(height))
}

/// Scene render followed by the ordered effect passes. Holds no pixels
/// between frames.
#[derive(Debug, Clone)]
pub struct PassPipeline {
    viewport: (u32, u32),
    render_scale: f32,
    size: (u32, u32),
    passes: Vec<EffectPass>,
}

impl PassPipeline {
    pub fn new(viewport: (u32, u32), render_scale: f32) -> Self {
        let size = scaled_size(viewport, render_scale);
        let passes = EFFECT_ORDER
            .iter()
            .map(|&kind| EffectPass::new(kind, size))
            .collect();
        Self {
            viewport,
            render_scale,
            size,
            passes,
        }
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Size of every image the pipeline produces.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn render_scale(&self) -> f32 {
        self.render_scale
    }

    pub fn passes(&self) -> &[EffectPass] {
        &self.passes
    }

    /// Pushes a new viewport size through every stage.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.size = scaled_size(self.viewport, self.render_scale);
        for pass in &mut self.passes {
            pass.set_output_size(self.size);
        }
        tracing::debug!(
            width,
            height,
            render_width = self.size.0,
            render_height = self.size.1,
            "pass pipeline resized"
        );
    }

    pub fn set_progress(&mut self, kind: EffectKind, progress: f32) {
        for pass in self.passes.iter_mut().filter(|pass| pass.kind() == kind) {
            pass.set_progress(progress);
        }
    }

    pub fn progress(&self, kind: EffectKind) -> Option<f32> {
        self.passes
            .iter()
            .find(|pass| pass.kind() == kind)
            .map(|pass| pass.uniforms().progress)
    }

    pub fn render(&self, scene: &SceneModel, camera: &PerspectiveCamera) -> RgbaImage {
        let frame = render_scene(scene, camera, self.size);
        self.passes
            .iter()
            .fold(frame, |image, pass| pass.apply(&image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::demo_assets;
    use crate::scene::SceneSettings;

    #[test]
    fn effects_run_in_fixed_order() {
        let pipeline = PassPipeline::new((64, 36), 1.0);
        let kinds: Vec<_> = pipeline.passes().iter().map(EffectPass::kind).collect();
        assert_eq!(kinds, vec![EffectKind::BandWipe, EffectKind::ChannelSplit]);
    }

    #[test]
    fn resize_reaches_every_stage() {
        let mut pipeline = PassPipeline::new((1280, 720), 1.0);
        pipeline.resize(800, 600);
        assert_eq!(pipeline.size(), (800, 600));
        pipeline.resize(400, 300);
        assert_eq!(pipeline.viewport(), (400, 300));
        assert!(pipeline
            .passes()
            .iter()
            .all(|pass| pass.uniforms().output_size == (400, 300)));
    }

    #[test]
    fn render_scale_shrinks_offscreen_images() {
        assert_eq!(scaled_size((1280, 720), 0.5), (640, 360));
        assert_eq!(scaled_size((3, 1), 0.1), (1, 1));
        let pipeline = PassPipeline::new((101, 51), 0.5);
        assert_eq!(pipeline.size(), (51, 26));
    }

    #[test]
    fn progress_targets_only_the_named_effect() {
        let mut pipeline = PassPipeline::new((32, 32), 1.0);
        pipeline.set_progress(EffectKind::ChannelSplit, 0.7);
        assert_eq!(pipeline.progress(EffectKind::ChannelSplit), Some(0.7));
        assert_eq!(pipeline.progress(EffectKind::BandWipe), Some(0.0));
    }

    #[test]
    fn output_matches_pipeline_size() {
        let scene =
            SceneModel::from_provider(&demo_assets(2, 16, 9), SceneSettings::default()).unwrap();
        let camera = PerspectiveCamera::new(40, 30).unwrap();
        let mut pipeline = PassPipeline::new((40, 30), 1.0);
        pipeline.set_progress(EffectKind::BandWipe, 0.5);
        assert_eq!(pipeline.render(&scene, &camera).dimensions(), (40, 30));
        pipeline.resize(20, 10);
        assert_eq!(pipeline.render(&scene, &camera).dimensions(), (20, 10));
    }
}
