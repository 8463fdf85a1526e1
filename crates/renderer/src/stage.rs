//! Owner of all mutable animation state.
//!
//! The stage is the single coordinator for the scene, the camera, the pass
//! pipeline and the transition timeline. Hosts feed it pointer positions,
//! viewport sizes and triggers; the frame loop asks it to update and render.

use std::time::Duration;

use image::RgbaImage;
use scheduler::{AnimationState, Timeline, TimelineState, TransitionStarted};

use crate::assets::AssetProvider;
use crate::camera::PerspectiveCamera;
use crate::effects::EffectKind;
use crate::error::{SceneError, StageError, ViewportError};
use crate::pipeline::PassPipeline;
use crate::scene::SceneModel;
use crate::types::RendererConfig;

pub struct Stage {
    scene: SceneModel,
    camera: PerspectiveCamera,
    pipeline: PassPipeline,
    animation: AnimationState,
    timeline: Timeline,
}

impl Stage {
    pub fn new(config: &RendererConfig, assets: &dyn AssetProvider) -> Result<Self, StageError> {
        let scene = SceneModel::from_provider(assets, config.scene)?;
        let (width, height) = config.surface_size;
        let camera = PerspectiveCamera::new(width, height)?;
        let pipeline = PassPipeline::new(config.surface_size, config.render_scale);
        let timeline = Timeline::new(config.timing, config.overlap, scene.groups().len())
            .map_err(SceneError::from)?;

        tracing::info!(
            images = scene.groups().len(),
            width,
            height,
            render_scale = config.render_scale,
            "stage ready"
        );

        let mut stage = Self {
            scene,
            camera,
            pipeline,
            animation: AnimationState::resting(config.timing.camera_far_z),
            timeline,
        };
        stage.sync_animation();
        Ok(stage)
    }

    pub fn scene(&self) -> &SceneModel {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn pipeline(&self) -> &PassPipeline {
        &self.pipeline
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    pub fn timeline_state(&self) -> TimelineState {
        self.timeline.state()
    }

    pub fn current_index(&self) -> usize {
        self.timeline.current_index()
    }

    /// Advances the gallery and schedules the transition toward it.
    pub fn trigger(&mut self, now: Duration) -> Option<TransitionStarted> {
        self.timeline.trigger(now)
    }

    /// Applies a viewport size. Zero-sized viewports leave both the camera
    /// and the pipeline on their previous size until a valid one arrives.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), ViewportError> {
        if let Err(err) = self.camera.set_viewport(width, height) {
            tracing::warn!(width, height, "ignoring invalid viewport; resize deferred");
            return Err(err);
        }
        self.pipeline.resize(width, height);
        Ok(())
    }

    /// Pointer position in [0, 1] x [0, 1].
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.scene.set_pointer(x, y);
    }

    /// One frame of state: ambient scene motion, then timeline writes.
    pub fn update(&mut self, now: Duration) {
        self.scene.update();
        self.timeline.advance(&mut self.animation, now);
        self.sync_animation();
    }

    pub fn render(&self) -> RgbaImage {
        self.pipeline.render(&self.scene, &self.camera)
    }

    fn sync_animation(&mut self) {
        self.camera.position.x = self.animation.camera_x;
        self.camera.position.z = self.animation.camera_z;
        self.pipeline
            .set_progress(EffectKind::BandWipe, self.animation.band_wipe);
        self.pipeline
            .set_progress(EffectKind::ChannelSplit, self.animation.channel_split);
    }
}
