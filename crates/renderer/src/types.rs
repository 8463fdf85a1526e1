use std::time::Duration;

use galleryconfig::{GalleryConfig, OverlapPolicy};
use scheduler::TransitionTiming;

use crate::runtime::RenderPolicy;
use crate::scene::SceneSettings;

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` mirrors the gallery file plus CLI overrides: how large
/// the viewport starts, how the scene moves, how transitions are timed, and
/// whether frames go to a window or to disk.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Offscreen render size relative to the viewport.
    pub render_scale: f32,
    /// Window or export behaviour.
    pub policy: RenderPolicy,
    pub scene: SceneSettings,
    pub timing: TransitionTiming,
    pub overlap: OverlapPolicy,
    /// Period of the automatic gallery advance.
    pub trigger_interval: Duration,
    pub title: String,
}

impl RendererConfig {
    pub fn from_gallery_config(config: &GalleryConfig, policy: RenderPolicy) -> Self {
        Self {
            surface_size: config.render.size,
            render_scale: config.render.render_scale,
            policy,
            scene: SceneSettings::from_config(config),
            timing: TransitionTiming::from_config(config),
            overlap: config.trigger.overlap,
            trigger_interval: config.trigger.interval,
            title: "curtainwipe".to_string(),
        }
    }
}

impl Default for RendererConfig {
    /// Built-in gallery constants in an uncapped window.
    fn default() -> Self {
        Self::from_gallery_config(&GalleryConfig::default(), RenderPolicy::default())
    }
}
