//! Renderer crate for curtainwipe, a 3D image gallery with wipe transitions.
//!
//! The module glues the scene model, the software rasteriser, the post effect
//! chain and the transition timeline together. The overall flow is:
//!
//! ```text
//!   CLI / curtainwipe
//!          │ RendererConfig + AssetProvider
//!          ▼
//!   Renderer::run ──▶ window::run / export::run ──▶ FrameLoop::tick
//!                                                        │
//!          Stage::update ◀── Timeline::advance ◀─────────┤
//!          Stage::render ──▶ raster ──▶ BandWipe ──▶ ChannelSplit ──▶ FrameSink
//! ```
//!
//! `Stage` owns everything that changes per frame (scene, camera, effect
//! passes, animation state and timeline), while `Renderer` only picks the
//! host: an interactive winit window presented through wgpu, or a headless
//! export that writes numbered PNGs on a fixed clock.

pub mod assets;
pub mod camera;
pub mod effects;
pub mod error;
pub mod export;
pub mod frame;
mod gpu;
pub mod pipeline;
pub mod pointer;
mod raster;
pub mod runtime;
pub mod scene;
pub mod sink;
pub mod stage;
mod texture;
pub mod types;
mod window;

use anyhow::Result;

pub use assets::{demo_assets, AssetProvider, InMemoryAssets};
pub use camera::PerspectiveCamera;
pub use effects::{EffectKind, EffectPass, EffectUniforms, ImageEffect};
pub use error::{SceneError, StageError, ViewportError};
pub use export::ExportSummary;
pub use frame::{FrameLoop, FrameOutcome};
pub use gpu::WindowPresenter;
pub use pipeline::PassPipeline;
pub use raster::render_scene;
pub use runtime::{
    FixedStepTimeSource, FrameScheduler, RenderPolicy, SystemTimeSource, TimeSample, TimeSource,
};
pub use scene::{SceneModel, SceneSettings};
pub use sink::{ExportSink, FrameSink};
pub use stage::Stage;
pub use types::RendererConfig;

/// Thin entry point that owns the configuration and picks a host.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Runs until the window closes or the export finishes.
    pub fn run(&self, assets: &dyn AssetProvider) -> Result<()> {
        match &self.config.policy {
            RenderPolicy::Animate { .. } => window::run(&self.config, assets),
            RenderPolicy::Export { .. } => {
                let summary = export::run(&self.config, assets)?;
                tracing::info!(
                    directory = %summary.directory.display(),
                    frames = summary.frames,
                    transitions = summary.transitions,
                    "export written"
                );
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_policy_runs_headless() {
        let dir = tempfile::tempdir().unwrap();
        let config = RendererConfig {
            surface_size: (20, 10),
            render_scale: 0.5,
            policy: RenderPolicy::Export {
                directory: dir.path().to_path_buf(),
                frames: 2,
                fps: 30.0,
            },
            ..RendererConfig::default()
        };
        let renderer = Renderer::new(config);
        renderer.run(&demo_assets(2, 8, 8)).unwrap();
        assert!(dir.path().join("frame_00000.png").exists());
        assert!(dir.path().join("frame_00001.png").exists());
    }
}
