//! Headless host: renders a fixed number of frames on a simulated clock.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use scheduler::PeriodicTrigger;

use crate::assets::AssetProvider;
use crate::frame::FrameLoop;
use crate::runtime::{time_source_for_policy, RenderPolicy};
use crate::sink::ExportSink;
use crate::stage::Stage;
use crate::types::RendererConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub directory: PathBuf,
    pub frames: u32,
    pub transitions: usize,
}

pub fn run(config: &RendererConfig, assets: &dyn AssetProvider) -> Result<ExportSummary> {
    let RenderPolicy::Export {
        directory,
        frames,
        fps,
    } = &config.policy
    else {
        bail!("export host requires an export render policy");
    };

    let mut stage = Stage::new(config, assets).context("failed to build stage")?;
    let mut sink = ExportSink::new(directory.clone())?;
    let mut clock = time_source_for_policy(&config.policy);
    let mut trigger = PeriodicTrigger::new(config.trigger_interval, clock.peek());
    let mut frame_loop = FrameLoop::new();
    let mut transitions = 0;

    tracing::info!(
        directory = %directory.display(),
        frames,
        fps,
        "exporting frames"
    );

    for _ in 0..*frames {
        let sample = clock.sample();
        if trigger.poll(sample.elapsed) {
            if let Some(started) = stage.trigger(sample.elapsed) {
                transitions += 1;
                tracing::debug!(
                    index = started.index,
                    frame = sample.frame_index,
                    "transition triggered"
                );
            }
        }
        frame_loop.tick(&mut stage, sample.elapsed, &mut sink)?;
    }

    tracing::info!(frames = sink.frames_written(), transitions, "export finished");

    Ok(ExportSummary {
        directory: sink.directory().to_path_buf(),
        frames: sink.frames_written(),
        transitions,
    })
}
