use std::time::Duration;

use anyhow::Result;

use crate::sink::FrameSink;
use crate::stage::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented { frame_index: u64 },
    /// The loop is stopped; nothing was updated or drawn.
    Stopped,
}

/// Drives one update + render + present per iteration, with stop/play.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    playing: bool,
    frames: u64,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            playing: true,
            frames: 0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    pub fn stop(&mut self) {
        if self.playing {
            tracing::info!(frames = self.frames, "frame loop stopped");
        }
        self.playing = false;
    }

    /// Resumes a stopped loop. Returns `false` when it was already running.
    pub fn play(&mut self) -> bool {
        if self.playing {
            return false;
        }
        self.playing = true;
        tracing::info!(frames = self.frames, "frame loop resumed");
        true
    }

    pub fn toggle(&mut self) -> bool {
        if self.playing {
            self.stop();
        } else {
            self.play();
        }
        self.playing
    }

    pub fn tick(
        &mut self,
        stage: &mut Stage,
        now: Duration,
        sink: &mut dyn FrameSink,
    ) -> Result<FrameOutcome> {
        if !self.playing {
            return Ok(FrameOutcome::Stopped);
        }
        stage.update(now);
        let frame = stage.render();
        sink.present(&frame)?;
        let frame_index = self.frames;
        self.frames += 1;
        Ok(FrameOutcome::Presented { frame_index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::demo_assets;
    use crate::types::RendererConfig;
    use image::RgbaImage;

    #[derive(Default)]
    struct CollectSink {
        frames: Vec<RgbaImage>,
    }

    impl FrameSink for CollectSink {
        fn present(&mut self, frame: &RgbaImage) -> Result<()> {
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    fn stage() -> Stage {
        let config = RendererConfig {
            surface_size: (24, 12),
            render_scale: 1.0,
            ..RendererConfig::default()
        };
        Stage::new(&config, &demo_assets(3, 8, 8)).unwrap()
    }

    #[test]
    fn presents_one_frame_per_tick() {
        let mut stage = stage();
        let mut sink = CollectSink::default();
        let mut frame_loop = FrameLoop::new();
        for step in 0..3u64 {
            let outcome = frame_loop
                .tick(&mut stage, Duration::from_millis(step * 16), &mut sink)
                .unwrap();
            assert_eq!(outcome, FrameOutcome::Presented { frame_index: step });
        }
        assert_eq!(sink.frames.len(), 3);
        assert_eq!(sink.frames[0].dimensions(), (24, 12));
    }

    #[test]
    fn stopped_loop_does_not_advance_and_resumes_with_state() {
        let mut stage = stage();
        let mut sink = CollectSink::default();
        let mut frame_loop = FrameLoop::new();
        frame_loop
            .tick(&mut stage, Duration::ZERO, &mut sink)
            .unwrap();
        let time_before = stage.scene().time();

        frame_loop.stop();
        let outcome = frame_loop
            .tick(&mut stage, Duration::from_millis(16), &mut sink)
            .unwrap();
        assert_eq!(outcome, FrameOutcome::Stopped);
        assert_eq!(stage.scene().time(), time_before);
        assert_eq!(sink.frames.len(), 1);

        assert!(frame_loop.play());
        assert!(!frame_loop.play(), "play while running is a no-op");
        frame_loop
            .tick(&mut stage, Duration::from_millis(32), &mut sink)
            .unwrap();
        assert_eq!(sink.frames.len(), 2);
        assert!(stage.scene().time() > time_before);
        assert_eq!(stage.scene().groups().len(), 3);
        assert_eq!(frame_loop.frames_presented(), 2);
    }

    #[test]
    fn toggle_flips_state() {
        let mut frame_loop = FrameLoop::new();
        assert!(!frame_loop.toggle());
        assert!(frame_loop.toggle());
    }
}
