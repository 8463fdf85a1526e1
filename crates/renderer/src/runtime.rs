use std::path::PathBuf;
use std::time::{Duration, Instant};

/// High-level behaviour requested by the caller.
///
/// The render policy decides whether frames animate against the wall clock
/// in a window or are rendered headless on a simulated clock and written to
/// disk.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPolicy {
    /// Run the window loop continuously, optionally clamping the frame rate.
    Animate {
        /// Optional frames-per-second cap; `None` renders every refresh.
        target_fps: Option<f32>,
    },
    /// Render a fixed number of frames into a directory of PNG files.
    Export {
        /// Destination directory for `frame_00000.png` and friends.
        directory: PathBuf,
        /// Number of frames to produce.
        frames: u32,
        /// Simulated frame rate used to advance time between frames.
        fps: f32,
    },
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self::Animate { target_fps: None }
    }
}

/// Snapshot of the clock handed to the timeline and the frame loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Elapsed wall-clock or simulated time.
    pub elapsed: Duration,
    /// Monotonic frame counter for the running session.
    pub frame_index: u64,
}

impl TimeSample {
    pub fn new(elapsed: Duration, frame_index: u64) -> Self {
        Self {
            elapsed,
            frame_index,
        }
    }

    pub fn seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}

/// Abstraction over where time values originate from.
pub trait TimeSource: Send {
    /// Resets the source to its initial state.
    fn reset(&mut self);
    /// Reads the current time without advancing the frame counter.
    fn peek(&self) -> Duration;
    /// Produces a time sample for the next frame.
    fn sample(&mut self) -> TimeSample;
}

/// Time source backed by the system monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
    frame: u64,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            frame: 0,
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn reset(&mut self) {
        self.origin = Instant::now();
        self.frame = 0;
    }

    fn peek(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sample(&mut self) -> TimeSample {
        let sample = TimeSample::new(self.origin.elapsed(), self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Simulated clock that advances by exactly one step per sample.
#[derive(Debug, Clone, Copy)]
pub struct FixedStepTimeSource {
    step: Duration,
    frame: u64,
}

impl FixedStepTimeSource {
    pub fn new(step: Duration) -> Self {
        Self { step, frame: 0 }
    }

    /// Step for `fps` frames per second; non-positive rates fall back to 60.
    pub fn from_fps(fps: f32) -> Self {
        let fps = if fps > 0.0 { fps } else { 60.0 };
        Self::new(frame_interval(fps))
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    fn time_at(&self, frame: u64) -> Duration {
        self.step * frame.min(u32::MAX as u64) as u32
    }
}

impl TimeSource for FixedStepTimeSource {
    fn reset(&mut self) {
        self.frame = 0;
    }

    fn peek(&self) -> Duration {
        self.time_at(self.frame)
    }

    fn sample(&mut self) -> TimeSample {
        let sample = TimeSample::new(self.time_at(self.frame), self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Length of one frame at `fps`, rounded to the nanosecond.
pub fn frame_interval(fps: f32) -> Duration {
    Duration::from_nanos((1e9 / fps as f64).round() as u64)
}

/// Convenient alias for owning time sources behind trait objects.
pub type BoxedTimeSource = Box<dyn TimeSource + Send>;

/// Builds a time source suited to the requested render policy.
pub fn time_source_for_policy(policy: &RenderPolicy) -> BoxedTimeSource {
    match policy {
        RenderPolicy::Animate { .. } => Box::new(SystemTimeSource::new()),
        RenderPolicy::Export { fps, .. } => Box::new(FixedStepTimeSource::from_fps(*fps)),
    }
}

/// Frame pacing for the window loop: enforces an optional fps cap.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    interval: Option<Duration>,
    last_frame: Option<Instant>,
}

impl FrameScheduler {
    pub fn new(policy: &RenderPolicy) -> Self {
        let interval = match policy {
            RenderPolicy::Animate {
                target_fps: Some(fps),
            } if *fps > 0.0 => Some(frame_interval(*fps)),
            _ => None,
        };
        Self {
            interval,
            last_frame: None,
        }
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn ready_for_frame(&self, now: Instant) -> bool {
        match (self.interval, self.last_frame) {
            (Some(interval), Some(last)) => now.saturating_duration_since(last) >= interval,
            _ => true,
        }
    }

    pub fn mark_rendered(&mut self, now: Instant) {
        self.last_frame = Some(now);
    }

    /// When the next capped frame becomes due; `None` when uncapped or before
    /// the first frame.
    pub fn next_deadline(&self) -> Option<Instant> {
        Some(self.last_frame? + self.interval?)
    }

    pub fn reset(&mut self) {
        self.last_frame = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_step_source_advances_one_step_per_sample() {
        let mut source = FixedStepTimeSource::new(Duration::from_millis(40));
        assert_eq!(source.sample(), TimeSample::new(Duration::ZERO, 0));
        assert_eq!(source.sample().elapsed, Duration::from_millis(40));
        assert_eq!(source.peek(), Duration::from_millis(80));
        source.reset();
        assert_eq!(source.sample().frame_index, 0);
    }

    #[test]
    fn fixed_step_source_from_fps() {
        let source = FixedStepTimeSource::from_fps(25.0);
        assert_eq!(source.step(), Duration::from_millis(40));
        let fallback = FixedStepTimeSource::from_fps(0.0);
        assert_eq!(fallback.step(), Duration::from_nanos(16_666_667));
    }

    #[test]
    fn system_source_counts_frames() {
        let mut source = SystemTimeSource::new();
        let first = source.sample();
        let second = source.sample();
        assert_eq!(first.frame_index, 0);
        assert_eq!(second.frame_index, 1);
        assert!(second.elapsed >= first.elapsed);
    }

    #[test]
    fn uncapped_scheduler_is_always_ready() {
        let mut scheduler = FrameScheduler::new(&RenderPolicy::Animate { target_fps: None });
        let now = Instant::now();
        assert!(scheduler.ready_for_frame(now));
        scheduler.mark_rendered(now);
        assert!(scheduler.ready_for_frame(now));
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[test]
    fn capped_scheduler_waits_for_interval() {
        let mut scheduler = FrameScheduler::new(&RenderPolicy::Animate {
            target_fps: Some(50.0),
        });
        let start = Instant::now();
        assert!(scheduler.ready_for_frame(start));
        scheduler.mark_rendered(start);
        assert!(!scheduler.ready_for_frame(start + Duration::from_millis(10)));
        assert!(scheduler.ready_for_frame(start + Duration::from_millis(20)));
        assert_eq!(
            scheduler.next_deadline(),
            Some(start + Duration::from_millis(20))
        );
        scheduler.reset();
        assert!(scheduler.ready_for_frame(start));
    }

    #[test]
    fn zero_fps_means_uncapped() {
        let scheduler = FrameScheduler::new(&RenderPolicy::Animate {
            target_fps: Some(0.0),
        });
        assert_eq!(scheduler.interval(), None);
    }

    #[test]
    fn export_policy_uses_fixed_steps() {
        let mut source = time_source_for_policy(&RenderPolicy::Export {
            directory: PathBuf::from("frames"),
            frames: 3,
            fps: 10.0,
        });
        source.sample();
        assert_eq!(source.sample().elapsed, Duration::from_millis(100));
    }
}
