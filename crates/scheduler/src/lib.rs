//! Transition timeline for the gallery: picks the next panel on each
//! trigger and drives camera and effect progress through timed tweens.
//!
//! Time is passed in as a [`Duration`] since an arbitrary epoch so the
//! same code runs against the wall clock and against a simulated export
//! clock.

mod easing;
mod schedule;

use std::time::Duration;

use galleryconfig::{GalleryConfig, OverlapPolicy};

pub use easing::Easing;
pub use schedule::{AnimatedParam, AnimationState, Schedule, TransitionTiming, Tween};

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("gallery must contain at least one image")]
    EmptyGallery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineState {
    Idle,
    Transitioning,
}

/// Emitted when a trigger issues a new schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionStarted {
    pub index: usize,
    pub started_at: Duration,
    pub total: Duration,
}

/// Cyclic position in the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryCursor {
    index: usize,
    len: usize,
}

impl GalleryCursor {
    pub fn new(len: usize) -> Result<Self, SchedulerError> {
        if len == 0 {
            return Err(SchedulerError::EmptyGallery);
        }
        Ok(Self { index: 0, len })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % self.len;
        self.index
    }
}

/// Fires once per `interval` on a fixed cadence from its anchor. A late
/// poll fires once and skips the missed periods rather than queueing them.
#[derive(Debug, Clone, Copy)]
pub struct PeriodicTrigger {
    interval: Duration,
    last_fired: Duration,
}

impl PeriodicTrigger {
    pub fn new(interval: Duration, now: Duration) -> Self {
        Self {
            interval,
            last_fired: now,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn poll(&mut self, now: Duration) -> bool {
        let elapsed = now.saturating_sub(self.last_fired);
        if elapsed < self.interval {
            return false;
        }
        if self.interval.is_zero() {
            self.last_fired = now;
            return true;
        }
        let periods = elapsed.as_nanos() / self.interval.as_nanos();
        let step = self.interval.as_nanos().saturating_mul(periods);
        self.last_fired += Duration::from_nanos(u64::try_from(step).unwrap_or(u64::MAX));
        true
    }

    pub fn next_due(&self) -> Duration {
        self.last_fired + self.interval
    }
}

struct RunningSchedule {
    started_at: Duration,
    schedule: Schedule,
    // start value captured when each tween's offset is first reached
    from: Vec<Option<f32>>,
    finished: Vec<bool>,
}

impl RunningSchedule {
    fn new(schedule: Schedule, started_at: Duration) -> Self {
        let count = schedule.tweens().len();
        Self {
            started_at,
            schedule,
            from: vec![None; count],
            finished: vec![false; count],
        }
    }

    fn apply(&mut self, state: &mut AnimationState, now: Duration) {
        let local = now.saturating_sub(self.started_at);
        for (slot, tween) in self.schedule.tweens().iter().enumerate() {
            if self.finished[slot] || local < tween.offset {
                continue;
            }
            let from = *self.from[slot].get_or_insert_with(|| state.get(tween.param));
            if local >= tween.end() {
                state.set(tween.param, tween.to);
                self.finished[slot] = true;
                continue;
            }
            let t = (local - tween.offset).as_secs_f32() / tween.duration.as_secs_f32();
            let eased = tween.easing.sample(t);
            state.set(tween.param, from + (tween.to - from) * eased);
        }
    }

    fn is_complete(&self) -> bool {
        self.finished.iter().all(|done| *done)
    }
}

/// Idle/Transitioning state machine over overlapping schedules.
pub struct Timeline {
    timing: TransitionTiming,
    policy: OverlapPolicy,
    cursor: GalleryCursor,
    running: Vec<RunningSchedule>,
}

impl Timeline {
    pub fn new(
        timing: TransitionTiming,
        policy: OverlapPolicy,
        gallery_len: usize,
    ) -> Result<Self, SchedulerError> {
        Ok(Self {
            timing,
            policy,
            cursor: GalleryCursor::new(gallery_len)?,
            running: Vec::new(),
        })
    }

    pub fn from_config(config: &GalleryConfig, gallery_len: usize) -> Result<Self, SchedulerError> {
        Self::new(
            TransitionTiming::from_config(config),
            config.trigger.overlap,
            gallery_len,
        )
    }

    pub fn state(&self) -> TimelineState {
        if self.running.is_empty() {
            TimelineState::Idle
        } else {
            TimelineState::Transitioning
        }
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn gallery_len(&self) -> usize {
        self.cursor.len()
    }

    pub fn running_schedules(&self) -> usize {
        self.running.len()
    }

    /// Advances the cursor and issues a schedule toward the new index.
    /// Returns `None` when the overlap policy drops the trigger.
    pub fn trigger(&mut self, now: Duration) -> Option<TransitionStarted> {
        if self.policy == OverlapPolicy::Skip && !self.running.is_empty() {
            tracing::debug!(
                index = self.cursor.index(),
                "transition already running; trigger skipped"
            );
            return None;
        }

        if !self.running.is_empty() {
            tracing::debug!(
                running = self.running.len(),
                "starting transition over a running schedule"
            );
        }

        let index = self.cursor.advance();
        let schedule = self.timing.build(index);
        let total = schedule.total_duration();
        self.running.push(RunningSchedule::new(schedule, now));
        tracing::debug!(index, total = ?total, "transition started");
        Some(TransitionStarted {
            index,
            started_at: now,
            total,
        })
    }

    /// Writes every active tween into `state`. Older schedules run first so
    /// the newest schedule's value is the one left in `state`.
    pub fn advance(&mut self, state: &mut AnimationState, now: Duration) {
        for running in &mut self.running {
            running.apply(state, now);
        }
        let before = self.running.len();
        self.running.retain(|running| !running.is_complete());
        if before > 0 && self.running.is_empty() {
            tracing::debug!(index = self.cursor.index(), "transition finished");
        }
    }
}
