use std::time::Duration;

use galleryconfig::GalleryConfig;

use crate::easing::Easing;

/// Parameters the timeline is allowed to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimatedParam {
    CameraX,
    CameraZ,
    BandWipeProgress,
    ChannelSplitProgress,
}

/// Camera placement and effect progress shared between the timeline and
/// the frame loop. Owned by one coordinator; everything else reads it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    pub camera_x: f32,
    pub camera_z: f32,
    pub band_wipe: f32,
    pub channel_split: f32,
}

impl AnimationState {
    pub fn resting(camera_z: f32) -> Self {
        Self {
            camera_x: 0.0,
            camera_z,
            band_wipe: 0.0,
            channel_split: 0.0,
        }
    }

    pub fn get(&self, param: AnimatedParam) -> f32 {
        match param {
            AnimatedParam::CameraX => self.camera_x,
            AnimatedParam::CameraZ => self.camera_z,
            AnimatedParam::BandWipeProgress => self.band_wipe,
            AnimatedParam::ChannelSplitProgress => self.channel_split,
        }
    }

    pub fn set(&mut self, param: AnimatedParam, value: f32) {
        match param {
            AnimatedParam::CameraX => self.camera_x = value,
            AnimatedParam::CameraZ => self.camera_z = value,
            AnimatedParam::BandWipeProgress => self.band_wipe = value,
            AnimatedParam::ChannelSplitProgress => self.channel_split = value,
        }
    }
}

/// One scheduled command: drive `param` to `to` over `duration`, starting
/// `offset` after the owning schedule begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub param: AnimatedParam,
    pub offset: Duration,
    pub duration: Duration,
    pub easing: Easing,
    pub to: f32,
}

impl Tween {
    pub fn end(&self) -> Duration {
        self.offset + self.duration
    }
}

/// Immutable batch of tweens issued together for one gallery step.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    target_index: usize,
    tweens: Vec<Tween>,
}

impl Schedule {
    pub fn new(target_index: usize, mut tweens: Vec<Tween>) -> Self {
        // stable sort keeps issue order for tweens sharing an offset
        tweens.sort_by_key(|tween| tween.offset);
        Self {
            target_index,
            tweens,
        }
    }

    pub fn target_index(&self) -> usize {
        self.target_index
    }

    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    pub fn total_duration(&self) -> Duration {
        self.tweens
            .iter()
            .map(Tween::end)
            .max()
            .unwrap_or(Duration::ZERO)
    }
}

/// Durations, curves and camera stops used to build every schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionTiming {
    pub camera_travel: Duration,
    pub camera_dip: Duration,
    pub effect: Duration,
    pub camera_near_z: f32,
    pub camera_far_z: f32,
    pub panel_spacing: f32,
    pub camera_ease: Easing,
    pub effect_ease: Easing,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self::from_config(&GalleryConfig::default())
    }
}

impl TransitionTiming {
    pub fn from_config(config: &GalleryConfig) -> Self {
        let transition = &config.transition;
        Self {
            camera_travel: transition.camera_travel,
            camera_dip: transition.camera_dip,
            effect: transition.effect,
            camera_near_z: transition.camera_near_z,
            camera_far_z: transition.camera_far_z,
            panel_spacing: config.scene.panel_spacing,
            camera_ease: transition.camera_ease.into(),
            effect_ease: transition.effect_ease.into(),
        }
    }

    pub fn build(&self, target_index: usize) -> Schedule {
        let camera = |param, offset, duration, to| Tween {
            param,
            offset,
            duration,
            easing: self.camera_ease,
            to,
        };
        let effect = |param, offset, to| Tween {
            param,
            offset,
            duration: self.effect,
            easing: self.effect_ease,
            to,
        };

        let mut tweens = vec![
            camera(
                AnimatedParam::CameraX,
                Duration::ZERO,
                self.camera_travel,
                target_index as f32 * self.panel_spacing,
            ),
            camera(
                AnimatedParam::CameraZ,
                Duration::ZERO,
                self.camera_dip,
                self.camera_near_z,
            ),
            camera(
                AnimatedParam::CameraZ,
                self.camera_dip,
                self.camera_dip,
                self.camera_far_z,
            ),
        ];
        for param in [
            AnimatedParam::BandWipeProgress,
            AnimatedParam::ChannelSplitProgress,
        ] {
            tweens.push(effect(param, Duration::ZERO, 1.0));
            tweens.push(effect(param, self.effect, 0.0));
        }

        Schedule::new(target_index, tweens)
    }
}
