use galleryconfig::EaseSetting;

/// Interpolation curve applied to a tween's normalised progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    Smoothstep,
    CubicInOut,
    QuartInOut,
}

impl Easing {
    pub fn sample(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Smoothstep => t * t * (3.0 - 2.0 * t),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::QuartInOut => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
        }
    }
}

impl From<EaseSetting> for Easing {
    fn from(value: EaseSetting) -> Self {
        match value {
            EaseSetting::Linear => Easing::Linear,
            EaseSetting::Smoothstep => Easing::Smoothstep,
            EaseSetting::CubicInOut => Easing::CubicInOut,
            EaseSetting::QuartInOut => Easing::QuartInOut,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::Smoothstep,
        Easing::CubicInOut,
        Easing::QuartInOut,
    ];

    #[test]
    fn endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.sample(0.0), 0.0, "{easing:?} at 0");
            assert_eq!(easing.sample(1.0), 1.0, "{easing:?} at 1");
        }
    }

    #[test]
    fn input_is_clamped() {
        for easing in ALL {
            assert_eq!(easing.sample(-3.0), 0.0);
            assert_eq!(easing.sample(7.0), 1.0);
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for easing in ALL {
            let mut last = 0.0;
            for step in 0..=100 {
                let sample = easing.sample(step as f32 / 100.0);
                assert!(sample >= last - 1e-6, "{easing:?} dipped at step {step}");
                last = sample;
            }
        }
    }

    #[test]
    fn in_out_curves_are_symmetric_about_midpoint() {
        for easing in [Easing::CubicInOut, Easing::QuartInOut] {
            assert!((easing.sample(0.5) - 0.5).abs() < 1e-6);
            let low = easing.sample(0.2);
            let high = easing.sample(0.8);
            assert!((low + high - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn quart_starts_slower_than_cubic() {
        assert!(Easing::QuartInOut.sample(0.2) < Easing::CubicInOut.sample(0.2));
    }
}
