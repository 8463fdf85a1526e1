use glam::Vec2;

/// Raw pointer offset from the viewport centre plus its lagged follower.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    raw: Vec2,
    smoothed: Vec2,
    lerp: f32,
}

impl PointerState {
    pub fn new(lerp: f32) -> Self {
        Self {
            raw: Vec2::ZERO,
            smoothed: Vec2::ZERO,
            lerp: lerp.clamp(f32::EPSILON, 1.0),
        }
    }

    /// Accepts a position in [0, 1] x [0, 1] and recentres it on the origin.
    pub fn set_normalized(&mut self, x: f32, y: f32) {
        self.raw = Vec2::new(x.clamp(0.0, 1.0) - 0.5, y.clamp(0.0, 1.0) - 0.5);
    }

    pub fn step(&mut self) {
        self.smoothed += (self.raw - self.smoothed) * self.lerp;
    }

    pub fn raw(&self) -> Vec2 {
        self.raw
    }

    pub fn smoothed(&self) -> Vec2 {
        self.smoothed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_is_recentred() {
        let mut pointer = PointerState::new(0.1);
        pointer.set_normalized(1.0, 0.25);
        assert_eq!(pointer.raw(), Vec2::new(0.5, -0.25));
        pointer.set_normalized(-2.0, 3.0);
        assert_eq!(pointer.raw(), Vec2::new(-0.5, 0.5));
    }

    #[test]
    fn smoothing_converges_without_overshoot() {
        let mut pointer = PointerState::new(0.1);
        pointer.set_normalized(0.9, 0.1);
        let target = pointer.raw();
        let mut distance = (target - pointer.smoothed()).length();
        for _ in 0..80 {
            pointer.step();
            let next = (target - pointer.smoothed()).length();
            assert!(next < distance, "distance must strictly shrink");
            assert!(pointer.smoothed().x <= target.x);
            assert!(pointer.smoothed().y >= target.y);
            distance = next;
        }
        assert!(distance < 1e-3);
    }

    #[test]
    fn full_lerp_snaps_to_raw() {
        let mut pointer = PointerState::new(1.0);
        pointer.set_normalized(0.2, 0.8);
        pointer.step();
        assert_eq!(pointer.smoothed(), pointer.raw());
    }
}
