use glam::Vec3;

use crate::error::ViewportError;

pub const FOV_Y_DEGREES: f32 = 60.0;
pub const NEAR_PLANE: f32 = 1.0;
pub const FAR_PLANE: f32 = 3000.0;
pub const RESTING_Z: f32 = 900.0;

/// Perspective camera looking down -Z with no rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    fov_y: f32,
    near: f32,
    far: f32,
    aspect: f32,
    viewport: (u32, u32),
}

impl PerspectiveCamera {
    pub fn new(width: u32, height: u32) -> Result<Self, ViewportError> {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, RESTING_Z),
            fov_y: FOV_Y_DEGREES.to_radians(),
            near: NEAR_PLANE,
            far: FAR_PLANE,
            aspect: 1.0,
            viewport: (1, 1),
        };
        camera.set_viewport(width, height)?;
        Ok(camera)
    }

    /// Recomputes the aspect ratio. Invalid sizes leave the camera untouched.
    pub fn set_viewport(&mut self, width: u32, height: u32) -> Result<(), ViewportError> {
        if width == 0 || height == 0 {
            return Err(ViewportError::InvalidDimensions { width, height });
        }
        self.viewport = (width, height);
        self.aspect = width as f32 / height as f32;
        Ok(())
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Direction through normalised device coordinates `(ndc_x, ndc_y)`,
    /// both in [-1, 1] with +y up. The returned vector has `z == -1`, so a
    /// ray parameter equals view depth.
    pub fn ray_direction(&self, ndc_x: f32, ndc_y: f32) -> Vec3 {
        let half_height = (self.fov_y * 0.5).tan();
        Vec3::new(ndc_x * half_height * self.aspect, ndc_y * half_height, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_rest_with_viewport_aspect() {
        let camera = PerspectiveCamera::new(1920, 1080).unwrap();
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 900.0));
        assert!((camera.aspect() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn resize_updates_aspect_each_time() {
        let mut camera = PerspectiveCamera::new(1280, 720).unwrap();
        camera.set_viewport(800, 600).unwrap();
        assert!((camera.aspect() - 800.0 / 600.0).abs() < 1e-6);
        camera.set_viewport(400, 300).unwrap();
        assert!((camera.aspect() - 400.0 / 300.0).abs() < 1e-6);
        assert_eq!(camera.viewport(), (400, 300));
    }

    #[test]
    fn zero_dimension_is_rejected_and_aspect_kept() {
        let mut camera = PerspectiveCamera::new(800, 600).unwrap();
        let err = camera.set_viewport(0, 600).unwrap_err();
        assert_eq!(
            err,
            ViewportError::InvalidDimensions {
                width: 0,
                height: 600
            }
        );
        assert!((camera.aspect() - 800.0 / 600.0).abs() < 1e-6);
        assert!(PerspectiveCamera::new(10, 0).is_err());
    }

    #[test]
    fn vertical_edge_ray_matches_field_of_view() {
        let camera = PerspectiveCamera::new(100, 100).unwrap();
        let top = camera.ray_direction(0.0, 1.0);
        let angle = top.y.atan2(-top.z).to_degrees();
        assert!((angle - 30.0).abs() < 1e-3);
    }
}
