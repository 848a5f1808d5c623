//! Perspective camera for the demo scenes.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};

/// Perspective camera looking from `position` at `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: FRAC_PI_2,
            aspect: 1.0,
            near: 0.01,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// Camera at `position` looking at `target` with default lens settings.
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    #[must_use]
    pub fn with_fov_y(mut self, fov_y: f32) -> Self {
        self.fov_y = fov_y;
        self
    }

    #[must_use]
    pub fn with_clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Get combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_looks_down_negative_z() {
        let camera = Camera::default();
        let view = camera.view_matrix();
        // The target ends up straight ahead, 3 units in front.
        let target = view.transform_point3(Vec3::ZERO);
        assert!(target.abs_diff_eq(Vec3::new(0.0, 0.0, -3.0), 1e-5));
    }

    #[test]
    fn test_target_projects_to_center() {
        let camera = Camera::new(Vec3::new(100.0, 100.0, 100.0), Vec3::ZERO).with_aspect(16.0 / 9.0);
        let clip = camera.view_projection_matrix().project_point3(Vec3::ZERO);
        assert!(clip.x.abs() < 1e-4);
        assert!(clip.y.abs() < 1e-4);
        assert!(clip.z > 0.0 && clip.z < 1.0);
    }

    #[test]
    fn test_builders() {
        let camera = Camera::default()
            .with_fov_y(1.0)
            .with_clip_planes(0.5, 50.0)
            .with_aspect(2.0);
        assert_eq!(camera.fov_y, 1.0);
        assert_eq!((camera.near, camera.far), (0.5, 50.0));
        assert_eq!(camera.aspect, 2.0);
    }
}
