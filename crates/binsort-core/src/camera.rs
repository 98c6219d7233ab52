//! Camera projection between screen space and the world.

use glam::{Mat4, Vec2, Vec3};

use crate::config::CameraConfig;
use crate::raycast::Ray;

/// NDC depth used when unprojecting the cursor.
pub const CURSOR_NDC_DEPTH: f32 = 0.5;

/// Anything that can map normalized device coordinates back into the world.
pub trait Projector {
    /// Maps an NDC point (`x`, `y`, `z` in `[-1, 1]`) to world space.
    fn unproject(&self, ndc: Vec3) -> Vec3;

    /// Camera eye position in world space.
    fn position(&self) -> Vec3;

    /// Ray from the eye through the given screen point.
    fn ray_through(&self, ndc: Vec2) -> Ray {
        let origin = self.position();
        let target = self.unproject(ndc.extend(CURSOR_NDC_DEPTH));
        Ray::new(origin, (target - origin).normalize_or_zero())
    }

    /// The 3D cursor: `reach` units from the eye along the ray through `ndc`.
    fn project_cursor(&self, ndc: Vec2, reach: f32) -> Vec3 {
        self.ray_through(ndc).at(reach)
    }
}

/// Right-handed perspective camera looking down `-Z` with OpenGL clip
/// conventions.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    position: Vec3,
    view_projection: Mat4,
    inverse_view_projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig) -> Self {
        let position = Vec3::from_array(config.position);
        let projection = Mat4::perspective_rh_gl(
            config.fov_y_degrees.to_radians(),
            config.aspect,
            config.near,
            config.far,
        );
        let view = Mat4::from_translation(-position);
        let view_projection = projection * view;
        Self {
            position,
            view_projection,
            inverse_view_projection: view_projection.inverse(),
        }
    }

    /// Maps a world point to NDC.
    pub fn project(&self, world: Vec3) -> Vec3 {
        self.view_projection.project_point3(world)
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

impl Projector for PerspectiveCamera {
    fn unproject(&self, ndc: Vec3) -> Vec3 {
        self.inverse_view_projection.project_point3(ndc)
    }

    fn position(&self) -> Vec3 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_center_ray_looks_forward() {
        let camera = PerspectiveCamera::default();
        let ray = camera.ray_through(Vec2::ZERO);
        assert!(ray.origin.abs_diff_eq(Vec3::new(0.0, 1.6, 0.0), EPS));
        assert!(ray.direction.abs_diff_eq(Vec3::NEG_Z, EPS));
    }

    #[test]
    fn test_cursor_sits_at_reach() {
        let camera = PerspectiveCamera::default();
        let cursor = camera.project_cursor(Vec2::ZERO, 2.0);
        assert!(cursor.abs_diff_eq(Vec3::new(0.0, 1.6, -2.0), EPS));

        let off_axis = camera.project_cursor(Vec2::new(0.8, -0.6), 2.0);
        assert!((off_axis.distance(camera.position()) - 2.0).abs() < EPS);
    }

    #[test]
    fn test_screen_edges_point_outward() {
        let camera = PerspectiveCamera::default();
        let right = camera.ray_through(Vec2::new(1.0, 0.0));
        let up = camera.ray_through(Vec2::new(0.0, 1.0));
        assert!(right.direction.x > 0.0 && right.direction.z < 0.0);
        assert!(up.direction.y > 0.0 && up.direction.z < 0.0);
    }

    #[test]
    fn test_unproject_inverts_project() {
        let camera = PerspectiveCamera::default();
        let world = Vec3::new(-1.5, 0.0, -3.0);
        let back = camera.unproject(camera.project(world));
        assert!(back.abs_diff_eq(world, 1e-3));
    }
}
