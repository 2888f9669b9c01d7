use glam::{Mat4, Vec3, Vec4};

use super::picking::Ray;

/// Arc-ball camera used by the software provider for screen-space picking.
/// Screen coordinates are pixels with the origin at the top-left corner.
pub struct ArcBallCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
}

impl ArcBallCamera {
    pub fn new() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.4,
            distance: 9.0,
            target: Vec3::ZERO,
            fov: 45.0_f32.to_radians(),
        }
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx.to_radians();
        self.pitch = (self.pitch + dy.to_radians()).clamp(-1.5, 1.5);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta)).clamp(0.5, 100.0);
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, 0.1, 200.0)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Project a world point to screen coordinates.
    /// Returns None for points behind the camera.
    pub fn project(&self, point: Vec3, viewport: [f32; 2]) -> Option<[f32; 2]> {
        let aspect = viewport[0] / viewport[1];
        let p = self.view_projection(aspect) * Vec4::new(point.x, point.y, point.z, 1.0);
        if p.w <= 0.0 {
            return None;
        }
        let ndc = p.truncate() / p.w;
        let screen_x = viewport[0] * 0.5 + ndc.x * viewport[0] * 0.5;
        let screen_y = viewport[1] * 0.5 - ndc.y * viewport[1] * 0.5;
        Some([screen_x, screen_y])
    }

    /// Cast a ray from a screen position into the scene
    pub fn screen_ray(&self, screen_pos: [f32; 2], viewport: [f32; 2]) -> Ray {
        let aspect = viewport[0] / viewport[1];

        // Screen → NDC
        let ndc_x = (screen_pos[0] - viewport[0] * 0.5) / (viewport[0] * 0.5);
        let ndc_y = -(screen_pos[1] - viewport[1] * 0.5) / (viewport[1] * 0.5);

        // Inverse view-projection
        let vp_inv = self.view_projection(aspect).inverse();

        // Unproject near and far points
        let near_ndc = Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far_ndc = Vec4::new(ndc_x, ndc_y, 1.0, 1.0);

        let near_world = vp_inv * near_ndc;
        let far_world = vp_inv * far_ndc;

        let near = near_world.truncate() / near_world.w;
        let far = far_world.truncate() / far_world.w;

        let direction = (far - near).normalize_or_zero();

        Ray {
            origin: self.eye_position(),
            direction,
        }
    }
}

impl Default for ArcBallCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::picking::ray_ground_plane;

    const VIEWPORT: [f32; 2] = [1280.0, 800.0];

    #[test]
    fn test_project_unproject_roundtrip_on_ground() {
        let cam = ArcBallCamera::new();
        let world = Vec3::new(1.0, 0.0, 1.5);

        let screen = cam.project(world, VIEWPORT).unwrap();
        let ray = cam.screen_ray(screen, VIEWPORT);
        let (hit, _) = ray_ground_plane(&ray, 5.0).unwrap();

        assert!((hit - world).length() < 1e-2, "roundtrip error: {:?}", hit);
    }

    #[test]
    fn test_screen_center_ray_points_at_target() {
        let cam = ArcBallCamera::new();
        let ray = cam.screen_ray([VIEWPORT[0] * 0.5, VIEWPORT[1] * 0.5], VIEWPORT);
        let to_target = (cam.target - ray.origin).normalize();
        assert!(ray.direction.dot(to_target) > 0.999);
    }

    #[test]
    fn test_point_behind_camera_not_projected() {
        let cam = ArcBallCamera::new();
        let behind = cam.eye_position() + (cam.eye_position() - cam.target);
        assert!(cam.project(behind, VIEWPORT).is_none());
    }
}
