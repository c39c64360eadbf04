use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::input::picking::Ray;

/// Perspective camera for 3D rendering.
/// Orientation comes from the look-at target, which the orbit controls own.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Eye position in world space.
    pub position: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    /// Viewport width / height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

/// GPU-side uniform data for the camera: view, projection and eye position.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub position: [f32; 4],
}

impl CameraUniform {
    pub const FLOATS: usize = 36;
}

impl PerspectiveCamera {
    pub fn new(fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            fov_y_deg,
            aspect,
            near,
            far,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Right-handed perspective projection, depth in [0, 1].
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    /// World-to-view transform looking at `target`, Y up.
    pub fn view_matrix(&self, target: Vec3) -> Mat4 {
        Mat4::look_at_rh(self.position, target, Vec3::Y)
    }

    pub fn uniform(&self, target: Vec3) -> CameraUniform {
        CameraUniform {
            view: self.view_matrix(target).to_cols_array_2d(),
            projection: self.projection_matrix().to_cols_array_2d(),
            position: self.position.extend(1.0).to_array(),
        }
    }

    /// Resize the viewport (e.g. on window resize). Zero-sized viewports are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    /// World-space ray through a point in normalized device coordinates.
    /// `None` when the camera sits on its target (no view direction).
    pub fn ray_from_ndc(&self, ndc: Vec2, target: Vec3) -> Option<Ray> {
        let inv = (self.projection_matrix() * self.view_matrix(target)).inverse();
        let far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        if far.w.abs() < f32::EPSILON {
            return None;
        }
        let far = far.truncate() / far.w;
        Ray::new(self.position, far - self.position)
    }
}

/// Pointer position in pixels to NDC: x right, y up, both in [-1, 1].
pub fn screen_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    if !(width > 0.0 && height > 0.0) {
        return Vec2::ZERO;
    }
    Vec2::new(x / width * 2.0 - 1.0, -(y / height) * 2.0 + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(75.0, 16.0 / 9.0, 0.1, 1000.0).with_position(Vec3::new(0.0, 0.0, 20.0))
    }

    #[test]
    fn projection_is_perspective() {
        let cols = camera().projection_matrix().to_cols_array_2d();
        // Perspective: w takes -z, so cols[2][3] is -1 and cols[3][3] is 0.
        assert_abs_diff_eq!(cols[2][3], -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(cols[3][3], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn view_puts_target_in_front() {
        let cam = camera();
        let p = cam.view_matrix(Vec3::ZERO).transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -20.0), 1e-4));
    }

    #[test]
    fn center_ray_points_at_target() {
        let ray = camera().ray_from_ndc(Vec2::ZERO, Vec3::ZERO).unwrap();
        assert_eq!(ray.origin, Vec3::new(0.0, 0.0, 20.0));
        assert!(ray.dir.abs_diff_eq(Vec3::NEG_Z, 1e-4), "dir = {}", ray.dir);
    }

    #[test]
    fn corner_ray_leans_right_and_up() {
        let ray = camera().ray_from_ndc(Vec2::new(1.0, 1.0), Vec3::ZERO).unwrap();
        assert!(ray.dir.x > 0.0 && ray.dir.y > 0.0 && ray.dir.z < 0.0);
        // Vertical half-angle matches half the field of view.
        let half = (ray.dir.y / -ray.dir.z).atan().to_degrees();
        assert_abs_diff_eq!(half, 37.5, epsilon = 1e-2);
    }

    #[test]
    fn camera_on_target_has_no_ray() {
        let cam = camera().with_position(Vec3::ZERO);
        assert!(cam.ray_from_ndc(Vec2::ZERO, Vec3::ZERO).is_none());
    }

    #[test]
    fn resize_updates_aspect() {
        let mut cam = camera();
        cam.resize(1920.0, 1080.0);
        assert_abs_diff_eq!(cam.aspect, 1920.0 / 1080.0, epsilon = 1e-6);
        cam.resize(0.0, 600.0);
        assert_abs_diff_eq!(cam.aspect, 1920.0 / 1080.0, epsilon = 1e-6);
    }

    #[test]
    fn screen_corners_map_to_ndc() {
        assert_eq!(screen_to_ndc(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, 1.0));
        assert_eq!(screen_to_ndc(800.0, 600.0, 800.0, 600.0), Vec2::new(1.0, -1.0));
        assert_eq!(screen_to_ndc(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
        assert_eq!(screen_to_ndc(10.0, 10.0, 0.0, 600.0), Vec2::ZERO);
    }

    #[test]
    fn uniform_is_pod_sized() {
        let u = camera().uniform(Vec3::ZERO);
        assert_eq!(bytemuck::cast_slice::<_, f32>(&[u]).len(), CameraUniform::FLOATS);
        assert_eq!(u.position, [0.0, 0.0, 20.0, 1.0]);
    }
}
