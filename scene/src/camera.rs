use glam::{Mat4, Vec2, Vec3};

use picking::{DepthConvention, ViewportSize};

/// A look-at camera orbiting a point of interest.
///
/// `center` is the point of interest; picking moves it onto whatever surface
/// was clicked while the eye stays put.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Near and far clip planes.
    pub clip_planes: Vec2,
}

impl Camera {
    pub const DEFAULT_FOV: f32 = 60.0;
    pub const DEFAULT_CLIP_PLANES: Vec2 = Vec2::new(0.1, 100.0);

    pub fn new<V: Into<Vec3>>(eye: V, center: V, up: V) -> Self {
        Self {
            eye: eye.into(),
            center: center.into(),
            up: up.into(),
            fov: Self::DEFAULT_FOV,
            clip_planes: Self::DEFAULT_CLIP_PLANES,
        }
    }

    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    pub fn with_clip_planes(mut self, near: f32, far: f32) -> Self {
        self.clip_planes = Vec2::new(near, far);
        self
    }

    /// World to view transform.
    pub fn calc_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.center, self.up)
    }

    pub fn set_lookat(&mut self, eye: Vec3, center: Vec3, up: Vec3) {
        self.eye = eye;
        self.center = center;
        self.up = up;
    }

    /// Moves the point of interest, keeping the eye and up vector.
    pub fn set_interest(&mut self, center: Vec3) {
        log::debug!("Camera interest {:?} -> {:?}", self.center, center);
        self.center = center;
    }

    /// Projection matching this camera for a viewport of the given size.
    pub fn projection(&self, viewport: ViewportSize) -> Projection {
        Projection::new(
            viewport.width,
            viewport.height,
            self.fov,
            self.clip_planes.x,
            self.clip_planes.y,
        )
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y)
    }
}

/// Perspective projection in the Vulkan convention.
///
/// Depth lands in `[0, 1]` with the near plane at 0 (at 1 when reversed),
/// and NDC +y points down the screen, so pixel rows map straight onto NDC
/// without a flip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    aspect: f32,
    /// Vertical field of view in radians.
    pub fovy: f32,
    znear: f32,
    zfar: f32,
    convention: DepthConvention,
}

impl Projection {
    /// `fovy` is given in degrees.
    pub fn new(width: u32, height: u32, fovy: f32, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fovy: fovy.to_radians(),
            znear,
            zfar,
            convention: DepthConvention::Standard,
        }
    }

    pub fn with_depth_convention(mut self, convention: DepthConvention) -> Self {
        self.convention = convention;
        self
    }

    pub fn depth_convention(&self) -> DepthConvention {
        self.convention
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn clip_planes(&self) -> Vec2 {
        Vec2::new(self.znear, self.zfar)
    }

    /// View to clip transform.
    pub fn calc_matrix(&self) -> Mat4 {
        let mut proj = match self.convention {
            DepthConvention::Standard => Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar),
            // swapping the planes maps near to 1 and far to 0
            DepthConvention::Reversed => Mat4::perspective_rh(self.fovy, self.aspect, self.zfar, self.znear),
        };
        proj.y_axis.y = -proj.y_axis.y;
        proj
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_view_looks_down_negative_z() {
        let camera = Camera::new(Vec3::new(-0.5, 0.0, 5.0), Vec3::new(-0.5, 0.0, 0.0), Vec3::Y);
        let center_in_view = camera.calc_matrix().transform_point3(camera.center);
        assert!((center_in_view - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-5);
    }

    #[test]
    fn test_projection_depth_range() {
        let projection = Projection::new(800, 600, 45.0, 0.5, 20.0);
        let proj = projection.calc_matrix();

        let near = proj * Vec4::new(0.0, 0.0, -0.5, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -20.0, 1.0);
        assert!((near.z / near.w).abs() < 1e-6);
        assert!((far.z / far.w - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_reversed_projection_depth_range() {
        let projection = Projection::new(800, 600, 45.0, 0.5, 20.0).with_depth_convention(DepthConvention::Reversed);
        let proj = projection.calc_matrix();

        let near = proj * Vec4::new(0.0, 0.0, -0.5, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -20.0, 1.0);
        assert!((near.z / near.w - 1.0).abs() < 1e-6);
        assert!((far.z / far.w).abs() < 1e-6);
    }

    #[test]
    fn test_projection_flips_y() {
        let proj = Projection::new(100, 100, 90.0, 0.1, 10.0).calc_matrix();
        let up = proj * Vec4::new(0.0, 1.0, -1.0, 1.0);
        assert!(up.y / up.w < 0.0);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut projection = Projection::new(100, 100, 60.0, 0.1, 10.0);
        projection.resize(200, 100);
        assert_eq!(projection.aspect(), 2.0);
    }

    #[test]
    fn test_set_interest_keeps_eye() {
        let mut camera = Camera::new(Vec3::new(0.0, 1.0, 5.0), Vec3::ZERO, Vec3::Y);
        camera.set_interest(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(camera.eye, Vec3::new(0.0, 1.0, 5.0));
        assert_eq!(camera.center, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(camera.up, Vec3::Y);
    }

    #[test]
    fn test_camera_projection_uses_clip_planes() {
        let camera = Camera::default().with_fov(45.0).with_clip_planes(1.0, 50.0);
        let projection = camera.projection(ViewportSize::new(1280, 720));
        assert_eq!(projection.clip_planes(), Vec2::new(1.0, 50.0));
        assert!((projection.fovy - 45f32.to_radians()).abs() < 1e-6);
    }
}
