use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::error::PickError;

/// Pixel dimensions of the rendered viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// True when `screen` lies on a pixel of the viewport.
    pub fn contains(&self, screen: Vec2) -> bool {
        screen.x >= 0.0 && screen.y >= 0.0 && screen.x < self.width as f32 && screen.y < self.height as f32
    }

    /// Maps a pixel position (origin top-left) to `[-1, 1]` NDC.
    ///
    /// The top row maps to `-1`, which matches a y-flipped (Vulkan style)
    /// projection.
    pub fn to_ndc(&self, screen: Vec2) -> Result<Vec2, PickError> {
        if self.is_empty() {
            return Err(PickError::EmptyViewport);
        }
        let size = Vec2::new(self.width as f32, self.height as f32);
        Ok(screen / size * 2.0 - Vec2::ONE)
    }

    /// Inverse of [`ViewportSize::to_ndc`].
    pub fn to_screen(&self, ndc: Vec2) -> Vec2 {
        let size = Vec2::new(self.width as f32, self.height as f32);
        (ndc + Vec2::ONE) * 0.5 * size
    }
}

/// Maps screen positions plus depth back to world space for one camera state.
///
/// `proj * view` is inverted once on construction, so several picks against
/// the same frame share the inversion.
#[derive(Debug, Clone, Copy)]
pub struct Unprojector {
    inv_view_proj: Mat4,
    viewport: ViewportSize,
}

impl Unprojector {
    pub fn new(view: Mat4, proj: Mat4, viewport: ViewportSize) -> Result<Self, PickError> {
        if viewport.is_empty() {
            return Err(PickError::EmptyViewport);
        }
        let view_proj = proj * view;
        // glam happily inverts a singular matrix into garbage, so check first
        let det = view_proj.determinant();
        if det == 0.0 || !det.is_finite() {
            log::warn!("Cannot unproject: view-projection matrix is singular (det = {det})");
            return Err(PickError::SingularTransform);
        }
        let inv_view_proj = view_proj.inverse();
        if !inv_view_proj.is_finite() {
            log::warn!("Cannot unproject: view-projection inverse is not finite");
            return Err(PickError::SingularTransform);
        }
        Ok(Self { inv_view_proj, viewport })
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    /// World position of the surface at `screen` with normalized `depth`.
    pub fn unproject(&self, screen: Vec2, depth: f32) -> Result<Vec3, PickError> {
        let ndc = self.viewport.to_ndc(screen)?;
        let clip = Vec4::new(ndc.x, ndc.y, depth, 1.0);
        let world = self.inv_view_proj * clip;
        if world.w == 0.0 {
            return Err(PickError::DegenerateDivisor);
        }
        let position = world.truncate() * world.w.recip();
        // a tiny but non-zero w still overflows
        if !position.is_finite() {
            return Err(PickError::DegenerateDivisor);
        }
        Ok(position)
    }
}

/// Converts a screen position and depth sample into a world position.
pub fn unproject(
    screen: Vec2,
    depth: f32,
    viewport: ViewportSize,
    view: Mat4,
    proj: Mat4,
) -> Result<Vec3, PickError> {
    Unprojector::new(view, proj, viewport)?.unproject(screen, depth)
}

/// Projects a world position to its screen position and depth.
///
/// Returns `None` for points on or behind the camera plane.
pub fn project(world: Vec3, viewport: ViewportSize, view: Mat4, proj: Mat4) -> Option<(Vec2, f32)> {
    let clip = proj * view * world.extend(1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some((viewport.to_screen(ndc.truncate()), ndc.z))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vulkan_perspective(fov_deg: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let mut proj = Mat4::perspective_rh(fov_deg.to_radians(), aspect, near, far);
        proj.y_axis.y = -proj.y_axis.y;
        proj
    }

    fn assert_close(a: Vec3, b: Vec3, tolerance: f32) {
        assert!((a - b).abs().max_element() <= tolerance, "{a:?} != {b:?}");
    }

    #[test]
    fn test_identity_camera_center() {
        let viewport = ViewportSize::new(100, 100);
        let world = unproject(Vec2::new(50.0, 50.0), 0.0, viewport, Mat4::IDENTITY, Mat4::IDENTITY)
            .expect("Could not unproject");
        assert_eq!(world, Vec3::ZERO);
    }

    #[test]
    fn test_identity_camera_corners() {
        let viewport = ViewportSize::new(200, 100);
        let world = unproject(Vec2::new(0.0, 0.0), 0.5, viewport, Mat4::IDENTITY, Mat4::IDENTITY)
            .expect("Could not unproject");
        assert_eq!(world, Vec3::new(-1.0, -1.0, 0.5));
        let world = unproject(Vec2::new(200.0, 100.0), 0.5, viewport, Mat4::IDENTITY, Mat4::IDENTITY)
            .expect("Could not unproject");
        assert_eq!(world, Vec3::new(1.0, 1.0, 0.5));
    }

    #[test]
    fn test_round_trip_inside_frustum() {
        let viewport = ViewportSize::new(1280, 720);
        let view = Mat4::look_at_rh(Vec3::new(-0.5, 1.0, 5.0), Vec3::new(-0.5, 0.0, 0.0), Vec3::Y);
        let proj = vulkan_perspective(60.0, viewport.aspect_ratio(), 1.0, 50.0);
        let unprojector = Unprojector::new(view, proj, viewport).expect("Could not build unprojector");

        let points = [
            Vec3::new(-0.5, 0.0, 0.0),
            Vec3::new(1.2, -0.4, 0.5),
            Vec3::new(-2.0, 0.8, -1.5),
            Vec3::new(0.3, 0.3, 2.0),
        ];
        for point in points {
            let (screen, depth) = project(point, viewport, view, proj).expect("Point should be in front of the camera");
            assert!(viewport.contains(screen));
            assert!((0.0..1.0).contains(&depth));
            let back = unprojector.unproject(screen, depth).expect("Could not unproject");
            assert_close(back, point, 1e-4);
        }
    }

    #[test]
    fn test_round_trip_sample_clip_planes() {
        let viewport = ViewportSize::new(800, 600);
        let view = Mat4::look_at_rh(Vec3::new(-0.5, 0.0, 5.0), Vec3::new(-0.5, 0.0, 0.0), Vec3::Y);
        let proj = vulkan_perspective(60.0, viewport.aspect_ratio(), 0.1, 100.0);
        let point = Vec3::new(2.5, 0.25, 0.0);
        let (screen, depth) = project(point, viewport, view, proj).expect("Point should be in front of the camera");
        let back = unproject(screen, depth, viewport, view, proj).expect("Could not unproject");
        assert_close(back, point, 1e-3);
    }

    #[test]
    fn test_top_of_screen_is_up_in_world() {
        let viewport = ViewportSize::new(100, 100);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let proj = vulkan_perspective(45.0, 1.0, 1.0, 10.0);
        let (screen, _) = project(Vec3::new(0.0, 1.0, 0.0), viewport, view, proj).expect("Point should be visible");
        assert!(screen.y < 50.0);
    }

    #[test]
    fn test_singular_transform_rejected() {
        let viewport = ViewportSize::new(100, 100);
        let result = unproject(Vec2::new(10.0, 10.0), 0.5, viewport, Mat4::ZERO, Mat4::IDENTITY);
        assert_eq!(result, Err(PickError::SingularTransform));
    }

    #[test]
    fn test_zero_divisor_rejected() {
        // Swaps z and w: the inverse sends (x, y, 0, 1) to (x, y, 1, 0)
        let swap_zw = Mat4::from_cols(Vec4::X, Vec4::Y, Vec4::W, Vec4::Z);
        let viewport = ViewportSize::new(100, 100);
        let result = unproject(Vec2::new(25.0, 75.0), 0.0, viewport, Mat4::IDENTITY, swap_zw);
        assert_eq!(result, Err(PickError::DegenerateDivisor));
    }

    #[test]
    fn test_empty_viewport_rejected() {
        let result = unproject(Vec2::ZERO, 0.5, ViewportSize::new(0, 100), Mat4::IDENTITY, Mat4::IDENTITY);
        assert_eq!(result, Err(PickError::EmptyViewport));
    }

    #[test]
    fn test_project_behind_camera() {
        let viewport = ViewportSize::new(100, 100);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let proj = vulkan_perspective(45.0, 1.0, 0.1, 10.0);
        assert!(project(Vec3::new(0.0, 0.0, 10.0), viewport, view, proj).is_none());
    }

    #[test]
    fn test_ndc_mapping() {
        let viewport = ViewportSize::new(100, 50);
        assert_eq!(viewport.to_ndc(Vec2::new(50.0, 25.0)), Ok(Vec2::ZERO));
        assert_eq!(viewport.to_ndc(Vec2::ZERO), Ok(Vec2::new(-1.0, -1.0)));
        assert_eq!(viewport.to_screen(Vec2::new(1.0, 1.0)), Vec2::new(100.0, 50.0));
        assert!(!viewport.contains(Vec2::new(100.0, 10.0)));
    }
}
