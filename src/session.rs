use anyhow::Context;
use glam::{Vec2, Vec3};

use picking::{unproject, DepthConvention, DepthReadback, PickError, ViewportSize};
use scene::{Camera, Config, FrameInfo, Projection};

/// Camera state of a viewport plus the "double click to re-target" picking.
pub struct PickSession {
    camera: Camera,
    projection: Projection,
    viewport: ViewportSize,
    convention: DepthConvention,
}

impl PickSession {
    pub fn new(camera: Camera, viewport: ViewportSize) -> Self {
        Self {
            camera,
            projection: camera.projection(viewport),
            viewport,
            convention: DepthConvention::Standard,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.camera(), config.viewport).with_depth_convention(config.depth_convention)
    }

    /// Depth convention the renderer uses; also flips the projection.
    pub fn with_depth_convention(mut self, convention: DepthConvention) -> Self {
        self.convention = convention;
        self.projection = self.projection.with_depth_convention(convention);
        self
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    /// Zero sized viewports (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = ViewportSize::new(width, height);
        self.projection.resize(width, height);
    }

    /// Uniform data for the current frame.
    pub fn frame_info(&self) -> FrameInfo {
        let mut frame = FrameInfo::new();
        frame.update(&self.camera, &self.projection);
        frame
    }

    /// Finds the surface under `mouse` and makes it the camera's point of interest.
    ///
    /// `mouse` is relative to the top-left corner of the viewport. Returns
    /// the hit position, or `None` when the pick was dropped: cursor outside
    /// the viewport, nothing rendered under it, or a point at infinity.
    pub fn raster_picking<R>(&mut self, mouse: Vec2, readback: &mut R) -> anyhow::Result<Option<Vec3>>
    where
        R: DepthReadback + ?Sized,
    {
        if !self.viewport.contains(mouse) {
            log::debug!("Pick at {mouse:?} is outside the viewport");
            return Ok(None);
        }

        let texel = readback
            .read_depth(mouse.floor().as_uvec2())
            .context("Could not read the depth under the cursor")?;
        let depth = texel.depth();
        if self.convention.is_background(depth) {
            log::debug!("Nothing under the cursor at {mouse:?}");
            return Ok(None);
        }

        let view = self.camera.calc_matrix();
        let proj = self.projection.calc_matrix();
        match unproject(mouse, depth, self.viewport, view, proj) {
            Ok(hit) => {
                self.camera.set_interest(hit);
                log::info!("Camera interest set to {hit:?}");
                Ok(Some(hit))
            }
            // also reached by garbage texels (NaN) that slip past the background check
            Err(PickError::DegenerateDivisor) => {
                log::debug!("Pick at {mouse:?} unprojects to infinity, ignored");
                Ok(None)
            }
            Err(error) => Err(error).context("Could not unproject the pick"),
        }
    }
}
