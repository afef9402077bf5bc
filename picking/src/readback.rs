use anyhow::{bail, Context};
use glam::UVec2;

use crate::depth::{DepthFormat, DepthTexel};
use crate::unproject::ViewportSize;

/// Source of the depth value under a pixel.
///
/// Implementors are responsible for getting the texel into host memory
/// before returning it; the storage it was copied through must not be
/// reused until the copy has been read.
pub trait DepthReadback {
    /// Format the underlying depth buffer was created with.
    fn format(&self) -> DepthFormat;

    /// Reads the depth texel at `pixel` (origin top-left).
    fn read_depth(&mut self, pixel: UVec2) -> anyhow::Result<DepthTexel>;
}

/// A whole depth image that already lives in host memory.
#[derive(Debug, Clone)]
pub struct HostDepthBuffer {
    size: ViewportSize,
    format: DepthFormat,
    texels: Vec<u32>,
}

impl HostDepthBuffer {
    /// Wraps row-major texels, one `u32` per pixel.
    pub fn new(size: ViewportSize, format: DepthFormat, texels: Vec<u32>) -> anyhow::Result<Self> {
        let expected = size.width as usize * size.height as usize;
        if texels.len() != expected {
            bail!(
                "Depth buffer of {}x{} needs {} texels, got {}",
                size.width,
                size.height,
                expected,
                texels.len()
            );
        }
        Ok(Self { size, format, texels })
    }

    /// A buffer cleared to `raw` everywhere.
    pub fn filled(size: ViewportSize, format: DepthFormat, raw: u32) -> Self {
        let texels = vec![raw; size.width as usize * size.height as usize];
        Self { size, format, texels }
    }

    /// Copies texels out of a mapped byte buffer (tightly packed rows).
    pub fn from_bytes(size: ViewportSize, format: DepthFormat, bytes: &[u8]) -> anyhow::Result<Self> {
        let texels: Vec<u32> = bytes
            .chunks_exact(4)
            .map(bytemuck::pod_read_unaligned::<u32>)
            .collect();
        Self::new(size, format, texels).context("Could not build depth buffer from bytes")
    }

    pub fn size(&self) -> ViewportSize {
        self.size
    }

    pub fn set(&mut self, pixel: UVec2, raw: u32) -> anyhow::Result<()> {
        let index = self.index(pixel)?;
        self.texels[index] = raw;
        Ok(())
    }

    fn index(&self, pixel: UVec2) -> anyhow::Result<usize> {
        if pixel.x >= self.size.width || pixel.y >= self.size.height {
            bail!(
                "Pixel ({}, {}) is outside the {}x{} depth buffer",
                pixel.x,
                pixel.y,
                self.size.width,
                self.size.height
            );
        }
        Ok(pixel.y as usize * self.size.width as usize + pixel.x as usize)
    }
}

impl DepthReadback for HostDepthBuffer {
    fn format(&self) -> DepthFormat {
        self.format
    }

    fn read_depth(&mut self, pixel: UVec2) -> anyhow::Result<DepthTexel> {
        let index = self.index(pixel)?;
        Ok(DepthTexel::new(self.texels[index], self.format))
    }
}
