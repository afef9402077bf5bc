use std::sync::mpsc;

use anyhow::{anyhow, bail, Context};
use glam::UVec2;

use picking::{DepthFormat, DepthReadback, DepthTexel, PickError};

/// Maps a wgpu depth format onto the formats the picking decoder knows.
///
/// `Depth24Plus` is backed by `X8_D24_UNORM_PACK32` on Vulkan, which is
/// where the raw texels handed to the decoder come from.
pub fn depth_format(format: wgpu::TextureFormat) -> Result<DepthFormat, PickError> {
    match format {
        wgpu::TextureFormat::Depth32Float => Ok(DepthFormat::Float32),
        wgpu::TextureFormat::Depth24Plus => Ok(DepthFormat::Unorm24Packed32),
        wgpu::TextureFormat::Depth24PlusStencil8 => Ok(DepthFormat::Unorm24Stencil8),
        other => Err(PickError::UnsupportedFormat(format!("{other:?}"))),
    }
}

const TEXEL_SIZE: u32 = 4;

/// Row pitch of a depth copy, padded to what `copy_texture_to_buffer` requires.
fn padded_bytes_per_row(width: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    (width * TEXEL_SIZE).div_ceil(align) * align
}

/// Reads depth texels back from a wgpu depth texture.
///
/// wgpu only copies the depth aspect of a whole texture, so each read copies
/// the full image into a mappable staging buffer, submits, blocks until the
/// buffer is mapped and picks out the requested texel. The staging buffer is
/// unmapped again before the next copy is recorded.
pub struct GpuDepthReadback<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    texture: &'a wgpu::Texture,
    format: DepthFormat,
    bytes_per_row: u32,
    staging: wgpu::Buffer,
}

impl<'a> GpuDepthReadback<'a> {
    pub fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue, texture: &'a wgpu::Texture) -> anyhow::Result<Self> {
        let format = depth_format(texture.format())?;
        // wgpu only allows copying the depth aspect out of 32 bit float depth
        if texture.format() != wgpu::TextureFormat::Depth32Float {
            bail!("Depth texture format {:?} cannot be copied to a buffer", texture.format());
        }
        if !texture.usage().contains(wgpu::TextureUsages::COPY_SRC) {
            bail!("Depth texture was not created with COPY_SRC usage");
        }

        let size = texture.size();
        let bytes_per_row = padded_bytes_per_row(size.width);
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Depth Readback Buffer"),
            size: bytes_per_row as wgpu::BufferAddress * size.height as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        Ok(Self {
            device,
            queue,
            texture,
            format,
            bytes_per_row,
            staging,
        })
    }

    /// Records and submits the copy of the whole depth aspect.
    fn copy_depth(&self) -> anyhow::Result<()> {
        let size = self.texture.size();

        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Depth Readback Encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::DepthOnly,
            },
            wgpu::ImageCopyBuffer {
                buffer: &self.staging,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(self.bytes_per_row),
                    rows_per_image: Some(size.height),
                },
            },
            wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
        );
        let _ = self.queue.submit(std::iter::once(encoder.finish()));

        if let Some(error) = pollster::block_on(self.device.pop_error_scope()) {
            bail!("Depth copy failed: {error}");
        }
        Ok(())
    }
}

impl DepthReadback for GpuDepthReadback<'_> {
    fn format(&self) -> DepthFormat {
        self.format
    }

    fn read_depth(&mut self, pixel: UVec2) -> anyhow::Result<DepthTexel> {
        let size = self.texture.size();
        if pixel.x >= size.width || pixel.y >= size.height {
            bail!(
                "Pixel ({}, {}) is outside the {}x{} depth texture",
                pixel.x,
                pixel.y,
                size.width,
                size.height
            );
        }

        self.copy_depth()?;

        let slice = self.staging.slice(..);
        let (sender, receiver) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        let _ = self.device.poll(wgpu::Maintain::Wait);
        receiver
            .recv()
            .map_err(|_| anyhow!("Depth readback callback was dropped"))?
            .context("Could not map depth readback buffer")?;

        let offset = pixel.y as usize * self.bytes_per_row as usize + pixel.x as usize * TEXEL_SIZE as usize;
        let texel = {
            let mapped = slice.get_mapped_range();
            DepthTexel::from_bytes(mapped.get(offset..).unwrap_or_default(), self.format)
        };
        self.staging.unmap();
        Ok(texel?)
    }
}
