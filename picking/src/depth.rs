use std::fmt;
use std::str::FromStr;

use crate::error::PickError;

/// Largest value a 24 bit unsigned normalized depth can hold.
pub const UNORM24_MASK: u32 = (1 << 24) - 1;

/// Depth buffer formats the decoder understands.
///
/// The set is closed. Tags coming from a renderer (Vulkan codes, config
/// names) go through `TryFrom`/`FromStr` and anything else is rejected with
/// [`PickError::UnsupportedFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthFormat {
    /// `D32_SFLOAT`: the texel is an IEEE-754 float.
    Float32,
    /// `X8_D24_UNORM_PACK32`: 24 bit depth in the low bits, 8 unused bits.
    Unorm24Packed32,
    /// `D24_UNORM_S8_UINT`: 24 bit depth in the low bits, stencil above.
    Unorm24Stencil8,
}

impl DepthFormat {
    /// Turns the raw bits of one texel into a normalized depth.
    pub fn decode(self, raw: u32) -> f32 {
        match self {
            DepthFormat::Float32 => f32::from_bits(raw),
            DepthFormat::Unorm24Packed32 | DepthFormat::Unorm24Stencil8 => {
                (raw & UNORM24_MASK) as f32 / UNORM24_MASK as f32
            }
        }
    }

    /// Name used in scene config files.
    pub fn name(self) -> &'static str {
        match self {
            DepthFormat::Float32 => "d32_sfloat",
            DepthFormat::Unorm24Packed32 => "x8_d24_unorm_pack32",
            DepthFormat::Unorm24Stencil8 => "d24_unorm_s8_uint",
        }
    }
}

impl fmt::Display for DepthFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DepthFormat {
    type Err = PickError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "d32_sfloat" => Ok(DepthFormat::Float32),
            "x8_d24_unorm_pack32" => Ok(DepthFormat::Unorm24Packed32),
            "d24_unorm_s8_uint" => Ok(DepthFormat::Unorm24Stencil8),
            _ => Err(PickError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl TryFrom<&str> for DepthFormat {
    type Error = PickError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A raw Vulkan `VkFormat` code, as handed over by a Vulkan renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VkFormat(pub i32);

impl VkFormat {
    pub const X8_D24_UNORM_PACK32: VkFormat = VkFormat(125);
    pub const D32_SFLOAT: VkFormat = VkFormat(126);
    pub const D24_UNORM_S8_UINT: VkFormat = VkFormat(129);
}

impl TryFrom<VkFormat> for DepthFormat {
    type Error = PickError;

    fn try_from(value: VkFormat) -> Result<Self, Self::Error> {
        match value {
            VkFormat::D32_SFLOAT => Ok(DepthFormat::Float32),
            VkFormat::X8_D24_UNORM_PACK32 => Ok(DepthFormat::Unorm24Packed32),
            VkFormat::D24_UNORM_S8_UINT => Ok(DepthFormat::Unorm24Stencil8),
            VkFormat(code) => Err(PickError::UnsupportedFormat(format!("VkFormat({code})"))),
        }
    }
}

/// Decodes one depth texel given the format tag the renderer declared.
///
/// The tag is resolved before the bits are looked at, so an unknown tag
/// fails without doing any work.
pub fn decode_depth<F>(raw: u32, format: F) -> Result<f32, PickError>
where
    F: TryInto<DepthFormat>,
    PickError: From<F::Error>,
{
    let format: DepthFormat = format.try_into()?;
    Ok(format.decode(raw))
}

/// One texel read back from a depth buffer, still in its stored form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthTexel {
    pub raw: u32,
    pub format: DepthFormat,
}

impl DepthTexel {
    pub fn new(raw: u32, format: DepthFormat) -> Self {
        Self { raw, format }
    }

    /// Reads the first texel of a mapped readback buffer.
    pub fn from_bytes(bytes: &[u8], format: DepthFormat) -> Result<Self, PickError> {
        let texel = bytes.get(..4).ok_or(PickError::ShortReadback(bytes.len()))?;
        Ok(Self::new(bytemuck::pod_read_unaligned::<u32>(texel), format))
    }

    /// Normalized depth in `[0, 1]`.
    pub fn depth(&self) -> f32 {
        self.format.decode(self.raw)
    }
}

/// Which end of the depth range the renderer clears to.
///
/// The clear value doubles as the "nothing under the cursor" sentinel, so
/// picks are skipped when the sampled depth sits on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthConvention {
    /// Near plane at 0, far plane (and clear value) at 1.
    #[default]
    Standard,
    /// Near plane at 1, far plane (and clear value) at 0.
    Reversed,
}

impl DepthConvention {
    pub fn far_plane(self) -> f32 {
        match self {
            DepthConvention::Standard => 1.0,
            DepthConvention::Reversed => 0.0,
        }
    }

    /// True when `depth` means no geometry was hit.
    pub fn is_background(self, depth: f32) -> bool {
        match self {
            DepthConvention::Standard => depth >= 1.0,
            DepthConvention::Reversed => depth <= 0.0,
        }
    }
}

impl FromStr for DepthConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(DepthConvention::Standard),
            "reversed" | "reverse" => Ok(DepthConvention::Reversed),
            _ => Err(format!("Unknown depth convention: {s}")),
        }
    }
}
