//! # Picking
//!
//! Screen space picking: decode the depth texel under the cursor and turn
//! it back into a world position with the camera's view and projection.
//!
//! ## Modules
//!
//! - `depth`: depth buffer formats, texel decoding and the far-plane sentinel.
//! - `unproject`: viewport/NDC mapping, `Unprojector` and the forward `project`.
//! - `readback`: the `DepthReadback` trait a renderer implements, plus a host-side buffer.
//! - `error`: `PickError`.
//!
//! ## Usage
//!
//! ```
//! use glam::{Mat4, Vec2};
//! use picking::{decode_depth, unproject, DepthFormat, ViewportSize};
//!
//! let depth = decode_depth(0x0000_0000, DepthFormat::Unorm24Packed32).unwrap();
//! let world = unproject(Vec2::new(50.0, 50.0), depth, ViewportSize::new(100, 100), Mat4::IDENTITY, Mat4::IDENTITY).unwrap();
//! assert_eq!(world, glam::Vec3::ZERO);
//! ```
mod depth;
mod error;
mod readback;
mod unproject;

pub use depth::{decode_depth, DepthConvention, DepthFormat, DepthTexel, VkFormat, UNORM24_MASK};
pub use error::PickError;
pub use readback::{DepthReadback, HostDepthBuffer};
pub use unproject::{project, unproject, Unprojector, ViewportSize};
