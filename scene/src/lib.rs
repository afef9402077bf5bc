//! # Scene
//!
//! This module contains the scene side of the samples: the camera, the
//! structs shared with the shaders, and the scene configuration file.
//!
//! ## Modules
//!
//! - `camera`: Contains the look-at `Camera` and the Vulkan-style `Projection`.
//! - `config`: Loads the configuration file (camera, viewport, depth format, recorded picks).
//! - `structs`: Contains the GPU-layout structs like `FrameInfo`, `Light`, `Vertex`, `InstanceInfo`, etc.
//!
//! ## Usage
//!
//! ```sh
//! // Load the scene and build the matrices for a frame
//! let config = Config::new("res/config.toml")?;
//! let camera = config.camera();
//! let projection = camera.projection(config.viewport);
//!
//! let mut frame = FrameInfo::new();
//! frame.update(&camera, &projection);
//! ```
mod camera;
mod config;
mod structs;

pub use camera::{Camera, Projection};
pub use config::{Config, RecordedPick};
pub use structs::{
    FrameInfo, InstanceInfo, Light, OpacityPushConstant, PbrMaterial, PrimMeshInfo, RasterPushConstant,
    RayQueryPushConstant, SceneDescription, Vertex,
};
