//! Host side mirrors of the structs the shaders read.
//!
//! Layouts must match the shader declarations byte for byte, so every
//! struct is `#[repr(C)]`, `Pod`, and padded by hand where a `vec3` would
//! otherwise leave a hole.

use glam::Mat4;

use crate::camera::{Camera, Projection};

//-----------Frame-----------------
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameInfo {
    pub proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub proj_inv: [[f32; 4]; 4],
    pub view_inv: [[f32; 4]; 4],
    pub cam_pos: [f32; 4], // xyz + pad
}

impl FrameInfo {
    pub fn new() -> Self {
        let identity = Mat4::IDENTITY.to_cols_array_2d();
        Self {
            proj: identity,
            view: identity,
            proj_inv: identity,
            view_inv: identity,
            cam_pos: [0.0; 4],
        }
    }

    pub fn update(&mut self, camera: &Camera, projection: &Projection) {
        let view = camera.calc_matrix();
        let proj = projection.calc_matrix();
        self.view = view.to_cols_array_2d();
        self.proj = proj.to_cols_array_2d();
        self.view_inv = view.inverse().to_cols_array_2d();
        self.proj_inv = proj.inverse().to_cols_array_2d();
        self.cam_pos = camera.eye.extend(1.0).into();
    }
}

impl Default for FrameInfo {
    fn default() -> Self {
        Self::new()
    }
}

//-----------Raster-----------------
/// Per draw data of the raster sample: node transform and material color.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RasterPushConstant {
    pub transfo: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl RasterPushConstant {
    pub fn new(transfo: Mat4, color: [f32; 4]) -> Self {
        Self {
            transfo: transfo.to_cols_array_2d(),
            color,
        }
    }
}

//-----------Light-----------------
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Light {
    pub position: [f32; 3],
    pub intensity: f32,
    pub radius: f32, // on XZ plane
    pub _pad0: f32,  // alignment of 8
}

impl Light {
    pub fn new(position: [f32; 3], intensity: f32, radius: f32) -> Self {
        Self {
            position,
            intensity,
            radius,
            _pad0: 0.0,
        }
    }
}

//-----------Ray query-----------------
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RayQueryPushConstant {
    pub max_depth: i32,
    pub frame: i32,
    pub firefly_clamp_threshold: f32,
    pub max_samples: i32,
    pub light: Light,
}

impl Default for RayQueryPushConstant {
    fn default() -> Self {
        Self {
            max_depth: 5,
            frame: 0,
            firefly_clamp_threshold: 10.0,
            max_samples: 2,
            light: Light::new([1.0, 4.0, 1.0], 100.0, 1.0),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PbrMaterial {
    pub albedo: [f32; 3],
    pub roughness: f32,
    pub metallic: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub t: [f32; 2],
}

/// Device addresses of one primitive mesh's buffers.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PrimMeshInfo {
    pub vertex_address: u64,
    pub index_address: u64,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceInfo {
    pub transform: [[f32; 4]; 4],
    pub material_id: i32,
}

impl InstanceInfo {
    pub fn new(transform: Mat4, material_id: i32) -> Self {
        Self {
            transform: transform.to_cols_array_2d(),
            material_id,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneDescription {
    pub material_address: u64,
    pub inst_info_address: u64,
    pub prim_info_address: u64,
    pub light: Light,
}

//-----------Opacity micromap-----------------
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OpacityPushConstant {
    pub metallic: f32,
    pub roughness: f32,
    pub intensity: f32,
    pub max_depth: i32,
    pub num_base_triangles: i32,
    pub radius: f32,
    pub use_anyhit: i32, // used as bool
}

impl Default for OpacityPushConstant {
    fn default() -> Self {
        Self {
            metallic: 0.5,
            roughness: 1.0,
            intensity: 5.0,
            max_depth: 5,
            num_base_triangles: 0,
            radius: 1.0,
            use_anyhit: 1,
        }
    }
}
