mod gpu;
mod readback;

pub use gpu::{create_depth_texture, setup_headless_gpu};
pub use readback::{depth_format, GpuDepthReadback};
