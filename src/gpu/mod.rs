//! wgpu implementations of the compute backend and the display

pub mod compute;
pub mod context;
pub mod display;
pub mod kernel;
pub mod overlay;

pub use compute::WgpuCompute;
pub use context::GpuContext;
pub use display::SurfaceDisplay;
pub use kernel::{KernelSource, WORKGROUP_SIZE};
pub use overlay::Overlay;
