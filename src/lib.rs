pub mod camera;
pub mod cli;
pub mod error;
pub mod frame;
pub mod gpu;
pub mod input;
pub mod math;
pub mod orchestrator;
pub mod scene;
pub mod timer;
pub mod types;

pub use camera::InteractiveCamera;
pub use error::{Result, TracerError};
pub use frame::FrameController;
pub use orchestrator::{CameraAction, ComputeBackend, Display, FrameStats, RenderSettings, Renderer};
pub use scene::{create_default_scene, Scene};
