// cli.rs - Command-line interface configuration
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::camera::DEFAULT_FOV;
use crate::orchestrator::RenderSettings;

/// Environment variable consulted when `--scene` is not given
pub const SCENE_ENV: &str = "SCENE";

#[derive(Parser, Debug, Clone)]
#[command(name = "orbit-tracer")]
#[command(about = "Interactive progressive GPU path tracer", long_about = None)]
pub struct Cli {
    /// Render width in pixels
    #[arg(long, default_value_t = 1280, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Render height in pixels
    #[arg(long, default_value_t = 720, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Horizontal field of view in degrees
    #[arg(long, default_value_t = DEFAULT_FOV)]
    pub fov: f32,

    /// Scene description (JSON); `default` or nothing selects the built-in scene
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// WGSL kernel to load instead of the embedded one
    #[arg(long)]
    pub kernel: Option<PathBuf>,

    /// Only use an adapter whose name contains this (case-insensitive)
    #[arg(long)]
    pub adapter: Option<String>,

    /// Seed for the per-frame random stream
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Milliseconds between timer-driven redraws
    #[arg(long = "frame-interval-ms", default_value_t = 15)]
    pub frame_interval_ms: u64,

    /// Disable the statistics overlay
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Print the active scene as JSON and exit
    #[arg(long = "dump-scene", default_value = "false")]
    pub dump_scene: bool,
}

impl Cli {
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            width: self.width,
            height: self.height,
            fov: self.fov,
            seed: self.seed,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// `--scene`, else `$SCENE`; `None` means the built-in scene.
    pub fn scene_path(&self) -> Option<PathBuf> {
        self.scene
            .clone()
            .or_else(|| std::env::var_os(SCENE_ENV).map(PathBuf::from))
            .filter(|path| path.as_os_str() != "default")
    }
}
