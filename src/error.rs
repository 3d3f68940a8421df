use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TracerError>;

/// Errors surfaced by the tracer library.
///
/// Startup failures (adapter, device, kernel) are fatal to the binary; surface and
/// poll errors can occur per frame.
#[derive(Debug, Error)]
pub enum TracerError {
    #[error("no compatible GPU adapter found{}", filter_suffix(.filter))]
    NoAdapter { filter: Option<String> },

    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("failed to create window surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("resolution {width}x{height} is not supported: {reason}")]
    Resolution {
        width: u32,
        height: u32,
        reason: String,
    },

    #[error("kernel source {path:?} could not be read: {source}")]
    KernelSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("kernel failed to build:\n{log}")]
    KernelBuild { log: String },

    #[error("scene file {path:?} could not be read: {source}")]
    SceneIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("scene description is malformed: {0}")]
    SceneParse(#[from] serde_json::Error),

    #[error("invalid scene: {0}")]
    InvalidScene(String),

    #[error("failed to acquire surface texture: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("device wait failed: {0}")]
    Poll(#[from] wgpu::PollError),
}

fn filter_suffix(filter: &Option<String>) -> String {
    match filter {
        Some(name) => format!(" matching {name:?}"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_adapter_message_mentions_filter() {
        let err = TracerError::NoAdapter {
            filter: Some("nvidia".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "no compatible GPU adapter found matching \"nvidia\""
        );

        let err = TracerError::NoAdapter { filter: None };
        assert_eq!(err.to_string(), "no compatible GPU adapter found");
    }

    #[test]
    fn test_kernel_build_message_carries_log() {
        let err = TracerError::KernelBuild {
            log: "3:5 error: unknown identifier".to_string(),
        };
        assert!(err.to_string().contains("unknown identifier"));
    }

    #[test]
    fn test_resolution_message_names_size() {
        let err = TracerError::Resolution {
            width: 70_000,
            height: 70_000,
            reason: "pixel count overflows".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "resolution 70000x70000 is not supported: pixel count overflows"
        );
    }
}
