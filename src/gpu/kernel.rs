use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::PathBuf;

use log::{info, warn};
use wgpu::{CompilationMessage, CompilationMessageType, Device};

use crate::error::{Result, TracerError};

/// Work-group size the embedded kernel is compiled with
pub const WORKGROUP_SIZE: u32 = 64;

pub const KERNEL_ENTRY_POINT: &str = "main";

const EMBEDDED_KERNEL: &str = include_str!("../path_tracer.wgsl");

/// Where the path tracing kernel comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelSource {
    Embedded,
    File(PathBuf),
}

impl KernelSource {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        path.map_or(KernelSource::Embedded, KernelSource::File)
    }

    pub fn load(&self) -> Result<Cow<'static, str>> {
        match self {
            KernelSource::Embedded => Ok(Cow::Borrowed(EMBEDDED_KERNEL)),
            KernelSource::File(path) => std::fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(|source| TracerError::KernelSource {
                    path: path.clone(),
                    source,
                }),
        }
    }

    fn label(&self) -> String {
        match self {
            KernelSource::Embedded => "embedded path_tracer.wgsl".to_string(),
            KernelSource::File(path) => path.display().to_string(),
        }
    }
}

/// Compiles the kernel and builds its compute pipeline.
///
/// Compiler diagnostics are collected into a build log; any error in it, or any
/// validation error while creating the pipeline, fails the build with that log.
pub fn build_pipeline(
    device: &Device,
    source: &KernelSource,
    layout: &wgpu::PipelineLayout,
) -> Result<wgpu::ComputePipeline> {
    let code = source.load()?;
    info!("Building kernel from {}", source.label());

    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Path Tracer Kernel"),
        source: wgpu::ShaderSource::Wgsl(code),
    });
    let compilation = pollster::block_on(module.get_compilation_info());

    let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some("Path Tracer Pipeline"),
        layout: Some(layout),
        module: &module,
        entry_point: Some(KERNEL_ENTRY_POINT),
        compilation_options: Default::default(),
        cache: None,
    });

    let validation = pollster::block_on(device.pop_error_scope());

    let mut log = build_log(&compilation.messages);
    let has_errors = compilation
        .messages
        .iter()
        .any(|m| matches!(m.message_type, CompilationMessageType::Error));

    if let Some(err) = validation {
        let _ = writeln!(log, "validation: {err}");
        return Err(TracerError::KernelBuild { log });
    }
    if has_errors {
        return Err(TracerError::KernelBuild { log });
    }
    if !log.is_empty() {
        warn!("Kernel build log:\n{log}");
    }

    Ok(pipeline)
}

fn build_log(messages: &[CompilationMessage]) -> String {
    let mut log = String::new();
    for message in messages {
        let kind = match message.message_type {
            CompilationMessageType::Error => "error",
            CompilationMessageType::Warning => "warning",
            CompilationMessageType::Info => "info",
        };
        match &message.location {
            Some(location) => {
                let _ = writeln!(
                    log,
                    "{kind} at {}:{}: {}",
                    location.line_number, location.line_position, message.message
                );
            }
            None => {
                let _ = writeln!(log, "{kind}: {}", message.message);
            }
        }
    }
    log
}
