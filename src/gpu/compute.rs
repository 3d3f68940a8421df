use std::sync::Arc;

use log::debug;
use wgpu::util::DeviceExt;
use wgpu::{Device, Queue};

use super::kernel::{build_pipeline, KernelSource, WORKGROUP_SIZE};
use crate::error::{Result, TracerError};
use crate::math::DispatchSize;
use crate::orchestrator::ComputeBackend;
use crate::types::{binding, FrameUniform, RenderCamera, SphereData};

/// Bytes per accumulated pixel (`vec4<f32>` in the kernel)
const ACCUMULATION_TEXEL_SIZE: u64 = 16;

/// Rejects render sizes the device cannot hold before any resource is created.
pub fn check_resolution(width: u32, height: u32, limits: &wgpu::Limits) -> Result<()> {
    let unsupported = |reason: String| TracerError::Resolution {
        width,
        height,
        reason,
    };

    if width == 0 || height == 0 {
        return Err(unsupported("width and height must be at least 1".to_string()));
    }
    let max_dimension = limits.max_texture_dimension_2d;
    if width > max_dimension || height > max_dimension {
        return Err(unsupported(format!(
            "output texture is limited to {max_dimension} pixels per side"
        )));
    }

    let work_items = width
        .checked_mul(height)
        .ok_or_else(|| unsupported("pixel count does not fit in 32 bits".to_string()))?;
    let groups = DispatchSize::cover(
        work_items,
        WORKGROUP_SIZE,
        limits.max_compute_workgroups_per_dimension,
    );
    if groups.is_none() {
        return Err(unsupported("too many work groups for one dispatch".to_string()));
    }

    let accumulation_size = u64::from(work_items) * ACCUMULATION_TEXEL_SIZE;
    let max_binding = u64::from(limits.max_storage_buffer_binding_size)
        .min(u64::from(limits.max_buffer_size));
    if accumulation_size > max_binding {
        return Err(unsupported(format!(
            "accumulation buffer needs {accumulation_size} bytes, device allows {max_binding}"
        )));
    }

    Ok(())
}

/// Owns the kernel and every buffer it reads or writes.
pub struct WgpuCompute {
    device: Arc<Device>,
    queue: Arc<Queue>,
    pipeline: wgpu::ComputePipeline,
    bind_group: wgpu::BindGroup,
    scene_buffer: wgpu::Buffer,
    frame_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    accumulation_buffer: wgpu::Buffer,
    output_view: wgpu::TextureView,
    sphere_capacity: usize,
    max_groups_per_dimension: u32,
}

impl WgpuCompute {
    pub fn new(
        device: Arc<Device>,
        queue: Arc<Queue>,
        kernel: &KernelSource,
        width: u32,
        height: u32,
        spheres: &[SphereData],
    ) -> Result<Self> {
        if spheres.is_empty() {
            return Err(TracerError::InvalidScene("scene has no spheres".to_string()));
        }
        check_resolution(width, height, &device.limits())?;

        // Scene, frame and camera buffers

        let scene_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Buffer"),
            contents: bytemuck::cast_slice(spheres),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });

        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Uniform Buffer"),
            contents: bytemuck::cast_slice(&[FrameUniform::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[RenderCamera::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // Running sum per pixel, cleared on reset
        let accumulation_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Accumulation Buffer"),
            size: width as u64 * height as u64 * ACCUMULATION_TEXEL_SIZE,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Output texture written by the kernel, sampled by the display
        let output_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Output Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let output_view = output_texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Bind group
        let bind_group_layout = Self::create_bind_group_layout(&device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("path_tracer_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: binding::SCENE,
                    resource: scene_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: binding::FRAME,
                    resource: frame_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: binding::OUTPUT,
                    resource: wgpu::BindingResource::TextureView(&output_view),
                },
                wgpu::BindGroupEntry {
                    binding: binding::CAMERA,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: binding::ACCUMULATION,
                    resource: accumulation_buffer.as_entire_binding(),
                },
            ],
        });

        // Pipeline
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Path Tracer Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let pipeline = build_pipeline(&device, kernel, &pipeline_layout)?;

        let max_groups_per_dimension = device.limits().max_compute_workgroups_per_dimension;
        debug!(
            "Compute ready: {}x{} pixels, {} spheres, {} groups per dimension",
            width,
            height,
            spheres.len(),
            max_groups_per_dimension
        );

        Ok(Self {
            device,
            queue,
            pipeline,
            bind_group,
            scene_buffer,
            frame_buffer,
            camera_buffer,
            accumulation_buffer,
            output_view,
            sphere_capacity: spheres.len(),
            max_groups_per_dimension,
        })
    }

    fn create_bind_group_layout(device: &Device) -> wgpu::BindGroupLayout {
        let buffer_entry = |binding, ty| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("path_tracer_bind_group_layout"),
            entries: &[
                buffer_entry(
                    binding::SCENE,
                    wgpu::BufferBindingType::Storage { read_only: true },
                ),
                buffer_entry(binding::FRAME, wgpu::BufferBindingType::Uniform),
                wgpu::BindGroupLayoutEntry {
                    binding: binding::OUTPUT,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: wgpu::TextureFormat::Rgba8Unorm,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
                buffer_entry(binding::CAMERA, wgpu::BufferBindingType::Uniform),
                buffer_entry(
                    binding::ACCUMULATION,
                    wgpu::BufferBindingType::Storage { read_only: false },
                ),
            ],
        })
    }

    /// The framebuffer the kernel writes, for the display to sample
    pub fn output_view(&self) -> &wgpu::TextureView {
        &self.output_view
    }
}

impl ComputeBackend for WgpuCompute {
    fn work_group_size(&self) -> u32 {
        WORKGROUP_SIZE
    }

    fn max_groups_per_dimension(&self) -> u32 {
        self.max_groups_per_dimension
    }

    fn upload_scene(&mut self, spheres: &[SphereData]) -> Result<()> {
        if spheres.len() > self.sphere_capacity {
            return Err(TracerError::InvalidScene(format!(
                "scene grew from {} to {} spheres",
                self.sphere_capacity,
                spheres.len()
            )));
        }
        self.queue
            .write_buffer(&self.scene_buffer, 0, bytemuck::cast_slice(spheres));
        Ok(())
    }

    fn clear_accumulation(&mut self) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Accumulation Clear Encoder"),
            });
        encoder.clear_buffer(&self.accumulation_buffer, 0, None);
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn upload_camera(&mut self, camera: &RenderCamera) {
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(camera));
    }

    fn dispatch(&mut self, args: &FrameUniform, size: DispatchSize) -> Result<()> {
        self.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(args));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Path Tracer Encoder"),
            });
        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Path Tracer Pass"),
                timestamp_writes: None,
            });
            compute_pass.set_pipeline(&self.pipeline);
            compute_pass.set_bind_group(0, &self.bind_group, &[]);
            compute_pass.dispatch_workgroups(size.groups_x, size.groups_y, 1);
        }

        // Submit and wait for the kernel to finish
        let submission = self.queue.submit(std::iter::once(encoder.finish()));
        self.device.poll(wgpu::PollType::Wait {
            submission_index: Some(submission),
            timeout: None,
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_resolutions_fit_default_limits() {
        let limits = wgpu::Limits::default();
        assert!(check_resolution(1280, 720, &limits).is_ok());
        assert!(check_resolution(1920, 1080, &limits).is_ok());
        assert!(check_resolution(1, 1, &limits).is_ok());
    }

    #[test]
    fn test_oversized_texture_is_rejected() {
        let limits = wgpu::Limits::default();
        let side = limits.max_texture_dimension_2d + 1;
        assert!(matches!(
            check_resolution(side, 16, &limits),
            Err(TracerError::Resolution { .. })
        ));
        assert!(check_resolution(70_000, 70_000, &limits).is_err());
    }

    #[test]
    fn test_accumulation_buffer_limit() {
        let limits = wgpu::Limits {
            max_storage_buffer_binding_size: 1024 * 1024,
            ..wgpu::Limits::default()
        };
        // 256x256 pixels at 16 bytes each is exactly one MiB
        assert!(check_resolution(256, 256, &limits).is_ok());
        assert!(matches!(
            check_resolution(256, 257, &limits),
            Err(TracerError::Resolution { .. })
        ));
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(check_resolution(0, 720, &wgpu::Limits::default()).is_err());
    }
}
