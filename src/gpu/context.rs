use std::sync::Arc;

use log::{debug, info};
use wgpu::{Adapter, Device, DeviceDescriptor, Instance, Queue, Surface};
use winit::window::Window;

use crate::error::{Result, TracerError};

/// Device, queue and the window surface they were chosen for
pub struct GpuContext {
    adapter: Adapter,
    device: Arc<Device>,
    queue: Arc<Queue>,
    surface: Surface<'static>,
}

impl GpuContext {
    /// Picks an adapter that can present to `window` and opens a device on it.
    ///
    /// With `adapter_filter` set, only adapters whose name contains it
    /// (case-insensitive) are considered. No candidate is fatal.
    pub async fn new(window: Arc<Window>, adapter_filter: Option<&str>) -> Result<Self> {
        // Create instance and surface
        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        // Pick adapter
        let adapter = Self::select_adapter(&instance, &surface, adapter_filter).await?;
        let info = adapter.get_info();
        info!("Using adapter: {} ({:?}, {:?})", info.name, info.device_type, info.backend);

        // Create device
        let (device, queue) = Self::request_device(&adapter).await?;

        Ok(Self {
            adapter,
            device: Arc::new(device),
            queue: Arc::new(queue),
            surface,
        })
    }

    async fn select_adapter(
        instance: &Instance,
        surface: &Surface<'_>,
        filter: Option<&str>,
    ) -> Result<Adapter> {
        let adapters = instance.enumerate_adapters(wgpu::Backends::PRIMARY);
        for adapter in &adapters {
            let info = adapter.get_info();
            debug!("Found adapter: {} ({:?}, {:?})", info.name, info.device_type, info.backend);
        }

        match filter {
            Some(filter) => adapters
                .into_iter()
                .find(|adapter| {
                    adapter_matches(&adapter.get_info().name, filter)
                        && adapter.is_surface_supported(surface)
                })
                .ok_or_else(|| TracerError::NoAdapter {
                    filter: Some(filter.to_string()),
                }),
            None => instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::HighPerformance,
                    compatible_surface: Some(surface),
                    force_fallback_adapter: false,
                })
                .await
                .map_err(|_| TracerError::NoAdapter { filter: None }),
        }
    }

    async fn request_device(adapter: &Adapter) -> Result<(Device, Queue)> {
        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("Path Tracer Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits {
                    max_storage_buffer_binding_size: adapter.limits().max_storage_buffer_binding_size,
                    max_buffer_size: adapter.limits().max_buffer_size,
                    ..Default::default()
                },
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await?;
        Ok((device, queue))
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    pub fn device(&self) -> &Arc<Device> {
        &self.device
    }

    pub fn queue(&self) -> &Arc<Queue> {
        &self.queue
    }

    /// Hands the surface over to the display, which owns its configuration.
    pub fn into_surface(self) -> Surface<'static> {
        self.surface
    }
}

fn adapter_matches(name: &str, filter: &str) -> bool {
    name.to_lowercase().contains(&filter.to_lowercase())
}
