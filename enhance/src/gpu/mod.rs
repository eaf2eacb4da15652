use std::sync::Arc;

use crate::common::{Error, Result};
use crate::parallel::HarnessConfig;

/// GPU context holding wgpu device and queue for compute operations.
#[derive(Debug, Clone)]
pub struct Gpu {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    adapter_info: wgpu::AdapterInfo,
}

impl Gpu {
    /// Creates a new GPU context with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(&HarnessConfig::default())
    }

    /// Creates a GPU context using the adapter preferences in `config`.
    pub fn with_config(config: &HarnessConfig) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: config.power_preference.into(),
            compatible_surface: None,
            force_fallback_adapter: config.force_fallback_adapter,
        }))
        .map_err(|e| {
            Error::DeviceResource(format!("failed to find suitable GPU adapter: {}", e))
        })?;

        let adapter_info = adapter.get_info();
        tracing::info!(
            "using adapter {} ({:?}, {:?})",
            adapter_info.name,
            adapter_info.device_type,
            adapter_info.backend
        );

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("enhance_device"),
            required_limits: adapter.limits(),
            ..Default::default()
        }))
        .map_err(|e| Error::DeviceResource(format!("failed to create device: {}", e)))?;

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            adapter_info,
        })
    }

    /// Returns a reference to the wgpu device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the wgpu queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    pub fn limits(&self) -> wgpu::Limits {
        self.device.limits()
    }

    /// Blocks until all submitted work has finished.
    pub fn wait(&self) -> Result<()> {
        self.device
            .poll(wgpu::PollType::Wait)
            .map(|_| ())
            .map_err(|e| Error::DeviceResource(format!("device poll failed: {}", e)))
    }
}
