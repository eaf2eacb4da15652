use std::time::{Duration, Instant};

use wgpu::util::DeviceExt;

use super::config::HarnessConfig;
use super::grid::{Extent2, GridConfig};
use super::kernel::{Kernel, KernelParams};
use super::pipeline::GpuKernelPipelines;
use crate::common::error::{Error, Result};
use crate::engine::{EnhancementEngine, validate_input};
use crate::gpu::Gpu;
use crate::image::Image;

/// Output of one dispatch and the time between dispatch and completion.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub image: Image,
    pub elapsed: Duration,
}

impl ExecutionResult {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Runs kernels on the GPU. Owns the device buffers for the duration of
/// each [`GpuHarness::run`] call; callers only see host images.
#[derive(Debug)]
pub struct GpuHarness {
    gpu: Gpu,
    config: HarnessConfig,
    pipelines: GpuKernelPipelines,
}

impl GpuHarness {
    /// Compiles both kernels for the configured work-group extent.
    pub fn new(gpu: Gpu, config: HarnessConfig) -> Result<Self> {
        check_workgroup(&gpu.limits(), config.workgroup)?;

        let scope = ErrorScope::push(gpu.device());
        let pipelines = GpuKernelPipelines::new(&gpu, config.workgroup);
        scope.finish("pipeline creation")?;

        tracing::debug!(
            "kernel pipelines ready on {}, work-group {}",
            gpu.adapter_info().name,
            pipelines.workgroup
        );

        Ok(Self {
            gpu,
            config,
            pipelines,
        })
    }

    /// Creates the GPU context and the harness from one configuration.
    pub fn from_config(config: HarnessConfig) -> Result<Self> {
        let gpu = Gpu::with_config(&config)?;
        Self::new(gpu, config)
    }

    pub fn gpu(&self) -> &Gpu {
        &self.gpu
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Uploads `image`, dispatches `kernel` over every pixel, waits for all
    /// units to finish and downloads the result.
    ///
    /// Only the dispatch and the wait are timed. Either the whole output is
    /// returned or an error; there is no partial result.
    pub fn run(&self, kernel: Kernel, image: &Image) -> Result<ExecutionResult> {
        validate_input(image)?;

        let desc = *image.desc();
        let grid = GridConfig::for_image(desc.height, desc.width, self.config.workgroup)?;

        if desc.is_empty() {
            return Ok(ExecutionResult {
                image: Image::new_empty(desc)?,
                elapsed: Duration::ZERO,
            });
        }

        let buffer_size = (image.bytes().len() * size_of::<u32>()) as u64;
        check_dispatch(&self.gpu.limits(), grid, buffer_size)?;

        tracing::debug!(
            "{} kernel on {}x{} {}: {} groups of {}",
            kernel.name(),
            desc.height,
            desc.width,
            desc.color_format,
            grid.groups,
            grid.group
        );

        let device = self.gpu.device();
        let queue = self.gpu.queue();

        // Allocation and upload
        let scope = ErrorScope::push(device);

        let params = KernelParams::new(kernel, &desc);
        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("enhance_params_buffer"),
            contents: bytemuck::bytes_of(&params),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let table = kernel.lookup_table();
        let table_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("enhance_table_buffer"),
            contents: bytemuck::cast_slice(&table),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let input_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("enhance_input_buffer"),
            size: buffer_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("enhance_output_buffer"),
            size: buffer_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("enhance_staging_buffer"),
            size: buffer_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let samples: Vec<u32> = image.bytes().iter().map(|&b| b as u32).collect();
        queue.write_buffer(&input_buffer, 0, bytemuck::cast_slice(&samples));
        queue.submit(std::iter::empty());

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("enhance_bind_group"),
            layout: &self.pipelines.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: input_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: output_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: table_buffer.as_entire_binding(),
                },
            ],
        });

        let uploaded = self.gpu.wait();
        scope.finish("buffer allocation")?;
        uploaded?;

        // Dispatch and barrier
        let scope = ErrorScope::push(device);
        let start = Instant::now();

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("enhance_dispatch_encoder"),
        });
        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("enhance_pass"),
                timestamp_writes: None,
            });
            compute_pass.set_pipeline(self.pipelines.pipeline(kernel));
            compute_pass.set_bind_group(0, &bind_group, &[]);
            compute_pass.dispatch_workgroups(grid.groups.x, grid.groups.y, 1);
        }
        queue.submit(std::iter::once(encoder.finish()));

        let completed = self.gpu.wait();
        let elapsed = start.elapsed();
        scope.finish("kernel dispatch")?;
        completed?;

        // Download
        let scope = ErrorScope::push(device);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("enhance_download_encoder"),
        });
        encoder.copy_buffer_to_buffer(&output_buffer, 0, &staging_buffer, 0, buffer_size);
        queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = staging_buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        let downloaded = self.gpu.wait();
        scope.finish("result readback")?;
        downloaded?;

        rx.recv()
            .map_err(|_| Error::DeviceResource("readback callback was dropped".to_string()))?
            .map_err(|e| Error::DeviceResource(format!("failed to map readback buffer: {}", e)))?;

        let bytes: Vec<u8> = {
            let data = buffer_slice.get_mapped_range();
            data.chunks_exact(size_of::<u32>())
                .map(|word| u32::from_le_bytes([word[0], word[1], word[2], word[3]]) as u8)
                .collect()
        };
        staging_buffer.unmap();

        tracing::debug!(
            "{} kernel finished in {:.3} ms",
            kernel.name(),
            elapsed.as_secs_f64() * 1000.0
        );

        Ok(ExecutionResult {
            image: Image::new_with_data(desc, bytes)?,
            elapsed,
        })
    }
}

/// Dispatches `kernel` through `harness`.
pub fn run_parallel(harness: &GpuHarness, kernel: Kernel, image: &Image) -> Result<ExecutionResult> {
    harness.run(kernel, image)
}

/// [`EnhancementEngine`] backed by the GPU harness. Timing is dropped.
#[derive(Debug)]
pub struct ParallelEngine {
    harness: GpuHarness,
}

impl ParallelEngine {
    pub fn new(harness: GpuHarness) -> Self {
        Self { harness }
    }

    pub fn harness(&self) -> &GpuHarness {
        &self.harness
    }
}

impl EnhancementEngine for ParallelEngine {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn brightness(&self, image: &Image, value: i32) -> Result<Image> {
        Ok(self.harness.run(Kernel::Brightness(value), image)?.image)
    }

    fn contrast(&self, image: &Image, factor: f32) -> Result<Image> {
        Ok(self.harness.run(Kernel::Contrast(factor), image)?.image)
    }
}

/// Captures validation and out-of-memory errors raised between `push` and
/// `finish`.
struct ErrorScope<'a> {
    device: &'a wgpu::Device,
}

impl<'a> ErrorScope<'a> {
    fn push(device: &'a wgpu::Device) -> Self {
        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        Self { device }
    }

    fn finish(self, what: &str) -> Result<()> {
        let validation = pollster::block_on(self.device.pop_error_scope());
        let out_of_memory = pollster::block_on(self.device.pop_error_scope());

        match validation.or(out_of_memory) {
            Some(err) => {
                tracing::error!("{} failed: {}", what, err);
                Err(Error::DeviceResource(format!("{} failed: {}", what, err)))
            }
            None => Ok(()),
        }
    }
}

fn check_workgroup(limits: &wgpu::Limits, group: Extent2) -> Result<()> {
    if group.x == 0 || group.y == 0 {
        return Err(Error::DeviceResource(format!(
            "work-group extent {} must be non-zero",
            group
        )));
    }

    if group.x > limits.max_compute_workgroup_size_x
        || group.y > limits.max_compute_workgroup_size_y
        || group.total() > limits.max_compute_invocations_per_workgroup as u64
    {
        return Err(Error::DeviceResource(format!(
            "work-group extent {} exceeds device limits ({}x{}, {} invocations)",
            group,
            limits.max_compute_workgroup_size_x,
            limits.max_compute_workgroup_size_y,
            limits.max_compute_invocations_per_workgroup
        )));
    }

    Ok(())
}

fn check_dispatch(limits: &wgpu::Limits, grid: GridConfig, buffer_size: u64) -> Result<()> {
    let max_groups = limits.max_compute_workgroups_per_dimension;
    if grid.groups.x > max_groups || grid.groups.y > max_groups {
        return Err(Error::DeviceResource(format!(
            "grid of {} groups exceeds {} per dimension",
            grid.groups, max_groups
        )));
    }

    let max_binding = (limits.max_storage_buffer_binding_size as u64).min(limits.max_buffer_size);
    if buffer_size > max_binding {
        return Err(Error::DeviceResource(format!(
            "image needs a {} byte buffer, device allows {}",
            buffer_size, max_binding
        )));
    }

    Ok(())
}
