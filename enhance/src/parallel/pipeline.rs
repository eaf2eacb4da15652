use super::grid::Extent2;
use super::kernel::{Kernel, shader_source};
use crate::gpu::Gpu;

/// Compiled compute pipelines for both kernels at one work-group extent.
/// Create once and reuse for multiple dispatches.
#[derive(Debug)]
pub struct GpuKernelPipelines {
    pub(super) brightness: wgpu::ComputePipeline,
    pub(super) contrast: wgpu::ComputePipeline,
    pub(super) bind_group_layout: wgpu::BindGroupLayout,
    pub(super) workgroup: Extent2,
}

impl GpuKernelPipelines {
    pub fn new(ctx: &Gpu, workgroup: Extent2) -> Self {
        let device = ctx.device();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("enhance_shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source(workgroup).into()),
        });

        let storage_entry = |binding: u32, read_only: bool| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("enhance_bind_group_layout"),
            entries: &[
                // Params uniform
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Input samples
                storage_entry(1, true),
                // Output samples
                storage_entry(2, false),
                // Per-value lookup table
                storage_entry(3, true),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("enhance_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let create = |kernel: Kernel| {
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(kernel.entry_point()),
                layout: Some(&pipeline_layout),
                module: &shader,
                entry_point: Some(kernel.entry_point()),
                compilation_options: Default::default(),
                cache: None,
            })
        };

        Self {
            brightness: create(Kernel::Brightness(0)),
            contrast: create(Kernel::Contrast(1.0)),
            bind_group_layout,
            workgroup,
        }
    }

    pub(super) fn pipeline(&self, kernel: Kernel) -> &wgpu::ComputePipeline {
        match kernel {
            Kernel::Brightness(_) => &self.brightness,
            Kernel::Contrast(_) => &self.contrast,
        }
    }
}
