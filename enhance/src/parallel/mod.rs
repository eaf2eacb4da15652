mod config;
mod grid;
mod kernel;
#[cfg(feature = "wgpu")]
mod harness;
#[cfg(feature = "wgpu")]
mod pipeline;

pub use config::{HarnessConfig, PowerPreference};
pub use grid::{DEFAULT_GROUP_EXTENT, Extent2, GridConfig};
pub use kernel::{Kernel, KernelParams, UnitId, coordinate_for, emulate, shader_source};

#[cfg(feature = "wgpu")]
pub use harness::{ExecutionResult, GpuHarness, ParallelEngine, run_parallel};
#[cfg(feature = "wgpu")]
pub use pipeline::GpuKernelPipelines;
