// Color formats
pub use crate::common::{ALL_FORMATS, ChannelCount, ChannelSize, ChannelType, ColorFormat};

// Error handling
pub use crate::common::{Error, Result};

// Image types
pub use crate::image::{Image, ImageDesc};

// Engines
pub use crate::engine::{
    EnhancementEngine, SerialEngine, VectorizedEngine, brightness_serial, brightness_vectorized,
    contrast_serial, contrast_vectorized,
};

// Parallel kernel model
pub use crate::parallel::{
    DEFAULT_GROUP_EXTENT, Extent2, GridConfig, HarnessConfig, Kernel, KernelParams,
    PowerPreference, UnitId, coordinate_for, emulate, shader_source,
};

// GPU
#[cfg(feature = "wgpu")]
pub use crate::gpu::Gpu;
#[cfg(feature = "wgpu")]
pub use crate::parallel::{
    ExecutionResult, GpuHarness, GpuKernelPipelines, ParallelEngine, run_parallel,
};
