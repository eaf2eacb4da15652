mod common;
mod engine;
#[cfg(feature = "wgpu")]
mod gpu;
mod image;
mod parallel;

pub mod formula;
pub mod prelude;

pub use prelude::*;
