use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::prelude::*;

/// Installs a test-writer subscriber once; later calls are no-ops.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("enhance=debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates a GPU context, or `None` on machines without a usable adapter.
#[cfg(feature = "wgpu")]
pub fn test_gpu() -> Option<Gpu> {
    init_test_logging();
    match Gpu::new() {
        Ok(gpu) => Some(gpu),
        Err(e) => {
            eprintln!("Skipping test - no GPU available: {}", e);
            None
        }
    }
}

/// Image with deterministic pseudo-random samples.
pub fn random_image(format: ColorFormat, width: u32, height: u32, seed: u64) -> Image {
    let desc = ImageDesc::new(width, height, format);
    let mut rng = StdRng::seed_from_u64(seed);
    let bytes = (0..desc.size_in_bytes()).map(|_| rng.random()).collect();
    Image::new_with_data(desc, bytes).unwrap()
}

/// Image whose samples cycle through every value 0..=255.
pub fn ramp_image(format: ColorFormat, width: u32, height: u32) -> Image {
    let desc = ImageDesc::new(width, height, format);
    let bytes = (0..desc.size_in_bytes()).map(|i| (i % 256) as u8).collect();
    Image::new_with_data(desc, bytes).unwrap()
}

/// The 2x2 gray image `[[10, 250], [0, 128]]`.
pub fn gray_2x2() -> Image {
    Image::from_raw(2, 2, 1, vec![10, 250, 0, 128]).unwrap()
}

/// Deterministic offsets and factors covering the interesting ranges.
pub fn random_parameters(seed: u64, count: usize) -> Vec<(i32, f32)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            (
                rng.random_range(-400..=400),
                rng.random_range(-4.0f32..=4.0f32),
            )
        })
        .collect()
}
