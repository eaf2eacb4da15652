mod serial;
mod vectorized;

pub use serial::SerialEngine;
pub use vectorized::VectorizedEngine;

use crate::common::error::Result;
use crate::image::Image;

/// One execution strategy for the brightness and contrast operations.
///
/// Every implementation produces the same output for the same input; they
/// differ only in how the work is scheduled.
pub trait EnhancementEngine {
    fn name(&self) -> &'static str;

    /// Adds `value` to every sample, clipping to `[0, 255]`.
    fn brightness(&self, image: &Image, value: i32) -> Result<Image>;

    /// Scales every sample around 128 by `factor`, clipping to `[0, 255]`.
    fn contrast(&self, image: &Image, factor: f32) -> Result<Image>;
}

/// Rejects images the engines cannot process, before any work is done.
pub(crate) fn validate_input(image: &Image) -> Result<()> {
    image.desc().color_format.validate_enhanceable()
}

pub fn brightness_serial(image: &Image, value: i32) -> Result<Image> {
    SerialEngine.brightness(image, value)
}

pub fn contrast_serial(image: &Image, factor: f32) -> Result<Image> {
    SerialEngine.contrast(image, factor)
}

pub fn brightness_vectorized(image: &Image, value: i32) -> Result<Image> {
    VectorizedEngine.brightness(image, value)
}

pub fn contrast_vectorized(image: &Image, factor: f32) -> Result<Image> {
    VectorizedEngine.contrast(image, factor)
}
