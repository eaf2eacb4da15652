use super::{EnhancementEngine, validate_input};
use crate::common::error::Result;
use crate::formula;
use crate::image::Image;

/// Reference engine: visits every row, column and channel in turn.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialEngine;

impl SerialEngine {
    fn apply<F>(image: &Image, op: F) -> Result<Image>
    where
        F: Fn(u8) -> u8,
    {
        validate_input(image)?;

        let desc = *image.desc();
        let channels = desc.channels();
        let input = image.bytes();
        let mut output = vec![0u8; desc.size_in_bytes()];

        for x in 0..desc.height {
            for y in 0..desc.width {
                for c in 0..channels {
                    let idx = desc.sample_index(x, y, c);
                    output[idx] = op(input[idx]);
                }
            }
        }

        Image::new_with_data(desc, output)
    }
}

impl EnhancementEngine for SerialEngine {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn brightness(&self, image: &Image, value: i32) -> Result<Image> {
        Self::apply(image, |p| formula::brightness(p, value))
    }

    fn contrast(&self, image: &Image, factor: f32) -> Result<Image> {
        Self::apply(image, |p| formula::contrast(p, factor))
    }
}
