#[cfg(test)]
mod tests;

use crate::common::{ChannelCount, ColorFormat, Error, Result};

#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub struct ImageDesc {
    pub width: u32,
    pub height: u32,
    pub color_format: ColorFormat,
}

/// Dense row-major image. Samples of one pixel are stored next to each other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    desc: ImageDesc,
    bytes: Vec<u8>,
}

impl Image {
    /// Returns the image descriptor.
    pub fn desc(&self) -> &ImageDesc {
        &self.desc
    }

    /// Returns the image bytes as a slice.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn take_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn new_empty(desc: ImageDesc) -> Result<Image> {
        Self::filled(desc, 0)
    }

    /// Creates an image with every byte set to `value`.
    pub fn filled(desc: ImageDesc, value: u8) -> Result<Image> {
        desc.color_format.validate()?;

        let bytes = vec![value; desc.size_in_bytes()];

        Ok(Image { desc, bytes })
    }

    pub fn new_with_data(desc: ImageDesc, bytes: Vec<u8>) -> Result<Image> {
        desc.color_format.validate()?;

        if bytes.len() != desc.size_in_bytes() {
            return Err(Error::InvalidShape(format!(
                "bytes length {} does not match expected size {} ({}x{} {})",
                bytes.len(),
                desc.size_in_bytes(),
                desc.width,
                desc.height,
                desc.color_format
            )));
        }

        Ok(Image { desc, bytes })
    }

    /// Builds an 8-bit image from a decoded `height x width x channels` buffer.
    pub fn from_raw(height: u32, width: u32, channels: u8, bytes: Vec<u8>) -> Result<Image> {
        let channel_count = ChannelCount::from_count(channels)?;
        let color_format = ColorFormat {
            channel_count,
            ..ColorFormat::L_U8
        };

        Self::new_with_data(ImageDesc::new(width, height, color_format), bytes)
    }

    /// Returns the sample of channel `c` at row `x`, column `y`.
    ///
    /// # Panics
    /// Panics if the coordinate is out of bounds or the image is not 8-bit.
    pub fn sample(&self, x: u32, y: u32, c: u8) -> u8 {
        assert_eq!(self.desc.color_format.channel_size.byte_count(), 1);
        assert!(x < self.desc.height && y < self.desc.width);
        assert!(c < self.desc.channels());

        self.bytes[self.desc.sample_index(x, y, c)]
    }

    pub fn bytes_per_pixel(&self) -> u8 {
        self.desc.color_format.byte_count()
    }
}

impl ImageDesc {
    pub fn new(width: u32, height: u32, color_format: ColorFormat) -> Self {
        Self {
            width,
            height,
            color_format,
        }
    }

    pub fn channels(&self) -> u8 {
        self.color_format.channel_count.channel_count()
    }

    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.color_format.byte_count() as usize
    }

    pub fn size_in_bytes(&self) -> usize {
        self.height as usize * self.row_bytes()
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Flat index of an 8-bit sample; `x` is the row, `y` the column.
    #[inline]
    pub fn sample_index(&self, x: u32, y: u32, c: u8) -> usize {
        let channels = self.channels() as usize;
        (x as usize * self.width as usize + y as usize) * channels + c as usize
    }
}
