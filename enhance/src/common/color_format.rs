use crate::common::error::{Error, Result};

#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Default)]
#[repr(u8)]
pub enum ChannelCount {
    #[default]
    L = 1,
    LA = 2,
    Rgb = 3,
    Rgba = 4,
}

#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Default)]
#[repr(u8)]
pub enum ChannelSize {
    #[default]
    _8bit = 1,
    _16bit = 2,
    _32bit = 4,
}

#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Default)]
#[repr(u8)]
pub enum ChannelType {
    #[default]
    UInt,
    Float,
}

#[derive(Clone, Copy, Debug, Hash, Default, PartialEq, Eq)]
pub struct ColorFormat {
    pub channel_count: ChannelCount,
    pub channel_size: ChannelSize,
    pub channel_type: ChannelType,
}

impl ChannelCount {
    pub fn channel_count(&self) -> u8 {
        *self as u8
    }

    pub fn byte_count(&self, channel_size: ChannelSize) -> u8 {
        self.channel_count() * channel_size.byte_count()
    }

    pub fn from_count(count: u8) -> Result<ChannelCount> {
        match count {
            1 => Ok(ChannelCount::L),
            2 => Ok(ChannelCount::LA),
            3 => Ok(ChannelCount::Rgb),
            4 => Ok(ChannelCount::Rgba),
            _ => Err(Error::InvalidShape(format!(
                "invalid channel count: {}",
                count
            ))),
        }
    }
}

impl ChannelSize {
    pub fn byte_count(&self) -> u8 {
        *self as u8
    }
}

impl ColorFormat {
    pub fn byte_count(&self) -> u8 {
        self.channel_count.byte_count(self.channel_size)
    }

    pub fn is_supported(&self) -> bool {
        ALL_FORMATS.contains(self)
    }

    /// Rejects formats an `Image` cannot hold, such as 16-bit floats.
    pub fn validate(&self) -> Result<()> {
        if !self.is_supported() {
            return Err(Error::UnsupportedDataType(format!(
                "unsupported color format: {:?}",
                self
            )));
        }
        Ok(())
    }

    /// Checks that the engines can process this format: gray or RGB with
    /// 8-bit unsigned samples. The channel count is checked first.
    pub fn validate_enhanceable(&self) -> Result<()> {
        if !matches!(self.channel_count, ChannelCount::L | ChannelCount::Rgb) {
            return Err(Error::InvalidShape(format!(
                "expected 1 or 3 channels, got {}",
                self.channel_count.channel_count()
            )));
        }
        if self.channel_size != ChannelSize::_8bit || self.channel_type != ChannelType::UInt {
            return Err(Error::UnsupportedDataType(format!(
                "expected 8-bit unsigned samples, got {}",
                self
            )));
        }
        Ok(())
    }
}

macro_rules! define_color_formats {
    ($(($prefix:ident, $count:ident)),+ $(,)?) => {
        paste::paste! {
            impl ColorFormat {
                $(
                    pub const [<$prefix _U8>]:  ColorFormat = ColorFormat { channel_count: ChannelCount::$count, channel_size: ChannelSize::_8bit,  channel_type: ChannelType::UInt };
                    pub const [<$prefix _U16>]: ColorFormat = ColorFormat { channel_count: ChannelCount::$count, channel_size: ChannelSize::_16bit, channel_type: ChannelType::UInt };
                    pub const [<$prefix _F32>]: ColorFormat = ColorFormat { channel_count: ChannelCount::$count, channel_size: ChannelSize::_32bit, channel_type: ChannelType::Float };
                )+
            }
        }
    };
}

define_color_formats!((L, L), (LA, LA), (RGB, Rgb), (RGBA, Rgba),);

impl std::fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let channels = match self.channel_count {
            ChannelCount::L => "L",
            ChannelCount::LA => "LA",
            ChannelCount::Rgb => "RGB",
            ChannelCount::Rgba => "RGBA",
        };
        let kind = match self.channel_type {
            ChannelType::UInt => 'u',
            ChannelType::Float => 'f',
        };
        write!(f, "{} {}{}", channels, kind, self.channel_size.byte_count() as u32 * 8)
    }
}

/// All formats an `Image` can hold.
pub const ALL_FORMATS: &[ColorFormat] = &[
    //
    ColorFormat::L_U8,
    ColorFormat::L_U16,
    ColorFormat::L_F32,
    //
    ColorFormat::LA_U8,
    ColorFormat::LA_U16,
    ColorFormat::LA_F32,
    //
    ColorFormat::RGB_U8,
    ColorFormat::RGB_U16,
    ColorFormat::RGB_F32,
    //
    ColorFormat::RGBA_U8,
    ColorFormat::RGBA_U16,
    ColorFormat::RGBA_F32,
];
