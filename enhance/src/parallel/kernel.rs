use super::grid::{Extent2, GridConfig};
use crate::common::error::{Error, Result};
use crate::engine::validate_input;
use crate::formula;
use crate::image::{Image, ImageDesc};

const KERNEL_SHADER: &str = include_str!("enhance.wgsl");

/// A per-pixel kernel together with its parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kernel {
    /// Offset added to every sample.
    Brightness(i32),
    /// Factor scaling every sample around the midpoint.
    Contrast(f32),
}

impl Kernel {
    pub fn name(&self) -> &'static str {
        match self {
            Kernel::Brightness(_) => "brightness",
            Kernel::Contrast(_) => "contrast",
        }
    }

    pub fn entry_point(&self) -> &'static str {
        match self {
            Kernel::Brightness(_) => "brightness_main",
            Kernel::Contrast(_) => "contrast_main",
        }
    }

    #[inline]
    pub fn apply_sample(&self, sample: u8) -> u8 {
        match *self {
            Kernel::Brightness(value) => formula::brightness(sample, value),
            Kernel::Contrast(factor) => formula::contrast(sample, factor),
        }
    }

    /// `apply_sample` for every sample value, widened to the device layout.
    ///
    /// The device reads contrast results from this table instead of
    /// evaluating the float formula, so its output does not depend on how the
    /// shader compiler contracts the multiply and add.
    pub fn lookup_table(&self) -> [u32; 256] {
        std::array::from_fn(|sample| self.apply_sample(sample as u8) as u32)
    }

    /// Body of one unit: all channels of the pixel at row `x`, column `y`.
    /// Units outside the image do nothing.
    pub fn execute_unit(&self, desc: &ImageDesc, input: &[u8], output: &mut [u8], x: u32, y: u32) {
        if x >= desc.height || y >= desc.width {
            return;
        }

        for c in 0..desc.channels() {
            let idx = desc.sample_index(x, y, c);
            output[idx] = self.apply_sample(input[idx]);
        }
    }
}

/// Identifies one unit of work: its group in the grid and its position
/// inside the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitId {
    pub group: Extent2,
    pub local: Extent2,
}

/// Global pixel coordinate `(x, y)` handled by `unit`.
#[inline]
pub fn coordinate_for(unit: UnitId, group_extent: Extent2) -> (u32, u32) {
    (
        unit.group.x * group_extent.x + unit.local.x,
        unit.group.y * group_extent.y + unit.local.y,
    )
}

/// Uniform block read by the shader. Layout matches `Params` in `enhance.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct KernelParams {
    pub height: u32,
    pub width: u32,
    pub channels: u32,
    pub offset: i32,
    pub _padding: [u32; 4],
}

impl KernelParams {
    pub fn new(kernel: Kernel, desc: &ImageDesc) -> Self {
        let offset = match kernel {
            Kernel::Brightness(value) => formula::effective_offset(value),
            Kernel::Contrast(_) => 0,
        };

        Self {
            height: desc.height,
            width: desc.width,
            channels: desc.channels() as u32,
            offset,
            _padding: [0; 4],
        }
    }
}

/// WGSL source with the work-group extent baked in.
pub fn shader_source(group: Extent2) -> String {
    KERNEL_SHADER
        .replace("{{GROUP_X}}", &group.x.to_string())
        .replace("{{GROUP_Y}}", &group.y.to_string())
}

/// Runs `kernel` on the host, visiting every unit of `grid` one by one in
/// group order. Produces the same output as a device dispatch.
///
/// Fails with [`Error::DeviceResource`] if `grid` leaves any pixel uncovered.
pub fn emulate(kernel: Kernel, image: &Image, grid: GridConfig) -> Result<Image> {
    validate_input(image)?;

    let desc = *image.desc();
    let covered = desc.is_empty()
        || (grid.group.x > 0 && grid.group.y > 0 && grid.covers(desc.height - 1, desc.width - 1));
    if !covered {
        return Err(Error::DeviceResource(format!(
            "grid of {} groups of {} does not cover {}x{} pixels",
            grid.groups, grid.group, desc.height, desc.width
        )));
    }
    let input = image.bytes();
    let mut output = vec![0u8; desc.size_in_bytes()];

    for gx in 0..grid.groups.x {
        for gy in 0..grid.groups.y {
            for lx in 0..grid.group.x {
                for ly in 0..grid.group.y {
                    let unit = UnitId {
                        group: Extent2::new(gx, gy),
                        local: Extent2::new(lx, ly),
                    };
                    let (x, y) = coordinate_for(unit, grid.group);
                    kernel.execute_unit(&desc, input, &mut output, x, y);
                }
            }
        }
    }

    Image::new_with_data(desc, output)
}
