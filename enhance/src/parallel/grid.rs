use serde::{Deserialize, Serialize};

use crate::common::error::{Error, Result};

/// Reference work-group extent along each axis.
pub const DEFAULT_GROUP_EXTENT: u32 = 16;

/// A 2D extent. `x` runs along image rows (height), `y` along columns (width).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent2 {
    pub x: u32,
    pub y: u32,
}

impl Extent2 {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Number of units in the extent.
    pub fn total(&self) -> u64 {
        self.x as u64 * self.y as u64
    }
}

impl Default for Extent2 {
    fn default() -> Self {
        Self::new(DEFAULT_GROUP_EXTENT, DEFAULT_GROUP_EXTENT)
    }
}

impl std::fmt::Display for Extent2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.x, self.y)
    }
}

/// Work-group size and number of groups for one dispatch.
///
/// Every pixel coordinate falls in exactly one unit. The last group along an
/// axis may hang past the image edge; those units are masked by the kernel's
/// bounds check, the image is never padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    pub group: Extent2,
    pub groups: Extent2,
}

impl GridConfig {
    /// Smallest grid of `group`-sized work-groups covering the image.
    pub fn for_image(height: u32, width: u32, group: Extent2) -> Result<Self> {
        if group.x == 0 || group.y == 0 {
            return Err(Error::DeviceResource(format!(
                "work-group extent {} must be non-zero",
                group
            )));
        }

        Ok(Self {
            group,
            groups: Extent2::new(height.div_ceil(group.x), width.div_ceil(group.y)),
        })
    }

    /// Units along each axis, including the masked ones.
    pub fn units(&self) -> Extent2 {
        Extent2::new(
            self.groups.x.saturating_mul(self.group.x),
            self.groups.y.saturating_mul(self.group.y),
        )
    }

    pub fn unit_count(&self) -> u64 {
        self.groups.total() * self.group.total()
    }

    /// Whether the grid reaches the pixel at row `x`, column `y`.
    pub fn covers(&self, x: u32, y: u32) -> bool {
        let units = self.units();
        x < units.x && y < units.y
    }
}
