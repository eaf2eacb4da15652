use serde::{Deserialize, Serialize};

use super::grid::Extent2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PowerPreference {
    #[default]
    HighPerformance,
    LowPower,
}

/// Settings for adapter selection and kernel dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Work-group extent; `x` along rows, `y` along columns.
    pub workgroup: Extent2,
    pub power_preference: PowerPreference,
    /// Use a software adapter even when hardware is present.
    pub force_fallback_adapter: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            workgroup: Extent2::default(),
            power_preference: PowerPreference::default(),
            force_fallback_adapter: false,
        }
    }
}

impl HarnessConfig {
    /// Builder method to set the work-group extent.
    pub fn workgroup(mut self, x: u32, y: u32) -> Self {
        self.workgroup = Extent2::new(x, y);
        self
    }

    /// Builder method to set the power preference.
    pub fn power_preference(mut self, power_preference: PowerPreference) -> Self {
        self.power_preference = power_preference;
        self
    }

    /// Builder method to request the fallback adapter.
    pub fn force_fallback_adapter(mut self, force: bool) -> Self {
        self.force_fallback_adapter = force;
        self
    }
}

#[cfg(feature = "wgpu")]
impl From<PowerPreference> for wgpu::PowerPreference {
    fn from(value: PowerPreference) -> Self {
        match value {
            PowerPreference::HighPerformance => wgpu::PowerPreference::HighPerformance,
            PowerPreference::LowPower => wgpu::PowerPreference::LowPower,
        }
    }
}
