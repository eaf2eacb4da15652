//! Per-sample brightness and contrast math shared by every engine.
//!
//! Both functions are total. Results are clipped to `[0, 255]`; the contrast
//! result is truncated toward zero after clipping, and NaN maps to 0. The SIMD
//! lanes in the vectorized engine follow the same steps; the WGSL kernel reads
//! contrast results from a table built with [`contrast`].

/// Center of the 8-bit range that contrast scales around.
pub const MIDPOINT: f32 = 128.0;

pub const SAMPLE_MAX: i32 = u8::MAX as i32;

/// Largest offset that can still change a sample. Anything beyond saturates
/// every sample the same way.
#[inline]
pub fn effective_offset(value: i32) -> i32 {
    value.clamp(-SAMPLE_MAX, SAMPLE_MAX)
}

#[inline]
pub fn brightness(sample: u8, value: i32) -> u8 {
    (sample as i32 + effective_offset(value)).clamp(0, SAMPLE_MAX) as u8
}

#[inline]
pub fn contrast(sample: u8, factor: f32) -> u8 {
    let centered = sample as f32 - MIDPOINT;
    let scaled = factor * centered;
    saturate(MIDPOINT + scaled)
}

#[inline]
pub fn saturate(value: f32) -> u8 {
    if !(value > 0.0) {
        0
    } else if value >= SAMPLE_MAX as f32 {
        u8::MAX
    } else {
        value as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_clips() {
        assert_eq!(brightness(10, 20), 30);
        assert_eq!(brightness(250, 20), 255);
        assert_eq!(brightness(0, 20), 20);
        assert_eq!(brightness(128, 20), 148);
        assert_eq!(brightness(5, -10), 0);
    }

    #[test]
    fn brightness_extreme_offsets() {
        assert_eq!(brightness(0, i32::MAX), 255);
        assert_eq!(brightness(255, i32::MIN), 0);
        assert_eq!(brightness(17, 0), 17);
    }

    #[test]
    fn contrast_reference_values() {
        assert_eq!(contrast(10, 2.0), 0);
        assert_eq!(contrast(250, 2.0), 255);
        assert_eq!(contrast(0, 2.0), 0);
        assert_eq!(contrast(128, 2.0), 128);
    }

    #[test]
    fn contrast_identity_is_exact() {
        for p in 0..=255u8 {
            assert_eq!(contrast(p, 1.0), p);
        }
    }

    #[test]
    fn contrast_truncates() {
        // 128 + 0.5 * (131 - 128) = 129.5
        assert_eq!(contrast(131, 0.5), 129);
        // 128 + 0.5 * (125 - 128) = 126.5
        assert_eq!(contrast(125, 0.5), 126);
    }

    #[test]
    fn contrast_negative_inverts() {
        assert_eq!(contrast(0, -1.0), 255);
        assert_eq!(contrast(255, -1.0), 1);
        assert_eq!(contrast(128, -1.0), 128);
    }

    #[test]
    fn contrast_zero_flattens() {
        for p in 0..=255u8 {
            assert_eq!(contrast(p, 0.0), 128);
        }
    }

    #[test]
    fn saturate_non_finite() {
        assert_eq!(saturate(f32::NAN), 0);
        assert_eq!(saturate(f32::INFINITY), 255);
        assert_eq!(saturate(f32::NEG_INFINITY), 0);
        assert_eq!(saturate(-0.0), 0);
        assert_eq!(saturate(254.99), 254);
    }

    #[test]
    fn contrast_nan_factor_is_black() {
        assert_eq!(contrast(200, f32::NAN), 0);
    }
}
