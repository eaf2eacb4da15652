use rayon::prelude::*;

use super::{EnhancementEngine, validate_input};
use crate::common::error::Result;
use crate::formula;
use crate::image::Image;

/// Samples handed to one rayon task.
const BLOCK_LEN: usize = 64 * 1024;

/// Whole-buffer engine.
///
/// Every channel goes through the same formula, so the image is treated as a
/// flat run of samples. Blocks are processed in parallel with SIMD lanes where
/// the CPU has them; results are bit-identical to [`super::SerialEngine`].
#[derive(Debug, Default, Clone, Copy)]
pub struct VectorizedEngine;

#[derive(Debug, Clone, Copy)]
enum Op {
    Brightness(i32),
    Contrast(f32),
}

impl VectorizedEngine {
    fn apply(image: &Image, op: Op) -> Result<Image> {
        validate_input(image)?;

        let desc = *image.desc();
        let mut output = vec![0u8; desc.size_in_bytes()];

        output
            .par_chunks_mut(BLOCK_LEN)
            .zip(image.bytes().par_chunks(BLOCK_LEN))
            .for_each(|(dst, src)| apply_block(op, src, dst));

        Image::new_with_data(desc, output)
    }
}

impl EnhancementEngine for VectorizedEngine {
    fn name(&self) -> &'static str {
        "vectorized"
    }

    fn brightness(&self, image: &Image, value: i32) -> Result<Image> {
        Self::apply(image, Op::Brightness(value))
    }

    fn contrast(&self, image: &Image, factor: f32) -> Result<Image> {
        Self::apply(image, Op::Contrast(factor))
    }
}

fn apply_block(op: Op, src: &[u8], dst: &mut [u8]) {
    debug_assert_eq!(src.len(), dst.len());

    #[cfg(target_arch = "x86_64")]
    if is_x86_feature_detected!("sse4.1") {
        // SAFETY: SSE4.1 support verified above
        unsafe { apply_block_sse41(op, src, dst) };
        return;
    }

    #[cfg(target_arch = "aarch64")]
    {
        // SAFETY: NEON is always available on aarch64
        unsafe { apply_block_neon(op, src, dst) };
        return;
    }

    #[allow(unreachable_code)]
    apply_scalar(op, src, dst);
}

fn apply_scalar(op: Op, src: &[u8], dst: &mut [u8]) {
    match op {
        Op::Brightness(value) => {
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = formula::brightness(s, value);
            }
        }
        Op::Contrast(factor) => {
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = formula::contrast(s, factor);
            }
        }
    }
}

// ============================================================================
// SSE4.1
// ============================================================================

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse4.1")]
unsafe fn apply_block_sse41(op: Op, src: &[u8], dst: &mut [u8]) {
    // Process 16 samples at a time
    let simd_len = src.len() / 16 * 16;
    unsafe {
        match op {
            Op::Brightness(value) => brightness_sse41(&src[..simd_len], &mut dst[..simd_len], value),
            Op::Contrast(factor) => contrast_sse41(&src[..simd_len], &mut dst[..simd_len], factor),
        }
    }
    // Scalar fallback
    apply_scalar(op, &src[simd_len..], &mut dst[simd_len..]);
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse4.1")]
unsafe fn brightness_sse41(src: &[u8], dst: &mut [u8], value: i32) {
    use std::arch::x86_64::*;

    let offset = formula::effective_offset(value);
    unsafe {
        // Saturating u8 add/sub is the clip to [0, 255]
        let magnitude = _mm_set1_epi8(offset.unsigned_abs() as u8 as i8);
        for (s, d) in src.chunks_exact(16).zip(dst.chunks_exact_mut(16)) {
            let px = _mm_loadu_si128(s.as_ptr() as *const __m128i);
            let out = if offset >= 0 {
                _mm_adds_epu8(px, magnitude)
            } else {
                _mm_subs_epu8(px, magnitude)
            };
            _mm_storeu_si128(d.as_mut_ptr() as *mut __m128i, out);
        }
    }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse4.1")]
unsafe fn contrast_sse41(src: &[u8], dst: &mut [u8], factor: f32) {
    use std::arch::x86_64::*;

    unsafe {
        let factor_vec = _mm_set1_ps(factor);
        let mid_vec = _mm_set1_ps(formula::MIDPOINT);
        let max_val = _mm_set1_ps(formula::SAMPLE_MAX as f32);
        let min_val = _mm_setzero_ps();

        // Same op order as the scalar formula; max_ps returns its second
        // operand for NaN so NaN lanes become 0.
        macro_rules! process {
            ($bytes:expr) => {{
                let f = _mm_cvtepi32_ps(_mm_cvtepu8_epi32($bytes));
                let centered = _mm_sub_ps(f, mid_vec);
                let scaled = _mm_mul_ps(factor_vec, centered);
                let r = _mm_add_ps(mid_vec, scaled);
                _mm_cvttps_epi32(_mm_min_ps(_mm_max_ps(r, min_val), max_val))
            }};
        }

        for (s, d) in src.chunks_exact(16).zip(dst.chunks_exact_mut(16)) {
            let px = _mm_loadu_si128(s.as_ptr() as *const __m128i);

            let r0 = process!(px);
            let r1 = process!(_mm_srli_si128::<4>(px));
            let r2 = process!(_mm_srli_si128::<8>(px));
            let r3 = process!(_mm_srli_si128::<12>(px));

            let lo = _mm_packus_epi32(r0, r1);
            let hi = _mm_packus_epi32(r2, r3);
            _mm_storeu_si128(d.as_mut_ptr() as *mut __m128i, _mm_packus_epi16(lo, hi));
        }
    }
}

// ============================================================================
// NEON
// ============================================================================

#[cfg(target_arch = "aarch64")]
unsafe fn apply_block_neon(op: Op, src: &[u8], dst: &mut [u8]) {
    let simd_len = src.len() / 16 * 16;
    unsafe {
        match op {
            Op::Brightness(value) => brightness_neon(&src[..simd_len], &mut dst[..simd_len], value),
            Op::Contrast(factor) => contrast_neon(&src[..simd_len], &mut dst[..simd_len], factor),
        }
    }
    apply_scalar(op, &src[simd_len..], &mut dst[simd_len..]);
}

#[cfg(target_arch = "aarch64")]
unsafe fn brightness_neon(src: &[u8], dst: &mut [u8], value: i32) {
    use std::arch::aarch64::*;

    let offset = formula::effective_offset(value);
    unsafe {
        let magnitude = vdupq_n_u8(offset.unsigned_abs() as u8);
        for (s, d) in src.chunks_exact(16).zip(dst.chunks_exact_mut(16)) {
            let px = vld1q_u8(s.as_ptr());
            let out = if offset >= 0 {
                vqaddq_u8(px, magnitude)
            } else {
                vqsubq_u8(px, magnitude)
            };
            vst1q_u8(d.as_mut_ptr(), out);
        }
    }
}

#[cfg(target_arch = "aarch64")]
unsafe fn contrast_neon(src: &[u8], dst: &mut [u8], factor: f32) {
    use std::arch::aarch64::*;

    unsafe {
        let factor_vec = vdupq_n_f32(factor);
        let mid_vec = vdupq_n_f32(formula::MIDPOINT);
        let max_val = vdupq_n_f32(formula::SAMPLE_MAX as f32);
        let min_val = vdupq_n_f32(0.0);

        // Separate mul and add, no vmlaq/vfmaq. NaN lanes survive max/min and
        // convert to 0.
        macro_rules! process {
            ($v:expr) => {{
                let f = vcvtq_f32_u32($v);
                let centered = vsubq_f32(f, mid_vec);
                let scaled = vmulq_f32(factor_vec, centered);
                let r = vaddq_f32(mid_vec, scaled);
                vcvtq_u32_f32(vminq_f32(vmaxq_f32(r, min_val), max_val))
            }};
        }

        for (s, d) in src.chunks_exact(16).zip(dst.chunks_exact_mut(16)) {
            let px = vld1q_u8(s.as_ptr());
            let lo_16 = vmovl_u8(vget_low_u8(px));
            let hi_16 = vmovl_u8(vget_high_u8(px));

            let r0 = process!(vmovl_u16(vget_low_u16(lo_16)));
            let r1 = process!(vmovl_u16(vget_high_u16(lo_16)));
            let r2 = process!(vmovl_u16(vget_low_u16(hi_16)));
            let r3 = process!(vmovl_u16(vget_high_u16(hi_16)));

            let lo = vmovn_u16(vcombine_u16(vmovn_u32(r0), vmovn_u32(r1)));
            let hi = vmovn_u16(vcombine_u16(vmovn_u32(r2), vmovn_u32(r3)));
            vst1q_u8(d.as_mut_ptr(), vcombine_u8(lo, hi));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_samples() -> Vec<u8> {
        // Every value, misaligned against the 16-lane width
        (0..=255u8).chain(0..=40u8).collect()
    }

    #[test]
    fn block_matches_scalar_brightness() {
        let src = all_samples();
        for value in [-300, -255, -128, -1, 0, 1, 7, 127, 200, 255, 1000] {
            let mut simd = vec![0u8; src.len()];
            let mut scalar = vec![0u8; src.len()];
            apply_block(Op::Brightness(value), &src, &mut simd);
            apply_scalar(Op::Brightness(value), &src, &mut scalar);
            assert_eq!(simd, scalar, "brightness {} differs", value);
        }
    }

    #[test]
    fn block_matches_scalar_contrast() {
        let src = all_samples();
        let factors = [
            -2.5,
            -1.0,
            0.0,
            0.3,
            0.5,
            1.0,
            1.1,
            1.7,
            2.0,
            100.0,
            f32::NAN,
            f32::INFINITY,
            f32::NEG_INFINITY,
        ];
        for factor in factors {
            let mut simd = vec![0u8; src.len()];
            let mut scalar = vec![0u8; src.len()];
            apply_block(Op::Contrast(factor), &src, &mut simd);
            apply_scalar(Op::Contrast(factor), &src, &mut scalar);
            assert_eq!(simd, scalar, "contrast {} differs", factor);
        }
    }

    #[test]
    fn spans_multiple_blocks() {
        let len = BLOCK_LEN * 2 + 37;
        let bytes: Vec<u8> = (0..len).map(|i| (i * 31 % 256) as u8).collect();
        let img = Image::from_raw(1, len as u32, 1, bytes.clone()).unwrap();

        let out = VectorizedEngine.brightness(&img, -9).unwrap();
        for (i, (&s, &d)) in bytes.iter().zip(out.bytes()).enumerate() {
            assert_eq!(d, formula::brightness(s, -9), "sample {}", i);
        }
    }
}
