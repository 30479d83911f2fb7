#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;
use unsafe_target_feature::unsafe_target_feature;

use super::soft::{self, Expanded};
use super::BLOCK_LEN;

/// Same schedule as [`soft::expand`], loading the block as two 256-bit
/// halves and producing `W1` eight words at a time.
#[unsafe_target_feature("avx2")]
pub fn expand(block: &[u8; BLOCK_LEN]) -> Expanded {
    let mut x = Expanded::ZERO;
    unsafe {
        // _mm256_shuffle_epi8 works per 128-bit lane, so the mask repeats
        let mask = _mm256_set_epi64x(
            0x0c0d0e0f08090a0b,
            0x0405060700010203,
            0x0c0d0e0f08090a0b,
            0x0405060700010203,
        );
        let src = block.as_ptr() as *const __m256i;
        let w = x.w.as_mut_ptr() as *mut __m256i;
        _mm256_storeu_si256(w.add(0), _mm256_shuffle_epi8(_mm256_loadu_si256(src.add(0)), mask));
        _mm256_storeu_si256(w.add(1), _mm256_shuffle_epi8(_mm256_loadu_si256(src.add(1)), mask));
    }

    soft::expand_tail(&mut x.w);

    unsafe {
        let w = x.w.as_ptr();
        let w1 = x.w1.as_mut_ptr();
        #[crate::loop_unroll(j, 0, 8, 8)]
        fn loop_unroll() {
            let lo = _mm256_loadu_si256(w.add(j) as *const __m256i);
            let hi = _mm256_loadu_si256(w.add(j + 4) as *const __m256i);
            _mm256_storeu_si256(w1.add(j) as *mut __m256i, _mm256_xor_si256(lo, hi));
        }
    }
    x
}

#[unsafe_target_feature("avx2")]
pub fn compress_blocks(state: &mut [u32; 8], blocks: &[u8]) {
    debug_assert_eq!(blocks.len() % BLOCK_LEN, 0);
    let mut i = 0usize;
    while i + BLOCK_LEN <= blocks.len() {
        let x = expand(unsafe { crate::utils::slice_to_array_at(blocks, i) });
        soft::rounds(state, &x);
        i += BLOCK_LEN;
    }
}
