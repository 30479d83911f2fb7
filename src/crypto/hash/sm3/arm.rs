use core::arch::aarch64::*;
use unsafe_target_feature::unsafe_target_feature;

use super::soft::{self, Expanded};
use super::BLOCK_LEN;

#[unsafe_target_feature("neon")]
pub fn expand(block: &[u8; BLOCK_LEN]) -> Expanded {
    let mut x = Expanded::ZERO;
    unsafe {
        let src = block.as_ptr();
        let w = x.w.as_mut_ptr();
        vst1q_u32(w.add(0), vreinterpretq_u32_u8(vrev32q_u8(vld1q_u8(src.add(0)))));
        vst1q_u32(w.add(4), vreinterpretq_u32_u8(vrev32q_u8(vld1q_u8(src.add(16)))));
        vst1q_u32(w.add(8), vreinterpretq_u32_u8(vrev32q_u8(vld1q_u8(src.add(32)))));
        vst1q_u32(w.add(12), vreinterpretq_u32_u8(vrev32q_u8(vld1q_u8(src.add(48)))));
    }

    soft::expand_tail(&mut x.w);

    unsafe {
        let w = x.w.as_ptr();
        let w1 = x.w1.as_mut_ptr();
        #[crate::loop_unroll(j, 0, 16, 4)]
        fn loop_unroll() {
            vst1q_u32(w1.add(j), veorq_u32(vld1q_u32(w.add(j)), vld1q_u32(w.add(j + 4))));
        }
    }
    x
}

#[unsafe_target_feature("neon")]
pub fn compress_blocks(state: &mut [u32; 8], blocks: &[u8]) {
    debug_assert_eq!(blocks.len() % BLOCK_LEN, 0);
    let mut i = 0usize;
    while i + BLOCK_LEN <= blocks.len() {
        let x = expand(unsafe { crate::utils::slice_to_array_at(blocks, i) });
        soft::rounds(state, &x);
        i += BLOCK_LEN;
    }
}
