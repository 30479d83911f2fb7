//! SM3 hash (GM/T 0004-2012).
//!
//! The scalar compression in [`soft`] is the reference; the SIMD modules only
//! vectorize the block load and the `W1` derivation and share the round
//! function with it, so every [`Backend`] produces identical digests.
//!
//! # Length extension
//!
//! SM3 is a plain Merkle-Damgård hash: a published digest *is* the internal
//! state after the padded message. [`hash_continue`] resumes from such a
//! state, which means `hash(secret || message)` is not a MAC. Anyone holding
//! the digest and the length of `secret || message` can compute
//! `hash(secret || message || pad || extra)` for any `extra`; see
//! [`length_extension`].

#[macro_use]
pub mod soft;

cfg_if::cfg_if! {
    if #[cfg(any(target_arch = "x86", target_arch = "x86_64"))] {
        pub mod x86_ssse3;
        pub mod x86_avx2;
    } else if #[cfg(target_arch = "aarch64")] {
        pub mod arm;
    }
}

mod backend;
pub mod batch;
mod engine;
pub mod length_extension;
mod padding;
mod state;

pub use backend::Backend;
pub use batch::{hash_batch, BatchHasher};
pub use engine::{hash, hash_continue, Sm3};
pub use padding::{pad, padded_len, Padding};
pub use state::{digest_to_state, state_to_digest, HashState};

pub const BLOCK_LEN: usize = 64;
pub const DIGEST_LEN: usize = 32;

pub type Digest = [u8; DIGEST_LEN];

pub const INITIAL_STATE: [u32; 8] = [
    0x7380166f,
    0x4914b2b9,
    0x172442d7,
    0xda8a0600,
    0xa96f30bc,
    0x163138aa,
    0xe38dee4d,
    0xb0fb0e4e,
];

/// Round constant for rounds 0..16.
pub const T0: u32 = 0x79cc4519;
/// Round constant for rounds 16..64.
pub const T1: u32 = 0x7a879d8a;

/// `T(j) <<< (j mod 32)` for every round, so the rounds skip one rotation.
pub(crate) const T_ROT: [u32; 64] = {
    let mut table = [0u32; 64];
    let mut j = 0;
    while j < 64 {
        let t = if j < 16 { T0 } else { T1 };
        table[j] = t.rotate_left(j as u32);
        j += 1;
    }
    table
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotated_round_constants() {
        assert_eq!(T_ROT[0], T0);
        assert_eq!(T_ROT[1], 0xf3988a32);
        assert_eq!(T_ROT[15], T0.rotate_left(15));
        assert_eq!(T_ROT[16], 0x9d8a7a87);
        assert_eq!(T_ROT[32], T1);
        assert_eq!(T_ROT[63], T1.rotate_left(31));
        for j in 0..64 {
            let t = if j < 16 { T0 } else { T1 };
            assert_eq!(T_ROT[j], t.rotate_left((j % 32) as u32), "round {}", j);
        }
    }
}
