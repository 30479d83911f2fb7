use super::{BLOCK_LEN, T_ROT};

/// Message schedule of one block: `W[0..68]` and `W1[j] = W[j] ^ W[j + 4]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Expanded {
    pub w: [u32; 68],
    pub w1: [u32; 64],
}

impl Expanded {
    pub(crate) const ZERO: Expanded = Expanded { w: [0; 68], w1: [0; 64] };
}

#[allow(non_snake_case)]
#[inline(always)]
fn P0(x: u32) -> u32 {
    x ^ x.rotate_left(9) ^ x.rotate_left(17)
}

#[allow(non_snake_case)]
#[inline(always)]
fn P1(x: u32) -> u32 {
    x ^ x.rotate_left(15) ^ x.rotate_left(23)
}

#[allow(non_snake_case)]
#[inline(always)]
fn FF0(a: u32, b: u32, c: u32) -> u32 {
    a ^ b ^ c
}

#[allow(non_snake_case)]
#[inline(always)]
fn FF1(a: u32, b: u32, c: u32) -> u32 {
    // (a & b) | (a & c) | (b & c)
    (a & b) | (c & (a | b))
}

#[allow(non_snake_case)]
#[inline(always)]
fn GG0(e: u32, f: u32, g: u32) -> u32 {
    e ^ f ^ g
}

#[allow(non_snake_case)]
#[inline(always)]
fn GG1(e: u32, f: u32, g: u32) -> u32 {
    // (e & f) | (!e & g)
    ((f ^ g) & e) ^ g
}

/// Fills `w[16..68]` from the 16 big-endian words already in `w[0..16]`.
#[inline(always)]
pub(crate) fn expand_tail(w: &mut [u32; 68]) {
    for i in 16..68 {
        w[i] = P1(w[i - 16] ^ w[i - 9] ^ w[i - 3].rotate_left(15))
            ^ w[i - 13].rotate_left(7)
            ^ w[i - 6];
    }
}

#[inline]
pub fn expand(block: &[u8; BLOCK_LEN]) -> Expanded {
    let mut x = Expanded::ZERO;
    for i in 0..16 {
        x.w[i] = u32::from_be_bytes([
            block[i * 4],
            block[i * 4 + 1],
            block[i * 4 + 2],
            block[i * 4 + 3],
        ]);
    }
    expand_tail(&mut x.w);
    for j in 0..64 {
        x.w1[j] = x.w[j] ^ x.w[j + 4];
    }
    x
}

/// The 64 compression rounds over an expanded block, XOR-ed into `state`.
/// Shared by every backend.
#[inline(always)]
pub(crate) fn rounds(state: &mut [u32; 8], x: &Expanded) {
    let w = &x.w;
    let w1 = &x.w1;

    let mut a = state[0];
    let mut b = state[1];
    let mut c = state[2];
    let mut d = state[3];
    let mut e = state[4];
    let mut f = state[5];
    let mut g = state[6];
    let mut h = state[7];

    macro_rules! round {
        ($j:expr, $ff:ident, $gg:ident) => {{
            let a12 = a.rotate_left(12);
            let ss1 = a12.wrapping_add(e).wrapping_add(T_ROT[$j]).rotate_left(7);
            let ss2 = ss1 ^ a12;
            let tt1 = $ff(a, b, c)
                .wrapping_add(d)
                .wrapping_add(ss2)
                .wrapping_add(w1[$j]);
            let tt2 = $gg(e, f, g)
                .wrapping_add(h)
                .wrapping_add(ss1)
                .wrapping_add(w[$j]);
            d = c;
            c = b.rotate_left(9);
            b = a;
            a = tt1;
            h = g;
            g = f.rotate_left(19);
            f = e;
            e = P0(tt2);
        }};
    }

    #[crate::loop_unroll(j, 0, 16)]
    fn loop_unroll() {
        round!(j, FF0, GG0);
    }
    #[crate::loop_unroll(j, 16, 48)]
    fn loop_unroll() {
        round!(j, FF1, GG1);
    }

    state[0] ^= a;
    state[1] ^= b;
    state[2] ^= c;
    state[3] ^= d;
    state[4] ^= e;
    state[5] ^= f;
    state[6] ^= g;
    state[7] ^= h;
}

/// Compresses one block into `state`. This is the reference every SIMD
/// backend is tested against.
#[inline]
pub fn compress(state: &mut [u32; 8], block: &[u8; BLOCK_LEN]) {
    let x = expand(block);
    rounds(state, &x);
}

/// `blocks.len()` must be a multiple of [`BLOCK_LEN`].
pub fn compress_blocks(state: &mut [u32; 8], blocks: &[u8]) {
    debug_assert_eq!(blocks.len() % BLOCK_LEN, 0);
    let mut i = 0usize;
    while i + BLOCK_LEN <= blocks.len() {
        compress(state, unsafe { crate::utils::slice_to_array_at(blocks, i) });
        i += BLOCK_LEN;
    }
}

#[cfg(test)]
macro_rules! sm3_test_case {
    ($backend:expr) => {{
        use crate::crypto::hash::sm3::Sm3;

        let backend = $backend;
        let digest = |data: &[u8]| {
            let mut m = Sm3::new().with_backend(backend).unwrap();
            m.update(data);
            m.finalize()
        };

        assert_eq!(
            digest(b""),
            [
                0x1a, 0xb2, 0x1d, 0x83, 0x55, 0xcf, 0xa1, 0x7f,
                0x8e, 0x61, 0x19, 0x48, 0x31, 0xe8, 0x1a, 0x8f,
                0x22, 0xbe, 0xc8, 0xc7, 0x28, 0xfe, 0xfb, 0x74,
                0x7e, 0xd0, 0x35, 0xeb, 0x50, 0x82, 0xaa, 0x2b,
            ]
        );
        assert_eq!(
            digest(b"abc"),
            [
                0x66, 0xc7, 0xf0, 0xf4, 0x62, 0xee, 0xed, 0xd9,
                0xd1, 0xf2, 0xd4, 0x6b, 0xdc, 0x10, 0xe4, 0xe2,
                0x41, 0x67, 0xc4, 0x87, 0x5c, 0xf2, 0xf7, 0xa2,
                0x29, 0x7d, 0xa0, 0x2b, 0x8f, 0x4b, 0xa8, 0xe0,
            ]
        );
        assert_eq!(
            digest(&b"abcd".repeat(16)),
            [
                0xde, 0xbe, 0x9f, 0xf9, 0x22, 0x75, 0xb8, 0xa1,
                0x38, 0x60, 0x48, 0x89, 0xc1, 0x8e, 0x5a, 0x4d,
                0x6f, 0xdb, 0x70, 0xe5, 0x38, 0x7e, 0x57, 0x65,
                0x29, 0x3d, 0xcb, 0xa3, 0x9c, 0x0c, 0x57, 0x32,
            ]
        );

        let random_data = (0..1000).map(|_| rand::random::<u8>()).collect::<Vec<u8>>();
        for _ in 0..100 {
            let length = (rand::random::<u32>() % 1000) as usize;
            let data = &random_data[..length];
            let expected = <sm3::Sm3 as sm3::Digest>::digest(data);
            assert_eq!(digest(data).as_slice(), expected.as_slice(), "length {}", length);
        }
        let expected = <sm3::Sm3 as sm3::Digest>::digest(&random_data);
        assert_eq!(digest(&random_data).as_slice(), expected.as_slice());
    }};
}

/// Checks a SIMD backend's message schedule and digests against this module.
#[cfg(test)]
macro_rules! sm3_equivalence_case {
    ($backend:expr) => {{
        use crate::crypto::hash::sm3::{soft, HashState, Sm3};

        let backend = $backend;
        for _ in 0..256 {
            let block: [u8; 64] = core::array::from_fn(|_| rand::random::<u8>());
            assert_eq!(backend.expand(&block), soft::expand(&block));

            let words: [u32; 8] = core::array::from_fn(|_| rand::random::<u32>());
            let mut fast = words;
            let mut reference = words;
            backend.compress_blocks(&mut fast, &block);
            soft::compress(&mut reference, &block);
            assert_eq!(fast, reference);
        }

        for length in [0usize, 1, 55, 56, 63, 64, 65, 119, 120, 128, 1000] {
            let data = (0..length).map(|_| rand::random::<u8>()).collect::<Vec<u8>>();
            let mut fast = Sm3::new().with_backend(backend).unwrap();
            fast.update(&data);
            let mut reference = Sm3::new().with_backend(crate::crypto::hash::sm3::Backend::Soft).unwrap();
            reference.update(&data);
            assert_eq!(fast.finalize(), reference.finalize(), "length {}", length);

            let state = HashState::from_words(core::array::from_fn(|_| rand::random::<u32>()));
            let mut fast = Sm3::with_state(state, 128).with_backend(backend).unwrap();
            let mut reference = Sm3::with_state(state, 128)
                .with_backend(crate::crypto::hash::sm3::Backend::Soft)
                .unwrap();
            fast.update(&data);
            reference.update(&data);
            assert_eq!(fast.finalize(), reference.finalize(), "continued length {}", length);
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::sm3::{Backend, INITIAL_STATE};

    #[test]
    fn test_sm3_soft() {
        sm3_test_case!(Backend::Soft);
    }

    #[test]
    fn test_expand_abc() {
        // "abc" padded to one block
        let mut block = [0u8; 64];
        block[..3].copy_from_slice(b"abc");
        block[3] = 0x80;
        block[63] = 0x18;
        let x = expand(&block);
        assert_eq!(x.w[0], 0x61626380);
        assert!(x.w[1..15].iter().all(|&w| w == 0));
        assert_eq!(x.w[15], 0x00000018);
        assert_eq!(x.w[16], 0x9092e200);
        assert_eq!(x.w[17], 0);
        assert_eq!(x.w[18], 0x000c0606);
        assert_eq!(x.w[19], 0x719c70ed);
        for j in 0..64 {
            assert_eq!(x.w1[j], x.w[j] ^ x.w[j + 4]);
        }
    }

    #[test]
    fn test_compress_abc_block() {
        let mut block = [0u8; 64];
        block[..3].copy_from_slice(b"abc");
        block[3] = 0x80;
        block[63] = 0x18;
        let mut state = INITIAL_STATE;
        compress(&mut state, &block);
        assert_eq!(
            state,
            [
                0x66c7f0f4, 0x62eeedd9, 0xd1f2d46b, 0xdc10e4e2,
                0x4167c487, 0x5cf2f7a2, 0x297da02b, 0x8f4ba8e0,
            ]
        );
    }

    #[test]
    fn test_boolean_functions() {
        for _ in 0..1000 {
            let (x, y, z) = (rand::random::<u32>(), rand::random::<u32>(), rand::random::<u32>());
            assert_eq!(FF1(x, y, z), (x & y) | (x & z) | (y & z));
            assert_eq!(GG1(x, y, z), (x & y) | (!x & z));
        }
    }

    #[test]
    fn test_compress_blocks_matches_single_blocks() {
        let data = (0..256).map(|_| rand::random::<u8>()).collect::<Vec<u8>>();
        let mut batched = INITIAL_STATE;
        compress_blocks(&mut batched, &data);

        let mut single = INITIAL_STATE;
        for chunk in data.chunks_exact(BLOCK_LEN) {
            let mut block = [0u8; BLOCK_LEN];
            block.copy_from_slice(chunk);
            compress(&mut single, &block);
        }
        assert_eq!(batched, single);
    }
}
