use super::BLOCK_LEN;

const MLEN_SIZE: usize = core::mem::size_of::<u64>();
const MAX_PAD_LEN: usize = BLOCK_LEN + MLEN_SIZE;

/// The bytes appended to a message before its final compression: `0x80`,
/// zero fill, then the big-endian bit length. Between 9 and 72 bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Padding {
    buf: [u8; MAX_PAD_LEN],
    len: usize,
    blocks: usize,
}

impl Padding {
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    #[inline]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of trailer blocks (1 or 2) the final partial block and this
    /// padding occupy together.
    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks
    }

    /// The encoded length field, in bits.
    #[inline]
    pub fn bit_len(&self) -> u64 {
        let mut field = [0u8; MLEN_SIZE];
        field.copy_from_slice(&self.buf[self.len - MLEN_SIZE..self.len]);
        u64::from_be_bytes(field)
    }
}

impl AsRef<[u8]> for Padding {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Padding for a `message_len`-byte message whose hashing resumed after
/// `prior_len` already-compressed bytes. The length field encodes
/// `(prior_len + message_len) * 8` modulo 2^64.
pub fn pad(message_len: u64, prior_len: u64) -> Padding {
    let rem = (message_len % BLOCK_LEN as u64) as usize;
    let blocks = if rem + 1 + MLEN_SIZE <= BLOCK_LEN { 1 } else { 2 };
    let len = blocks * BLOCK_LEN - rem;

    let mut buf = [0u8; MAX_PAD_LEN];
    buf[0] = 0x80;
    let mlen_bits = prior_len.wrapping_add(message_len).wrapping_mul(8);
    buf[len - MLEN_SIZE..len].copy_from_slice(&mlen_bits.to_be_bytes());

    Padding { buf, len, blocks }
}

/// Length of a `message_len`-byte message once padded: the `prior_len` a
/// continuation over that message's digest must declare.
#[inline]
pub fn padded_len(message_len: u64) -> u64 {
    message_len + pad(message_len, 0).len() as u64
}

/// The final one or two blocks of a message: its unaligned tail followed by
/// the padding.
pub(crate) struct Trailer {
    buf: [u8; 2 * BLOCK_LEN],
    blocks: usize,
}

impl Trailer {
    /// `tail` is shorter than a block; `total_len` counts every byte the
    /// length field must cover, tail and any prior offset included.
    pub(crate) fn new(tail: &[u8], total_len: u64) -> Self {
        debug_assert!(tail.len() < BLOCK_LEN);
        let tail_len = tail.len() as u64;
        let padding = pad(tail_len, total_len.wrapping_sub(tail_len));

        let mut buf = [0u8; 2 * BLOCK_LEN];
        buf[..tail.len()].copy_from_slice(tail);
        buf[tail.len()..tail.len() + padding.len()].copy_from_slice(padding.as_bytes());
        Trailer { buf, blocks: padding.block_count() }
    }

    #[inline]
    pub(crate) fn blocks(&self) -> &[u8] {
        &self.buf[..self.blocks * BLOCK_LEN]
    }
}
