use super::{Digest, DIGEST_LEN, INITIAL_STATE};
use crate::Sm3Error;

/// The eight chaining words between block compressions.
///
/// A final `HashState` and its [`Digest`] carry the same information: the
/// digest is just the big-endian packing of the words. That is what makes
/// [`HashState::from_digest`] (and length extension) possible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HashState([u32; 8]);

impl HashState {
    pub const INITIAL: HashState = HashState(INITIAL_STATE);

    #[inline(always)]
    pub const fn from_words(words: [u32; 8]) -> Self {
        Self(words)
    }

    #[inline(always)]
    pub const fn words(&self) -> &[u32; 8] {
        &self.0
    }

    #[inline(always)]
    pub(crate) fn words_mut(&mut self) -> &mut [u32; 8] {
        &mut self.0
    }

    #[inline]
    pub fn to_digest(&self) -> Digest {
        let mut output = [0u8; DIGEST_LEN];
        for (chunk, word) in output.chunks_exact_mut(4).zip(self.0.iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        output
    }

    #[inline]
    pub fn from_digest(digest: &Digest) -> Self {
        let mut words = [0u32; 8];
        for (word, chunk) in words.iter_mut().zip(digest.chunks_exact(4)) {
            *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Self(words)
    }
}

impl Default for HashState {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl TryFrom<&[u8]> for HashState {
    type Error = Sm3Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let digest: &Digest = bytes
            .try_into()
            .map_err(|_| Sm3Error::InvalidDigestLength { actual: bytes.len() })?;
        Ok(Self::from_digest(digest))
    }
}

/// Recovers the chaining state a digest was packed from.
#[inline]
pub fn digest_to_state(digest: &Digest) -> HashState {
    HashState::from_digest(digest)
}

#[inline]
pub fn state_to_digest(state: &HashState) -> Digest {
    state.to_digest()
}
