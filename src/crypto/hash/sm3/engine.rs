use super::padding::Trailer;
use super::{Backend, Digest, HashState};
use crate::Sm3Error;

/// Incremental SM3 hasher.
///
/// `update` may be called any number of times; only the bytes of an
/// unfinished block are buffered.
#[derive(Clone, Copy)]
pub struct Sm3 {
    state: HashState,
    len: u64,
    buffer: [u8; Self::BLOCK_LEN],
    offset: usize,
    backend: Backend,
}

impl Sm3 {
    pub const BLOCK_LEN: usize = super::BLOCK_LEN;
    pub const DIGEST_LEN: usize = super::DIGEST_LEN;

    #[inline]
    pub fn new() -> Self {
        Self::with_state(HashState::INITIAL, 0)
    }

    /// Resumes hashing from `state` as if `prior_len` bytes had already been
    /// compressed into it.
    ///
    /// With `state = digest_to_state(&hash(m))` and
    /// `prior_len = padded_len(m.len())`, this hashes the continuation of
    /// `m || pad(m)` without knowing `m`. Nothing checks that `prior_len`
    /// matches how `state` was produced.
    #[inline]
    pub fn with_state(state: HashState, prior_len: u64) -> Self {
        Self::with_state_on(Backend::selected(), state, prior_len)
    }

    #[inline]
    pub(crate) fn with_state_on(backend: Backend, state: HashState, prior_len: u64) -> Self {
        Self {
            state,
            len: prior_len,
            buffer: [0; Self::BLOCK_LEN],
            offset: 0,
            backend,
        }
    }

    /// Switches compression to `backend`, failing if this CPU cannot run it.
    pub fn with_backend(mut self, backend: Backend) -> Result<Self, Sm3Error> {
        if !backend.is_available() {
            return Err(Sm3Error::BackendUnavailable(backend.name()));
        }
        self.backend = backend;
        Ok(self)
    }

    #[inline]
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Chaining state after the last whole block; buffered bytes are not
    /// reflected until `finalize`.
    #[inline]
    pub fn state(&self) -> HashState {
        self.state
    }

    /// Bytes accounted so far, prior offset included.
    #[inline]
    pub fn processed_len(&self) -> u64 {
        self.len.wrapping_add(self.offset as u64)
    }

    pub fn update(&mut self, data: &[u8]) {
        let mut data = data;

        if self.offset > 0 {
            let take = data.len().min(Self::BLOCK_LEN - self.offset);
            self.buffer[self.offset..self.offset + take].copy_from_slice(&data[..take]);
            self.offset += take;
            data = &data[take..];
            if self.offset < Self::BLOCK_LEN {
                return;
            }
            self.backend.compress_blocks(self.state.words_mut(), &self.buffer);
            self.len = self.len.wrapping_add(Self::BLOCK_LEN as u64);
            self.offset = 0;
        }

        let whole = data.len() - data.len() % Self::BLOCK_LEN;
        if whole > 0 {
            self.backend.compress_blocks(self.state.words_mut(), &data[..whole]);
            self.len = self.len.wrapping_add(whole as u64);
        }

        let rest = &data[whole..];
        self.buffer[..rest.len()].copy_from_slice(rest);
        self.offset = rest.len();
    }

    pub fn finalize(self) -> Digest {
        let trailer = Trailer::new(&self.buffer[..self.offset], self.processed_len());
        let mut state = self.state;
        self.backend.compress_blocks(state.words_mut(), trailer.blocks());
        state.to_digest()
    }

    #[inline]
    pub fn oneshot<T: AsRef<[u8]>>(data: T) -> Digest {
        let mut m = Self::new();
        m.update(data.as_ref());
        m.finalize()
    }
}

impl Default for Sm3 {
    fn default() -> Self {
        Self::new()
    }
}

/// SM3 digest of `data`.
#[inline]
pub fn hash(data: &[u8]) -> Digest {
    Sm3::oneshot(data)
}

/// Continues an SM3 computation from `state`, declaring `prior_len` bytes
/// already hashed. This is the length-extension entry point: see
/// [`Sm3::with_state`].
#[inline]
pub fn hash_continue(data: &[u8], state: HashState, prior_len: u64) -> Digest {
    let mut m = Sm3::with_state(state, prior_len);
    m.update(data);
    m.finalize()
}

#[inline]
pub(crate) fn hash_on(backend: Backend, data: &[u8]) -> Digest {
    let mut m = Sm3::with_state_on(backend, HashState::INITIAL, 0);
    m.update(data);
    m.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::sm3::{digest_to_state, pad, padded_len};
    use proptest::prelude::*;

    #[test]
    fn test_known_vectors() {
        sm3_test_case!(Backend::selected());
    }

    #[test]
    fn test_deterministic() {
        let data = (0..777).map(|_| rand::random::<u8>()).collect::<Vec<u8>>();
        let first = hash(&data);
        for _ in 0..8 {
            assert_eq!(hash(&data), first);
        }
        assert_eq!(Sm3::oneshot(&data), first);
    }

    #[test]
    fn test_hash_continue_from_initial_state() {
        let data = b"user=guest&data=payload";
        assert_eq!(hash_continue(data, HashState::INITIAL, 0), hash(data));
    }

    #[test]
    fn test_hash_continue_equals_hash_of_padded_prefix() {
        for prefix_len in [0usize, 1, 44, 55, 56, 64, 100, 200] {
            let prefix = (0..prefix_len).map(|_| rand::random::<u8>()).collect::<Vec<u8>>();
            let suffix = (0..prefix_len / 2 + 3).map(|_| rand::random::<u8>()).collect::<Vec<u8>>();

            let state = digest_to_state(&hash(&prefix));
            let continued = hash_continue(&suffix, state, padded_len(prefix_len as u64));

            let mut full = prefix.clone();
            full.extend_from_slice(pad(prefix_len as u64, 0).as_bytes());
            full.extend_from_slice(&suffix);
            assert_eq!(continued, hash(&full), "prefix length {}", prefix_len);
        }
    }

    #[test]
    fn test_state_and_processed_len() {
        let mut m = Sm3::with_state(HashState::INITIAL, 128);
        assert_eq!(m.processed_len(), 128);
        m.update(&[0u8; 70]);
        assert_eq!(m.processed_len(), 198);
        assert_ne!(m.state(), HashState::INITIAL);
        m.update(&[0u8; 58]);
        assert_eq!(m.processed_len(), 256);
    }

    #[test]
    fn test_with_backend_accepts_available() {
        for backend in Backend::available() {
            let m = Sm3::new().with_backend(backend).unwrap();
            assert_eq!(m.backend(), backend);
            assert_eq!(m.finalize(), hash(b""));
        }
    }

    #[test]
    fn test_with_backend_rejects_unsupported() {
        for backend in Backend::all() {
            match Sm3::new().with_backend(backend) {
                Ok(m) => {
                    assert!(backend.is_available(), "backend {}", backend.name());
                    assert_eq!(m.backend(), backend);
                }
                Err(err) => {
                    assert!(!backend.is_available(), "backend {}", backend.name());
                    assert!(matches!(err, Sm3Error::BackendUnavailable(name) if name == backend.name()));
                }
            }
        }
    }

    proptest! {
        #[test]
        fn prop_chunked_updates_match_oneshot(
            data in proptest::collection::vec(any::<u8>(), 0..600),
            cuts in proptest::collection::vec(0usize..600, 0..8),
        ) {
            let mut cuts: Vec<usize> = cuts.into_iter().map(|c| c % (data.len() + 1)).collect();
            cuts.sort_unstable();

            let mut m = Sm3::new();
            let mut start = 0;
            for cut in cuts {
                m.update(&data[start..cut]);
                start = cut;
            }
            m.update(&data[start..]);
            prop_assert_eq!(m.finalize(), hash(&data));
        }

        #[test]
        fn prop_matches_reference_crate(data in proptest::collection::vec(any::<u8>(), 0..300)) {
            let expected = <sm3::Sm3 as sm3::Digest>::digest(&data);
            prop_assert_eq!(&hash(&data)[..], expected.as_slice());
        }
    }
}
