//! Forging `hash(secret || message || glue || extension)` from
//! `hash(secret || message)` alone.
//!
//! The forger needs the digest, the total prefix length and the extension.
//! When the secret length is unknown, each guess yields its own glue; only
//! the right guess produces a suffix the verifier accepts.

use super::{hash_continue, pad, padded_len, Digest, HashState, Padding};

/// A forged continuation: the glue padding that must follow the original
/// message and the digest of the extended message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extension {
    pub glue: Padding,
    pub digest: Digest,
}

impl Extension {
    /// The bytes to append after the original message: glue, then
    /// `extension`.
    pub fn forged_suffix(&self, extension: &[u8]) -> Vec<u8> {
        let mut suffix = Vec::with_capacity(self.glue.len() + extension.len());
        suffix.extend_from_slice(self.glue.as_bytes());
        suffix.extend_from_slice(extension);
        suffix
    }
}

/// Extends `original`, the digest of some unknown `prefix_len`-byte input,
/// by `extension`.
pub fn extend(original: &Digest, prefix_len: u64, extension: &[u8]) -> Extension {
    let glue = pad(prefix_len, 0);
    let state = HashState::from_digest(original);
    let digest = hash_continue(extension, state, padded_len(prefix_len));
    Extension { glue, digest }
}
