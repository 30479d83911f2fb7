use std::sync::OnceLock;

use super::soft;
#[cfg(test)]
use super::soft::Expanded;
#[cfg(target_arch = "aarch64")]
use super::arm;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use super::{x86_avx2, x86_ssse3};
#[cfg(test)]
use super::BLOCK_LEN;

/// Block compression strategy. All variants compute the same function; the
/// SIMD ones only vectorize the message load and `W1` derivation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Backend {
    Soft,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Ssse3,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Avx2,
    #[cfg(target_arch = "aarch64")]
    Neon,
}

impl Backend {
    /// Every backend compiled for this target, slowest first.
    pub fn all() -> Vec<Backend> {
        #[allow(unused_mut)]
        let mut all = vec![Backend::Soft];
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            all.push(Backend::Ssse3);
            all.push(Backend::Avx2);
        }
        #[cfg(target_arch = "aarch64")]
        all.push(Backend::Neon);
        all
    }

    /// Backends the running CPU supports.
    pub fn available() -> Vec<Backend> {
        Self::all().into_iter().filter(|b| b.is_available()).collect()
    }

    /// The fastest available backend, detected on first use.
    pub fn selected() -> Backend {
        static SELECTED: OnceLock<Backend> = OnceLock::new();
        *SELECTED.get_or_init(|| {
            let backend = Self::detect();
            tracing::debug!(backend = backend.name(), "selected SM3 compression backend");
            backend
        })
    }

    fn detect() -> Backend {
        if cfg!(feature = "force-soft") {
            return Backend::Soft;
        }
        Self::all()
            .into_iter()
            .rev()
            .find(|b| b.is_available())
            .unwrap_or(Backend::Soft)
    }

    pub fn is_available(self) -> bool {
        match self {
            Backend::Soft => true,
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Ssse3 => crate::is_hw_feature_detected!(
                "x86" => ("ssse3"),
                "x86_64" => ("ssse3"),
            ),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Avx2 => crate::is_hw_feature_detected!(
                "x86" => ("avx2"),
                "x86_64" => ("avx2"),
            ),
            #[cfg(target_arch = "aarch64")]
            Backend::Neon => crate::is_hw_feature_detected!("aarch64" => ("neon")),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Backend::Soft => "soft",
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Ssse3 => "ssse3",
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Avx2 => "avx2",
            #[cfg(target_arch = "aarch64")]
            Backend::Neon => "neon",
        }
    }

    /// Compresses every whole block of `blocks` into `state`, in order.
    ///
    /// Callers must only pass backends for which [`Backend::is_available`]
    /// holds; `Sm3` and `BatchHasher` check this when a backend is chosen.
    #[inline]
    pub(crate) fn compress_blocks(self, state: &mut [u32; 8], blocks: &[u8]) {
        debug_assert!(self.is_available());
        match self {
            Backend::Soft => soft::compress_blocks(state, blocks),
            // SAFETY: availability checked when the backend was chosen.
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Ssse3 => unsafe { x86_ssse3::compress_blocks(state, blocks) },
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Avx2 => unsafe { x86_avx2::compress_blocks(state, blocks) },
            #[cfg(target_arch = "aarch64")]
            Backend::Neon => unsafe { arm::compress_blocks(state, blocks) },
        }
    }

    #[cfg(test)]
    pub(crate) fn expand(self, block: &[u8; BLOCK_LEN]) -> Expanded {
        debug_assert!(self.is_available());
        match self {
            Backend::Soft => soft::expand(block),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Ssse3 => unsafe { x86_ssse3::expand(block) },
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Avx2 => unsafe { x86_avx2::expand(block) },
            #[cfg(target_arch = "aarch64")]
            Backend::Neon => unsafe { arm::expand(block) },
        }
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self::selected()
    }
}
