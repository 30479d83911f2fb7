//! SM3 (GM/T 0004-2012) hash engine.
//!
//! Scalar reference compression, SIMD fast paths selected at runtime,
//! single-message and streaming digesting, Merkle-Damgård state
//! continuation, and fork-join batch hashing of independent messages.
//!
//! ```
//! use sm3_engine::crypto::hash::sm3;
//!
//! let digest = sm3::hash(b"abc");
//! assert_eq!(digest[..4], [0x66, 0xc7, 0xf0, 0xf4]);
//! ```

pub mod crypto;
pub mod error;
pub mod utils;

pub use error::Sm3Error;
pub use sm3_engine_macros::*;
