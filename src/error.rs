use thiserror::Error;

#[derive(Debug, Error)]
pub enum Sm3Error {
    /// A digest or serialized state was not exactly 32 bytes.
    #[error("invalid digest length: expected 32 bytes, got {actual}")]
    InvalidDigestLength { actual: usize },

    /// The requested compression backend needs CPU features this machine lacks.
    #[error("compression backend `{0}` is not supported on this CPU")]
    BackendUnavailable(&'static str),

    /// The OS refused to start a batch worker thread.
    #[error("failed to spawn batch worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Sm3Error::InvalidDigestLength { actual: 31 };
        assert_eq!(err.to_string(), "invalid digest length: expected 32 bytes, got 31");

        let err = Sm3Error::BackendUnavailable("avx2");
        assert_eq!(err.to_string(), "compression backend `avx2` is not supported on this CPU");

        let err = Sm3Error::from(std::io::Error::new(std::io::ErrorKind::OutOfMemory, "no threads"));
        assert!(matches!(err, Sm3Error::WorkerSpawn(_)));
        assert_eq!(err.to_string(), "failed to spawn batch worker: no threads");
    }
}
