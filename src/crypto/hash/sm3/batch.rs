use core::marker::PhantomData;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use super::engine::hash_on;
use super::{Backend, Digest, DIGEST_LEN};
use crate::Sm3Error;

/// Hashes independent messages on a pool of scoped worker threads.
///
/// Workers claim message indices from a shared counter, so uneven message
/// sizes balance themselves. Output order always matches input order.
#[derive(Clone, Copy, Debug)]
pub struct BatchHasher {
    workers: usize,
    backend: Backend,
}

impl BatchHasher {
    /// Auto worker count on the selected backend.
    pub fn new() -> Self {
        Self { workers: 0, backend: Backend::selected() }
    }

    /// `0` picks [`thread::available_parallelism`].
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Result<Self, Sm3Error> {
        if !backend.is_available() {
            return Err(Sm3Error::BackendUnavailable(backend.name()));
        }
        self.backend = backend;
        Ok(self)
    }

    /// Number of threads a batch of `count` messages would use.
    pub fn workers_for(&self, count: usize) -> usize {
        let requested = match self.workers {
            0 => thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            n => n,
        };
        requested.clamp(1, count.max(1))
    }

    pub fn hash_all<M: AsRef<[u8]> + Sync>(&self, messages: &[M]) -> Result<Vec<Digest>, Sm3Error> {
        let count = messages.len();
        if count == 0 {
            return Ok(Vec::new());
        }

        let workers = self.workers_for(count);
        tracing::debug!(messages = count, workers, backend = self.backend.name(), "hashing SM3 batch");

        let mut output = vec![[0u8; DIGEST_LEN]; count];
        if workers == 1 {
            for (slot, message) in output.iter_mut().zip(messages) {
                *slot = hash_on(self.backend, message.as_ref());
            }
            return Ok(output);
        }

        let next = AtomicUsize::new(0);
        let slots = Slots::new(&mut output);
        let backend = self.backend;

        let spawned = thread::scope(|scope| {
            for id in 0..workers {
                let worker = thread::Builder::new()
                    .name(format!("sm3-batch-{}", id))
                    .spawn_scoped(scope, || {
                        let mut hashed = 0usize;
                        loop {
                            let i = next.fetch_add(1, Ordering::Relaxed);
                            if i >= count {
                                break;
                            }
                            let digest = hash_on(backend, messages[i].as_ref());
                            // SAFETY: each index is returned by exactly one fetch_add.
                            unsafe { slots.write(i, digest) };
                            hashed += 1;
                        }
                        tracing::trace!(hashed, "sm3 batch worker done");
                    });
                if let Err(e) = worker {
                    tracing::warn!(worker = id, error = %e, "failed to spawn sm3 batch worker");
                    return Err(e);
                }
            }
            Ok(())
        });
        spawned?;

        Ok(output)
    }
}

impl Default for BatchHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Digests of `messages`, in order, computed on `workers` threads
/// (`0` = one per available core).
pub fn hash_batch<M: AsRef<[u8]> + Sync>(messages: &[M], workers: usize) -> Result<Vec<Digest>, Sm3Error> {
    BatchHasher::new().with_workers(workers).hash_all(messages)
}

/// Shared writer over the output vector. Sound only while writers touch
/// pairwise distinct indices.
struct Slots<'a> {
    ptr: *mut Digest,
    len: usize,
    _marker: PhantomData<&'a mut [Digest]>,
}

unsafe impl Sync for Slots<'_> {}

impl<'a> Slots<'a> {
    fn new(slice: &'a mut [Digest]) -> Self {
        Self { ptr: slice.as_mut_ptr(), len: slice.len(), _marker: PhantomData }
    }

    /// # Safety
    /// No other thread may write index `i` concurrently.
    #[inline]
    unsafe fn write(&self, i: usize, digest: Digest) {
        debug_assert!(i < self.len);
        self.ptr.add(i).write(digest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::sm3::hash;

    fn random_messages(count: usize) -> Vec<Vec<u8>> {
        (0..count)
            .map(|_| {
                let len = rand::random::<usize>() % 300;
                (0..len).map(|_| rand::random::<u8>()).collect()
            })
            .collect()
    }

    #[test]
    fn test_batch_matches_sequential() {
        let messages = random_messages(37);
        let expected: Vec<Digest> = messages.iter().map(|m| hash(m)).collect();
        for workers in [0, 1, 2, 4, 37, 74] {
            let digests = hash_batch(&messages, workers).unwrap();
            assert_eq!(digests, expected, "workers {}", workers);
        }
    }

    #[test]
    fn test_batch_keeps_order_with_uneven_sizes() {
        let messages: Vec<Vec<u8>> = (0..16).map(|i| vec![i as u8; (16 - i) * 1000]).collect();
        let digests = hash_batch(&messages, 4).unwrap();
        for (digest, message) in digests.iter().zip(&messages) {
            assert_eq!(*digest, hash(message));
        }
    }

    #[test]
    fn test_empty_batch() {
        let messages: [&[u8]; 0] = [];
        assert!(hash_batch(&messages, 0).unwrap().is_empty());
        assert!(hash_batch(&messages, 8).unwrap().is_empty());
    }

    #[test]
    fn test_single_and_str_messages() {
        let digests = hash_batch(&["abc"], 8).unwrap();
        assert_eq!(digests, vec![hash(b"abc")]);

        let digests = hash_batch(&["", "abc"], 2).unwrap();
        assert_eq!(digests, vec![hash(b""), hash(b"abc")]);
    }

    #[test]
    fn test_worker_clamping() {
        let hasher = BatchHasher::new().with_workers(16);
        assert_eq!(hasher.workers_for(3), 3);
        assert_eq!(hasher.workers_for(100), 16);
        assert_eq!(hasher.workers_for(0), 1);

        let auto = BatchHasher::default();
        assert!(auto.workers_for(1_000_000) >= 1);
        assert_eq!(auto.workers_for(1), 1);
    }

    #[test]
    fn test_with_backend_rejects_unsupported() {
        for backend in Backend::all() {
            match BatchHasher::new().with_backend(backend) {
                Ok(hasher) => {
                    assert!(backend.is_available(), "backend {}", backend.name());
                    assert_eq!(hasher.hash_all(&["abc"]).unwrap(), vec![hash(b"abc")]);
                }
                Err(err) => {
                    assert!(!backend.is_available(), "backend {}", backend.name());
                    assert!(matches!(err, Sm3Error::BackendUnavailable(name) if name == backend.name()));
                }
            }
        }
    }

    #[test]
    fn test_every_backend() {
        let messages = random_messages(20);
        let expected: Vec<Digest> = messages.iter().map(|m| hash(m)).collect();
        for backend in Backend::available() {
            let hasher = BatchHasher::new().with_workers(3).with_backend(backend).unwrap();
            assert_eq!(hasher.hash_all(&messages).unwrap(), expected, "backend {}", backend.name());
        }
    }
}
