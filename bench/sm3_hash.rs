use criterion::*;
use sm3_engine::crypto::hash::sm3::{hash_batch, Backend, Sm3};
use sm3_engine::utils::human_readable_size;
use sm3_engine::{_impl_bench_trait_for_criterion, _bench_main};

_impl_bench_trait_for_criterion!(Criterion);

fn bench_sm3_hash(c: &mut impl BenchTrait, size: usize) {
    let data = vec![0u8; size];

    for backend in Backend::available() {
        let test_name = format!("sm3({}) hash {}", backend.name(), human_readable_size(size));
        c.bench(&test_name, #[inline(always)] || {
            let mut sm3 = match Sm3::new().with_backend(backend) {
                Ok(sm3) => sm3,
                Err(_) => return,
            };
            sm3.update(&data);
            std::hint::black_box(sm3.finalize());
        });
    }
}

fn bench_sm3_hash_rustcrypto(c: &mut impl BenchTrait, size: usize) {
    use sm3::Digest;
    let data = vec![0u8; size];

    let test_name = format!("sm3(rustcrypto) hash {}", human_readable_size(size));
    c.bench(&test_name, #[inline(always)] || {
        std::hint::black_box(sm3::Sm3::digest(&data));
    });
}

fn bench_sm3_batch(c: &mut impl BenchTrait, size: usize) {
    let messages = vec![vec![0u8; size]; 1024];

    let test_name = format!("sm3 batch 1024 x {}", human_readable_size(size));
    c.bench(&test_name, #[inline(always)] || {
        std::hint::black_box(hash_batch(&messages, 0).ok());
    });
}

fn bench_sm3(c: &mut Criterion) {
    bench_sm3_hash(c, 16);
    bench_sm3_hash_rustcrypto(c, 16);
    bench_sm3_hash(c, 64);
    bench_sm3_hash_rustcrypto(c, 64);
    bench_sm3_hash(c, 1024);
    bench_sm3_hash_rustcrypto(c, 1024);
    bench_sm3_hash(c, 8192);
    bench_sm3_hash_rustcrypto(c, 8192);
    bench_sm3_hash(c, 65536);
    bench_sm3_hash_rustcrypto(c, 65536);
    bench_sm3_batch(c, 64);
    bench_sm3_batch(c, 4096);
}

criterion_group!(benches, bench_sm3);
_bench_main!(benches, bench_sm3_hash, 8192);
