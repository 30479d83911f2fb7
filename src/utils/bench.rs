/// Formats a byte count for benchmark labels: `65536` -> `"64 KiB"`.
pub fn human_readable_size(size: usize) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut scaled = size;
    let mut unit = 0;
    while scaled >= 1024 && scaled % 1024 == 0 && unit + 1 < UNITS.len() {
        scaled /= 1024;
        unit += 1;
    }
    format!("{} {}", scaled, UNITS[unit])
}

/// Lets a benchmark body run either under criterion or as a plain loop over
/// a range, which is handy under a profiler.
#[macro_export]
macro_rules! _impl_bench_trait_for_criterion {
    ($name:ident) => {
        pub trait BenchTrait {
            fn bench<F>(&mut self, name: &str, f: F) where F: FnMut();
        }

        impl BenchTrait for std::ops::Range<usize> {
            #[inline(always)]
            fn bench<F>(&mut self, _name: &str, mut f: F) where F: FnMut() {
                for _ in self {
                    f();
                }
            }
        }

        impl BenchTrait for $name {
            #[inline(always)]
            fn bench<F>(&mut self, name: &str, mut f: F) where F: FnMut() {
                self.bench_function(name, |b| b.iter(|| f()));
            }
        }
    };
}

/// `main` for a bench target: `--bench` runs the criterion group, anything
/// else runs `$fn` in a tight loop.
#[macro_export]
macro_rules! _bench_main {
    ($group:ident, $fn:ident, $size:expr $(,)?) => {
        fn main() {
            if std::env::args().any(|arg| arg == "--bench") {
                $group();
                Criterion::default().configure_from_args().final_summary();
                return;
            }
            let mut range = 0..100000;
            $fn(&mut range, $size);
        }
    };
}
