mod bench;

pub use bench::human_readable_size;

/// Detects CPU features at runtime, short-circuiting on features the build
/// already enables statically. Each `"arch" => ("feat", ...)` arm is only
/// compiled on its own target arch; other arches report `false`.
///
/// ```ignore
/// let avx2 = crate::is_hw_feature_detected!(
///     "x86" => ("avx2"),
///     "x86_64" => ("avx2"),
/// );
/// ```
#[macro_export]
macro_rules! is_hw_feature_detected {
    ($($arch:tt => ($($feat:tt),+)),+ $(,)?) => {
        {
            #[allow(unused_mut)]
            let mut available = false;
            $(
                #[cfg(target_arch = $arch)]
                {
                    available = cfg!(all($(target_feature = $feat),+));
                    if !available {
                        available = true;
                        $(
                            if !$crate::__runtime_feature!($feat) {
                                available = false;
                            }
                        )+
                    }
                }
            )+
            available
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __runtime_feature {
    ($feat:tt) => {
        {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            let found = std::is_x86_feature_detected!($feat);
            #[cfg(target_arch = "aarch64")]
            let found = std::arch::is_aarch64_feature_detected!($feat);
            #[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
            let found = false;
            found
        }
    };
}

/// # Safety
/// `index + N` must not exceed `slice.len()`.
#[inline(always)]
pub(crate) const unsafe fn slice_to_array_at<T, const N: usize>(slice: &[T], index: usize) -> &[T; N] {
    &*(slice.as_ptr().add(index) as *const [T; N])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_to_array_at() {
        let data: Vec<u8> = (0..128).collect();
        let block: &[u8; 64] = unsafe { slice_to_array_at(&data, 64) };
        assert_eq!(block[0], 64);
        assert_eq!(block[63], 127);
        let head: &[u8; 4] = unsafe { slice_to_array_at(&data, 0) };
        assert_eq!(head, &[0, 1, 2, 3]);
    }

    #[test]
    fn test_static_feature_is_detected() {
        #[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
        assert!(crate::is_hw_feature_detected!("x86_64" => ("sse2")));
        #[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
        assert!(crate::is_hw_feature_detected!("aarch64" => ("neon")));
        assert!(!crate::is_hw_feature_detected!("mips64" => ("msa")));
    }
}
