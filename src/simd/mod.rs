//! Runtime SIMD feature detection.
//!
//! The engine picks vector widths at runtime from a small bitmask. On
//! x86/x86_64 the mask comes from `is_x86_feature_detected!`, which
//! performs the CPUID and XGETBV checks (including OS-level AVX state)
//! internally. On aarch64 NEON is a baseline feature, so the mask is fixed
//! at compile time. Everywhere else the mask is empty and the scalar paths
//! run.
//!
//! With `cache-cpu-detection` the mask is memoized process-wide: the
//! initialization race is idempotent (every thread computes the same
//! value), and a program can call [`prime`] once during startup to make
//! all later reads lock-free loads. Once observed nonzero, the mask never
//! changes.

pub(crate) mod kernels;

#[cfg(feature = "cache-cpu-detection")]
use std::sync::OnceLock;

/// Bitmask of usable vector widths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimdMask(u32);

impl SimdMask {
    pub const NONE: SimdMask = SimdMask(0);
    /// 4-lane f32 (SSE2 / NEON).
    pub const F32X4: SimdMask = SimdMask(1);
    /// 2-lane f64 (SSE2 / NEON).
    pub const F64X2: SimdMask = SimdMask(2);
    /// 8-lane f32 (AVX).
    pub const F32X8: SimdMask = SimdMask(4);
    /// 4-lane f64 (AVX).
    pub const F64X4: SimdMask = SimdMask(8);
    /// 16-lane f32 (AVX-512).
    pub const F32X16: SimdMask = SimdMask(16);
    /// 8-lane f64 (AVX-512).
    pub const F64X8: SimdMask = SimdMask(32);

    pub const fn union(self, other: SimdMask) -> SimdMask {
        SimdMask(self.0 | other.0)
    }

    pub const fn contains(self, other: SimdMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: SimdMask) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for SimdMask {
    type Output = SimdMask;

    fn bitor(self, rhs: SimdMask) -> SimdMask {
        self.union(rhs)
    }
}

#[cfg(feature = "cache-cpu-detection")]
static FEATURES: OnceLock<SimdMask> = OnceLock::new();

fn detect() -> SimdMask {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        let mut mask = SimdMask::NONE;
        if std::arch::is_x86_feature_detected!("sse2") {
            mask = mask | SimdMask::F32X4 | SimdMask::F64X2;
        }
        #[cfg(feature = "avx")]
        {
            if std::arch::is_x86_feature_detected!("avx") {
                mask = mask | SimdMask::F32X8 | SimdMask::F64X4;
                #[cfg(feature = "avx512")]
                {
                    if std::arch::is_x86_feature_detected!("avx512f") {
                        mask = mask | SimdMask::F32X16 | SimdMask::F64X8;
                    }
                }
            }
        }
        mask
    }
    #[cfg(target_arch = "aarch64")]
    {
        SimdMask::F32X4 | SimdMask::F64X2
    }
    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
    {
        SimdMask::NONE
    }
}

/// The vector widths available to this process.
pub fn features() -> SimdMask {
    #[cfg(feature = "cache-cpu-detection")]
    {
        *FEATURES.get_or_init(detect)
    }
    #[cfg(not(feature = "cache-cpu-detection"))]
    {
        detect()
    }
}

/// Perform feature detection eagerly, so later calls are plain loads.
pub fn prime() {
    let _ = features();
}

/// Install a caller-supplied feature mask instead of the detected one.
///
/// Must run before any transform; returns `false` if detection already
/// happened (the installed mask stays in effect either way after the first
/// success). Without `cache-cpu-detection` this has no effect.
pub fn force(mask: SimdMask) -> bool {
    #[cfg(feature = "cache-cpu-detection")]
    {
        FEATURES.set(mask).is_ok()
    }
    #[cfg(not(feature = "cache-cpu-detection"))]
    {
        let _ = mask;
        false
    }
}
