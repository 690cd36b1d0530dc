//! Vector-width-parameterized butterfly kernels.
//!
//! For each (element type, lane count) pair a macro instantiates the inner
//! butterfly pass, the recursive block it falls back to above the twiddle
//! buffer, and the vectorized twiddle-expansion recurrence. The kernels
//! only ever see contiguous unit-stride data; the multipass dispatcher
//! checks that before handing passes over.
//!
//! The radix-8 terminal is deliberately not vectorized across lanes; it
//! only needs to be compiled at the right instruction level, which
//! `multiversion` takes care of.

use wide::{f32x4, f64x2};
#[cfg(feature = "avx")]
use wide::{f32x8, f64x4};
#[cfg(feature = "avx512")]
use wide::{f32x16, f64x8};

use super::SimdMask;
use crate::butterfly::fft8;
use crate::scalar::{cexp, Scalar};
use crate::{Direction, TWIDDLE_BUF_LOG2, TWIDDLE_BUF_SIZE};

macro_rules! simd_kernels {
    ($block:ident, $pass:ident, $twiddles:ident, $t:ty, $v:ty, $lanes:expr) => {
        /// Twiddle doubling recurrence, vectorized once the produced run is
        /// at least one vector wide.
        #[multiversion::multiversion(targets(
            "x86_64+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
            "x86_64+avx2+fma",
            "x86_64+sse4.2",
            "x86+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
            "x86+avx2+fma",
            "x86+sse4.2",
            "x86+sse2",
            "aarch64+neon",
        ))]
        fn $twiddles(log2n: usize, log2b: usize, re: &mut [$t], im: &mut [$t], direction: Direction) {
            re[0] = 0.0;
            im[0] = 0.0;
            for i in 0..log2b {
                let k = 1usize << i;
                let (x, mut y) = <$t as Scalar>::cexpm1(log2n - i);
                if let Direction::Forward = direction {
                    y = -y;
                }
                if k >= $lanes {
                    let xs = <$v>::splat(x);
                    let ys = <$v>::splat(y);
                    let mut j = 0usize;
                    while j < k {
                        let r = <$v>::new(re[j..j + $lanes].try_into().unwrap());
                        let m = <$v>::new(im[j..j + $lanes].try_into().unwrap());
                        let out_r = (xs * r - ys * m) + (xs + r);
                        let out_m = (ys * r + xs * m) + (ys + m);
                        re[k + j..k + j + $lanes].copy_from_slice(&out_r.to_array());
                        im[k + j..k + j + $lanes].copy_from_slice(&out_m.to_array());
                        j += $lanes;
                    }
                } else {
                    for j in 0..k {
                        re[k + j] = (x * re[j] - y * im[j]) + (x + re[j]);
                        im[k + j] = (y * re[j] + x * im[j]) + (y + im[j]);
                    }
                }
            }
            for v in re[..1 << log2b].iter_mut() {
                *v += 1.0;
            }
        }

        /// Butterfly block with the recursive multiplier composition.
        #[multiversion::multiversion(targets(
            "x86_64+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
            "x86_64+avx2+fma",
            "x86_64+sse4.2",
            "x86+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
            "x86+avx2+fma",
            "x86+sse4.2",
            "x86+sse2",
            "aarch64+neon",
        ))]
        #[allow(clippy::too_many_arguments)]
        fn $block(
            log2n: usize,
            log2b: usize,
            re: &mut [$t],
            im: &mut [$t],
            lo: usize,
            hi: usize,
            cm: $t,
            sm: $t,
            direction: Direction,
            tr: &[$t],
            ti: &[$t],
        ) {
            let b = 1usize << log2b;
            let h = b >> 1;
            if log2b <= TWIDDLE_BUF_LOG2 {
                let cc = <$v>::splat(cm);
                let ss = <$v>::splat(sm);
                let mut i = 0usize;
                while i < b {
                    let t_r = <$v>::new(tr[i..i + $lanes].try_into().unwrap());
                    let t_i = <$v>::new(ti[i..i + $lanes].try_into().unwrap());
                    let c = cc * t_r - ss * t_i;
                    let s = ss * t_r + cc * t_i;
                    let xl = <$v>::new(re[lo + i..lo + i + $lanes].try_into().unwrap());
                    let yl = <$v>::new(im[lo + i..lo + i + $lanes].try_into().unwrap());
                    let xr = <$v>::new(re[hi + i..hi + i + $lanes].try_into().unwrap());
                    let yr = <$v>::new(im[hi + i..hi + i + $lanes].try_into().unwrap());
                    let x = c * xr - s * yr;
                    let y = s * xr + c * yr;
                    re[lo + i..lo + i + $lanes].copy_from_slice(&(xl + x).to_array());
                    im[lo + i..lo + i + $lanes].copy_from_slice(&(yl + y).to_array());
                    re[hi + i..hi + i + $lanes].copy_from_slice(&(xl - x).to_array());
                    im[hi + i..hi + i + $lanes].copy_from_slice(&(yl - y).to_array());
                    i += $lanes;
                }
            } else {
                let (x, mut y) = cexp::<$t>(log2n - log2b + 1);
                if let Direction::Forward = direction {
                    y = -y;
                }
                $block(log2n, log2b - 1, re, im, lo, hi, cm, sm, direction, tr, ti);
                $block(
                    log2n,
                    log2b - 1,
                    re,
                    im,
                    lo + h,
                    hi + h,
                    cm * x - sm * y,
                    sm * x + cm * y,
                    direction,
                    tr,
                    ti,
                );
            }
        }

        /// One vectorized butterfly pass over `2^log2c` contiguous blocks.
        #[multiversion::multiversion(targets(
            "x86_64+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
            "x86_64+avx2+fma",
            "x86_64+sse4.2",
            "x86+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
            "x86+avx2+fma",
            "x86+sse4.2",
            "x86+sse2",
            "aarch64+neon",
        ))]
        #[allow(clippy::too_many_arguments)]
        fn $pass(
            log2n: usize,
            log2c: usize,
            re: &mut [$t],
            im: &mut [$t],
            direction: Direction,
            log2t: usize,
            tr: &[$t],
            ti: &[$t],
        ) {
            let n = 1usize << log2n;
            let h = n >> 1;
            let blocks = 1usize << log2c;
            let mut lo = 0usize;
            if log2n - 1 <= log2t {
                if h > $lanes {
                    for _ in 0..blocks {
                        let mut d = 0usize;
                        while d < h {
                            // Unrolled x2; slightly faster.
                            let c = <$v>::new(tr[d..d + $lanes].try_into().unwrap());
                            let s = <$v>::new(ti[d..d + $lanes].try_into().unwrap());
                            let xl = <$v>::new(re[lo + d..lo + d + $lanes].try_into().unwrap());
                            let yl = <$v>::new(im[lo + d..lo + d + $lanes].try_into().unwrap());
                            let xr = <$v>::new(re[lo + h + d..lo + h + d + $lanes].try_into().unwrap());
                            let yr = <$v>::new(im[lo + h + d..lo + h + d + $lanes].try_into().unwrap());
                            let x = c * xr - s * yr;
                            let y = s * xr + c * yr;
                            re[lo + d..lo + d + $lanes].copy_from_slice(&(xl + x).to_array());
                            im[lo + d..lo + d + $lanes].copy_from_slice(&(yl + y).to_array());
                            re[lo + h + d..lo + h + d + $lanes].copy_from_slice(&(xl - x).to_array());
                            im[lo + h + d..lo + h + d + $lanes].copy_from_slice(&(yl - y).to_array());
                            let d2 = d + $lanes;
                            let c = <$v>::new(tr[d2..d2 + $lanes].try_into().unwrap());
                            let s = <$v>::new(ti[d2..d2 + $lanes].try_into().unwrap());
                            let xl = <$v>::new(re[lo + d2..lo + d2 + $lanes].try_into().unwrap());
                            let yl = <$v>::new(im[lo + d2..lo + d2 + $lanes].try_into().unwrap());
                            let xr = <$v>::new(re[lo + h + d2..lo + h + d2 + $lanes].try_into().unwrap());
                            let yr = <$v>::new(im[lo + h + d2..lo + h + d2 + $lanes].try_into().unwrap());
                            let x = c * xr - s * yr;
                            let y = s * xr + c * yr;
                            re[lo + d2..lo + d2 + $lanes].copy_from_slice(&(xl + x).to_array());
                            im[lo + d2..lo + d2 + $lanes].copy_from_slice(&(yl + y).to_array());
                            re[lo + h + d2..lo + h + d2 + $lanes].copy_from_slice(&(xl - x).to_array());
                            im[lo + h + d2..lo + h + d2 + $lanes].copy_from_slice(&(yl - y).to_array());
                            d += 2 * $lanes;
                        }
                        lo += n;
                    }
                } else {
                    for _ in 0..blocks {
                        let c = <$v>::new(tr[0..$lanes].try_into().unwrap());
                        let s = <$v>::new(ti[0..$lanes].try_into().unwrap());
                        let xl = <$v>::new(re[lo..lo + $lanes].try_into().unwrap());
                        let yl = <$v>::new(im[lo..lo + $lanes].try_into().unwrap());
                        let xr = <$v>::new(re[lo + h..lo + h + $lanes].try_into().unwrap());
                        let yr = <$v>::new(im[lo + h..lo + h + $lanes].try_into().unwrap());
                        let x = c * xr - s * yr;
                        let y = s * xr + c * yr;
                        re[lo..lo + $lanes].copy_from_slice(&(xl + x).to_array());
                        im[lo..lo + $lanes].copy_from_slice(&(yl + y).to_array());
                        re[lo + h..lo + h + $lanes].copy_from_slice(&(xl - x).to_array());
                        im[lo + h..lo + h + $lanes].copy_from_slice(&(yl - y).to_array());
                        lo += n;
                    }
                }
            } else {
                for _ in 0..blocks {
                    $block(
                        log2n,
                        log2n - 1,
                        re,
                        im,
                        lo,
                        lo + h,
                        1.0,
                        0.0,
                        direction,
                        tr,
                        ti,
                    );
                    lo += n;
                }
            }
        }
    };
}

simd_kernels!(block_4f, pass_4f, twiddles_4f, f32, f32x4, 4);
simd_kernels!(block_2d, pass_2d, twiddles_2d, f64, f64x2, 2);
#[cfg(feature = "avx")]
simd_kernels!(block_8f, pass_8f, twiddles_8f, f32, f32x8, 8);
#[cfg(feature = "avx")]
simd_kernels!(block_4d, pass_4d, twiddles_4d, f64, f64x4, 4);
#[cfg(feature = "avx512")]
simd_kernels!(block_16f, pass_16f, twiddles_16f, f32, f32x16, 16);
#[cfg(feature = "avx512")]
simd_kernels!(block_8d, pass_8d, twiddles_8d, f64, f64x8, 8);

/// Fused bottom three passes: radix-8 over every 8-element block.
#[multiversion::multiversion(targets(
    "x86_64+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
    "x86_64+avx2+fma",
    "x86_64+sse4.2",
    "x86+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
    "x86+avx2+fma",
    "x86+sse4.2",
    "x86+sse2",
    "aarch64+neon",
))]
fn fft8_chunks_f32(re: &mut [f32], im: &mut [f32], blocks: usize, direction: Direction) {
    for j in 0..blocks {
        let base = (8 * j) as isize;
        fft8(re, im, base, base, 1, 1, direction, std::f32::consts::FRAC_1_SQRT_2);
    }
}

/// Fused bottom three passes: radix-8 over every 8-element block.
#[multiversion::multiversion(targets(
    "x86_64+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
    "x86_64+avx2+fma",
    "x86_64+sse4.2",
    "x86+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
    "x86+avx2+fma",
    "x86+sse4.2",
    "x86+sse2",
    "aarch64+neon",
))]
fn fft8_chunks_f64(re: &mut [f64], im: &mut [f64], blocks: usize, direction: Direction) {
    for j in 0..blocks {
        let base = (8 * j) as isize;
        fft8(re, im, base, base, 1, 1, direction, std::f64::consts::FRAC_1_SQRT_2);
    }
}

fn width_fits(lanes: usize, log2d: usize, log2t: usize) -> bool {
    4 * lanes <= (1usize << log2d) && 2 * lanes <= (1usize << log2t)
}

fn try_pass_f32(
    mask: SimdMask,
    log2d: usize,
    log2c: usize,
    re: &mut [f32],
    im: &mut [f32],
    direction: Direction,
    log2t: usize,
) -> bool {
    let mut tr = [0.0f32; TWIDDLE_BUF_SIZE];
    let mut ti = [0.0f32; TWIDDLE_BUF_SIZE];
    #[cfg(feature = "avx512")]
    if mask.contains(SimdMask::F32X16) && width_fits(16, log2d, log2t) {
        twiddles_16f(log2d, log2t, &mut tr, &mut ti, direction);
        pass_16f(log2d, log2c, re, im, direction, log2t, &tr, &ti);
        return true;
    }
    #[cfg(feature = "avx")]
    if mask.contains(SimdMask::F32X8) && width_fits(8, log2d, log2t) {
        twiddles_8f(log2d, log2t, &mut tr, &mut ti, direction);
        pass_8f(log2d, log2c, re, im, direction, log2t, &tr, &ti);
        return true;
    }
    if mask.contains(SimdMask::F32X4) && width_fits(4, log2d, log2t) {
        twiddles_4f(log2d, log2t, &mut tr, &mut ti, direction);
        pass_4f(log2d, log2c, re, im, direction, log2t, &tr, &ti);
        return true;
    }
    false
}

fn try_pass_f64(
    mask: SimdMask,
    log2d: usize,
    log2c: usize,
    re: &mut [f64],
    im: &mut [f64],
    direction: Direction,
    log2t: usize,
) -> bool {
    let mut tr = [0.0f64; TWIDDLE_BUF_SIZE];
    let mut ti = [0.0f64; TWIDDLE_BUF_SIZE];
    #[cfg(feature = "avx512")]
    if mask.contains(SimdMask::F64X8) && width_fits(8, log2d, log2t) {
        twiddles_8d(log2d, log2t, &mut tr, &mut ti, direction);
        pass_8d(log2d, log2c, re, im, direction, log2t, &tr, &ti);
        return true;
    }
    #[cfg(feature = "avx")]
    if mask.contains(SimdMask::F64X4) && width_fits(4, log2d, log2t) {
        twiddles_4d(log2d, log2t, &mut tr, &mut ti, direction);
        pass_4d(log2d, log2c, re, im, direction, log2t, &tr, &ti);
        return true;
    }
    if mask.contains(SimdMask::F64X2) && width_fits(2, log2d, log2t) {
        twiddles_2d(log2d, log2t, &mut tr, &mut ti, direction);
        pass_2d(log2d, log2c, re, im, direction, log2t, &tr, &ti);
        return true;
    }
    false
}

const ANY_F32: SimdMask = SimdMask::F32X4.union(SimdMask::F32X8).union(SimdMask::F32X16);
const ANY_F64: SimdMask = SimdMask::F64X2.union(SimdMask::F64X4).union(SimdMask::F64X8);

macro_rules! impl_multipass {
    ($with_mask:ident, $entry:ident, $t:ty, $any:ident, $min_log2t:expr, $fft8_chunks:ident, $try_pass:ident) => {
        /// Consume passes from the bottom of a multipass schedule with the
        /// given width mask. Returns the number of passes handled; passes
        /// are always contiguous, starting at block size
        /// `2^(log2n - depth + 1)`.
        pub(crate) fn $with_mask(
            mask: SimdMask,
            log2n: usize,
            log2c: usize,
            depth: usize,
            re: &mut [$t],
            im: &mut [$t],
            direction: Direction,
        ) -> usize {
            if !mask.intersects($any) {
                return 0;
            }
            if TWIDDLE_BUF_LOG2 < $min_log2t {
                return 0;
            }
            let mut depth = depth;
            let mut done = 0usize;
            if depth == log2n && depth >= 3 {
                let blocks = 1usize << (log2n + log2c - 3);
                $fft8_chunks(re, im, blocks, direction);
                depth -= 3;
                done = 3;
            }
            if log2n - depth + 1 > 3 {
                for log2d in (log2n - depth + 1)..=log2n {
                    let log2t = if log2d - 1 < TWIDDLE_BUF_LOG2 {
                        log2d - 1
                    } else {
                        TWIDDLE_BUF_LOG2
                    };
                    if $try_pass(mask, log2d, log2c + log2n - log2d, re, im, direction, log2t) {
                        done += 1;
                    } else {
                        break;
                    }
                }
                return done;
            }
            done
        }

        /// The pluggable multipass hook wired into the scalar trait.
        pub(crate) fn $entry(
            log2n: usize,
            log2c: usize,
            depth: usize,
            re: &mut [$t],
            im: &mut [$t],
            direction: Direction,
        ) -> usize {
            $with_mask(super::features(), log2n, log2c, depth, re, im, direction)
        }
    };
}

impl_multipass!(multipass_with_mask_f32, multipass_optimized_f32, f32, ANY_F32, 3, fft8_chunks_f32, try_pass_f32);
impl_multipass!(multipass_with_mask_f64, multipass_optimized_f64, f64, ANY_F64, 2, fft8_chunks_f64, try_pass_f64);
