//! Twiddle factor generation.
//!
//! Twiddles are expanded from the O(log n) seed values `exp(2*pi*i/2^k)`
//! by a doubling recurrence, so any produced twiddle is the result of at
//! most `log2b` multiplications. The recurrence runs on the `exp(ix) - 1`
//! form and only adds the one back in a final pass; accuracy is slightly
//! better that way than when working with `(cos, sin)` directly.

use crate::scalar::Scalar;
use crate::Direction;

/// Fill `re`/`im` with `exp(+-2*pi*i*k / 2^log2n)` for `0 <= k < 2^log2b`.
///
/// The forward transform uses the negated angle.
pub(crate) fn compute_twiddles<T: Scalar>(
    log2n: usize,
    log2b: usize,
    re: &mut [T],
    im: &mut [T],
    direction: Direction,
) {
    re[0] = T::zero();
    im[0] = T::zero();
    for i in 0..log2b {
        let k = 1usize << i;
        let (x, mut y) = T::cexpm1(log2n - i);
        if let Direction::Forward = direction {
            y = -y;
        }
        for j in 0..k {
            re[k + j] = (x * re[j] - y * im[j]) + (x + re[j]);
            im[k + j] = (y * re[j] + x * im[j]) + (y + im[j]);
        }
    }
    for v in re[..1 << log2b].iter_mut() {
        *v = T::one() + *v;
    }
}

/// Fill `re`/`im` with `exp(+-2*pi*i*k / count)` for `0 <= k < count`.
///
/// `count` is always even here (the Bluestein path works modulo `2n`).
/// Only the first quadrant-and-a-bit is built by doubling; the rest follows
/// from the negation symmetries of the unit circle.
pub(crate) fn compute_chirp_twiddles<T: Scalar>(
    count: usize,
    re: &mut [T],
    im: &mut [T],
    direction: Direction,
) {
    let m = count >> 1;
    let h = (m + 2) >> 1;
    if count < 1 {
        return;
    }
    re[0] = T::zero();
    im[0] = T::zero();
    let mut i = 1;
    while i < h {
        let (x, mut y) = T::cexpm1_frac(i, count);
        if let Direction::Forward = direction {
            y = -y;
        }
        let j = if h < i * 2 { h - i } else { i };
        for k in 0..j {
            re[i + k] = (x * re[k] - y * im[k]) + (x + re[k]);
            im[i + k] = (y * re[k] + x * im[k]) + (y + im[k]);
        }
        i *= 2;
    }
    for v in re[..h].iter_mut() {
        *v = T::one() + *v;
    }
    for k in h..m {
        re[k] = -re[m - k];
        im[k] = im[m - k];
    }
    for k in 0..m {
        re[m + k] = -re[k];
        im[m + k] = -im[k];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::assert_complex_close;

    #[test]
    fn forward_twiddles_walk_the_unit_circle() {
        const LOG2N: usize = 6;
        let n = 1usize << LOG2N;
        let mut re = vec![0.0f64; n];
        let mut im = vec![0.0f64; n];
        compute_twiddles(LOG2N, LOG2N, &mut re, &mut im, Direction::Forward);

        assert_eq!(re[0], 1.0);
        assert_eq!(im[0], 0.0);
        for k in 0..n {
            let angle = -std::f64::consts::TAU * k as f64 / n as f64;
            assert_complex_close((re[k], im[k]), (angle.cos(), angle.sin()), 1e-14);
        }
    }

    #[test]
    fn inverse_twiddles_conjugate_the_forward_ones() {
        const LOG2N: usize = 5;
        let n = 1usize << LOG2N;
        let (mut fre, mut fim) = (vec![0.0f64; n], vec![0.0f64; n]);
        let (mut ire, mut iim) = (vec![0.0f64; n], vec![0.0f64; n]);
        compute_twiddles(LOG2N, LOG2N, &mut fre, &mut fim, Direction::Forward);
        compute_twiddles(LOG2N, LOG2N, &mut ire, &mut iim, Direction::Inverse);
        for k in 0..n {
            assert_complex_close((ire[k], iim[k]), (fre[k], -fim[k]), 1e-15);
        }
    }

    #[test]
    fn chirp_twiddles_cover_the_full_cycle() {
        for n in [1usize, 3, 5, 6, 7, 13, 100] {
            let count = 2 * n;
            let mut re = vec![0.0f64; count];
            let mut im = vec![0.0f64; count];
            compute_chirp_twiddles(count, &mut re, &mut im, Direction::Forward);
            for k in 0..count {
                let angle = -std::f64::consts::TAU * k as f64 / count as f64;
                assert_complex_close((re[k], im[k]), (angle.cos(), angle.sin()), 1e-13);
            }
        }
    }
}
