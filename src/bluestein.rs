//! Bluestein's algorithm for arbitrary sizes.
//!
//! A DFT of any length `n` becomes a convolution of length `m`, the
//! smallest power of two at least `2n - 1`: the input is premultiplied by
//! the chirp `exp(+-pi*i*k^2/n)`, convolved with the conjugate chirp
//! kernel through two power-of-two FFTs, and postmultiplied by the chirp
//! again. The chirp exponent `k^2 mod 2n` is generated incrementally by
//! adding successive odd numbers, so no squaring overflows and no modulo
//! runs in the loop.
//!
//! One scratch allocation of `4m + 4n` scalars covers the two convolution
//! operands and the `2n` chirp twiddles; it is released on every path out.

use num_complex::Complex;

use crate::errors::{try_vec, FftError};
use crate::scalar::Scalar;
use crate::transform::{run_pot, SrcView};
use crate::twiddles::compute_chirp_twiddles;
use crate::{at, Direction};

/// Destination of a non-power-of-two transform.
pub(crate) enum NpotDst<'a, T> {
    Split {
        re: &'a mut [T],
        re_base: isize,
        re_step: isize,
        im: &'a mut [T],
        im_base: isize,
        im_step: isize,
    },
    Interleaved(&'a mut [Complex<T>]),
}

impl<T: Copy> NpotDst<'_, T> {
    fn get(&self, i: usize) -> (T, T) {
        match self {
            NpotDst::Split {
                re,
                re_base,
                re_step,
                im,
                im_base,
                im_step,
            } => (
                re[at(*re_base, i, *re_step)],
                im[at(*im_base, i, *im_step)],
            ),
            NpotDst::Interleaved(buf) => (buf[i].re, buf[i].im),
        }
    }

    fn set(&mut self, i: usize, value: (T, T)) {
        match self {
            NpotDst::Split {
                re,
                re_base,
                re_step,
                im,
                im_base,
                im_step,
            } => {
                re[at(*re_base, i, *re_step)] = value.0;
                im[at(*im_base, i, *im_step)] = value.1;
            }
            NpotDst::Interleaved(buf) => {
                buf[i] = Complex {
                    re: value.0,
                    im: value.1,
                }
            }
        }
    }
}

/// Allocate the convolution scratch. Returns `(scratch, log2m, m)` with
/// `m` also built up in the scalar type by doubling, so no integer-to-
/// scalar conversion is required of custom element types.
fn npot_scratch<T: Scalar>(n: usize) -> Result<(Vec<T>, usize, T), FftError> {
    let mut log2m = 0usize;
    let mut m_scalar = T::one();
    while (1usize << log2m) < 2 * n - 1 {
        log2m += 1;
        m_scalar = m_scalar + m_scalar;
    }
    let len = 4 * (1usize << log2m) + 4 * n;
    let scratch = try_vec![T::zero(); len];
    Ok((scratch, log2m, m_scalar))
}

/// The convolution itself; `ar`/`ai` in the scratch already hold the
/// input values.
fn npot_run<T: Scalar>(
    n: usize,
    log2m: usize,
    m_scalar: T,
    scratch: &mut [T],
    mut dst: NpotDst<'_, T>,
    direction: Direction,
    scale: T,
) {
    let m = 1usize << log2m;
    let (a, rest) = scratch.split_at_mut(2 * m);
    let (ar, ai) = a.split_at_mut(m);
    let (b, t) = rest.split_at_mut(2 * m);
    let (br, bi) = b.split_at_mut(m);
    let (tr, ti) = t.split_at_mut(2 * n);

    compute_chirp_twiddles(2 * n, tr, ti, direction);

    // Premultiply the input by the chirp and build the reflected kernel.
    let mut j = 0usize;
    for i in 0..n {
        let c = tr[j];
        let s = ti[j];
        let x = ar[i];
        let y = ai[i];
        ar[i] = x * c - y * s;
        ai[i] = x * s + y * c;
        br[i] = c;
        bi[i] = -s;
        if i > 0 {
            br[m - i] = c;
            bi[m - i] = -s;
        }
        j += 2 * i + 1;
        if j >= 2 * n {
            j -= 2 * n;
        }
    }
    for i in n..m {
        ar[i] = T::zero();
        ai[i] = T::zero();
    }
    for i in n..=(m - n) {
        br[i] = T::zero();
        bi[i] = T::zero();
    }

    // The scale factors are (1/m, 1, scale) rather than (1, 1, scale/m);
    // this keeps intermediates in range for limited-range element types.
    run_pot(
        log2m,
        ar,
        0,
        1,
        ai,
        0,
        1,
        None,
        None,
        Direction::Forward,
        T::one() / m_scalar,
    );
    run_pot(log2m, br, 0, 1, bi, 0, 1, None, None, Direction::Forward, T::one());
    for i in 0..m {
        let c = br[i];
        let s = bi[i];
        let x = ar[i];
        let y = ai[i];
        ar[i] = c * x - s * y;
        ai[i] = c * y + s * x;
    }
    run_pot(log2m, ar, 0, 1, ai, 0, 1, None, None, Direction::Inverse, scale);

    // Postmultiply by the chirp into the strided destination.
    let mut j = 0usize;
    for i in 0..n {
        let c = tr[j];
        let s = ti[j];
        let x = ar[i];
        let y = ai[i];
        dst.set(i, (c * x - s * y, c * y + s * x));
        j += 2 * i + 1;
        if j >= 2 * n {
            j -= 2 * n;
        }
    }
}

/// Out-of-place non-power-of-two transform.
pub(crate) fn fft_npot_out<T: Scalar>(
    n: usize,
    src_re: SrcView<'_, T>,
    src_im: SrcView<'_, T>,
    dst: NpotDst<'_, T>,
    direction: Direction,
    scale: T,
) -> Result<(), FftError> {
    let (mut scratch, log2m, m_scalar) = npot_scratch::<T>(n)?;
    {
        let m = 1usize << log2m;
        let (ar, rest) = scratch.split_at_mut(m);
        let ai = &mut rest[..m];
        for i in 0..n {
            ar[i] = src_re.get(i);
            ai[i] = src_im.get(i);
        }
    }
    npot_run(n, log2m, m_scalar, &mut scratch, dst, direction, scale);
    Ok(())
}

/// In-place non-power-of-two transform; the destination holds the input.
pub(crate) fn fft_npot_in_place<T: Scalar>(
    n: usize,
    dst: NpotDst<'_, T>,
    direction: Direction,
    scale: T,
) -> Result<(), FftError> {
    let (mut scratch, log2m, m_scalar) = npot_scratch::<T>(n)?;
    {
        let m = 1usize << log2m;
        let (ar, rest) = scratch.split_at_mut(m);
        let ai = &mut rest[..m];
        for i in 0..n {
            let (x, y) = dst.get(i);
            ar[i] = x;
            ai[i] = y;
        }
    }
    npot_run(n, log2m, m_scalar, &mut scratch, dst, direction, scale);
    Ok(())
}
