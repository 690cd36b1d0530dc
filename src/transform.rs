//! Argument validation, layout handling and the power-of-two pipeline.
//!
//! Every public entry point normalizes its arguments into strided stream
//! views, dispatches on the size (power of two runs the permutation plus
//! butterfly pipeline directly, everything else goes through the Bluestein
//! convolution), and applies the final scaling. The scale `ONE`
//! short-circuits the multiplication pass.
//!
//! Interleaved destinations are viewed as a scalar buffer of twice the
//! length and temporarily deinterleaved through three bit-reversal-based
//! shuffles, so the butterflies always run on separate real/imaginary
//! halves; the shuffles are pure permutations and the results match the
//! split-array entry points exactly.

use num_complex::Complex;

use crate::bitrev::{broadcast, permute_copy, permute_in_place};
use crate::bluestein::NpotDst;
#[cfg(feature = "npot")]
use crate::bluestein::{fft_npot_in_place, fft_npot_out};
use crate::butterfly::butterfly;
use crate::errors::FftError;
use crate::scalar::Scalar;
use crate::{at, Direction, TMP_BUF_SIZE};

/// One strided input stream of a transform.
#[derive(Clone, Copy)]
pub enum Source<'a, T> {
    /// An endless run of zeros; the absent-source case.
    Zero,
    /// Every logical element reads the same value.
    Constant(T),
    /// `data[k * stride]` for logical element `k`. A zero stride reads
    /// `data[0]` everywhere; a negative stride walks backwards, with
    /// logical element 0 at the far end of the slice.
    Strided { data: &'a [T], stride: isize },
}

/// A validated source stream.
#[derive(Clone, Copy)]
pub(crate) enum SrcView<'a, T> {
    Constant(T),
    Slice { data: &'a [T], base: isize, step: isize },
}

impl<T: Copy> SrcView<'_, T> {
    pub(crate) fn get(&self, i: usize) -> T {
        match *self {
            SrcView::Constant(v) => v,
            SrcView::Slice { data, base, step } => data[at(base, i, step)],
        }
    }
}

/// Validate a destination stride pattern; returns the base index of
/// logical element 0.
fn stream_base(n: usize, stride: isize, len: usize) -> Result<isize, FftError> {
    if stride == 0 {
        return Err(FftError::InvalidStride(0));
    }
    let span = (n - 1)
        .checked_mul(stride.unsigned_abs())
        .and_then(|s| s.checked_add(1))
        .ok_or(FftError::InvalidStride(stride))?;
    if span > len {
        return Err(FftError::BufferTooSmall(len, span));
    }
    Ok(if stride < 0 {
        (n - 1) as isize * -stride
    } else {
        0
    })
}

fn resolve_source<T: Scalar>(src: Source<'_, T>, n: usize) -> Result<SrcView<'_, T>, FftError> {
    match src {
        Source::Zero => Ok(SrcView::Constant(T::zero())),
        Source::Constant(v) => Ok(SrcView::Constant(v)),
        Source::Strided { data, stride } => {
            if stride == 0 {
                if data.is_empty() {
                    return Err(FftError::BufferTooSmall(0, 1));
                }
                return Ok(SrcView::Constant(data[0]));
            }
            let base = stream_base(n, stride, data.len())?;
            Ok(SrcView::Slice {
                data,
                base,
                step: stride,
            })
        }
    }
}

fn contiguous_source<'a, T: Scalar>(
    src: Option<&'a [T]>,
    n: usize,
) -> Result<SrcView<'a, T>, FftError> {
    match src {
        None => Ok(SrcView::Constant(T::zero())),
        Some(s) => {
            if s.len() != n {
                return Err(FftError::MismatchedLength(n, s.len()));
            }
            Ok(SrcView::Slice {
                data: s,
                base: 0,
                step: 1,
            })
        }
    }
}

/// The interleaved layout as a scalar slice of twice the length.
///
/// `Complex<T>` is `repr(C)` with the real part first; num-complex
/// documents the cast as sound.
fn complex_scalars<T>(c: &[Complex<T>]) -> &[T] {
    unsafe { std::slice::from_raw_parts(c.as_ptr() as *const T, c.len() * 2) }
}

fn complex_scalars_mut<T>(c: &mut [Complex<T>]) -> &mut [T] {
    unsafe { std::slice::from_raw_parts_mut(c.as_mut_ptr() as *mut T, c.len() * 2) }
}

/// Power-of-two pipeline on split destination streams.
///
/// `src_*` of `None` means the destination already holds the input.
#[allow(clippy::too_many_arguments)]
pub(crate) fn run_pot<T: Scalar>(
    log2n: usize,
    re: &mut [T],
    re_base: isize,
    re_step: isize,
    im: &mut [T],
    im_base: isize,
    im_step: isize,
    src_re: Option<SrcView<'_, T>>,
    src_im: Option<SrcView<'_, T>>,
    direction: Direction,
    scale: T,
) {
    let n = 1usize << log2n;
    let mut tmp = [T::zero(); TMP_BUF_SIZE];
    match src_re {
        None => permute_in_place(log2n, re, re_base, re_step, &mut tmp),
        Some(SrcView::Constant(v)) => broadcast(n, v, re, re_base, re_step),
        Some(SrcView::Slice { data, base, step }) => {
            permute_copy(log2n, data, base, step, re, re_base, re_step, &mut tmp)
        }
    }
    match src_im {
        None => permute_in_place(log2n, im, im_base, im_step, &mut tmp),
        Some(SrcView::Constant(v)) => broadcast(n, v, im, im_base, im_step),
        Some(SrcView::Slice { data, base, step }) => {
            permute_copy(log2n, data, base, step, im, im_base, im_step, &mut tmp)
        }
    }
    butterfly(
        log2n, re, im, re_base, im_base, re_step, im_step, direction, &mut tmp,
    );
    if scale != T::one() {
        for i in 0..n {
            re[at(re_base, i, re_step)] = re[at(re_base, i, re_step)] * scale;
            im[at(im_base, i, im_step)] = im[at(im_base, i, im_step)] * scale;
        }
    }
}

/// Deinterleave `[r0 i0 r1 i1 ..]` into `[r0 r1 .. | i0 i1 ..]` in place.
///
/// This is a bit-reversal permutation of the whole array followed by one
/// of each half; small arrays go through the scratch buffer instead.
pub(crate) fn deinterleave<T: Scalar>(data: &mut [T], log2len: usize, tmp: &mut [T]) {
    let len = 1usize << log2len;
    let h = len >> 1;
    if len <= 2 {
        return;
    }
    if len <= TMP_BUF_SIZE {
        for i in 0..h {
            tmp[i] = data[2 * i];
            tmp[h + i] = data[2 * i + 1];
        }
        data[..len].copy_from_slice(&tmp[..len]);
        return;
    }
    permute_in_place(log2len, data, 0, 1, tmp);
    permute_in_place(log2len - 1, data, 0, 1, tmp);
    permute_in_place(log2len - 1, data, h as isize, 1, tmp);
}

/// Inverse of [`deinterleave`].
pub(crate) fn interleave<T: Scalar>(data: &mut [T], log2len: usize, tmp: &mut [T]) {
    let len = 1usize << log2len;
    let h = len >> 1;
    if len <= 2 {
        return;
    }
    if len <= TMP_BUF_SIZE {
        for i in 0..h {
            tmp[2 * i] = data[i];
            tmp[2 * i + 1] = data[h + i];
        }
        data[..len].copy_from_slice(&tmp[..len]);
        return;
    }
    permute_in_place(log2len - 1, data, 0, 1, tmp);
    permute_in_place(log2len - 1, data, h as isize, 1, tmp);
    permute_in_place(log2len, data, 0, 1, tmp);
}

/// Power-of-two pipeline on an interleaved destination buffer of `2n`
/// scalars.
fn run_pot_interleaved<T: Scalar>(
    log2n: usize,
    buf: &mut [T],
    src_re: Option<SrcView<'_, T>>,
    src_im: Option<SrcView<'_, T>>,
    direction: Direction,
    scale: T,
) {
    let n = 1usize << log2n;
    let mut tmp = [T::zero(); TMP_BUF_SIZE];
    match src_re {
        None => permute_in_place(log2n, buf, 0, 2, &mut tmp),
        Some(SrcView::Constant(v)) => broadcast(n, v, buf, 0, 2),
        Some(SrcView::Slice { data, base, step }) => {
            permute_copy(log2n, data, base, step, buf, 0, 2, &mut tmp)
        }
    }
    match src_im {
        None => permute_in_place(log2n, buf, 1, 2, &mut tmp),
        Some(SrcView::Constant(v)) => broadcast(n, v, buf, 1, 2),
        Some(SrcView::Slice { data, base, step }) => {
            permute_copy(log2n, data, base, step, buf, 1, 2, &mut tmp)
        }
    }
    deinterleave(buf, log2n + 1, &mut tmp);
    {
        let (re, im) = buf.split_at_mut(n);
        butterfly(log2n, re, im, 0, 0, 1, 1, direction, &mut tmp);
    }
    interleave(buf, log2n + 1, &mut tmp);
    if scale != T::one() {
        for v in buf.iter_mut() {
            *v = *v * scale;
        }
    }
}

/// Transform of split contiguous arrays; `None` sources read as zeros.
///
/// `dst_re.len()` is the transform size.
pub fn fft<T: Scalar>(
    src_re: Option<&[T]>,
    src_im: Option<&[T]>,
    dst_re: &mut [T],
    dst_im: &mut [T],
    direction: Direction,
    scale: T,
) -> Result<(), FftError> {
    let n = dst_re.len();
    if dst_im.len() != n {
        return Err(FftError::MismatchedLength(n, dst_im.len()));
    }
    if n == 0 {
        return Ok(());
    }
    let sre = contiguous_source(src_re, n)?;
    let sim = contiguous_source(src_im, n)?;
    if n.is_power_of_two() {
        run_pot(
            n.trailing_zeros() as usize,
            dst_re,
            0,
            1,
            dst_im,
            0,
            1,
            Some(sre),
            Some(sim),
            direction,
            scale,
        );
        Ok(())
    } else {
        let dst = NpotDst::Split {
            re: dst_re,
            re_base: 0,
            re_step: 1,
            im: dst_im,
            im_base: 0,
            im_step: 1,
        };
        #[cfg(feature = "npot")]
        {
            fft_npot_out(n, sre, sim, dst, direction, scale)
        }
        #[cfg(not(feature = "npot"))]
        {
            let _ = (sre, sim, dst);
            Err(FftError::UnsupportedSize(n))
        }
    }
}

/// In-place transform of split contiguous arrays.
pub fn fft_in_place<T: Scalar>(
    re: &mut [T],
    im: &mut [T],
    direction: Direction,
    scale: T,
) -> Result<(), FftError> {
    let n = re.len();
    if im.len() != n {
        return Err(FftError::MismatchedLength(n, im.len()));
    }
    if n == 0 {
        return Ok(());
    }
    if n.is_power_of_two() {
        run_pot(
            n.trailing_zeros() as usize,
            re,
            0,
            1,
            im,
            0,
            1,
            None,
            None,
            direction,
            scale,
        );
        Ok(())
    } else {
        let dst = NpotDst::Split {
            re,
            re_base: 0,
            re_step: 1,
            im,
            im_base: 0,
            im_step: 1,
        };
        #[cfg(feature = "npot")]
        {
            fft_npot_in_place(n, dst, direction, scale)
        }
        #[cfg(not(feature = "npot"))]
        {
            let _ = dst;
            Err(FftError::UnsupportedSize(n))
        }
    }
}

/// Transform of interleaved complex arrays; a `None` source reads as zeros.
pub fn fft_interleaved<T: Scalar>(
    src: Option<&[Complex<T>]>,
    dst: &mut [Complex<T>],
    direction: Direction,
    scale: T,
) -> Result<(), FftError> {
    let n = dst.len();
    if n == 0 {
        return Ok(());
    }
    if let Some(s) = src {
        if s.len() != n {
            return Err(FftError::MismatchedLength(n, s.len()));
        }
    }
    let (sre, sim) = match src {
        None => (
            SrcView::Constant(T::zero()),
            SrcView::Constant(T::zero()),
        ),
        Some(s) => {
            let view = complex_scalars(s);
            (
                SrcView::Slice {
                    data: view,
                    base: 0,
                    step: 2,
                },
                SrcView::Slice {
                    data: view,
                    base: 1,
                    step: 2,
                },
            )
        }
    };
    if n.is_power_of_two() {
        run_pot_interleaved(
            n.trailing_zeros() as usize,
            complex_scalars_mut(dst),
            Some(sre),
            Some(sim),
            direction,
            scale,
        );
        Ok(())
    } else {
        let dst = NpotDst::Interleaved(dst);
        #[cfg(feature = "npot")]
        {
            fft_npot_out(n, sre, sim, dst, direction, scale)
        }
        #[cfg(not(feature = "npot"))]
        {
            let _ = (sre, sim, dst);
            Err(FftError::UnsupportedSize(n))
        }
    }
}

/// In-place transform of an interleaved complex array.
pub fn fft_interleaved_in_place<T: Scalar>(
    dst: &mut [Complex<T>],
    direction: Direction,
    scale: T,
) -> Result<(), FftError> {
    let n = dst.len();
    if n == 0 {
        return Ok(());
    }
    if n.is_power_of_two() {
        run_pot_interleaved(
            n.trailing_zeros() as usize,
            complex_scalars_mut(dst),
            None,
            None,
            direction,
            scale,
        );
        Ok(())
    } else {
        let dst = NpotDst::Interleaved(dst);
        #[cfg(feature = "npot")]
        {
            fft_npot_in_place(n, dst, direction, scale)
        }
        #[cfg(not(feature = "npot"))]
        {
            let _ = dst;
            Err(FftError::UnsupportedSize(n))
        }
    }
}

/// Transform with independent strides on every stream.
///
/// Destination strides must be nonzero and their spans must fit the
/// slices; sources follow the [`Source`] rules.
#[allow(clippy::too_many_arguments)]
pub fn fft_strided<T: Scalar>(
    n: usize,
    src_re: Source<'_, T>,
    src_im: Source<'_, T>,
    dst_re: &mut [T],
    dst_re_stride: isize,
    dst_im: &mut [T],
    dst_im_stride: isize,
    direction: Direction,
    scale: T,
) -> Result<(), FftError> {
    if n == 0 {
        return Ok(());
    }
    let re_base = stream_base(n, dst_re_stride, dst_re.len())?;
    let im_base = stream_base(n, dst_im_stride, dst_im.len())?;
    let sre = resolve_source(src_re, n)?;
    let sim = resolve_source(src_im, n)?;
    if n.is_power_of_two() {
        run_pot(
            n.trailing_zeros() as usize,
            dst_re,
            re_base,
            dst_re_stride,
            dst_im,
            im_base,
            dst_im_stride,
            Some(sre),
            Some(sim),
            direction,
            scale,
        );
        Ok(())
    } else {
        let dst = NpotDst::Split {
            re: dst_re,
            re_base,
            re_step: dst_re_stride,
            im: dst_im,
            im_base,
            im_step: dst_im_stride,
        };
        #[cfg(feature = "npot")]
        {
            fft_npot_out(n, sre, sim, dst, direction, scale)
        }
        #[cfg(not(feature = "npot"))]
        {
            let _ = (sre, sim, dst);
            Err(FftError::UnsupportedSize(n))
        }
    }
}

/// In-place transform with independent strides on both streams.
pub fn fft_strided_in_place<T: Scalar>(
    n: usize,
    re: &mut [T],
    re_stride: isize,
    im: &mut [T],
    im_stride: isize,
    direction: Direction,
    scale: T,
) -> Result<(), FftError> {
    if n == 0 {
        return Ok(());
    }
    let re_base = stream_base(n, re_stride, re.len())?;
    let im_base = stream_base(n, im_stride, im.len())?;
    if n.is_power_of_two() {
        run_pot(
            n.trailing_zeros() as usize,
            re,
            re_base,
            re_stride,
            im,
            im_base,
            im_stride,
            None,
            None,
            direction,
            scale,
        );
        Ok(())
    } else {
        let dst = NpotDst::Split {
            re,
            re_base,
            re_step: re_stride,
            im,
            im_base,
            im_step: im_stride,
        };
        #[cfg(feature = "npot")]
        {
            fft_npot_in_place(n, dst, direction, scale)
        }
        #[cfg(not(feature = "npot"))]
        {
            let _ = dst;
            Err(FftError::UnsupportedSize(n))
        }
    }
}
