//! Complex FFT for inputs of any size.
//!
//! The forward discrete Fourier transform (DFT) of a sequence `X` of `N`
//! complex numbers is defined here as
//!
//! ```text
//! Y[j] = scale * sum(X[k] * exp(-2*pi*i*j*k/N), 0 <= k < N)
//! ```
//!
//! and the inverse (IDFT) as
//!
//! ```text
//! X[k] = scale * sum(Y[j] * exp(+2*pi*i*j*k/N), 0 <= j < N)
//! ```
//!
//! with a real scaling factor of choice in each direction. With
//! `scale = 1` both ways, `IDFT(DFT(X)) = N * X`. Popular pairings are
//! `(1, 1/N)`, `(1/N, 1)` and `(1/sqrt(N), 1/sqrt(N))`; this crate simply
//! takes the desired scale explicitly and skips the multiplication pass
//! entirely when it is one.
//!
//! Power-of-two sizes run a radix-2 decimation-in-time Cooley-Tukey
//! pipeline: an explicit bit-reversal permutation (the only step that
//! reads the source) followed by a cache-aware butterfly schedule, with
//! vectorized inner passes selected at runtime from the CPU feature mask.
//! Every other size is reduced to a power-of-two convolution with
//! Bluestein's algorithm. Heap allocation happens only on that Bluestein
//! path; power-of-two transforms touch nothing but the caller's buffers
//! and a small stack scratch.
//!
//! Three layouts are supported, each in-place or out-of-place: split
//! real/imaginary slices, interleaved [`num_complex::Complex`] slices,
//! and independently strided streams (strides may be negative; a source
//! may be absent, reading as zeros). See [`fft`], [`fft_interleaved`] and
//! [`fft_strided`].
//!
//! ```
//! use chirpfft::{fft_in_place, Direction};
//!
//! let mut reals = vec![1.0f64, 1.0, 1.0, 1.0];
//! let mut imags = vec![0.0f64; 4];
//! fft_in_place(&mut reals, &mut imags, Direction::Forward, 1.0)?;
//! assert_eq!(reals[0], 4.0);
//! # Ok::<(), chirpfft::FftError>(())
//! ```
//!
//! Observed accuracy is `RMS(error) < C * eps * RMS(output) * log2(N)`
//! with `C = 0.5` for powers of two and `C = 1` otherwise, where `eps` is
//! the ULP of one in the element type.

mod bitrev;
mod bluestein;
mod butterfly;
mod errors;
mod scalar;
#[cfg(feature = "simd")]
pub mod simd;
mod transform;
mod twiddles;
#[cfg(test)]
mod utils;

pub use errors::FftError;
pub use scalar::Scalar;
pub use transform::{
    fft, fft_in_place, fft_interleaved, fft_interleaved_in_place, fft_strided,
    fft_strided_in_place, Source,
};

pub use num_complex;

/// Transform direction: the sign of the exponent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Negative exponent, `exp(-2*pi*i*j*k/N)`.
    Forward,
    /// Positive exponent, `exp(+2*pi*i*j*k/N)`.
    Inverse,
}

/// Log2 of the per-call stack scratch, in scalar elements. The scratch
/// holds the twiddle buffer (both halves) during butterflies and the tile
/// buffer during blocked bit reversal.
pub(crate) const TMP_BUF_LOG2: usize = 10;
pub(crate) const TMP_BUF_SIZE: usize = 1 << TMP_BUF_LOG2;
pub(crate) const TWIDDLE_BUF_LOG2: usize = TMP_BUF_LOG2 - 1;
pub(crate) const TWIDDLE_BUF_SIZE: usize = 1 << TWIDDLE_BUF_LOG2;

/// Tile bits for the blocked in-place bit reversal; a `2^Q x 2^Q` tile
/// must fit in the scratch.
pub(crate) const Q: usize = if TMP_BUF_LOG2 / 2 < 6 {
    TMP_BUF_LOG2 / 2
} else {
    6
};

const _: () = assert!(TMP_BUF_LOG2 >= 2);
const _: () = assert!(Q >= 1 && 2 * Q <= TMP_BUF_LOG2);

/// Physical index of logical element `i` in a strided stream.
#[inline(always)]
pub(crate) fn at(base: isize, i: usize, step: isize) -> usize {
    (base + i as isize * step) as usize
}
