//! Error type returned by the transform entry points.
//!
//! The engine never panics on caller mistakes; every entry point validates
//! its arguments up front and reports problems as values. Once validation
//! has passed, the remaining work is pure arithmetic and cannot fail, with
//! the single exception of the Bluestein scratch allocation.

use std::error::Error;
use std::fmt::Formatter;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FftError {
    /// The Bluestein scratch buffer could not be allocated.
    OutOfMemory(usize),
    /// Two arrays that must describe the same signal have different lengths.
    MismatchedLength(usize, usize),
    /// A destination stride of zero, or a stride whose span leaves the slice.
    InvalidStride(isize),
    /// A slice is too short for the requested number of elements.
    BufferTooSmall(usize, usize),
    /// Non-power-of-two size with the `npot` feature disabled.
    UnsupportedSize(usize),
}

impl Error for FftError {}

impl std::fmt::Display for FftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FftError::OutOfMemory(length) => {
                f.write_fmt(format_args!("cannot allocate {length} scratch elements"))
            }
            FftError::MismatchedLength(s0, s1) => f.write_fmt(format_args!(
                "arrays of the same signal have lengths {s0} and {s1}"
            )),
            FftError::InvalidStride(stride) => f.write_fmt(format_args!(
                "stride {stride} is zero or walks outside the buffer"
            )),
            FftError::BufferTooSmall(len, needed) => f.write_fmt(format_args!(
                "buffer holds {len} elements but the stride pattern touches {needed}"
            )),
            FftError::UnsupportedSize(n) => f.write_fmt(format_args!(
                "size {n} is not a power of two and non-power-of-two support is disabled"
            )),
        }
    }
}

macro_rules! try_vec {
    ($elem:expr; $n:expr) => {{
        let mut v = Vec::new();
        v.try_reserve_exact($n)
            .map_err(|_| crate::errors::FftError::OutOfMemory($n))?;
        v.resize($n, $elem);
        v
    }};
}

pub(crate) use try_vec;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_size() {
        let err = FftError::UnsupportedSize(48);
        assert!(err.to_string().contains("48"));
    }
}
