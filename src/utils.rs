//! Error metrics and assertions shared by the unit tests, all phrased over
//! split-layout complex signals.

use std::fmt::Display;

use num_traits::Float;

/// Asserts that a complex sample matches the expected value in both
/// components.
#[allow(dead_code)]
#[track_caller]
pub(crate) fn assert_complex_close<T: Float + Display>(got: (T, T), want: (T, T), epsilon: T) {
    if !((got.0 - want.0).abs() < epsilon && (got.1 - want.1).abs() < epsilon) {
        panic!(
            "Assertion failed: ({}, {}) too far from expected value ({}, {}) (with epsilon {})",
            got.0, got.1, want.0, want.1, epsilon
        );
    }
}

/// Root-mean-square magnitude of a split-layout signal.
#[allow(dead_code)]
pub(crate) fn rms<T: Float>(re: &[T], im: &[T]) -> T {
    let n = T::from(re.len().max(1)).unwrap();
    let sum = re
        .iter()
        .zip(im.iter())
        .fold(T::zero(), |acc, (&r, &i)| acc + r * r + i * i);
    (sum / n).sqrt()
}

/// RMS of the pointwise difference between two split-layout signals.
#[allow(dead_code)]
pub(crate) fn rms_error<T: Float>(a_re: &[T], a_im: &[T], b_re: &[T], b_im: &[T]) -> T {
    let n = T::from(a_re.len().max(1)).unwrap();
    let sum = a_re
        .iter()
        .zip(a_im.iter())
        .zip(b_re.iter().zip(b_im.iter()))
        .fold(T::zero(), |acc, ((&ar, &ai), (&br, &bi))| {
            acc + (ar - br) * (ar - br) + (ai - bi) * (ai - bi)
        });
    (sum / n).sqrt()
}
