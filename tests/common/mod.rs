//! Shared helpers for the integration suites.

use chirpfft::Direction;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// O(n^2) DFT straight from the definition; the reference oracle.
#[allow(dead_code)]
pub fn naive_dft(re: &[f64], im: &[f64], direction: Direction) -> (Vec<f64>, Vec<f64>) {
    let n = re.len();
    let sign = match direction {
        Direction::Forward => -1.0,
        Direction::Inverse => 1.0,
    };
    let mut out_re = vec![0.0; n];
    let mut out_im = vec![0.0; n];
    for j in 0..n {
        let mut acc_re = 0.0;
        let mut acc_im = 0.0;
        for k in 0..n {
            let angle = sign * std::f64::consts::TAU * ((j * k) % n) as f64 / n as f64;
            let (s, c) = angle.sin_cos();
            acc_re += re[k] * c - im[k] * s;
            acc_im += re[k] * s + im[k] * c;
        }
        out_re[j] = acc_re;
        out_im[j] = acc_im;
    }
    (out_re, out_im)
}

#[allow(dead_code)]
pub fn random_signal(n: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let re = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let im = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
    (re, im)
}

#[allow(dead_code)]
pub fn rms(re: &[f64], im: &[f64]) -> f64 {
    let n = re.len().max(1);
    let sum: f64 = re
        .iter()
        .zip(im.iter())
        .map(|(r, i)| r * r + i * i)
        .sum();
    (sum / n as f64).sqrt()
}

#[allow(dead_code)]
pub fn rms_error(a_re: &[f64], a_im: &[f64], b_re: &[f64], b_im: &[f64]) -> f64 {
    let n = a_re.len().max(1);
    let sum: f64 = a_re
        .iter()
        .zip(a_im.iter())
        .zip(b_re.iter().zip(b_im.iter()))
        .map(|((ar, ai), (br, bi))| (ar - br) * (ar - br) + (ai - bi) * (ai - bi))
        .sum();
    (sum / n as f64).sqrt()
}

#[allow(dead_code)]
#[track_caller]
pub fn assert_close(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "{actual} too far from {expected} (epsilon {epsilon})"
    );
}
