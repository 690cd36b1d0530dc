//! Numerical contracts: round trips, agreement with the O(n^2) DFT, and
//! the known closed-form spectra.

mod common;

use chirpfft::{fft, fft_in_place, Direction};
use common::{assert_close, naive_dft, random_signal, rms, rms_error};

const EPS: f64 = f64::EPSILON;

const SIZES: &[usize] = &[
    1, 2, 3, 4, 5, 6, 7, 8, 13, 16, 31, 32, 100, 128, 257, 1000, 1024, 4096,
];

#[test]
fn forward_inverse_round_trip() {
    for &n in SIZES {
        let (re0, im0) = random_signal(n, 0xC0FFEE ^ n as u64);
        let (mut re, mut im) = (re0.clone(), im0.clone());
        fft_in_place(&mut re, &mut im, Direction::Forward, 1.0).unwrap();
        fft_in_place(&mut re, &mut im, Direction::Inverse, 1.0 / n as f64).unwrap();

        let log2n = (n as f64).log2().max(1.0);
        let bound = 16.0 * EPS * log2n * rms(&re0, &im0) + 1e-13;
        let err = rms_error(&re, &im, &re0, &im0);
        assert!(err <= bound, "n {n}: round-trip rms {err} above {bound}");
    }
}

#[test]
fn inverse_forward_round_trip() {
    for &n in SIZES {
        let (re0, im0) = random_signal(n, 0xBEEF ^ n as u64);
        let (mut re, mut im) = (re0.clone(), im0.clone());
        fft_in_place(&mut re, &mut im, Direction::Inverse, 1.0).unwrap();
        fft_in_place(&mut re, &mut im, Direction::Forward, 1.0 / n as f64).unwrap();

        let log2n = (n as f64).log2().max(1.0);
        let bound = 16.0 * EPS * log2n * rms(&re0, &im0) + 1e-13;
        let err = rms_error(&re, &im, &re0, &im0);
        assert!(err <= bound, "n {n}: round-trip rms {err} above {bound}");
    }
}

#[test]
fn agrees_with_the_naive_dft() {
    for &n in SIZES.iter().filter(|&&n| n <= 1024) {
        let (src_re, src_im) = random_signal(n, 0xDEAD ^ n as u64);
        let mut got_re = vec![0.0; n];
        let mut got_im = vec![0.0; n];
        fft(
            Some(&src_re),
            Some(&src_im),
            &mut got_re,
            &mut got_im,
            Direction::Forward,
            1.0,
        )
        .unwrap();

        let (want_re, want_im) = naive_dft(&src_re, &src_im, Direction::Forward);
        let err = rms_error(&got_re, &got_im, &want_re, &want_im);
        // The oracle's own accumulation error grows with n, so the bound
        // carries an n term on top of the transform's log2(n) one.
        let bound = EPS * rms(&want_re, &want_im) * (50.0 + n as f64) + 1e-13;
        assert!(err <= bound, "n {n}: rms {err} above {bound}");
    }
}

#[test]
fn inverse_agrees_with_the_naive_idft() {
    for &n in &[4usize, 5, 12, 16, 100] {
        let (src_re, src_im) = random_signal(n, 0xABCD ^ n as u64);
        let mut got_re = vec![0.0; n];
        let mut got_im = vec![0.0; n];
        fft(
            Some(&src_re),
            Some(&src_im),
            &mut got_re,
            &mut got_im,
            Direction::Inverse,
            1.0,
        )
        .unwrap();

        let (want_re, want_im) = naive_dft(&src_re, &src_im, Direction::Inverse);
        let err = rms_error(&got_re, &got_im, &want_re, &want_im);
        let bound = EPS * rms(&want_re, &want_im) * (50.0 + n as f64) + 1e-13;
        assert!(err <= bound, "n {n}: rms {err} above {bound}");
    }
}

#[test]
fn single_element_passes_through() {
    let mut re = [3.0f64];
    let mut im = [-4.0f64];
    fft_in_place(&mut re, &mut im, Direction::Forward, 1.0).unwrap();
    assert_eq!((re[0], im[0]), (3.0, -4.0));
}

#[test]
fn two_point_impulse() {
    let mut re = [1.0f64, 0.0];
    let mut im = [0.0f64, 0.0];
    fft_in_place(&mut re, &mut im, Direction::Forward, 1.0).unwrap();
    assert_eq!(re, [1.0, 1.0]);
    assert_eq!(im, [0.0, 0.0]);
}

#[test]
fn four_point_impulse_and_constant() {
    let mut re = [1.0f64, 0.0, 0.0, 0.0];
    let mut im = [0.0f64; 4];
    fft_in_place(&mut re, &mut im, Direction::Forward, 1.0).unwrap();
    for i in 0..4 {
        assert_close(re[i], 1.0, 1e-15);
        assert_close(im[i], 0.0, 1e-15);
    }

    let mut re = [1.0f64; 4];
    let mut im = [0.0f64; 4];
    fft_in_place(&mut re, &mut im, Direction::Forward, 1.0).unwrap();
    assert_close(re[0], 4.0, 1e-15);
    for i in 1..4 {
        assert_close(re[i], 0.0, 1e-15);
        assert_close(im[i], 0.0, 1e-15);
    }
}

#[test]
fn eight_point_ramp_spectrum() {
    let mut re: Vec<f64> = (1..=8).map(|i| i as f64).collect();
    let mut im = vec![0.0f64; 8];
    fft_in_place(&mut re, &mut im, Direction::Forward, 1.0).unwrap();

    assert_close(re[0], 36.0, 1e-12);
    assert_close(im[0], 0.0, 1e-12);
    assert_close(re[4], -4.0, 1e-12);
    assert_close(im[4], 0.0, 1e-12);
    // Y[1] = -4 + 4*(1 + sqrt(2))*i, and the spectrum of a real signal
    // is conjugate-symmetric.
    assert_close(re[1], -4.0, 1e-12);
    assert_close(im[1], 4.0 * (1.0 + 2.0f64.sqrt()), 1e-12);
    for k in 1..8 {
        assert_close(re[k], re[8 - k], 1e-12);
        assert_close(im[k], -im[8 - k], 1e-12);
    }
}

#[test]
fn five_point_constant_is_a_dc_spike() {
    let mut re = [1.0f64; 5];
    let mut im = [0.0f64; 5];
    fft_in_place(&mut re, &mut im, Direction::Forward, 1.0).unwrap();
    assert_close(re[0], 5.0, 1e-12);
    for i in 1..5 {
        assert_close(re[i], 0.0, 1e-12);
        assert_close(im[i], 0.0, 1e-12);
    }
}

#[test]
fn six_point_tone_is_a_unit_impulse_at_bin_one() {
    let n = 6usize;
    let mut re = vec![0.0f64; n];
    let mut im = vec![0.0f64; n];
    for k in 0..n {
        let angle = std::f64::consts::TAU * k as f64 / n as f64;
        re[k] = angle.cos();
        im[k] = angle.sin();
    }
    fft_in_place(&mut re, &mut im, Direction::Forward, 1.0).unwrap();
    for i in 0..n {
        let want = if i == 1 { n as f64 } else { 0.0 };
        assert_close(re[i], want, 1e-12);
        assert_close(im[i], 0.0, 1e-12);
    }
}

#[test]
fn scale_is_linear() {
    for &n in &[16usize, 20] {
        let (src_re, src_im) = random_signal(n, 7);
        let mut unit_re = vec![0.0; n];
        let mut unit_im = vec![0.0; n];
        fft(
            Some(&src_re),
            Some(&src_im),
            &mut unit_re,
            &mut unit_im,
            Direction::Forward,
            1.0,
        )
        .unwrap();

        let s = 0.3125f64;
        let mut scaled_re = vec![0.0; n];
        let mut scaled_im = vec![0.0; n];
        fft(
            Some(&src_re),
            Some(&src_im),
            &mut scaled_re,
            &mut scaled_im,
            Direction::Forward,
            s,
        )
        .unwrap();

        for i in 0..n {
            assert_close(scaled_re[i], unit_re[i] * s, 1e-11);
            assert_close(scaled_im[i], unit_im[i] * s, 1e-11);
        }
    }
}

#[test]
fn f32_round_trip() {
    for &n in &[8usize, 33, 64, 100] {
        let mut rng_re: Vec<f32> = (0..n).map(|i| ((i * 19 % 41) as f32) / 41.0 - 0.5).collect();
        let mut rng_im: Vec<f32> = (0..n).map(|i| ((i * 11 % 43) as f32) / 43.0 - 0.5).collect();
        let orig_re = rng_re.clone();
        let orig_im = rng_im.clone();
        fft_in_place(&mut rng_re, &mut rng_im, Direction::Forward, 1.0f32).unwrap();
        fft_in_place(&mut rng_re, &mut rng_im, Direction::Inverse, 1.0f32 / n as f32).unwrap();
        for i in 0..n {
            assert!(
                (rng_re[i] - orig_re[i]).abs() < 1e-4,
                "n {n} re[{i}]: {} vs {}",
                rng_re[i],
                orig_re[i]
            );
            assert!((rng_im[i] - orig_im[i]).abs() < 1e-4);
        }
    }
}
