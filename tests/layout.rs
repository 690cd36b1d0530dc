//! Layout contracts: stride invariance, zero/constant sources, interleaved
//! versus split equivalence, in-place versus out-of-place.

mod common;

use chirpfft::num_complex::Complex;
use chirpfft::{
    fft, fft_in_place, fft_interleaved, fft_interleaved_in_place, fft_strided,
    fft_strided_in_place, Direction, FftError, Source,
};
use common::{assert_close, random_signal};

/// Contiguous reference output for a given signal.
fn reference(re: &[f64], im: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = re.len();
    let mut out_re = vec![0.0; n];
    let mut out_im = vec![0.0; n];
    fft(
        Some(re),
        Some(im),
        &mut out_re,
        &mut out_im,
        Direction::Forward,
        1.0,
    )
    .unwrap();
    (out_re, out_im)
}

#[test]
fn strided_destinations_hold_the_contiguous_values() {
    for &n in &[64usize, 20] {
        let (src_re, src_im) = random_signal(n, 11 + n as u64);
        let (want_re, want_im) = reference(&src_re, &src_im);

        for &(rs, is) in &[(1isize, 1isize), (2, 3), (3, 1), (5, 2)] {
            let mut dst_re = vec![f64::NAN; n * rs as usize];
            let mut dst_im = vec![f64::NAN; n * is as usize];
            fft_strided(
                n,
                Source::Strided {
                    data: &src_re,
                    stride: 1,
                },
                Source::Strided {
                    data: &src_im,
                    stride: 1,
                },
                &mut dst_re,
                rs,
                &mut dst_im,
                is,
                Direction::Forward,
                1.0,
            )
            .unwrap();
            for i in 0..n {
                assert_close(dst_re[i * rs as usize], want_re[i], 1e-12);
                assert_close(dst_im[i * is as usize], want_im[i], 1e-12);
            }
        }
    }
}

#[test]
fn negative_destination_stride_writes_backwards() {
    let n = 32usize;
    let (src_re, src_im) = random_signal(n, 5);
    let (want_re, want_im) = reference(&src_re, &src_im);

    let mut dst_re = vec![0.0f64; n];
    let mut dst_im = vec![0.0f64; n];
    fft_strided(
        n,
        Source::Strided {
            data: &src_re,
            stride: 1,
        },
        Source::Strided {
            data: &src_im,
            stride: 1,
        },
        &mut dst_re,
        -1,
        &mut dst_im,
        1,
        Direction::Forward,
        1.0,
    )
    .unwrap();
    for i in 0..n {
        assert_close(dst_re[n - 1 - i], want_re[i], 1e-12);
        assert_close(dst_im[i], want_im[i], 1e-12);
    }
}

#[test]
fn strided_source_reads_the_logical_positions() {
    let n = 16usize;
    let (logical_re, logical_im) = random_signal(n, 23);
    let (want_re, want_im) = reference(&logical_re, &logical_im);

    // Source spread over every third slot, imaginary reversed.
    let mut sparse_re = vec![0.0f64; 3 * n];
    let mut rev_im = vec![0.0f64; n];
    for i in 0..n {
        sparse_re[3 * i] = logical_re[i];
        rev_im[n - 1 - i] = logical_im[i];
    }

    let mut dst_re = vec![0.0f64; n];
    let mut dst_im = vec![0.0f64; n];
    fft_strided(
        n,
        Source::Strided {
            data: &sparse_re,
            stride: 3,
        },
        Source::Strided {
            data: &rev_im,
            stride: -1,
        },
        &mut dst_re,
        1,
        &mut dst_im,
        1,
        Direction::Forward,
        1.0,
    )
    .unwrap();
    for i in 0..n {
        assert_close(dst_re[i], want_re[i], 1e-12);
        assert_close(dst_im[i], want_im[i], 1e-12);
    }
}

#[test]
fn absent_source_transforms_to_zero() {
    for &n in &[8usize, 12] {
        let mut dst_re = vec![f64::NAN; n];
        let mut dst_im = vec![f64::NAN; n];
        fft(
            None,
            None,
            &mut dst_re,
            &mut dst_im,
            Direction::Forward,
            1.0,
        )
        .unwrap();
        for i in 0..n {
            assert_eq!(dst_re[i], 0.0);
            assert_eq!(dst_im[i], 0.0);
        }
    }
}

#[test]
fn constant_source_is_a_scaled_dc_spike() {
    let m = 1.25f64;
    for &n in &[16usize, 10] {
        let mut dst_re = vec![0.0f64; n];
        let mut dst_im = vec![0.0f64; n];
        fft_strided(
            n,
            Source::Constant(m),
            Source::Zero,
            &mut dst_re,
            1,
            &mut dst_im,
            1,
            Direction::Forward,
            1.0,
        )
        .unwrap();
        assert_close(dst_re[0], n as f64 * m, 1e-11);
        assert_close(dst_im[0], 0.0, 1e-11);
        for i in 1..n {
            assert_close(dst_re[i], 0.0, 1e-11);
            assert_close(dst_im[i], 0.0, 1e-11);
        }
    }
}

#[test]
fn interleaved_matches_split_exactly() {
    for &n in &[4usize, 16, 256, 2048, 20, 100] {
        let (src_re, src_im) = random_signal(n, 31 + n as u64);
        let (want_re, want_im) = reference(&src_re, &src_im);

        let src: Vec<Complex<f64>> = src_re
            .iter()
            .zip(src_im.iter())
            .map(|(&re, &im)| Complex { re, im })
            .collect();
        let mut dst = vec![Complex::default(); n];
        fft_interleaved(Some(&src), &mut dst, Direction::Forward, 1.0).unwrap();
        for i in 0..n {
            assert_eq!(dst[i].re, want_re[i], "n {n} re[{i}]");
            assert_eq!(dst[i].im, want_im[i], "n {n} im[{i}]");
        }

        // And the in-place interleaved entry.
        let mut buf = src.clone();
        fft_interleaved_in_place(&mut buf, Direction::Forward, 1.0).unwrap();
        for i in 0..n {
            assert_eq!(buf[i].re, want_re[i]);
            assert_eq!(buf[i].im, want_im[i]);
        }
    }
}

#[test]
fn in_place_matches_out_of_place_exactly() {
    for &n in &[64usize, 48] {
        let (src_re, src_im) = random_signal(n, 77);
        let (want_re, want_im) = reference(&src_re, &src_im);

        let mut re = src_re.clone();
        let mut im = src_im.clone();
        fft_in_place(&mut re, &mut im, Direction::Forward, 1.0).unwrap();
        assert_eq!(re, want_re, "n {n}");
        assert_eq!(im, want_im, "n {n}");
    }
}

#[test]
fn strided_in_place_matches_contiguous() {
    for &n in &[32usize, 20] {
        let (src_re, src_im) = random_signal(n, 99);
        let (want_re, want_im) = reference(&src_re, &src_im);

        let mut re = vec![0.0f64; 2 * n];
        let mut im = vec![0.0f64; 2 * n];
        for i in 0..n {
            re[2 * i] = src_re[i];
            im[2 * i] = src_im[i];
        }
        fft_strided_in_place(n, &mut re, 2, &mut im, 2, Direction::Forward, 1.0).unwrap();
        for i in 0..n {
            assert_close(re[2 * i], want_re[i], 1e-12);
            assert_close(im[2 * i], want_im[i], 1e-12);
        }
    }
}

#[test]
fn zero_sized_calls_touch_nothing() {
    let mut empty_re: Vec<f64> = vec![];
    let mut empty_im: Vec<f64> = vec![];
    assert_eq!(
        fft_in_place(&mut empty_re, &mut empty_im, Direction::Forward, 1.0),
        Ok(())
    );
    let mut empty: Vec<Complex<f64>> = vec![];
    assert_eq!(
        fft_interleaved_in_place(&mut empty, Direction::Inverse, 1.0),
        Ok(())
    );
    assert_eq!(
        fft_strided(
            0,
            Source::<f64>::Zero,
            Source::Zero,
            &mut empty_re,
            1,
            &mut empty_im,
            1,
            Direction::Forward,
            1.0,
        ),
        Ok(())
    );
}

#[test]
fn interleaved_source_to_split_reference() {
    // Interleaved inverse matches the split inverse.
    let n = 128usize;
    let (src_re, src_im) = random_signal(n, 123);
    let mut want_re = src_re.clone();
    let mut want_im = src_im.clone();
    fft_in_place(&mut want_re, &mut want_im, Direction::Inverse, 0.5).unwrap();

    let mut buf: Vec<Complex<f64>> = src_re
        .iter()
        .zip(src_im.iter())
        .map(|(&re, &im)| Complex { re, im })
        .collect();
    fft_interleaved_in_place(&mut buf, Direction::Inverse, 0.5).unwrap();
    for i in 0..n {
        assert_eq!(buf[i].re, want_re[i]);
        assert_eq!(buf[i].im, want_im[i]);
    }
}

#[test]
fn oversized_stride_patterns_are_rejected() {
    let mut re = vec![0.0f64; 8];
    let mut im = vec![0.0f64; 8];
    assert_eq!(
        fft_strided(
            8,
            Source::Zero,
            Source::Zero,
            &mut re,
            3,
            &mut im,
            1,
            Direction::Forward,
            1.0,
        ),
        Err(FftError::BufferTooSmall(8, 22))
    );
}
