//! Radix-2 decimation-in-time butterfly engine.
//!
//! Input arrives bit-reversed; passes run from block size 2 up to `n`.
//! Twiddles for a pass live in a bounded stack buffer. When a block is
//! larger than the buffer, the pass does not materialize all of its
//! twiddles; instead it recurses over half-blocks, composing a running
//! multiplier pair `(C, S)` with the stored twiddles, so each effective
//! twiddle is still the product of O(log n) factors and the roundoff stays
//! at O(log n) ULP.
//!
//! The bottom three passes fuse into a hand-scheduled radix-8 kernel, and
//! above `log2n = 12` the schedule splits into two recursively transformed
//! halves joined by a single top-level pass, which keeps the working set
//! cache-resident.

use crate::scalar::{cexp, Scalar};
use crate::twiddles::compute_twiddles;
use crate::{at, Direction, TWIDDLE_BUF_LOG2, TWIDDLE_BUF_SIZE};

/// Hand-scheduled (I)FFT of one 8-element block.
///
/// `c` is `sqrt(2)/2`; forward and inverse differ only in the signs of the
/// intermediate imaginary combinations.
#[inline(always)]
pub(crate) fn fft8<T: Scalar>(
    re: &mut [T],
    im: &mut [T],
    re_base: isize,
    im_base: isize,
    re_step: isize,
    im_step: isize,
    direction: Direction,
    c: T,
) {
    let r0 = re[at(re_base, 0, re_step)];
    let i0 = im[at(im_base, 0, im_step)];
    let r1 = re[at(re_base, 1, re_step)];
    let i1 = im[at(im_base, 1, im_step)];
    let r2 = re[at(re_base, 2, re_step)];
    let i2 = im[at(im_base, 2, im_step)];
    let r3 = re[at(re_base, 3, re_step)];
    let i3 = im[at(im_base, 3, im_step)];
    let r4 = re[at(re_base, 4, re_step)];
    let i4 = im[at(im_base, 4, im_step)];
    let r5 = re[at(re_base, 5, re_step)];
    let i5 = im[at(im_base, 5, im_step)];
    let r6 = re[at(re_base, 6, re_step)];
    let i6 = im[at(im_base, 6, im_step)];
    let r7 = re[at(re_base, 7, re_step)];
    let i7 = im[at(im_base, 7, im_step)];

    let (pr0, mr1) = (r0 + r1, r0 - r1);
    let (pi0, mi1) = (i0 + i1, i0 - i1);
    let (pr2, mr3) = (r2 + r3, r2 - r3);
    let (pi2, mi3) = (i2 + i3, i2 - i3);
    let (pr4, mr5) = (r4 + r5, r4 - r5);
    let (pi4, mi5) = (i4 + i5, i4 - i5);
    let (pr6, mr7) = (r6 + r7, r6 - r7);
    let (pi6, mi7) = (i6 + i7, i6 - i7);

    match direction {
        Direction::Forward => {
            let r0 = pr0 + pr2;
            let i0 = pi0 + pi2;
            let r1 = mr1 + mi3;
            let i1 = mi1 - mr3;
            let r2 = pr0 - pr2;
            let i2 = pi0 - pi2;
            let r3 = mr1 - mi3;
            let i3 = mi1 + mr3;
            let r4 = pr4 + pr6;
            let i4 = pi4 + pi6;
            let r5 = mr5 + mi7;
            let i5 = mi5 - mr7;
            let r6 = pr4 - pr6;
            let i6 = pi4 - pi6;
            let r7 = mr5 - mi7;
            let i7 = mi5 + mr7;
            let p5 = c * (r5 + i5);
            let m5 = c * (r5 - i5);
            let p7 = c * (r7 + i7);
            let m7 = c * (r7 - i7);
            re[at(re_base, 0, re_step)] = r0 + r4;
            im[at(im_base, 0, im_step)] = i0 + i4;
            re[at(re_base, 1, re_step)] = r1 + p5;
            im[at(im_base, 1, im_step)] = i1 - m5;
            re[at(re_base, 2, re_step)] = r2 + i6;
            im[at(im_base, 2, im_step)] = i2 - r6;
            re[at(re_base, 3, re_step)] = r3 - m7;
            im[at(im_base, 3, im_step)] = i3 - p7;
            re[at(re_base, 4, re_step)] = r0 - r4;
            im[at(im_base, 4, im_step)] = i0 - i4;
            re[at(re_base, 5, re_step)] = r1 - p5;
            im[at(im_base, 5, im_step)] = i1 + m5;
            re[at(re_base, 6, re_step)] = r2 - i6;
            im[at(im_base, 6, im_step)] = i2 + r6;
            re[at(re_base, 7, re_step)] = r3 + m7;
            im[at(im_base, 7, im_step)] = i3 + p7;
        }
        Direction::Inverse => {
            let r0 = pr0 + pr2;
            let i0 = pi0 + pi2;
            let r1 = mr1 - mi3;
            let i1 = mi1 + mr3;
            let r2 = pr0 - pr2;
            let i2 = pi0 - pi2;
            let r3 = mr1 + mi3;
            let i3 = mi1 - mr3;
            let r4 = pr4 + pr6;
            let i4 = pi4 + pi6;
            let r5 = mr5 - mi7;
            let i5 = mi5 + mr7;
            let r6 = pr4 - pr6;
            let i6 = pi4 - pi6;
            let r7 = mr5 + mi7;
            let i7 = mi5 - mr7;
            let p5 = c * (r5 + i5);
            let m5 = c * (r5 - i5);
            let p7 = c * (r7 + i7);
            let m7 = c * (r7 - i7);
            re[at(re_base, 0, re_step)] = r0 + r4;
            im[at(im_base, 0, im_step)] = i0 + i4;
            re[at(re_base, 1, re_step)] = r1 + m5;
            im[at(im_base, 1, im_step)] = i1 + p5;
            re[at(re_base, 2, re_step)] = r2 - i6;
            im[at(im_base, 2, im_step)] = i2 + r6;
            re[at(re_base, 3, re_step)] = r3 - p7;
            im[at(im_base, 3, im_step)] = i3 + m7;
            re[at(re_base, 4, re_step)] = r0 - r4;
            im[at(im_base, 4, im_step)] = i0 - i4;
            re[at(re_base, 5, re_step)] = r1 - m5;
            im[at(im_base, 5, im_step)] = i1 - p5;
            re[at(re_base, 6, re_step)] = r2 + i6;
            im[at(im_base, 6, im_step)] = i2 - r6;
            re[at(re_base, 7, re_step)] = r3 + p7;
            im[at(im_base, 7, im_step)] = i3 - m7;
        }
    }
}

/// Part of a size-`2^log2n` butterfly on a block of `2^log2b` pairs.
///
/// Individual twiddles are products of the stored twiddles `(tr, ti)` with
/// the recursively composed multiplier `(cm, sm)`.
#[allow(clippy::too_many_arguments)]
fn butterfly_block<T: Scalar>(
    log2n: usize,
    log2b: usize,
    re: &mut [T],
    im: &mut [T],
    lr: isize,
    li: isize,
    hr: isize,
    hi: isize,
    re_step: isize,
    im_step: isize,
    cm: T,
    sm: T,
    direction: Direction,
    tr: &[T],
    ti: &[T],
) {
    let b = 1usize << log2b;
    let h = (b >> 1) as isize;
    if log2b <= TWIDDLE_BUF_LOG2 {
        // The block is small enough that every twiddle is precomputed.
        for i in 0..b {
            let c = cm * tr[i] - sm * ti[i];
            let s = sm * tr[i] + cm * ti[i];
            let xl = re[at(lr, i, re_step)];
            let yl = im[at(li, i, im_step)];
            let xr = re[at(hr, i, re_step)];
            let yr = im[at(hi, i, im_step)];
            let x = c * xr - s * yr;
            let y = s * xr + c * yr;
            re[at(lr, i, re_step)] = xl + x;
            im[at(li, i, im_step)] = yl + y;
            re[at(hr, i, re_step)] = xl - x;
            im[at(hi, i, im_step)] = yl - y;
        }
    } else {
        // Process the halves recursively, composing the multiplier.
        let (x, mut y) = cexp::<T>(log2n - log2b + 1);
        if let Direction::Forward = direction {
            y = -y;
        }
        butterfly_block(
            log2n,
            log2b - 1,
            re,
            im,
            lr,
            li,
            hr,
            hi,
            re_step,
            im_step,
            cm,
            sm,
            direction,
            tr,
            ti,
        );
        butterfly_block(
            log2n,
            log2b - 1,
            re,
            im,
            lr + h * re_step,
            li + h * im_step,
            hr + h * re_step,
            hi + h * im_step,
            re_step,
            im_step,
            cm * x - sm * y,
            sm * x + cm * y,
            direction,
            tr,
            ti,
        );
    }
}

/// One butterfly pass over `2^log2c` blocks of `2^log2n` elements.
#[allow(clippy::too_many_arguments)]
pub(crate) fn butterfly_pass<T: Scalar>(
    log2n: usize,
    log2c: usize,
    re: &mut [T],
    im: &mut [T],
    re_base: isize,
    im_base: isize,
    re_step: isize,
    im_step: isize,
    direction: Direction,
    log2t: usize,
    tr: &[T],
    ti: &[T],
) {
    if log2n == 0 {
        return;
    }
    let n = 1usize << log2n;
    let h = n >> 1;
    let blocks = 1usize << log2c;
    let mut lr = re_base;
    let mut li = im_base;
    let mut hr = re_base + h as isize * re_step;
    let mut hi = im_base + h as isize * im_step;
    if log2n - 1 <= log2t {
        // Enough precomputed twiddles for the whole block.
        if h > 1 {
            for _ in 0..blocks {
                let mut d = 0usize;
                while d < h {
                    // Unrolled x2; slightly faster.
                    let cw = tr[d];
                    let sw = ti[d];
                    let xl = re[at(lr, d, re_step)];
                    let yl = im[at(li, d, im_step)];
                    let xr = re[at(hr, d, re_step)];
                    let yr = im[at(hi, d, im_step)];
                    let x = cw * xr - sw * yr;
                    let y = sw * xr + cw * yr;
                    re[at(lr, d, re_step)] = xl + x;
                    im[at(li, d, im_step)] = yl + y;
                    re[at(hr, d, re_step)] = xl - x;
                    im[at(hi, d, im_step)] = yl - y;

                    let cw = tr[d + 1];
                    let sw = ti[d + 1];
                    let xl = re[at(lr, d + 1, re_step)];
                    let yl = im[at(li, d + 1, im_step)];
                    let xr = re[at(hr, d + 1, re_step)];
                    let yr = im[at(hi, d + 1, im_step)];
                    let x = cw * xr - sw * yr;
                    let y = sw * xr + cw * yr;
                    re[at(lr, d + 1, re_step)] = xl + x;
                    im[at(li, d + 1, im_step)] = yl + y;
                    re[at(hr, d + 1, re_step)] = xl - x;
                    im[at(hi, d + 1, im_step)] = yl - y;
                    d += 2;
                }
                lr += n as isize * re_step;
                li += n as isize * im_step;
                hr += n as isize * re_step;
                hi += n as isize * im_step;
            }
        } else {
            // Size-2 blocks need no twiddles at all.
            for _ in 0..blocks {
                let xl = re[at(lr, 0, re_step)];
                let yl = im[at(li, 0, im_step)];
                let xr = re[at(hr, 0, re_step)];
                let yr = im[at(hi, 0, im_step)];
                re[at(lr, 0, re_step)] = xl + xr;
                im[at(li, 0, im_step)] = yl + yr;
                re[at(hr, 0, re_step)] = xl - xr;
                im[at(hi, 0, im_step)] = yl - yr;
                lr += n as isize * re_step;
                li += n as isize * im_step;
                hr += n as isize * re_step;
                hi += n as isize * im_step;
            }
        }
    } else {
        // Not enough buffered twiddles; go through the recursive block.
        for _ in 0..blocks {
            butterfly_block(
                log2n,
                log2n - 1,
                re,
                im,
                lr,
                li,
                hr,
                hi,
                re_step,
                im_step,
                T::one(),
                T::zero(),
                direction,
                tr,
                ti,
            );
            lr += n as isize * re_step;
            li += n as isize * im_step;
            hr += n as isize * re_step;
            hi += n as isize * im_step;
        }
    }
}

/// Run `depth` butterfly passes, from block size `2^(log2n-depth+1)` up to
/// `2^log2n`, over `2^log2c` blocks.
#[allow(clippy::too_many_arguments)]
fn butterfly_multipass<T: Scalar>(
    log2n: usize,
    log2c: usize,
    mut depth: usize,
    re: &mut [T],
    im: &mut [T],
    re_base: isize,
    im_base: isize,
    re_step: isize,
    im_step: isize,
    direction: Direction,
    tr: &mut [T],
    ti: &mut [T],
) {
    while depth > 0 {
        if re_step == 1 && im_step == 1 {
            let total = 1usize << (log2n + log2c);
            let rb = re_base as usize;
            let ib = im_base as usize;
            let consumed = T::optimized_multipass(
                log2n,
                log2c,
                depth,
                &mut re[rb..rb + total],
                &mut im[ib..ib + total],
                direction,
            );
            if consumed > 0 {
                depth -= consumed;
                continue;
            }
        }
        if depth == log2n && depth >= 3 {
            // Fuse the three bottom passes into the radix-8 kernel.
            let blocks = 1usize << (log2n + log2c - 3);
            let (c, _) = cexp::<T>(3);
            for j in 0..blocks {
                fft8(
                    re,
                    im,
                    re_base + (8 * j) as isize * re_step,
                    im_base + (8 * j) as isize * im_step,
                    re_step,
                    im_step,
                    direction,
                    c,
                );
            }
            depth -= 3;
            continue;
        }
        let log2d = log2n - depth + 1;
        let log2t = if log2d - 1 < TWIDDLE_BUF_LOG2 {
            log2d - 1
        } else {
            TWIDDLE_BUF_LOG2
        };
        compute_twiddles(log2d, log2t, tr, ti, direction);
        butterfly_pass(
            log2d,
            log2c + log2n - log2d,
            re,
            im,
            re_base,
            im_base,
            re_step,
            im_step,
            direction,
            log2t,
            tr,
            ti,
        );
        depth -= 1;
    }
}

/// Full butterfly schedule for one bit-reversed array of `2^log2n` elements.
///
/// `tmp` is the caller's stack scratch of `2^TMP_BUF_LOG2` scalars; its two
/// halves hold the twiddle buffer.
#[allow(clippy::too_many_arguments)]
pub(crate) fn butterfly<T: Scalar>(
    log2n: usize,
    re: &mut [T],
    im: &mut [T],
    re_base: isize,
    im_base: isize,
    re_step: isize,
    im_step: isize,
    direction: Direction,
    tmp: &mut [T],
) {
    if log2n > 12 {
        // Transform the halves separately, then join them with a single
        // pass; the halves stay cache-resident.
        let h = (1usize << (log2n - 1)) as isize;
        butterfly(
            log2n - 1,
            re,
            im,
            re_base,
            im_base,
            re_step,
            im_step,
            direction,
            tmp,
        );
        butterfly(
            log2n - 1,
            re,
            im,
            re_base + h * re_step,
            im_base + h * im_step,
            re_step,
            im_step,
            direction,
            tmp,
        );
        let (tr, ti) = tmp.split_at_mut(TWIDDLE_BUF_SIZE);
        butterfly_multipass(
            log2n,
            0,
            1,
            re,
            im,
            re_base,
            im_base,
            re_step,
            im_step,
            direction,
            tr,
            ti,
        );
    } else {
        let (tr, ti) = tmp.split_at_mut(TWIDDLE_BUF_SIZE);
        butterfly_multipass(
            log2n,
            0,
            log2n,
            re,
            im,
            re_base,
            im_base,
            re_step,
            im_step,
            direction,
            tr,
            ti,
        );
    }
}
