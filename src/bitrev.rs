//! Bit-reversal permutations.
//!
//! The permutation `dst[reverse(i)] = src[i]` is the only step of the
//! power-of-two pipeline that reads the source. Three regimes keep it
//! cache-friendly:
//!
//! - small arrays (`log2n <= 8`) go through the byte-reverse table;
//! - medium arrays recurse: the out-of-place form splits even/odd source
//!   indices into the two destination halves, the in-place form swaps the
//!   two mixed quarters `0X..X1 <-> 1X..X0` and recurses into the pure
//!   quarters `0X..X0` and `1X..X1`;
//! - large in-place arrays use the cache-blocked tiling of Carter and
//!   Gatlin, "Towards an Optimal Bit-Reversal Permutation Program", with
//!   tile parameter `Q`. The out-of-place form performs one deinterleaving
//!   pass and defers to the in-place algorithm on each half, which turns
//!   out to be faster, especially for smaller `Q`.
//!
//! All streams are `(slice, base, step)` triples; a negative step walks the
//! slice backwards with `base` addressing logical element zero.

use crate::{at, Q};

/// One sub-table per bit count `b <= 8`, laid out at offset `2^b`.
#[cfg(feature = "bitrev-table")]
const fn build_bitrev_table() -> [u8; 512] {
    let mut table = [0u8; 512];
    let mut bits = 0usize;
    while bits <= 8 {
        let len = 1usize << bits;
        let mut i = 0usize;
        while i < len {
            table[len + i] = if bits == 0 {
                0
            } else {
                (i as u8).reverse_bits() >> (8 - bits)
            };
            i += 1;
        }
        bits += 1;
    }
    table
}

#[cfg(feature = "bitrev-table")]
static BITREV_TABLE: [u8; 512] = build_bitrev_table();

/// Reverse the low `bits` bits of `i`.
pub(crate) fn bit_reverse(i: usize, bits: usize) -> usize {
    #[cfg(feature = "bitrev-table")]
    {
        if bits <= 8 {
            return BITREV_TABLE[(1usize << bits) + i] as usize;
        }
        ((BITREV_TABLE[256 + (i & 255)] as usize) << (bits - 8)) ^ bit_reverse(i >> 8, bits - 8)
    }
    #[cfg(not(feature = "bitrev-table"))]
    {
        if bits == 0 {
            return 0;
        }
        i.reverse_bits() >> (usize::BITS as usize - bits)
    }
}

/// Swap `data[a + i*a_step]` with `data[b + reverse(i)*b_step]` over
/// `2^log2n` positions. The two streams must be disjoint.
fn bitrev_swap<T: Copy>(
    log2n: usize,
    data: &mut [T],
    a: isize,
    a_step: isize,
    b: isize,
    b_step: isize,
) {
    let n = 1usize << log2n;
    if log2n <= 8 {
        for i in 0..n {
            let j = bit_reverse(i, log2n);
            data.swap(at(a, i, a_step), at(b, j, b_step));
        }
    } else {
        let h = (n >> 1) as isize;
        bitrev_swap(log2n - 1, data, a, 2 * a_step, b, b_step);
        bitrev_swap(log2n - 1, data, a + a_step, 2 * a_step, b + h * b_step, b_step);
    }
}

/// In-place bit-reversal permutation of one strided stream.
///
/// `tmp` must hold at least `2^(2Q)` elements; it is only touched by the
/// blocked regime.
pub(crate) fn permute_in_place<T: Copy>(
    log2n: usize,
    data: &mut [T],
    base: isize,
    step: isize,
    tmp: &mut [T],
) {
    let n = 1usize << log2n;
    let h = (n >> 1) as isize;
    if log2n <= 8 {
        for i in 0..n {
            let j = bit_reverse(i, log2n);
            if i < j {
                data.swap(at(base, i, step), at(base, j, step));
            }
        }
    } else if log2n <= 2 * Q + 2 || log2n <= 16 {
        // Exchange 0X..X1's and 1X..X0's, then recurse into 0X..X0's
        // and 1X..X1's.
        bitrev_swap(log2n - 2, data, base + step, 2 * step, base + h * step, 2 * step);
        permute_in_place(log2n - 2, data, base, 2 * step, tmp);
        permute_in_place(log2n - 2, data, base + (h + 1) * step, 2 * step, tmp);
    } else {
        let log2m = log2n - 2 * Q;
        let m = 1usize << log2m;
        let tile = 1usize << Q;
        for b in 0..m {
            let ib = bit_reverse(b, log2m);
            if ib < b {
                // Already handled as the reflection of an earlier tile.
                continue;
            }
            for a in 0..tile {
                for c in 0..tile {
                    tmp[(a << Q) ^ c] =
                        data[at(base, (a << (log2n - Q)) ^ (b << Q) ^ c, step)];
                }
            }
            for c in 0..tile {
                let ic = bit_reverse(c, Q);
                for a in 0..tile {
                    let ia = bit_reverse(a, Q);
                    let i = (ic << (log2n - Q)) ^ (ib << Q) ^ ia;
                    let di = at(base, i, step);
                    core::mem::swap(&mut data[di], &mut tmp[(a << Q) ^ c]);
                }
            }
            if b != ib {
                // The self-paired tile already sits in its reflected block.
                for a in 0..tile {
                    for c in 0..tile {
                        data[at(base, (a << (log2n - Q)) ^ (b << Q) ^ c, step)] =
                            tmp[(a << Q) ^ c];
                    }
                }
            }
        }
    }
}

/// Copy-permute one strided stream: `dst[reverse(i)] = src[i]`.
pub(crate) fn permute_copy<T: Copy>(
    log2n: usize,
    src: &[T],
    s_base: isize,
    s_step: isize,
    dst: &mut [T],
    d_base: isize,
    d_step: isize,
    tmp: &mut [T],
) {
    let n = 1usize << log2n;
    let h = (n >> 1) as isize;
    if log2n <= 8 {
        for i in 0..n {
            let j = bit_reverse(i, log2n);
            dst[at(d_base, j, d_step)] = src[at(s_base, i, s_step)];
        }
    } else if log2n <= 16 {
        permute_copy(log2n - 1, src, s_base, 2 * s_step, dst, d_base, d_step, tmp);
        permute_copy(
            log2n - 1,
            src,
            s_base + s_step,
            2 * s_step,
            dst,
            d_base + h * d_step,
            d_step,
            tmp,
        );
    } else {
        // One deinterleaving pass, then the in-place algorithm on each half.
        for i in 0..(n >> 1) {
            dst[at(d_base, i, d_step)] = src[at(s_base, 2 * i, s_step)];
            dst[at(d_base + h * d_step, i, d_step)] = src[at(s_base, 2 * i + 1, s_step)];
        }
        permute_in_place(log2n - 1, dst, d_base, d_step, tmp);
        permute_in_place(log2n - 1, dst, d_base + h * d_step, d_step, tmp);
    }
}

/// Fill one strided stream with a single value (the stride-0 source case).
pub(crate) fn broadcast<T: Copy>(n: usize, value: T, dst: &mut [T], base: isize, step: isize) {
    for i in 0..n {
        dst[at(base, i, step)] = value;
    }
}
