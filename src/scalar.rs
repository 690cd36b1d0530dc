//! Scalar element abstraction.
//!
//! The whole engine is generic over one scalar type. The trait asks for the
//! ring operations plus two complex-exponential primitives, both returning
//! the `exp(ix) - 1` shifted form: downstream recurrences multiply values
//! near zero, and keeping the `-1` form preserves precision there. A custom
//! element type (software float, fixed point) implements this trait and may
//! override the two primitives to avoid floating literals entirely.

use std::ops::{Add, Div, Mul, Neg, Sub};

use num_traits::{One, Zero};

use crate::Direction;

/// Element type the transform engine is instantiated over.
///
/// `Div` appears only on two cold paths: the `1/m` pre-scale of the
/// Bluestein convolution and the fractional complex exponential.
pub trait Scalar:
    Copy
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Zero
    + One
    + 'static
{
    /// `exp(2*pi*i / 2^log2n) - 1` as `(re, im)`.
    fn cexpm1(log2n: usize) -> (Self, Self);

    /// `exp(2*pi*i * p/q) - 1` as `(re, im)`.
    fn cexpm1_frac(p: usize, q: usize) -> (Self, Self);

    /// Optimized butterfly multipass hook.
    ///
    /// Called with contiguous unit-stride data before each scalar pass.
    /// May consume one or more passes from the bottom of the schedule and
    /// report how many; the default consumes none. The f32/f64
    /// implementations forward to the vectorized passes when `simd` is
    /// enabled.
    #[allow(unused_variables)]
    fn optimized_multipass(
        log2n: usize,
        log2c: usize,
        depth: usize,
        reals: &mut [Self],
        imags: &mut [Self],
        direction: Direction,
    ) -> usize {
        0
    }
}

/// `exp(2*pi*i / 2^log2n)`, reassembled from the shifted form.
#[inline]
pub(crate) fn cexp<T: Scalar>(log2n: usize) -> (T, T) {
    let (re, im) = T::cexpm1(log2n);
    (T::one() + re, im)
}

/// `exp(2*pi*i / 2^k) - 1` for `k = 0..=16`, entered with sub-ULP accuracy.
const CEXPM1_TABLE: [(f64, f64); 17] = [
    (0.0e0, 0.0e0),
    (-2.0e0, 0.0e0),
    (-1.0e0, 1.0e0),
    (
        -2.928932188134524755991556378951509607151e-1,
        7.071067811865475244008443621048490392848e-1,
    ),
    (
        -7.612046748871324387181681060321171317758e-2,
        3.826834323650897717284599840303988667613e-1,
    ),
    (
        -1.921471959676955087381776386576096302606e-2,
        1.950903220161282678482848684770222409276e-1,
    ),
    (
        -4.815273327803113755163046890520078424525e-3,
        9.801714032956060199419556388864184586113e-2,
    ),
    (
        -1.204543794827607285228395240899305556796e-3,
        4.906767432741801425495497694268265831474e-2,
    ),
    (
        -3.011813037957798842343503338278031499389e-4,
        2.454122852291228803173452945928292506546e-2,
    ),
    (
        -7.529816085545907835350880361677564939353e-5,
        1.227153828571992607940826195100321214037e-2,
    ),
    (
        -1.882471739885734300956227143228382608274e-5,
        6.135884649154475359640234590372580917057e-3,
    ),
    (
        -4.706190423828488419874299880100447012366e-6,
        3.067956762965976270145365490919842518944e-3,
    ),
    (
        -1.176548298090070974289828473980951732077e-6,
        1.533980186284765612303697150264079079954e-3,
    ),
    (
        -2.941371177808397717822612343228837361006e-7,
        7.669903187427045269385683579485766431409e-4,
    ),
    (
        -7.353428214885526851929261214305179884431e-8,
        3.834951875713955890724616811813812633950e-4,
    ),
    (
        -1.838357070619165308459709028549492394875e-8,
        1.917475973107033074399095619890009334688e-4,
    ),
    (
        -4.595892687109028066860393851041105696810e-9,
        9.587379909597734587051721097647635118706e-5,
    ),
];

const TAU: f64 = 6.283185307179586476925286766559005768;

macro_rules! impl_float_scalar {
    ($t:ty, $multipass:path) => {
        impl Scalar for $t {
            fn cexpm1(log2n: usize) -> (Self, Self) {
                if log2n < CEXPM1_TABLE.len() {
                    let (re, im) = CEXPM1_TABLE[log2n];
                    (re as $t, im as $t)
                } else {
                    // For small x the Taylor series is accurate to a couple
                    // of ULPs.
                    const C1: f64 = 1.0e0;
                    const C2: f64 = 5.0e-1;
                    const C3: f64 = 1.666666666666666666666666666666666666666e-1;
                    const C4: f64 = 4.166666666666666666666666666666666666666e-2;
                    const C5: f64 = 8.333333333333333333333333333333333333333e-3;
                    const C6: f64 = 1.388888888888888888888888888888888888888e-3;
                    const C7: f64 = 1.984126984126984126984126984126984126984e-4;
                    const C8: f64 = 2.480158730158730158730158730158730158730e-5;
                    let x = TAU as $t / (1u64 << log2n) as $t;
                    let x2 = x * x;
                    let re = -x2
                        * (C2 as $t - x2 * (C4 as $t - x2 * (C6 as $t - x2 * C8 as $t)));
                    let im =
                        x * (C1 as $t - x2 * (C3 as $t - x2 * (C5 as $t - x2 * C7 as $t)));
                    (re, im)
                }
            }

            fn cexpm1_frac(p: usize, q: usize) -> (Self, Self) {
                // Paired continued products for sine and cosine, evaluated
                // reverse-Horner style: each step folds in the term pair
                // (2i+3)(2i+4) for cosine and (2i+2)(2i+3) for sine.
                let x = TAU as $t * p as $t / q as $t;
                let x2 = x * x;
                let mut c: $t = 1.0;
                let mut s: $t = 1.0;
                let mut i: $t = 32.0;
                for _ in 0..=32 {
                    let j = 2.0 * i + 3.0;
                    let k = i + i + 3.0;
                    let jj = j * j;
                    c = 1.0 - x2 * c / (jj + k);
                    s = 1.0 - x2 * s / (jj - k);
                    i -= 1.0;
                }
                (-c * 0.5 * x2, s * x)
            }

            fn optimized_multipass(
                log2n: usize,
                log2c: usize,
                depth: usize,
                reals: &mut [Self],
                imags: &mut [Self],
                direction: Direction,
            ) -> usize {
                #[cfg(feature = "simd")]
                {
                    $multipass(log2n, log2c, depth, reals, imags, direction)
                }
                #[cfg(not(feature = "simd"))]
                {
                    let _ = (log2n, log2c, depth, reals, imags, direction);
                    0
                }
            }
        }
    };
}

impl_float_scalar!(f32, crate::simd::kernels::multipass_optimized_f32);
impl_float_scalar!(f64, crate::simd::kernels::multipass_optimized_f64);
