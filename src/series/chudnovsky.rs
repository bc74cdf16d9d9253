use rug::{
    ops::{CompleteRound, Pow},
    Complete, Float, Integer,
};

use super::{clamp_iterations, Normalization, TermGenerator};
use crate::error::PiError;

pub const A: u32 = 13591409;
pub const B: u32 = 545140134;
pub const C: u32 = 640320;
pub const D: u32 = 12;

/// Decimal digits gained per term, rounded down.
pub const DIGITS_PER_TERM: u64 = 14;

/// Chudnovsky series for 1/π:
///
/// ```text
///          _inf_
///          \      (-1)^k * (6k)! * (13591409 + 545140134k)
/// 1/π = 12  \     -------------------------------------------
///           /      (3k)! * (k!)^3 * 640320^(3k + 3/2)
///          /____
///           k=0
/// ```
///
/// Factorials are exact big integers; only `640320^(3k + 3/2)` needs a
/// square root and is evaluated in floating point.
#[derive(Debug, Default, Clone, Copy)]
pub struct Chudnovsky;

impl TermGenerator for Chudnovsky {
    fn name(&self) -> &'static str {
        "chudnovsky"
    }

    fn term(&self, k: u32, prec: u32) -> Result<Float, PiError> {
        let out_of_range = || PiError::TermIndexOverflow(k);
        let six_k = k.checked_mul(6).ok_or_else(out_of_range)?;
        let three_k = k.checked_mul(3).ok_or_else(out_of_range)?;

        let linear = Integer::from(B) * k + A; // 545140134k + 13591409

        let mut numerator = Integer::factorial(six_k).complete() * linear; // (6k)! * (A + Bk)
        if k % 2 == 1 {
            numerator = -numerator;
        }

        let denominator = Integer::factorial(three_k).complete() // (3k)!
            * Integer::factorial(k).complete().pow(3); // (k!)^3

        // 640320^(3k) * sqrt(640320) * 640320
        let mut irrational = Float::u_pow_u(C, three_k).complete(prec);
        irrational *= Float::sqrt_u(C).complete(prec);
        irrational *= C;

        let mut den = Float::with_val(prec, denominator);
        den *= irrational;

        let mut term = Float::with_val(prec, numerator);
        term /= den;
        term *= D;

        // past the exponent range the quotient degrades to inf/inf
        if !term.is_finite() {
            return Err(out_of_range());
        }

        Ok(term)
    }

    fn iterations(&self, digits: u64) -> u32 {
        // one extra term so truncating the series never costs the last digit
        clamp_iterations(digits.div_ceil(DIGITS_PER_TERM) + 1)
    }

    fn normalization(&self) -> Normalization {
        Normalization::Reciprocal
    }
}
