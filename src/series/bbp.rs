use rug::{ops::CompleteRound, Float};

use super::{clamp_iterations, Normalization, TermGenerator};
use crate::error::PiError;

/// Bailey–Borwein–Plouffe series:
///
/// ```text
///       _inf_
///       \       1    /   4        2        1        1    \
/// π =    \    ----- | ------ - ------ - ------ - ------ |
///        /     16^k  \ 8k+1     8k+4     8k+5     8k+6  /
///       /____
///        k=0
/// ```
///
/// Everything is float arithmetic, there is no exact integer phase.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bbp;

impl TermGenerator for Bbp {
    fn name(&self) -> &'static str {
        "bbp"
    }

    fn term(&self, k: u32, prec: u32) -> Result<Float, PiError> {
        let eight_k = 8 * u64::from(k);

        let mut term = Float::with_val(prec, 4) / (eight_k + 1);
        term -= Float::with_val(prec, 2) / (eight_k + 4);
        term -= Float::with_val(prec, 1) / (eight_k + 5);
        term -= Float::with_val(prec, 1) / (eight_k + 6);

        term /= Float::u_pow_u(16, k).complete(prec);

        Ok(term)
    }

    fn iterations(&self, digits: u64) -> u32 {
        // each term adds at least one bit, one term per digit is plenty
        clamp_iterations(digits)
    }

    fn normalization(&self) -> Normalization {
        Normalization::Identity
    }
}
