//! Series whose partial sums converge to π (or to 1/π).
//!
//! Every series is expressed as a [`TermGenerator`]: a pure function from the
//! index `k` to the `k`-th summand at a given precision, plus the two facts
//! the accumulator needs to drive it, namely how many terms a digit count
//! requires and how the finished sum turns into π.

use rug::Float;

use crate::error::PiError;

pub mod bbp;
pub mod chudnovsky;

pub use bbp::Bbp;
pub use chudnovsky::Chudnovsky;

/// How a finished series sum becomes π.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// The sum already is π.
    Identity,
    /// The sum is 1/π.
    Reciprocal,
}

impl Normalization {
    pub fn apply(self, sum: Float) -> Float {
        match self {
            Normalization::Identity => sum,
            Normalization::Reciprocal => 1 / sum,
        }
    }
}

pub trait TermGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    /// The `k`-th summand, rounded to `prec` bits.
    ///
    /// Terms are independent of each other; no state survives between calls.
    fn term(&self, k: u32, prec: u32) -> Result<Float, PiError>;

    /// Number of terms needed for `digits` correct decimal digits.
    fn iterations(&self, digits: u64) -> u32;

    fn normalization(&self) -> Normalization;
}

/// Clamp a term count to the index type. Digit counts that reach the clamp
/// have already been rejected by precision planning.
pub(crate) fn clamp_iterations(n: u64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
