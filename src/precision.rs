//! Working-precision planning.
//!
//! A decimal digit carries log2(10) bits of information, so `d` digits need
//! `ceil(d * log2(10))` bits of significand. The computation itself runs a few
//! guard bits above that so rounding in the last term cannot reach the last
//! requested digit.

use crate::error::PiError;

/// log2(10)
pub const BITS_PER_DIGIT: f64 = 3.32192809488736234787;

/// Extra bits carried on top of [`plan`] unless the caller overrides it.
pub const DEFAULT_GUARD_BITS: u32 = 32;

/// Bits of significand needed to represent `digits` decimal digits.
pub fn plan(digits: u64) -> Result<u32, PiError> {
    if digits == 0 {
        return Err(PiError::InvalidDigits(digits));
    }

    // saturating float -> int cast, anything past prec_max is rejected below
    let bits = (digits as f64 * BITS_PER_DIGIT).ceil() as u64;
    checked_prec(digits, bits)
}

/// [`plan`] plus `guard_bits`.
pub fn working_precision(digits: u64, guard_bits: u32) -> Result<u32, PiError> {
    let bits = u64::from(plan(digits)?) + u64::from(guard_bits);
    checked_prec(digits, bits)
}

fn checked_prec(digits: u64, bits: u64) -> Result<u32, PiError> {
    let max = rug::float::prec_max();
    if bits > u64::from(max) {
        return Err(PiError::PrecisionOverflow { digits, bits, max });
    }
    Ok(bits as u32)
}
