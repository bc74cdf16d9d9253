use rug::{float::Round, Float};

/// Decimal rendering of `value` with exactly `digits` fractional digits.
///
/// Digits past the requested count are cut off, never rounded, so every
/// printed digit is one the computation actually produced. Values of any
/// magnitude render positionally (`0.0156`, `1234.500`), never with an
/// exponent. Infinities and NaN render as rug displays them.
pub fn format_fixed(value: &Float, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value.is_zero() {
        return assemble(false, "0", "", digits);
    }

    // enough significant digits for the integer part plus the fraction,
    // MPFR truncates so nothing carries into the kept digits
    let wanted = integer_digits(value) + digits + 2;
    let (negative, mantissa, exp) =
        value.to_sign_string_exp_round(10, Some(wanted), Round::Zero);

    // value = 0.<mantissa> * 10^exp
    let exp = exp.unwrap_or(1);
    if exp > 0 {
        let point = exp as usize;
        if mantissa.len() >= point {
            let (int_part, frac_part) = mantissa.split_at(point);
            assemble(negative, int_part, frac_part, digits)
        } else {
            assemble(negative, &format!("{mantissa:0<point$}"), "", digits)
        }
    } else {
        let frac_part = "0".repeat(exp.unsigned_abs() as usize) + &mantissa;
        assemble(negative, "0", &frac_part, digits)
    }
}

/// `int_part.frac_part`, the fraction cut or zero-padded to `digits`.
fn assemble(negative: bool, int_part: &str, frac_part: &str, digits: usize) -> String {
    let mut out = String::with_capacity(int_part.len() + digits + 2);
    if negative {
        out.push('-');
    }
    out.push_str(int_part);
    if digits > 0 {
        out.push('.');
        out.extend(frac_part.chars().chain(std::iter::repeat('0')).take(digits));
    }
    out
}

fn integer_digits(value: &Float) -> usize {
    // 2^(exp-1) <= |value| < 2^exp
    match value.get_exp() {
        Some(exp) if exp > 0 => ((exp as f64) * std::f64::consts::LOG10_2).ceil() as usize + 1,
        _ => 1,
    }
}
