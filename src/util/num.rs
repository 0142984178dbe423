/// Floored integer division: the quotient is rounded toward negative
/// infinity.
///
/// Returns `None` when `divisor` is zero or the quotient overflows.
///
/// ## Example
/// ```
/// use calci::util::num::floor_div_i64;
///
/// assert_eq!(floor_div_i64(7, 2), Some(3));
/// assert_eq!(floor_div_i64(-7, 2), Some(-4));
/// assert_eq!(floor_div_i64(1, 0), None);
/// ```
#[must_use]
pub fn floor_div_i64(dividend: i64, divisor: i64) -> Option<i64> {
    let quotient = dividend.checked_div(divisor)?;
    let remainder = dividend.checked_rem(divisor)?;
    if remainder != 0 && ((remainder < 0) != (divisor < 0)) {
        quotient.checked_sub(1)
    } else {
        Some(quotient)
    }
}

/// Floored integer modulo: the result takes the sign of the divisor.
///
/// Returns `None` when `divisor` is zero.
///
/// ## Example
/// ```
/// use calci::util::num::floor_mod_i64;
///
/// assert_eq!(floor_mod_i64(-7, 3), Some(2));
/// assert_eq!(floor_mod_i64(7, -3), Some(-2));
/// ```
#[must_use]
pub fn floor_mod_i64(dividend: i64, divisor: i64) -> Option<i64> {
    // i64::MIN % -1 overflows in checked_rem but the floored result is 0.
    if divisor == -1 {
        return Some(0);
    }
    let remainder = dividend.checked_rem(divisor)?;
    if remainder != 0 && ((remainder < 0) != (divisor < 0)) {
        Some(remainder + divisor)
    } else {
        Some(remainder)
    }
}

/// Float modulo whose result takes the sign of the divisor.
///
/// Division by zero yields `NaN`; callers reject a zero divisor first.
#[must_use]
pub fn floor_mod_f64(dividend: f64, divisor: f64) -> f64 {
    let remainder = dividend % divisor;
    if remainder != 0.0 && ((remainder < 0.0) != (divisor < 0.0)) {
        remainder + divisor
    } else {
        remainder
    }
}

/// Widens an integer operand to a float.
///
/// Integers beyond 2^53 lose precision, the same as any mixed
/// integer/float arithmetic.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub const fn i64_to_f64(value: i64) -> f64 {
    value as f64
}

/// Renders a float in its shortest round-trip form.
///
/// Finite values always carry a fractional part or an exponent, so `1.0`
/// never prints as `1`. Exponents are signed and at least two digits wide.
///
/// ## Example
/// ```
/// use calci::util::num::format_float;
///
/// assert_eq!(format_float(1.0), "1.0");
/// assert_eq!(format_float(0.1 + 0.2), "0.30000000000000004");
/// assert_eq!(format_float(1e16), "1e+16");
/// assert_eq!(format_float(0.00001), "1e-05");
/// assert_eq!(format_float(f64::NAN), "nan");
/// ```
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    normalize_exponent(&format!("{value:?}"))
}

/// Rewrites `1e16` as `1e+16` and `1e-5` as `1e-05`. Text without an
/// exponent is returned unchanged.
fn normalize_exponent(text: &str) -> String {
    let Some((mantissa, exponent)) = text.split_once('e') else {
        return text.to_string();
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_division_rounds_down() {
        assert_eq!(floor_div_i64(7, 2), Some(3));
        assert_eq!(floor_div_i64(-7, 2), Some(-4));
        assert_eq!(floor_div_i64(7, -2), Some(-4));
        assert_eq!(floor_div_i64(-7, -2), Some(3));
        assert_eq!(floor_div_i64(6, 3), Some(2));
        assert_eq!(floor_div_i64(i64::MIN, -1), None);
        assert_eq!(floor_div_i64(5, 0), None);
    }

    #[test]
    fn floor_modulo_follows_divisor_sign() {
        assert_eq!(floor_mod_i64(7, 3), Some(1));
        assert_eq!(floor_mod_i64(-7, 3), Some(2));
        assert_eq!(floor_mod_i64(7, -3), Some(-2));
        assert_eq!(floor_mod_i64(-7, -3), Some(-1));
        assert_eq!(floor_mod_i64(i64::MIN, -1), Some(0));
        assert_eq!(floor_mod_i64(5, 0), None);
    }

    #[test]
    fn float_modulo_follows_divisor_sign() {
        assert_eq!(floor_mod_f64(5.5, 2.0), 1.5);
        assert_eq!(floor_mod_f64(-5.5, 2.0), 0.5);
        assert_eq!(floor_mod_f64(5.5, -2.0), -0.5);
    }

    #[test]
    fn floats_render_like_repr() {
        assert_eq!(format_float(2.5), "2.5");
        assert_eq!(format_float(-3.0), "-3.0");
        assert_eq!(format_float(1.5e16), "1.5e+16");
        assert_eq!(format_float(1.5e-7), "1.5e-07");
        assert_eq!(format_float(1e100), "1e+100");
        assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
    }
}
