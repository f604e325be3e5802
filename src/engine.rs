//! The decimal engine: rounding, digit expansion, exponent extraction, and
//! significant-digit logic over an absolute value. Works entirely on
//! `fixed_decimal::Decimal`; the assembler turns the resulting digit strings
//! into localized text.

use std::cmp::Ordering;

use fixed_decimal::{Decimal, SignedRoundingMode, UnsignedRoundingMode};

use crate::options::RoundingMode;
use crate::pattern::{Increment, SubPattern};

pub(crate) struct Request<'a> {
    pub sub: &'a SubPattern,
    pub rounding_mode: RoundingMode,
    /// Sign of the original value; ceiling and floor depend on it.
    pub negative: bool,
    pub fractional_digits: Option<u8>,
    pub currency_fraction: Option<u8>,
    pub round_nearest: Option<Increment>,
    pub maximum_integer_digits: Option<u8>,
}

pub(crate) struct DigitParts {
    /// ASCII integer digits, already padded to the minimum (may be empty).
    pub integer: String,
    /// ASCII fraction digits, trimmed and padded per the effective bounds.
    pub fraction: String,
    /// Display exponent when the pattern is scientific.
    pub exponent: Option<i32>,
    /// The rounded absolute value, for plural-category evaluation.
    pub rounded: Decimal,
}

pub(crate) fn signed_mode(mode: RoundingMode, negative: bool) -> SignedRoundingMode {
    match mode {
        RoundingMode::Down => SignedRoundingMode::Unsigned(UnsignedRoundingMode::Trunc),
        RoundingMode::Up => SignedRoundingMode::Unsigned(UnsignedRoundingMode::Expand),
        RoundingMode::HalfUp => SignedRoundingMode::Unsigned(UnsignedRoundingMode::HalfExpand),
        RoundingMode::HalfDown => SignedRoundingMode::Unsigned(UnsignedRoundingMode::HalfTrunc),
        RoundingMode::HalfEven => SignedRoundingMode::Unsigned(UnsignedRoundingMode::HalfEven),
        RoundingMode::Ceiling => {
            if negative {
                SignedRoundingMode::Unsigned(UnsignedRoundingMode::Trunc)
            } else {
                SignedRoundingMode::Unsigned(UnsignedRoundingMode::Expand)
            }
        }
        RoundingMode::Floor => {
            if negative {
                SignedRoundingMode::Unsigned(UnsignedRoundingMode::Expand)
            } else {
                SignedRoundingMode::Unsigned(UnsignedRoundingMode::Trunc)
            }
        }
    }
}

/// Decomposes the absolute value into digit strings under the sub-pattern's
/// rules. The multiplier for percent and permille is applied before any
/// rounding.
pub(crate) fn decompose(abs: &Decimal, req: &Request) -> DigitParts {
    let sub = req.sub;
    let mut dec = abs.clone();
    if sub.multiplier_pow10 > 0 {
        dec.multiply_pow10(sub.multiplier_pow10 as i16);
    }
    let mode = signed_mode(req.rounding_mode, req.negative);

    let exponent = if sub.exponent_digits > 0 {
        Some(scientific(&mut dec, sub, req, mode))
    } else {
        plain(&mut dec, sub, req, mode);
        None
    };

    emit(dec, sub, req, exponent)
}

/// Shifts the value into mantissa form, applies mantissa precision, and
/// returns the display exponent. A rounding carry (9.99 → 10.0) re-selects
/// the exponent. Under the engineering rule the mantissa shows
/// `max_integer_digits` integer digits; otherwise `min_integer_digits`.
fn scientific(dec: &mut Decimal, sub: &SubPattern, req: &Request, mode: SignedRoundingMode) -> i32 {
    let int_count = if sub.max_integer_digits > 1 {
        sub.max_integer_digits as i32
    } else {
        sub.min_integer_digits.max(1) as i32
    };
    let magnitude = |d: &Decimal| -> i32 {
        if d.absolute.is_zero() {
            0
        } else {
            d.absolute.nonzero_magnitude_start() as i32
        }
    };

    let mag = magnitude(dec);
    let mut exp = mag - (int_count - 1);
    dec.multiply_pow10((-exp) as i16);

    if let Some(f) = req.fractional_digits {
        dec.round_with_mode(-(f as i16), mode);
        dec.absolute.pad_end(-(f as i16));
    } else if sub.max_significant_digits > 0 {
        apply_significant(dec, sub.min_significant_digits, sub.max_significant_digits, mode);
    } else {
        // UTS 35: in scientific notation the mantissa's significant digits
        // are minimum-integer plus maximum-fraction; zero means "all".
        let max_sig = sub.min_integer_digits + sub.max_fraction_digits;
        if max_sig > 0 {
            let min_sig = (sub.min_integer_digits + sub.min_fraction_digits).max(1);
            apply_significant(dec, min_sig, max_sig, mode);
        }
    }

    // Re-select after a carry changed the mantissa's magnitude.
    let total_mag = exp + magnitude(dec);
    let new_exp = total_mag - (int_count - 1);
    if new_exp != exp && !dec.absolute.is_zero() {
        dec.multiply_pow10((exp - new_exp) as i16);
        exp = new_exp;
    }
    exp
}

fn plain(dec: &mut Decimal, sub: &SubPattern, req: &Request, mode: SignedRoundingMode) {
    if let Some(nearest) = req.round_nearest {
        snap_to_increment(dec, nearest, req.rounding_mode, req.negative);
    } else if let Some(f) = req.fractional_digits {
        // The caller's override wins over the pattern and over significant
        // digits.
        dec.round_with_mode(-(f as i16), mode);
    } else if sub.max_significant_digits > 0 {
        apply_significant(dec, sub.min_significant_digits, sub.max_significant_digits, mode);
    } else {
        let max_frac = req.currency_fraction.unwrap_or(sub.max_fraction_digits);
        dec.round_with_mode(-(max_frac as i16), mode);
    }

    if let Some(inc) = sub.rounding_increment {
        snap_to_increment(dec, inc, req.rounding_mode, req.negative);
    }

    // Presentational fraction bounds do not apply to significant-digit
    // output; that path sized the fraction itself.
    let significant =
        sub.max_significant_digits > 0 && req.fractional_digits.is_none() && req.round_nearest.is_none();
    if !significant {
        let min_frac = req
            .fractional_digits
            .or(req.currency_fraction)
            .unwrap_or(sub.min_fraction_digits);
        dec.absolute.trim_end();
        if min_frac > 0 {
            dec.absolute.pad_end(-(min_frac as i16));
        }
    }
}

/// Rounds to at most `max_sd` significant digits and pads back to at least
/// `min_sd`.
fn apply_significant(dec: &mut Decimal, min_sd: u8, max_sd: u8, mode: SignedRoundingMode) {
    let mag_start = dec.absolute.nonzero_magnitude_start();
    let mag_end = dec.absolute.nonzero_magnitude_end();
    let current = if dec.absolute.is_zero() {
        1i16
    } else {
        (mag_start - mag_end + 1).max(1)
    };

    if current > max_sd as i16 {
        let round_pos = mag_start - max_sd as i16 + 1;
        dec.round_with_mode(round_pos, mode);
    }
    dec.absolute.trim_end();

    let mag_start_after = dec.absolute.nonzero_magnitude_start();
    let after = if dec.absolute.is_zero() {
        1i16
    } else {
        let me = dec.absolute.nonzero_magnitude_end();
        (mag_start_after - me + 1).max(1)
    };
    if after < min_sd as i16 {
        dec.absolute.pad_end(mag_start_after - min_sd as i16 + 1);
    }
}

/// Snaps the absolute value to the nearest multiple of the increment, in
/// exact integer arithmetic. Falls back to plain rounding at the increment's
/// scale when the scaled value exceeds 128-bit range.
fn snap_to_increment(dec: &mut Decimal, inc: Increment, mode: RoundingMode, negative: bool) {
    let mut units = inc.units;
    let mut scale = inc.scale;
    while scale > 0 {
        units = match units.checked_mul(10) {
            Some(u) => u,
            None => return,
        };
        scale -= 1;
    }
    if units <= 0 {
        return;
    }
    if units == 1 {
        dec.round_with_mode(scale, signed_mode(mode, negative));
        return;
    }

    let mut work = dec.clone();
    work.multiply_pow10(-scale);
    let s = work.absolute.to_string();
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s.as_str(), ""),
    };
    let n: i128 = match int_part.parse() {
        Ok(n) => n,
        Err(_) => {
            dec.round_with_mode(scale, signed_mode(mode, negative));
            return;
        }
    };

    let r = n % units;
    let frac_nonzero = frac_part.chars().any(|c| c != '0');
    if r == 0 && !frac_nonzero {
        return;
    }

    let go_up = match mode {
        RoundingMode::Down => false,
        RoundingMode::Up => true,
        RoundingMode::Ceiling => !negative,
        RoundingMode::Floor => negative,
        half => {
            // Compare the distance into the increment, r + f, against half
            // of it: equivalently 2r + 2f against the increment.
            let cmp = if !frac_nonzero {
                (2 * r).cmp(&units)
            } else {
                match units - 2 * r {
                    c if c <= 0 => Ordering::Greater,
                    1 => cmp_half(frac_part),
                    _ => Ordering::Less,
                }
            };
            match half {
                RoundingMode::HalfDown => cmp == Ordering::Greater,
                RoundingMode::HalfUp => cmp != Ordering::Less,
                _ => match cmp {
                    Ordering::Greater => true,
                    Ordering::Less => false,
                    Ordering::Equal => ((n - r) / units) % 2 != 0,
                },
            }
        }
    };

    let snapped = if go_up { n - r + units } else { n - r };
    let mut out: Decimal = snapped
        .to_string()
        .parse()
        .unwrap_or_else(|_| Decimal::from(0));
    out.multiply_pow10(scale);
    *dec = out;
}

/// Compares a fraction-digit string against one half.
fn cmp_half(frac: &str) -> Ordering {
    let trimmed = frac.trim_end_matches('0');
    let mut chars = trimmed.chars();
    match chars.next() {
        None => Ordering::Less,
        Some(c) => match c.cmp(&'5') {
            Ordering::Equal => {
                if chars.as_str().is_empty() {
                    Ordering::Equal
                } else {
                    Ordering::Greater
                }
            }
            other => other,
        },
    }
}

fn emit(dec: Decimal, sub: &SubPattern, req: &Request, exponent: Option<i32>) -> DigitParts {
    let s = dec.absolute.to_string();
    let (mut integer, fraction) = match s.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (s, String::new()),
    };

    while integer.len() < sub.min_integer_digits as usize {
        integer.insert(0, '0');
    }
    if sub.min_integer_digits == 0 && integer == "0" && !fraction.is_empty() {
        integer.clear();
    }

    if exponent.is_none() {
        if let Some(max) = req.maximum_integer_digits {
            let len = integer.chars().count();
            if len > max as usize {
                integer = integer.chars().skip(len - max as usize).collect();
            }
        }
    }

    DigitParts {
        integer,
        fraction,
        exponent,
        rounded: dec,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::compile;

    fn run(pattern: &str, value: &str, mode: RoundingMode) -> (String, String, Option<i32>) {
        let meta = compile(pattern).unwrap();
        let negative = value.starts_with('-');
        let mut dec: Decimal = value.parse().unwrap();
        dec.apply_sign_display(fixed_decimal::SignDisplay::Never);
        let req = Request {
            sub: &meta.positive,
            rounding_mode: mode,
            negative,
            fractional_digits: None,
            currency_fraction: None,
            round_nearest: None,
            maximum_integer_digits: None,
        };
        let parts = decompose(&dec, &req);
        (parts.integer, parts.fraction, parts.exponent)
    }

    #[test]
    fn half_even_default() {
        assert_eq!(run("0.00", "0.125", RoundingMode::HalfEven).1, "12");
        assert_eq!(run("0.00", "0.135", RoundingMode::HalfEven).1, "14");
    }

    #[test]
    fn fraction_carry_into_integer() {
        let (int, frac, _) = run("0.00", "9.999", RoundingMode::HalfEven);
        assert_eq!(int, "10");
        assert_eq!(frac, "00");
    }

    #[test]
    fn min_fraction_padding() {
        let (int, frac, _) = run("0.00", "5", RoundingMode::HalfEven);
        assert_eq!(int, "5");
        assert_eq!(frac, "00");
    }

    #[test]
    fn optional_fraction_trimmed() {
        let (_, frac, _) = run("#,##0.###", "1.5", RoundingMode::HalfEven);
        assert_eq!(frac, "5");
        let (_, frac, _) = run("#,##0.###", "7", RoundingMode::HalfEven);
        assert_eq!(frac, "");
    }

    #[test]
    fn directional_modes() {
        assert_eq!(run("0.0", "1.01", RoundingMode::Up).1, "1");
        assert_eq!(run("0.0", "1.09", RoundingMode::Down).1, "0");
        // Ceiling moves toward positive infinity, so a negative value
        // truncates.
        assert_eq!(run("0.0", "-1.09", RoundingMode::Ceiling).1, "0");
        assert_eq!(run("0.0", "-1.01", RoundingMode::Floor).1, "1");
    }

    #[test]
    fn half_up_and_half_down() {
        assert_eq!(run("0.0", "0.25", RoundingMode::HalfUp).1, "3");
        assert_eq!(run("0.0", "0.25", RoundingMode::HalfDown).1, "2");
    }

    #[test]
    fn scientific_basic() {
        let (int, frac, exp) = run("#E0", "12345", RoundingMode::HalfEven);
        assert_eq!(int, "1");
        assert_eq!(frac, "2345");
        assert_eq!(exp, Some(4));
    }

    #[test]
    fn scientific_small_value() {
        let (int, frac, exp) = run("#E0", "0.00123", RoundingMode::HalfEven);
        assert_eq!(int, "1");
        assert_eq!(frac, "23");
        assert_eq!(exp, Some(-3));
    }

    #[test]
    fn scientific_fixed_mantissa() {
        let (int, frac, exp) = run("0.00E0", "12345", RoundingMode::HalfEven);
        assert_eq!(int, "1");
        assert_eq!(frac, "23");
        assert_eq!(exp, Some(4));
    }

    #[test]
    fn scientific_carry_reselects_exponent() {
        let (int, frac, exp) = run("0.0E0", "9.99", RoundingMode::HalfEven);
        assert_eq!(int, "1");
        assert_eq!(frac, "0");
        assert_eq!(exp, Some(1));
    }

    #[test]
    fn engineering_mantissa_width() {
        let (int, frac, exp) = run("00.0E0", "12345", RoundingMode::HalfEven);
        assert_eq!(int, "12");
        assert_eq!(frac, "3");
        assert_eq!(exp, Some(3));
    }

    #[test]
    fn scientific_zero() {
        let (int, _, exp) = run("#E0", "0", RoundingMode::HalfEven);
        assert_eq!(int, "0");
        assert_eq!(exp, Some(0));
    }

    #[test]
    fn significant_digits_round_and_pad() {
        let (int, frac, _) = run("@@#", "12345", RoundingMode::HalfEven);
        assert_eq!(int, "12300");
        assert_eq!(frac, "");
        let (int, frac, _) = run("@@@", "1.2", RoundingMode::HalfEven);
        assert_eq!(int, "1");
        assert_eq!(frac, "20");
    }

    #[test]
    fn pattern_increment_nickel() {
        let (int, frac, _) = run("0.05", "1.33", RoundingMode::HalfEven);
        assert_eq!(int, "1");
        assert_eq!(frac, "35");
        let (int, frac, _) = run("0.05", "1.32", RoundingMode::HalfEven);
        assert_eq!(int, "1");
        assert_eq!(frac, "30");
    }

    #[test]
    fn round_nearest_integer_multiple() {
        let meta = compile("#,##0").unwrap();
        let dec: Decimal = "1232".parse().unwrap();
        let req = Request {
            sub: &meta.positive,
            rounding_mode: RoundingMode::HalfEven,
            negative: false,
            fractional_digits: None,
            currency_fraction: None,
            round_nearest: Some(Increment { units: 5, scale: 0 }),
            maximum_integer_digits: None,
        };
        let parts = decompose(&dec, &req);
        assert_eq!(parts.integer, "1230");
    }

    #[test]
    fn increment_tie_half_even() {
        // 1.125 against increment 0.25: exactly between 1.00 and 1.25;
        // half-even picks the multiple with the even quotient.
        let meta = compile("0.00").unwrap();
        let dec: Decimal = "1.125".parse().unwrap();
        let req = Request {
            sub: &meta.positive,
            rounding_mode: RoundingMode::HalfEven,
            negative: false,
            fractional_digits: None,
            currency_fraction: None,
            round_nearest: Some(Increment { units: 25, scale: -2 }),
            maximum_integer_digits: None,
        };
        let parts = decompose(&dec, &req);
        assert_eq!(
            (parts.integer, parts.fraction),
            ("1".to_string(), "00".to_string())
        );
    }

    #[test]
    fn fractional_override_beats_significant() {
        let meta = compile("@@@@").unwrap();
        let dec: Decimal = "12.3456".parse().unwrap();
        let req = Request {
            sub: &meta.positive,
            rounding_mode: RoundingMode::HalfEven,
            negative: false,
            fractional_digits: Some(1),
            currency_fraction: None,
            round_nearest: None,
            maximum_integer_digits: None,
        };
        let parts = decompose(&dec, &req);
        assert_eq!(parts.integer, "12");
        assert_eq!(parts.fraction, "3");
    }

    #[test]
    fn currency_fraction_applies() {
        let meta = compile("¤#,##0.00").unwrap();
        let dec: Decimal = "5".parse().unwrap();
        let req = Request {
            sub: &meta.positive,
            rounding_mode: RoundingMode::HalfEven,
            negative: false,
            fractional_digits: None,
            currency_fraction: Some(0),
            round_nearest: None,
            maximum_integer_digits: None,
        };
        let parts = decompose(&dec, &req);
        assert_eq!(parts.integer, "5");
        assert_eq!(parts.fraction, "");
    }

    #[test]
    fn percent_multiplier_before_rounding() {
        let (int, frac, _) = run("#,##0%", "0.1235", RoundingMode::HalfEven);
        assert_eq!(int, "12");
        assert_eq!(frac, "");
    }

    #[test]
    fn maximum_integer_truncates_left() {
        let meta = compile("#,##0").unwrap();
        let dec: Decimal = "12345".parse().unwrap();
        let req = Request {
            sub: &meta.positive,
            rounding_mode: RoundingMode::HalfEven,
            negative: false,
            fractional_digits: None,
            currency_fraction: None,
            round_nearest: None,
            maximum_integer_digits: Some(2),
        };
        let parts = decompose(&dec, &req);
        assert_eq!(parts.integer, "45");
    }

    #[test]
    fn zero_with_min_digits() {
        let (int, frac, _) = run("0.00", "0", RoundingMode::HalfEven);
        assert_eq!(int, "0");
        assert_eq!(frac, "00");
    }
}
