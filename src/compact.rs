//! Compact ("short"/"long") formatting: picks a divisor and pattern bucket
//! by magnitude and plural category, then reuses the ordinary compile →
//! decompose → assemble pipeline on the divided value.

use fixed_decimal::Decimal;

use crate::assemble::Assembly;
use crate::currency::BoundCurrency;
use crate::engine::{self, Request};
use crate::error::Error;
use crate::options::ResolvedOptions;
use crate::pattern;
use crate::provider::{FormatStyle, NumberData};

fn magnitude(dec: &Decimal) -> i32 {
    if dec.absolute.is_zero() {
        0
    } else {
        dec.absolute.nonzero_magnitude_start() as i32
    }
}

pub(crate) fn format_compact(
    abs: &Decimal,
    style: FormatStyle,
    res: &ResolvedOptions,
    data: &dyn NumberData,
) -> Result<String, Error> {
    if style == FormatStyle::CurrencyLong {
        return currency_long(abs, res, data);
    }

    let max_exp = data.max_compact_exponent(&res.locale, style) as i32;
    let mag = magnitude(abs);
    if abs.absolute.is_zero() || mag < 3 {
        return crate::format_with_meta(abs, res.meta.clone(), res, data);
    }

    let mode = engine::signed_mode(res.rounding_mode, res.negative);
    let max_frac = res.fractional_digits.unwrap_or(0);

    // The bucket's zero count fixes the divisor: a "00K" bucket at 10^4
    // divides by 10^3 and shows two integer digits.
    let divide_at = |exp: i32| -> Option<(Decimal, i32)> {
        let probe = data
            .compact_pattern(
                &res.locale,
                style,
                exp as u8,
                crate::provider::PluralCategory::Other,
            )
            .unwrap_or("0");
        if probe == "0" {
            return None;
        }
        let zeros = probe.chars().filter(|c| *c == '0').count() as i32;
        let mut divided = abs.clone();
        divided.multiply_pow10((zeros - 1 - exp) as i16);
        divided.round_with_mode(-(max_frac as i16), mode);
        divided.absolute.trim_end();
        Some((divided, zeros))
    };

    let mut exp = mag.min(max_exp);
    let Some((mut divided, zeros)) = divide_at(exp) else {
        return crate::format_with_meta(abs, res.meta.clone(), res, data);
    };

    // Rounding the divided value can carry into the next bucket
    // (999,950,000 → "1B"); re-select once.
    if magnitude(&divided) + 1 > zeros && exp < max_exp {
        exp = (exp - (zeros - 1) + magnitude(&divided)).min(max_exp);
        match divide_at(exp) {
            Some((redivided, _)) => divided = redivided,
            None => return crate::format_with_meta(abs, res.meta.clone(), res, data),
        }
    }

    let plural = data.plural_category(&res.locale, &divided);
    let pattern_src = data
        .compact_pattern(&res.locale, style, exp as u8, plural)
        .or_else(|| {
            data.compact_pattern(
                &res.locale,
                style,
                exp as u8,
                crate::provider::PluralCategory::Other,
            )
        })
        .unwrap_or("0");
    if pattern_src == "0" {
        return crate::format_with_meta(abs, res.meta.clone(), res, data);
    }

    let meta = pattern::compile(pattern_src)?;
    let sub = meta.sub(res.negative);
    let req = Request {
        sub,
        rounding_mode: res.rounding_mode,
        negative: res.negative,
        fractional_digits: res.fractional_digits,
        currency_fraction: None,
        round_nearest: None,
        maximum_integer_digits: None,
    };
    let parts = engine::decompose(&divided, &req);
    let assembly = Assembly {
        sub,
        symbols: &res.symbols,
        currency: res.currency.as_ref(),
        currency_symbol: res.currency_symbol.as_ref(),
        plural: Some(plural),
        minimum_grouping_digits: res.minimum_grouping_digits,
        currency_spacing: res.currency_spacing,
        wrapper: res.wrapper.as_ref(),
    };
    Ok(assembly.assemble(&parts))
}

/// `currency_long` does not divide: the number renders through the standard
/// decimal pattern and the pluralized currency display name follows.
fn currency_long(
    abs: &Decimal,
    res: &ResolvedOptions,
    data: &dyn NumberData,
) -> Result<String, Error> {
    let sub = res.meta.sub(res.negative);
    let req = Request {
        sub,
        rounding_mode: res.rounding_mode,
        negative: res.negative,
        fractional_digits: res.fractional_digits,
        currency_fraction: None,
        round_nearest: res.round_nearest,
        maximum_integer_digits: res.maximum_integer_digits,
    };
    let parts = engine::decompose(abs, &req);
    let plural = data.plural_category(&res.locale, &parts.rounded);

    let name = match res.currency.as_ref() {
        Some(BoundCurrency::Iso(rec)) => rec.display_name(plural).to_string(),
        Some(BoundCurrency::Token(tok)) => tok.long_name.clone(),
        None => String::new(),
    };

    let assembly = Assembly {
        sub,
        symbols: &res.symbols,
        currency: res.currency.as_ref(),
        currency_symbol: res.currency_symbol.as_ref(),
        plural: Some(plural),
        minimum_grouping_digits: res.minimum_grouping_digits,
        currency_spacing: res.currency_spacing,
        wrapper: res.wrapper.as_ref(),
    };
    let body = assembly.assemble(&parts);
    let name = match res.wrapper.as_ref() {
        Some(w) => w(&name, crate::options::Section::Currency),
        None => name,
    };
    Ok(format!("{body} {name}"))
}
