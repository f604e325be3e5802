//! A locale-aware number formatting engine implementing the CLDR decimal
//! format patterns of UTS 35 §3: pattern compilation, rounding, grouping,
//! significant digits, scientific and compact notation, currency binding,
//! and padding, over integers, doubles, and arbitrary-precision decimals.
//!
//! The core is purely functional: every call is a computation over the
//! value, a typed option bag, and a [`NumberData`] provider. The built-in
//! [`CldrData`] provider embeds a CLDR snapshot for a handful of locales;
//! production callers can supply their own loader.
//!
//! ```
//! use cldrfmt::{format, CldrData, FormatOptions};
//!
//! let s = format(12345, &CldrData, &FormatOptions::default()).unwrap();
//! assert_eq!(s, "12,345");
//! ```

mod assemble;
mod compact;
mod currency;
mod data;
mod engine;
mod error;
mod options;
mod pattern;
mod provider;
mod value;

pub use data::CldrData;
pub use error::{CompileError, Error};
pub use options::{
    CurrencyChoice, CurrencyDigits, CurrencySymbol, Format, FormatOptions, NumberSystemChoice,
    RoundingMode, Section, Wrapper,
};
pub use pattern::{compile, Affix, PadPosition, PatternMetadata, SubPattern};
pub use provider::{
    CurrencyRecord, CurrencySpacing, DigitalToken, FormatStyle, NumberData, NumberSymbols,
    PluralCategory,
};
pub use value::Number;

use std::sync::Arc;

use fixed_decimal::Decimal;

use assemble::Assembly;
use options::ResolvedOptions;
use value::{classify, into_absolute, Classified};

/// Formats a numeric value against the given data provider and options.
pub fn format(
    value: impl Into<Number>,
    data: &dyn NumberData,
    options: &FormatOptions,
) -> Result<String, Error> {
    let number = value.into();
    let classified = classify(&number);
    let negative = matches!(
        classified,
        Classified::Finite { negative: true, .. } | Classified::Infinite { negative: true }
    );
    let res = options::resolve(data, options, negative)?;

    match classified {
        Classified::NaN => Ok(non_finite(&res, |s| s.nan.clone())),
        Classified::Infinite { .. } => Ok(non_finite(&res, |s| s.infinity.clone())),
        Classified::Finite { dec, .. } => {
            let abs = into_absolute(dec);
            match res.compact {
                Some(style) => compact::format_compact(&abs, style, &res, data),
                None => format_with_meta(&abs, res.meta.clone(), &res, data),
            }
        }
    }
}

/// Runs the decompose → assemble pipeline for one compiled pattern. The
/// compact selector reuses this for its standard-format fallback.
pub(crate) fn format_with_meta(
    abs: &Decimal,
    meta: Arc<PatternMetadata>,
    res: &ResolvedOptions,
    data: &dyn NumberData,
) -> Result<String, Error> {
    let sub = meta.sub(res.negative);
    let req = engine::Request {
        sub,
        rounding_mode: res.rounding_mode,
        negative: res.negative,
        fractional_digits: res.fractional_digits,
        currency_fraction: res.currency_fraction,
        round_nearest: res.round_nearest,
        maximum_integer_digits: res.maximum_integer_digits,
    };
    let parts = engine::decompose(abs, &req);

    let wants_plural = sub
        .prefix
        .iter()
        .chain(sub.suffix.iter())
        .any(|t| matches!(t, Affix::Currency(3)));
    let plural = wants_plural.then(|| data.plural_category(&res.locale, &parts.rounded));

    let assembly = Assembly {
        sub,
        symbols: &res.symbols,
        currency: res.currency.as_ref(),
        currency_symbol: res.currency_symbol.as_ref(),
        plural,
        minimum_grouping_digits: res.minimum_grouping_digits,
        currency_spacing: res.currency_spacing,
        wrapper: res.wrapper.as_ref(),
    };
    Ok(assembly.assemble(&parts))
}

/// NaN and infinity render the symbol-table string inside the
/// sign-appropriate affixes; no digit processing happens.
fn non_finite(res: &ResolvedOptions, text: impl Fn(&NumberSymbols) -> String) -> String {
    let sub = res.meta.sub(res.negative);
    let assembly = Assembly {
        sub,
        symbols: &res.symbols,
        currency: res.currency.as_ref(),
        currency_symbol: res.currency_symbol.as_ref(),
        plural: None,
        minimum_grouping_digits: res.minimum_grouping_digits,
        currency_spacing: res.currency_spacing,
        wrapper: res.wrapper.as_ref(),
    };
    assembly.assemble_non_finite(&text(&res.symbols))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(value: impl Into<Number>, opts: FormatOptions) -> String {
        format(value, &CldrData, &opts).unwrap()
    }

    fn with_locale(locale: &str) -> FormatOptions {
        FormatOptions {
            locale: Some(locale.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn standard_english() {
        assert_eq!(fmt(12345, FormatOptions::default()), "12,345");
    }

    #[test]
    fn french_grouping_uses_narrow_space() {
        assert_eq!(fmt(12345, with_locale("fr")), "12\u{202F}345");
    }

    #[test]
    fn spanish_euro_with_grouping_option() {
        let opts = FormatOptions {
            locale: Some("es".to_string()),
            currency: Some(CurrencyChoice::Code("EUR".to_string())),
            minimum_grouping_digits: Some(1),
            ..Default::default()
        };
        assert_eq!(fmt(1345.32, opts), "1.345,32\u{00A0}€");
    }

    #[test]
    fn spanish_euro_default_grouping() {
        // Spanish requires five integer digits before grouping kicks in.
        let opts = FormatOptions {
            locale: Some("es".to_string()),
            currency: Some(CurrencyChoice::Code("EUR".to_string())),
            ..Default::default()
        };
        assert_eq!(fmt(1345.32, opts), "1345,32\u{00A0}€");
    }

    #[test]
    fn raw_scientific_pattern() {
        let opts = FormatOptions {
            format: Some(Format::Pattern("#E0".to_string())),
            ..Default::default()
        };
        assert_eq!(fmt(12345, opts), "1.2345E4");
    }

    #[test]
    fn accounting_thb_negative() {
        let opts = FormatOptions {
            format: Some(Format::Accounting),
            currency: Some(CurrencyChoice::Code("THB".to_string())),
            ..Default::default()
        };
        assert_eq!(fmt(-12345, opts), "(THB\u{00A0}12,345.00)");
    }

    #[test]
    fn accounting_thb_thai_native_digits() {
        let opts = FormatOptions {
            format: Some(Format::Accounting),
            currency: Some(CurrencyChoice::Code("THB".to_string())),
            locale: Some("th".to_string()),
            number_system: Some(NumberSystemChoice::Native),
            ..Default::default()
        };
        assert_eq!(fmt(12345, opts), "฿๑๒,๓๔๕.๐๐");
    }

    #[test]
    fn half_even_fraction() {
        let opts = FormatOptions {
            format: Some(Format::Pattern("0.00".to_string())),
            ..Default::default()
        };
        assert_eq!(fmt(0.125, opts), "0.12");
    }

    #[test]
    fn zero_under_every_named_format() {
        assert_eq!(fmt(0, FormatOptions::default()), "0");
        let opts = FormatOptions {
            format: Some(Format::Percent),
            ..Default::default()
        };
        assert_eq!(fmt(0, opts), "0%");
        let opts = FormatOptions {
            format: Some(Format::Scientific),
            ..Default::default()
        };
        assert_eq!(fmt(0, opts), "0E0");
        let opts = FormatOptions {
            format: Some(Format::Currency),
            currency: Some(CurrencyChoice::Code("USD".to_string())),
            ..Default::default()
        };
        assert_eq!(fmt(0, opts), "$0.00");
        let opts = FormatOptions {
            format: Some(Format::Short),
            ..Default::default()
        };
        assert_eq!(fmt(0, opts), "0");
    }

    #[test]
    fn negative_zero_double_formats_positive() {
        assert_eq!(fmt(-0.0, FormatOptions::default()), "0");
    }

    #[test]
    fn non_finite_values() {
        assert_eq!(fmt(f64::NAN, FormatOptions::default()), "NaN");
        assert_eq!(fmt(f64::INFINITY, FormatOptions::default()), "∞");
        assert_eq!(fmt(f64::NEG_INFINITY, FormatOptions::default()), "-∞");
    }

    #[test]
    fn fraction_rounds_across_integer() {
        let opts = FormatOptions {
            format: Some(Format::Pattern("0.00".to_string())),
            ..Default::default()
        };
        assert_eq!(fmt(9.999, opts), "10.00");
    }

    #[test]
    fn percent_multiplies() {
        let opts = FormatOptions {
            format: Some(Format::Percent),
            ..Default::default()
        };
        assert_eq!(fmt(0.34, opts.clone()), "34%");
        let fr = FormatOptions {
            locale: Some("fr".to_string()),
            ..opts
        };
        assert_eq!(fmt(0.34, fr), "34\u{00A0}%");
    }

    #[test]
    fn currency_placeholder_ladder() {
        for (pattern, expected) in [
            ("¤#,##0.00", "$1,234.50"),
            ("¤¤\u{00A0}#,##0.00", "USD\u{00A0}1,234.50"),
            ("#,##0.00 ¤¤¤", "1,234.50 US dollars"),
            ("¤¤¤¤#,##0.00", "$1,234.50"),
        ] {
            let opts = FormatOptions {
                format: Some(Format::Pattern(pattern.to_string())),
                currency: Some(CurrencyChoice::Code("USD".to_string())),
                ..Default::default()
            };
            assert_eq!(fmt(1234.5, opts), expected, "for {pattern}");
        }
    }

    #[test]
    fn currency_symbol_override() {
        let opts = FormatOptions {
            currency: Some(CurrencyChoice::Code("USD".to_string())),
            currency_symbol: Some(CurrencySymbol::Iso),
            ..Default::default()
        };
        assert_eq!(fmt(2, opts), "USD\u{00A0}2.00");

        let opts = FormatOptions {
            currency: Some(CurrencyChoice::Code("USD".to_string())),
            currency_symbol: Some(CurrencySymbol::Explicit("US$".to_string())),
            ..Default::default()
        };
        // The explicit string starts with a letter, so the spaced variant
        // still applies.
        assert_eq!(fmt(2, opts), "US$\u{00A0}2.00");
    }

    #[test]
    fn currency_spacing_inserted_for_letter_symbols() {
        // The ISO code ends with a letter and sits against the digits, so
        // the no-break space is inserted.
        let opts = FormatOptions {
            format: Some(Format::Pattern("¤¤#,##0.00".to_string())),
            currency: Some(CurrencyChoice::Code("EUR".to_string())),
            ..Default::default()
        };
        assert_eq!(fmt(5, opts), "EUR\u{00A0}5.00");

        // A non-letter symbol stays glued.
        let opts = FormatOptions {
            format: Some(Format::Pattern("¤#,##0.00".to_string())),
            currency: Some(CurrencyChoice::Code("EUR".to_string())),
            ..Default::default()
        };
        assert_eq!(fmt(5, opts), "€5.00");
    }

    #[test]
    fn japanese_yen_has_no_fraction() {
        let opts = FormatOptions {
            currency: Some(CurrencyChoice::Code("JPY".to_string())),
            ..Default::default()
        };
        assert_eq!(fmt(1234, opts), "¥1,234");
    }

    #[test]
    fn cash_digits_snap_to_nickel() {
        let opts = FormatOptions {
            currency: Some(CurrencyChoice::Code("CHF".to_string())),
            cash: Some(true),
            ..Default::default()
        };
        assert_eq!(fmt(1.02, opts), "CHF\u{00A0}1.00");
        let opts = FormatOptions {
            currency: Some(CurrencyChoice::Code("CHF".to_string())),
            currency_digits: Some(CurrencyDigits::Cash),
            ..Default::default()
        };
        assert_eq!(fmt(1.03, opts), "CHF\u{00A0}1.05");
    }

    #[test]
    fn fractional_digits_override() {
        let opts = FormatOptions {
            currency: Some(CurrencyChoice::Code("USD".to_string())),
            fractional_digits: Some(0),
            ..Default::default()
        };
        assert_eq!(fmt(1234.56, opts), "$1,235");
    }

    #[test]
    fn maximum_integer_digits_truncates() {
        let opts = FormatOptions {
            maximum_integer_digits: Some(3),
            ..Default::default()
        };
        assert_eq!(fmt(987654, opts), "654");
    }

    #[test]
    fn round_nearest_multiples() {
        let opts = FormatOptions {
            round_nearest: Some(25),
            ..Default::default()
        };
        assert_eq!(fmt(1112, opts), "1,100");
    }

    #[test]
    fn compact_short() {
        let opts = FormatOptions {
            format: Some(Format::Short),
            ..Default::default()
        };
        assert_eq!(fmt(12345, opts.clone()), "12K");
        assert_eq!(fmt(1234, opts.clone()), "1K");
        assert_eq!(fmt(999, opts.clone()), "999");
        assert_eq!(fmt(1234567, opts.clone()), "1M");
        assert_eq!(fmt(-12345, opts), "-12K");
    }

    #[test]
    fn compact_short_carry_to_next_bucket() {
        let opts = FormatOptions {
            format: Some(Format::Short),
            ..Default::default()
        };
        assert_eq!(fmt(999_950_000, opts), "1B");
    }

    #[test]
    fn compact_long_plural() {
        let opts = FormatOptions {
            format: Some(Format::Long),
            ..Default::default()
        };
        assert_eq!(fmt(12345, opts.clone()), "12 thousand");
        assert_eq!(fmt(1000, opts), "1 thousand");
    }

    #[test]
    fn compact_currency_short() {
        let opts = FormatOptions {
            format: Some(Format::Short),
            currency: Some(CurrencyChoice::Code("USD".to_string())),
            ..Default::default()
        };
        assert_eq!(fmt(12345, opts), "$12K");
    }

    #[test]
    fn compact_falls_back_without_data() {
        // German has no short form below a million.
        let opts = FormatOptions {
            format: Some(Format::Short),
            locale: Some("de".to_string()),
            ..Default::default()
        };
        assert_eq!(fmt(12345, opts.clone()), "12.345");
        assert_eq!(fmt(12_345_678, opts), "12\u{00A0}Mio.");
    }

    #[test]
    fn currency_long_display_name() {
        let opts = FormatOptions {
            format: Some(Format::Long),
            currency: Some(CurrencyChoice::Code("USD".to_string())),
            ..Default::default()
        };
        assert_eq!(fmt(12345, opts.clone()), "12,345 US dollars");
        assert_eq!(fmt(1, opts), "1 US dollar");
    }

    #[test]
    fn compact_fractional_digits() {
        let opts = FormatOptions {
            format: Some(Format::Short),
            fractional_digits: Some(1),
            ..Default::default()
        };
        assert_eq!(fmt(12345, opts), "12.3K");
    }

    #[test]
    fn digital_token_formatting() {
        let opts = FormatOptions {
            currency: Some(CurrencyChoice::Code("4H95J0R2X".to_string())),
            ..Default::default()
        };
        // Token short names are letters, so the spaced variant applies.
        assert_eq!(fmt(0.05, opts), "BTC\u{00A0}0.05");
    }

    #[test]
    fn from_locale_currency() {
        let opts = FormatOptions {
            locale: Some("fr".to_string()),
            currency: Some(CurrencyChoice::FromLocale),
            ..Default::default()
        };
        assert_eq!(fmt(9.9, opts), "9,90\u{00A0}€");
    }

    #[test]
    fn bigint_input() {
        let big: num_bigint::BigInt = "123456789012345678".parse().unwrap();
        assert_eq!(
            fmt(big, FormatOptions::default()),
            "123,456,789,012,345,678"
        );
    }

    #[test]
    fn decimal_input_preserves_precision() {
        let dec: fixed_decimal::Decimal = "0.1000".parse().unwrap();
        let opts = FormatOptions {
            format: Some(Format::Pattern("0.####".to_string())),
            ..Default::default()
        };
        // Trailing zeros trim down to the pattern's minimum.
        assert_eq!(fmt(dec, opts), "0.1");
    }

    #[test]
    fn deterministic() {
        let opts = FormatOptions {
            currency: Some(CurrencyChoice::Code("EUR".to_string())),
            locale: Some("fr".to_string()),
            ..Default::default()
        };
        let a = fmt(1234.56, opts.clone());
        let b = fmt(1234.56, opts);
        assert_eq!(a, b);
    }

    #[test]
    fn sign_symmetry() {
        let pos = fmt(1234.5, FormatOptions::default());
        let neg = fmt(-1234.5, FormatOptions::default());
        assert_eq!(neg, format!("-{pos}"));
    }

    #[test]
    fn wrapper_decorates_components() {
        let wrapper: Wrapper = std::sync::Arc::new(|text, section| match section {
            Section::Currency => format!("[{text}]"),
            _ => text.to_string(),
        });
        let opts = FormatOptions {
            currency: Some(CurrencyChoice::Code("EUR".to_string())),
            wrapper: Some(wrapper),
            ..Default::default()
        };
        assert_eq!(fmt(5, opts), "[€]5.00");
    }

    #[test]
    fn unknown_locale_is_reported() {
        let err = format(
            1,
            &CldrData,
            &FormatOptions {
                locale: Some("xx".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnknownLocale(_)));
    }

    #[test]
    fn padded_pattern() {
        let opts = FormatOptions {
            format: Some(Format::Pattern("*x#,##0.0".to_string())),
            ..Default::default()
        };
        assert_eq!(fmt(12.3, opts), "xxx12.3");
    }

    #[test]
    fn hindi_secondary_grouping() {
        assert_eq!(fmt(12345678, with_locale("hi")), "1,23,45,678");
    }

    #[test]
    fn arabic_native_digits() {
        let opts = FormatOptions {
            locale: Some("ar".to_string()),
            ..Default::default()
        };
        assert_eq!(fmt(1234.5, opts), "١\u{066C}٢٣٤\u{066B}٥");
    }
}
