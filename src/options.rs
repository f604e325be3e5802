//! Typed caller options and the resolver that reconciles them with locale
//! data into a fully populated per-call value. Validation short-circuits;
//! nothing downstream ever sees a half-resolved state.

use std::sync::Arc;

use icu::locale::Locale as IcuLocale;

use crate::currency::BoundCurrency;
use crate::error::Error;
use crate::pattern::{self, Affix, Increment, PatternMetadata};
use crate::provider::{FormatStyle, NumberData, NumberSymbols};

/// What the caller selects with `format:`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Format {
    Standard,
    Currency,
    Accounting,
    Percent,
    Scientific,
    /// Rewritten to `DecimalShort` or `CurrencyShort` depending on whether a
    /// currency is supplied.
    Short,
    Long,
    DecimalShort,
    DecimalLong,
    CurrencyShort,
    CurrencyLong,
    CurrencyNoSymbol,
    AccountingNoSymbol,
    CurrencyAlphaNextToNumber,
    AccountingAlphaNextToNumber,
    /// A raw TR35 pattern string.
    Pattern(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CurrencyChoice {
    /// An ISO 4217 code or a digital-token registry identifier.
    Code(String),
    Record(crate::provider::CurrencyRecord),
    /// Use the currency of the locale's territory.
    FromLocale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurrencyDigits {
    Accounting,
    Cash,
    Iso,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CurrencySymbol {
    Standard,
    Iso,
    Narrow,
    Symbol,
    Explicit(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundingMode {
    Down,
    HalfUp,
    HalfEven,
    Ceiling,
    Floor,
    HalfDown,
    Up,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NumberSystemChoice {
    Default,
    Native,
    Named(String),
}

/// Tags handed to the wrapper callback for each emitted component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Literal,
    Number,
    Currency,
    Symbol,
    Pad,
}

pub type Wrapper = Arc<dyn Fn(&str, Section) -> String + Send + Sync>;

/// The caller-facing option bag. Every field has a neutral default; the
/// resolver fills the gaps from locale data.
#[derive(Clone, Default)]
pub struct FormatOptions {
    pub format: Option<Format>,
    pub currency: Option<CurrencyChoice>,
    pub currency_digits: Option<CurrencyDigits>,
    /// Deprecated alias: `true` selects cash digits unless `currency_digits`
    /// is given explicitly.
    pub cash: Option<bool>,
    pub rounding_mode: Option<RoundingMode>,
    pub fractional_digits: Option<u8>,
    pub maximum_integer_digits: Option<u8>,
    pub round_nearest: Option<u32>,
    pub minimum_grouping_digits: Option<u8>,
    pub locale: Option<String>,
    pub number_system: Option<NumberSystemChoice>,
    pub currency_symbol: Option<CurrencySymbol>,
    pub wrapper: Option<Wrapper>,
}

/// Everything downstream components need, fully validated.
#[derive(Clone)]
pub(crate) struct ResolvedOptions {
    pub locale: String,
    pub number_system: String,
    pub symbols: NumberSymbols,
    pub pattern: String,
    pub meta: Arc<PatternMetadata>,
    pub style: Option<FormatStyle>,
    /// Set when a compact style was selected; the compact selector picks the
    /// effective pattern per magnitude bucket.
    pub compact: Option<FormatStyle>,
    pub currency: Option<BoundCurrency>,
    pub currency_digits: CurrencyDigits,
    pub currency_symbol: Option<CurrencySymbol>,
    pub rounding_mode: RoundingMode,
    pub fractional_digits: Option<u8>,
    pub currency_fraction: Option<u8>,
    pub round_nearest: Option<Increment>,
    pub maximum_integer_digits: Option<u8>,
    pub minimum_grouping_digits: u8,
    /// `pattern_sign`: true selects the negative sub-pattern.
    pub negative: bool,
    pub currency_spacing: bool,
    pub wrapper: Option<Wrapper>,
}

pub(crate) fn resolve(
    data: &dyn NumberData,
    opts: &FormatOptions,
    negative: bool,
) -> Result<ResolvedOptions, Error> {
    let requested = opts.locale.as_deref().unwrap_or(data.default_locale());
    let (locale, nu_extension) = canonicalize_locale(requested)?;
    if !data.is_known_locale(&locale) {
        return Err(Error::UnknownLocale(locale));
    }

    let number_system = resolve_number_system(data, &locale, opts, nu_extension)?;
    let symbols = data
        .symbols(&locale, &number_system)
        .ok_or_else(|| Error::UnknownNumberSystem(number_system.clone()))?;

    let currency = resolve_currency(data, &locale, opts)?;
    let currency_digits = match (opts.currency_digits, opts.cash) {
        (Some(d), _) => d,
        (None, Some(true)) => CurrencyDigits::Cash,
        _ => CurrencyDigits::Accounting,
    };

    if let Some(0) = opts.round_nearest {
        return Err(Error::InvalidOption(
            "round_nearest must be a positive integer".to_string(),
        ));
    }

    // A supplied currency with no format promotes the default to the
    // locale's currency format.
    let format = match opts.format.clone() {
        Some(f) => f,
        None if currency.is_some() => match data.default_currency_style(&locale) {
            FormatStyle::Accounting => Format::Accounting,
            _ => Format::Currency,
        },
        None => Format::Standard,
    };

    // `short`/`long` split on currency presence.
    let format = match format {
        Format::Short if currency.is_some() => Format::CurrencyShort,
        Format::Short => Format::DecimalShort,
        Format::Long if currency.is_some() => Format::CurrencyLong,
        Format::Long => Format::DecimalLong,
        other => other,
    };

    let (mut style, compact, mut pattern_src) = match &format {
        Format::Pattern(src) => (None, None, src.clone()),
        named => {
            let style = named_style(named);
            let source_style = if style.is_compact() {
                // Compact formats fall back through the standard pattern;
                // bucket patterns are selected per value later.
                FormatStyle::Standard
            } else {
                style
            };
            let src = data
                .pattern(&locale, &number_system, source_style)
                .ok_or_else(|| {
                    Error::UnknownFormat(format!(
                        "format {} is not defined for locale {locale} and number system {number_system}",
                        source_style.name()
                    ))
                })?;
            (
                Some(style),
                style.is_compact().then_some(style),
                src.to_string(),
            )
        }
    };

    let mut meta = pattern::compile(&pattern_src)?;

    let requires_currency = meta.positive.currency_placeholder_count > 0
        || matches!(
            compact,
            Some(FormatStyle::CurrencyShort) | Some(FormatStyle::CurrencyLong)
        );
    if requires_currency && currency.is_none() {
        return Err(Error::Format(format!(
            "currency format {pattern_src:?} requires that currency be specified"
        )));
    }

    // Alpha-next-to-number: a letter-class symbol directly adjacent to the
    // digits switches to the spaced pattern variant when the locale has one.
    let mut currency_spacing = true;
    if let (Some(bound), Some(s)) = (&currency, style) {
        let variant = match s {
            FormatStyle::Currency => Some(FormatStyle::CurrencyAlphaNextToNumber),
            FormatStyle::Accounting => Some(FormatStyle::AccountingAlphaNextToNumber),
            _ => None,
        };
        if let Some(variant) = variant {
            let symbol = bound.symbol(
                meta.positive.currency_placeholder_count.max(1),
                opts.currency_symbol.as_ref(),
                None,
            );
            if symbol_is_alpha_edged(&symbol) && currency_adjacent_to_number(&meta) {
                if let Some(src) = data.pattern(&locale, &number_system, variant) {
                    pattern_src = src.to_string();
                    meta = pattern::compile(&pattern_src)?;
                    style = Some(variant);
                    currency_spacing = false;
                }
            }
        }
    }

    // Currency fraction digits and rounding apply to currency formats; the
    // caller's overrides win.
    let currency_style = matches!(
        style,
        Some(
            FormatStyle::Currency
                | FormatStyle::Accounting
                | FormatStyle::CurrencyNoSymbol
                | FormatStyle::AccountingNoSymbol
                | FormatStyle::CurrencyAlphaNextToNumber
                | FormatStyle::AccountingAlphaNextToNumber
        )
    ) || matches!(compact, Some(FormatStyle::CurrencyShort));
    let applies_currency_digits = currency.is_some()
        && (currency_style || meta.positive.currency_placeholder_count > 0);
    let currency_fraction = if applies_currency_digits && opts.fractional_digits.is_none() {
        currency
            .as_ref()
            .and_then(|c| c.fraction_digits(currency_digits))
    } else {
        None
    };
    let round_nearest = match opts.round_nearest {
        Some(n) => Some(Increment {
            units: n as i128,
            scale: 0,
        }),
        None if applies_currency_digits && opts.fractional_digits.is_none() => currency
            .as_ref()
            .and_then(|c| c.rounding(currency_digits)),
        None => None,
    };

    let minimum_grouping_digits = opts
        .minimum_grouping_digits
        .unwrap_or_else(|| data.minimum_grouping_digits(&locale));

    Ok(ResolvedOptions {
        locale,
        number_system,
        symbols,
        pattern: pattern_src,
        meta,
        style,
        compact,
        currency,
        currency_digits,
        currency_symbol: opts.currency_symbol.clone(),
        rounding_mode: opts.rounding_mode.unwrap_or(RoundingMode::HalfEven),
        fractional_digits: opts.fractional_digits,
        currency_fraction,
        round_nearest,
        maximum_integer_digits: opts.maximum_integer_digits,
        minimum_grouping_digits,
        negative,
        currency_spacing,
        wrapper: opts.wrapper.clone(),
    })
}

fn named_style(format: &Format) -> FormatStyle {
    match format {
        Format::Standard => FormatStyle::Standard,
        Format::Currency => FormatStyle::Currency,
        Format::Accounting => FormatStyle::Accounting,
        Format::Percent => FormatStyle::Percent,
        Format::Scientific => FormatStyle::Scientific,
        Format::DecimalShort | Format::Short => FormatStyle::DecimalShort,
        Format::DecimalLong | Format::Long => FormatStyle::DecimalLong,
        Format::CurrencyShort => FormatStyle::CurrencyShort,
        Format::CurrencyLong => FormatStyle::CurrencyLong,
        Format::CurrencyNoSymbol => FormatStyle::CurrencyNoSymbol,
        Format::AccountingNoSymbol => FormatStyle::AccountingNoSymbol,
        Format::CurrencyAlphaNextToNumber => FormatStyle::CurrencyAlphaNextToNumber,
        Format::AccountingAlphaNextToNumber => FormatStyle::AccountingAlphaNextToNumber,
        Format::Pattern(_) => FormatStyle::Standard,
    }
}

/// Canonicalizes a locale tag and extracts a `-u-nu-` extension if present.
fn canonicalize_locale(tag: &str) -> Result<(String, Option<String>), Error> {
    let normalized = tag.replace('_', "-");
    let nu = unicode_extension(&normalized, "nu");
    let stripped = strip_unicode_extensions(&normalized);
    let parsed: IcuLocale = stripped
        .parse()
        .map_err(|_| Error::UnknownLocale(tag.to_string()))?;
    Ok((parsed.to_string(), nu))
}

fn unicode_extension(tag: &str, key: &str) -> Option<String> {
    let lower = tag.to_ascii_lowercase();
    let search = match lower.find("-x-") {
        Some(x) => &lower[..x],
        None => &lower[..],
    };
    let u_idx = search.find("-u-")?;
    let tokens: Vec<&str> = search[u_idx + 3..].split('-').collect();
    for i in 0..tokens.len() {
        if tokens[i] == key && i + 1 < tokens.len() && tokens[i + 1].len() > 2 {
            return Some(tokens[i + 1].to_string());
        }
    }
    None
}

fn strip_unicode_extensions(tag: &str) -> String {
    let search_end = tag.find("-x-").unwrap_or(tag.len());
    if let Some(idx) = tag[..search_end].find("-u-") {
        let before = &tag[..idx];
        let after: Vec<&str> = tag[idx + 3..].split('-').collect();
        let mut end_of_u = after.len();
        for (i, token) in after.iter().enumerate() {
            if token.len() == 1 && *token != "u" {
                end_of_u = i;
                break;
            }
        }
        if end_of_u < after.len() {
            format!("{}-{}", before, after[end_of_u..].join("-"))
        } else {
            before.to_string()
        }
    } else {
        tag.to_string()
    }
}

fn resolve_number_system(
    data: &dyn NumberData,
    locale: &str,
    opts: &FormatOptions,
    nu_extension: Option<String>,
) -> Result<String, Error> {
    let name = match &opts.number_system {
        Some(NumberSystemChoice::Default) | None => match nu_extension {
            Some(nu) => nu,
            None => data.default_number_system(locale).to_string(),
        },
        Some(NumberSystemChoice::Native) => data.native_number_system(locale).to_string(),
        Some(NumberSystemChoice::Named(name)) => name.to_ascii_lowercase(),
    };
    if !data.is_known_number_system(&name) {
        return Err(Error::UnknownNumberSystem(name));
    }
    Ok(name)
}

fn is_well_formed_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

fn resolve_currency(
    data: &dyn NumberData,
    locale: &str,
    opts: &FormatOptions,
) -> Result<Option<BoundCurrency>, Error> {
    let choice = match &opts.currency {
        Some(c) => c,
        None => return Ok(None),
    };
    match choice {
        CurrencyChoice::Record(rec) => Ok(Some(BoundCurrency::Iso(rec.clone()))),
        CurrencyChoice::FromLocale => {
            let code = data
                .territory_currency(locale)
                .ok_or_else(|| Error::UnknownCurrency(format!("no currency for locale {locale}")))?;
            let record = data
                .currency(locale, code)
                .ok_or_else(|| Error::UnknownCurrency(code.to_string()))?;
            Ok(Some(BoundCurrency::Iso(record)))
        }
        CurrencyChoice::Code(code) => {
            if is_well_formed_currency_code(code) {
                let upper = code.to_ascii_uppercase();
                if let Some(record) = data.currency(locale, &upper) {
                    return Ok(Some(BoundCurrency::Iso(record)));
                }
            }
            if let Some(token) = data.digital_token(code) {
                return Ok(Some(BoundCurrency::Token(token)));
            }
            Err(Error::UnknownCurrency(code.clone()))
        }
    }
}

fn symbol_is_alpha_edged(symbol: &str) -> bool {
    let first = symbol.chars().next();
    let last = symbol.chars().next_back();
    first.is_some_and(|c| c.is_alphabetic()) || last.is_some_and(|c| c.is_alphabetic())
}

/// True when either sub-pattern has a currency sign with no literal between
/// it and the digits.
fn currency_adjacent_to_number(meta: &PatternMetadata) -> bool {
    let adjacent = |sub: &crate::pattern::SubPattern| {
        matches!(sub.prefix.last(), Some(Affix::Currency(_)))
            || matches!(sub.suffix.first(), Some(Affix::Currency(_)))
    };
    adjacent(&meta.positive) || adjacent(&meta.negative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CldrData;

    fn resolve_ok(opts: FormatOptions) -> ResolvedOptions {
        resolve(&CldrData, &opts, false).unwrap()
    }

    #[test]
    fn defaults_to_standard() {
        let res = resolve_ok(FormatOptions::default());
        assert_eq!(res.locale, "en");
        assert_eq!(res.number_system, "latn");
        assert_eq!(res.style, Some(FormatStyle::Standard));
        assert_eq!(res.rounding_mode, RoundingMode::HalfEven);
    }

    #[test]
    fn currency_promotes_format() {
        let res = resolve_ok(FormatOptions {
            currency: Some(CurrencyChoice::Code("EUR".to_string())),
            ..Default::default()
        });
        assert_eq!(res.style, Some(FormatStyle::Currency));
        assert_eq!(res.currency_fraction, Some(2));
    }

    #[test]
    fn short_splits_on_currency() {
        let res = resolve_ok(FormatOptions {
            format: Some(Format::Short),
            ..Default::default()
        });
        assert_eq!(res.compact, Some(FormatStyle::DecimalShort));

        let res = resolve_ok(FormatOptions {
            format: Some(Format::Short),
            currency: Some(CurrencyChoice::Code("USD".to_string())),
            ..Default::default()
        });
        assert_eq!(res.compact, Some(FormatStyle::CurrencyShort));
    }

    #[test]
    fn currency_format_requires_currency() {
        let err = resolve(
            &CldrData,
            &FormatOptions {
                format: Some(Format::Currency),
                ..Default::default()
            },
            false,
        )
        .err().unwrap();
        assert!(matches!(err, Error::Format(_)));

        let err = resolve(
            &CldrData,
            &FormatOptions {
                format: Some(Format::Pattern("¤#,##0.00".to_string())),
                ..Default::default()
            },
            false,
        )
        .err().unwrap();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn unknown_things_error() {
        let err = resolve(
            &CldrData,
            &FormatOptions {
                locale: Some("zz".to_string()),
                ..Default::default()
            },
            false,
        )
        .err().unwrap();
        assert!(matches!(err, Error::UnknownLocale(_)));

        let err = resolve(
            &CldrData,
            &FormatOptions {
                number_system: Some(NumberSystemChoice::Named("nope".to_string())),
                ..Default::default()
            },
            false,
        )
        .err().unwrap();
        assert!(matches!(err, Error::UnknownNumberSystem(_)));

        let err = resolve(
            &CldrData,
            &FormatOptions {
                currency: Some(CurrencyChoice::Code("XXQ".to_string())),
                ..Default::default()
            },
            false,
        )
        .err().unwrap();
        assert!(matches!(err, Error::UnknownCurrency(_)));
    }

    #[test]
    fn cash_alias() {
        let res = resolve_ok(FormatOptions {
            currency: Some(CurrencyChoice::Code("CHF".to_string())),
            cash: Some(true),
            ..Default::default()
        });
        assert_eq!(res.currency_digits, CurrencyDigits::Cash);
        let nearest = res.round_nearest.unwrap();
        assert_eq!(nearest.units, 5);
        assert_eq!(nearest.scale, -2);

        // Explicit currency_digits beats the deprecated alias.
        let res = resolve_ok(FormatOptions {
            currency: Some(CurrencyChoice::Code("CHF".to_string())),
            cash: Some(true),
            currency_digits: Some(CurrencyDigits::Accounting),
            ..Default::default()
        });
        assert_eq!(res.currency_digits, CurrencyDigits::Accounting);
    }

    #[test]
    fn alpha_next_to_number_switches_pattern() {
        // THB renders as "THB" in en, a letter-edged symbol adjacent to the
        // digits, so the spaced variant takes over.
        let res = resolve_ok(FormatOptions {
            format: Some(Format::Accounting),
            currency: Some(CurrencyChoice::Code("THB".to_string())),
            ..Default::default()
        });
        assert_eq!(res.style, Some(FormatStyle::AccountingAlphaNextToNumber));
        assert!(!res.currency_spacing);

        // EUR's symbol is not a letter; the pattern stays.
        let res = resolve_ok(FormatOptions {
            format: Some(Format::Currency),
            currency: Some(CurrencyChoice::Code("EUR".to_string())),
            ..Default::default()
        });
        assert_eq!(res.style, Some(FormatStyle::Currency));
        assert!(res.currency_spacing);
    }

    #[test]
    fn nu_extension_selects_number_system() {
        let res = resolve_ok(FormatOptions {
            locale: Some("th-u-nu-thai".to_string()),
            ..Default::default()
        });
        assert_eq!(res.locale, "th");
        assert_eq!(res.number_system, "thai");
    }

    #[test]
    fn native_number_system() {
        let res = resolve_ok(FormatOptions {
            locale: Some("th".to_string()),
            number_system: Some(NumberSystemChoice::Native),
            ..Default::default()
        });
        assert_eq!(res.number_system, "thai");
    }

    #[test]
    fn round_nearest_zero_rejected() {
        let err = resolve(
            &CldrData,
            &FormatOptions {
                round_nearest: Some(0),
                ..Default::default()
            },
            false,
        )
        .err().unwrap();
        assert!(matches!(err, Error::InvalidOption(_)));
    }

    #[test]
    fn from_locale_currency() {
        let res = resolve_ok(FormatOptions {
            locale: Some("fr".to_string()),
            currency: Some(CurrencyChoice::FromLocale),
            ..Default::default()
        });
        assert_eq!(res.currency.as_ref().unwrap().code(), "EUR");
    }

    #[test]
    fn digital_token_currency() {
        let res = resolve_ok(FormatOptions {
            currency: Some(CurrencyChoice::Code("4H95J0R2X".to_string())),
            ..Default::default()
        });
        assert_eq!(res.currency.as_ref().unwrap().code(), "BTC");
        // Tokens contribute no fraction digits; the pattern's stand.
        assert_eq!(res.currency_fraction, None);
    }
}
