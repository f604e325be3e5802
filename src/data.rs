//! An embedded CLDR snapshot: enough locales, number systems, currencies,
//! and compact data to run and test the engine without an external loader.
//! Everything here is plain data in match tables; the formatting core only
//! sees it through the `NumberData` trait.

use fixed_decimal::Decimal;
use icu::locale::Locale as IcuLocale;
use icu::plurals::{
    PluralCategory as IcuPluralCategory, PluralOperands, PluralRuleType,
    PluralRules as IcuPluralRules, PluralRulesOptions, PluralRulesPreferences,
};

use crate::provider::{
    CurrencyRecord, CurrencySpacing, DigitalToken, FormatStyle, NumberData, NumberSymbols,
    PluralCategory,
};

/// The built-in data provider.
pub struct CldrData;

fn lang_of(locale: &str) -> &str {
    locale
        .split('-')
        .next()
        .unwrap_or(locale)
        .split('_')
        .next()
        .unwrap_or(locale)
}

pub(crate) fn zero_digit(system: &str) -> Option<char> {
    match system {
        "latn" => Some('0'),
        "arab" => Some('\u{0660}'),
        "arabext" => Some('\u{06F0}'),
        "beng" => Some('\u{09E6}'),
        "deva" => Some('\u{0966}'),
        "fullwide" => Some('\u{FF10}'),
        "gujr" => Some('\u{0AE6}'),
        "guru" => Some('\u{0A66}'),
        "khmr" => Some('\u{17E0}'),
        "knda" => Some('\u{0CE6}'),
        "laoo" => Some('\u{0ED0}'),
        "mlym" => Some('\u{0D66}'),
        "mymr" => Some('\u{1040}'),
        "olck" => Some('\u{1C50}'),
        "orya" => Some('\u{0B66}'),
        "sinh" => Some('\u{0DE6}'),
        "tamldec" => Some('\u{0BE6}'),
        "telu" => Some('\u{0C66}'),
        "thai" => Some('\u{0E50}'),
        "tibt" => Some('\u{0F20}'),
        "vaii" => Some('\u{A620}'),
        _ => None,
    }
}

fn nan_string(lang: &str) -> &'static str {
    match lang {
        "ar" => "\u{0644}\u{064A}\u{0633}\u{0020}\u{0631}\u{0642}\u{0645}\u{064B}\u{0627}", // ليس رقمًا
        _ => "NaN",
    }
}

fn separators(lang: &str) -> (&'static str, &'static str) {
    match lang {
        "fr" => (",", "\u{202F}"), // narrow no-break space
        "de" | "es" => (",", "."),
        _ => (".", ","),
    }
}

impl NumberData for CldrData {
    fn default_locale(&self) -> &str {
        "en"
    }

    fn is_known_locale(&self, locale: &str) -> bool {
        matches!(
            lang_of(locale),
            "en" | "fr" | "de" | "es" | "th" | "ar" | "ja" | "hi"
        )
    }

    fn default_number_system(&self, locale: &str) -> &str {
        match lang_of(locale) {
            "ar" => "arab",
            _ => "latn",
        }
    }

    fn native_number_system(&self, locale: &str) -> &str {
        match lang_of(locale) {
            "th" => "thai",
            "ar" => "arab",
            "hi" => "deva",
            other => self.default_number_system(other),
        }
    }

    fn is_known_number_system(&self, system: &str) -> bool {
        zero_digit(system).is_some()
    }

    fn symbols(&self, locale: &str, system: &str) -> Option<NumberSymbols> {
        let zero = zero_digit(system)?;
        let lang = lang_of(locale);
        let (decimal, group) = if system == "arab" || system == "arabext" {
            ("\u{066B}", "\u{066C}") // Arabic decimal and thousands separators
        } else {
            separators(lang)
        };
        let percent = if system == "arab" || system == "arabext" {
            "\u{066A}" // ٪
        } else {
            "%"
        };
        Some(NumberSymbols {
            zero_digit: zero,
            decimal: decimal.to_string(),
            group: group.to_string(),
            exponential: "E".to_string(),
            plus_sign: "+".to_string(),
            minus_sign: "-".to_string(),
            percent_sign: percent.to_string(),
            permille_sign: "‰".to_string(),
            infinity: "∞".to_string(),
            nan: nan_string(lang).to_string(),
            currency_decimal: None,
            currency_group: None,
            before_currency: CurrencySpacing::no_break_space(),
            after_currency: CurrencySpacing::no_break_space(),
        })
    }

    fn pattern(&self, locale: &str, _system: &str, style: FormatStyle) -> Option<&str> {
        let lang = lang_of(locale);
        match style {
            FormatStyle::Standard => Some(match lang {
                "hi" => "#,##,##0.###",
                _ => "#,##0.###",
            }),
            FormatStyle::Percent => Some(match lang {
                "fr" | "de" | "es" | "ar" => "#,##0\u{00A0}%",
                _ => "#,##0%",
            }),
            FormatStyle::Scientific => Some("#E0"),
            FormatStyle::Currency => Some(match lang {
                "fr" | "de" | "es" => "#,##0.00\u{00A0}¤",
                "ar" => "¤\u{00A0}#,##0.00",
                "hi" => "¤#,##,##0.00",
                _ => "¤#,##0.00",
            }),
            FormatStyle::Accounting => Some(match lang {
                "fr" | "es" => "#,##0.00\u{00A0}¤;(#,##0.00\u{00A0}¤)",
                "de" => "#,##0.00\u{00A0}¤",
                "ar" => "¤\u{00A0}#,##0.00;(¤\u{00A0}#,##0.00)",
                "hi" => "¤#,##,##0.00;(¤#,##,##0.00)",
                _ => "¤#,##0.00;(¤#,##0.00)",
            }),
            FormatStyle::CurrencyNoSymbol => Some(match lang {
                "hi" => "#,##,##0.00",
                _ => "#,##0.00",
            }),
            FormatStyle::AccountingNoSymbol => Some(match lang {
                "hi" => "#,##,##0.00",
                _ => "#,##0.00;(#,##0.00)",
            }),
            FormatStyle::CurrencyAlphaNextToNumber => match lang {
                "en" | "th" | "ja" => Some("¤\u{00A0}#,##0.00"),
                "hi" => Some("¤\u{00A0}#,##,##0.00"),
                _ => None,
            },
            FormatStyle::AccountingAlphaNextToNumber => match lang {
                "en" | "th" | "ja" => Some("¤\u{00A0}#,##0.00;(¤\u{00A0}#,##0.00)"),
                _ => None,
            },
            FormatStyle::DecimalShort
            | FormatStyle::DecimalLong
            | FormatStyle::CurrencyShort
            | FormatStyle::CurrencyLong => None,
        }
    }

    fn default_currency_style(&self, _locale: &str) -> FormatStyle {
        FormatStyle::Currency
    }

    fn currency(&self, locale: &str, code: &str) -> Option<CurrencyRecord> {
        let lang = lang_of(locale);
        let (fraction, cash_fraction, rounding, cash_rounding) = match code {
            "BHD" | "IQD" | "JOD" | "KWD" | "LYD" | "OMR" | "TND" => (3, 3, 0, 0),
            "JPY" | "KRW" | "VND" | "ISK" | "CLP" | "PYG" => (0, 0, 0, 0),
            "CHF" => (2, 2, 0, 5),
            _ => (2, 2, 0, 0),
        };
        let (symbol, narrow): (&str, &str) = match code {
            "USD" => match lang {
                "en" | "ja" | "de" | "fr" => ("$", "$"),
                _ => ("US$", "$"),
            },
            "EUR" => ("€", "€"),
            "GBP" => ("£", "£"),
            "JPY" => match lang {
                "ja" => ("￥", "¥"),
                _ => ("¥", "¥"),
            },
            "CNY" => ("CN¥", "¥"),
            "THB" => match lang {
                "th" => ("฿", "฿"),
                _ => ("THB", "฿"),
            },
            "CHF" => ("CHF", "CHF"),
            "INR" => ("₹", "₹"),
            "EGP" => match lang {
                "ar" => ("\u{062C}.\u{0645}.", "E£"), // ج.م.
                _ => ("EGP", "E£"),
            },
            "BRL" => ("R$", "R$"),
            "KRW" => ("₩", "₩"),
            _ => return None,
        };
        let (one, other) = match code {
            "USD" => ("US dollar", "US dollars"),
            "EUR" => ("euro", "euros"),
            "GBP" => ("British pound", "British pounds"),
            "JPY" => ("Japanese yen", "Japanese yen"),
            "CNY" => ("Chinese yuan", "Chinese yuan"),
            "THB" => ("Thai baht", "Thai baht"),
            "CHF" => ("Swiss franc", "Swiss francs"),
            "INR" => ("Indian rupee", "Indian rupees"),
            "EGP" => ("Egyptian pound", "Egyptian pounds"),
            "BRL" => ("Brazilian real", "Brazilian reais"),
            "KRW" => ("South Korean won", "South Korean won"),
            _ => return None,
        };
        Some(CurrencyRecord {
            code: code.to_string(),
            symbol: symbol.to_string(),
            narrow_symbol: narrow.to_string(),
            display_name_one: one.to_string(),
            display_name_other: other.to_string(),
            fraction_digits: fraction,
            cash_fraction_digits: cash_fraction,
            rounding_increment: rounding,
            cash_rounding_increment: cash_rounding,
        })
    }

    fn digital_token(&self, id: &str) -> Option<DigitalToken> {
        match id {
            "4H95J0R2X" => Some(DigitalToken {
                id: id.to_string(),
                short_name: "BTC".to_string(),
                long_name: "Bitcoin".to_string(),
            }),
            _ => None,
        }
    }

    fn territory_currency(&self, locale: &str) -> Option<&str> {
        match lang_of(locale) {
            "en" => Some("USD"),
            "fr" | "de" | "es" => Some("EUR"),
            "th" => Some("THB"),
            "ja" => Some("JPY"),
            "ar" => Some("EGP"),
            "hi" => Some("INR"),
            _ => None,
        }
    }

    fn minimum_grouping_digits(&self, locale: &str) -> u8 {
        match lang_of(locale) {
            "es" => 2,
            _ => 1,
        }
    }

    fn plural_category(&self, locale: &str, value: &Decimal) -> PluralCategory {
        let loc: IcuLocale = locale
            .parse()
            .unwrap_or_else(|_| "en".parse().unwrap());
        let prefs = PluralRulesPreferences::from(&loc);
        let mut opts = PluralRulesOptions::default();
        opts.rule_type = Some(PluralRuleType::Cardinal);
        let rules = match IcuPluralRules::try_new(prefs, opts) {
            Ok(r) => r,
            Err(_) => return PluralCategory::Other,
        };
        match rules.category_for(PluralOperands::from(value)) {
            IcuPluralCategory::Zero => PluralCategory::Zero,
            IcuPluralCategory::One => PluralCategory::One,
            IcuPluralCategory::Two => PluralCategory::Two,
            IcuPluralCategory::Few => PluralCategory::Few,
            IcuPluralCategory::Many => PluralCategory::Many,
            IcuPluralCategory::Other => PluralCategory::Other,
        }
    }

    fn compact_pattern(
        &self,
        locale: &str,
        style: FormatStyle,
        exponent: u8,
        plural: PluralCategory,
    ) -> Option<&str> {
        let lang = lang_of(locale);
        match style {
            FormatStyle::DecimalShort => decimal_short(lang, exponent),
            FormatStyle::DecimalLong => decimal_long(lang, exponent, plural),
            FormatStyle::CurrencyShort => currency_short(lang, exponent),
            _ => None,
        }
    }

    fn max_compact_exponent(&self, locale: &str, _style: FormatStyle) -> u8 {
        match lang_of(locale) {
            "en" | "th" | "fr" | "es" | "de" | "ja" => 14,
            _ => 0,
        }
    }
}

fn decimal_short(lang: &str, exponent: u8) -> Option<&'static str> {
    match lang {
        "en" | "th" => Some(match exponent {
            3 => "0K",
            4 => "00K",
            5 => "000K",
            6 => "0M",
            7 => "00M",
            8 => "000M",
            9 => "0B",
            10 => "00B",
            11 => "000B",
            12 => "0T",
            13 => "00T",
            14 => "000T",
            _ => "0",
        }),
        "fr" => Some(match exponent {
            3 => "0\u{00A0}k",
            4 => "00\u{00A0}k",
            5 => "000\u{00A0}k",
            6 => "0\u{00A0}M",
            7 => "00\u{00A0}M",
            8 => "000\u{00A0}M",
            9 => "0\u{00A0}Md",
            10 => "00\u{00A0}Md",
            11 => "000\u{00A0}Md",
            12 => "0\u{00A0}Bn",
            13 => "00\u{00A0}Bn",
            14 => "000\u{00A0}Bn",
            _ => "0",
        }),
        "es" => Some(match exponent {
            3 => "0\u{00A0}mil",
            4 => "00\u{00A0}mil",
            5 => "000\u{00A0}mil",
            6 => "0\u{00A0}M",
            7 => "00\u{00A0}M",
            8 => "000\u{00A0}M",
            9 => "0000\u{00A0}M",
            10 => "00\u{00A0}mil\u{00A0}M",
            11 => "000\u{00A0}mil\u{00A0}M",
            12 => "0\u{00A0}B",
            13 => "00\u{00A0}B",
            14 => "000\u{00A0}B",
            _ => "0",
        }),
        "de" => Some(match exponent {
            // German has no short form below a million.
            6 => "0\u{00A0}Mio.",
            7 => "00\u{00A0}Mio.",
            8 => "000\u{00A0}Mio.",
            9 => "0\u{00A0}Mrd.",
            10 => "00\u{00A0}Mrd.",
            11 => "000\u{00A0}Mrd.",
            12 => "0\u{00A0}Bio.",
            13 => "00\u{00A0}Bio.",
            14 => "000\u{00A0}Bio.",
            _ => "0",
        }),
        "ja" => Some(match exponent {
            4 => "0万",
            5 => "00万",
            6 => "000万",
            7 => "0000万",
            8 => "0億",
            9 => "00億",
            10 => "000億",
            11 => "0000億",
            12 => "0兆",
            13 => "00兆",
            14 => "000兆",
            _ => "0",
        }),
        _ => None,
    }
}

fn decimal_long(lang: &str, exponent: u8, plural: PluralCategory) -> Option<&'static str> {
    match lang {
        "en" => Some(match exponent {
            3 => "0 thousand",
            4 => "00 thousand",
            5 => "000 thousand",
            6 => "0 million",
            7 => "00 million",
            8 => "000 million",
            9 => "0 billion",
            10 => "00 billion",
            11 => "000 billion",
            12 => "0 trillion",
            13 => "00 trillion",
            14 => "000 trillion",
            _ => "0",
        }),
        "fr" => Some(match (exponent, plural) {
            (3, _) => "0 mille",
            (4, _) => "00 mille",
            (5, _) => "000 mille",
            (6, PluralCategory::One) => "0 million",
            (6, _) => "0 millions",
            (7, _) => "00 millions",
            (8, _) => "000 millions",
            (9, PluralCategory::One) => "0 milliard",
            (9, _) => "0 milliards",
            (10, _) => "00 milliards",
            (11, _) => "000 milliards",
            (12, PluralCategory::One) => "0 billion",
            (12, _) => "0 billions",
            (13, _) => "00 billions",
            (14, _) => "000 billions",
            _ => "0",
        }),
        _ => decimal_short(lang, exponent),
    }
}

fn currency_short(lang: &str, exponent: u8) -> Option<&'static str> {
    match lang {
        "en" | "th" => Some(match exponent {
            3 => "¤0K",
            4 => "¤00K",
            5 => "¤000K",
            6 => "¤0M",
            7 => "¤00M",
            8 => "¤000M",
            9 => "¤0B",
            10 => "¤00B",
            11 => "¤000B",
            12 => "¤0T",
            13 => "¤00T",
            14 => "¤000T",
            _ => "0",
        }),
        "fr" => Some(match exponent {
            3 => "0\u{00A0}k\u{00A0}¤",
            4 => "00\u{00A0}k\u{00A0}¤",
            5 => "000\u{00A0}k\u{00A0}¤",
            6 => "0\u{00A0}M\u{00A0}¤",
            7 => "00\u{00A0}M\u{00A0}¤",
            8 => "000\u{00A0}M\u{00A0}¤",
            9 => "0\u{00A0}Md\u{00A0}¤",
            10 => "00\u{00A0}Md\u{00A0}¤",
            11 => "000\u{00A0}Md\u{00A0}¤",
            12 => "0\u{00A0}Bn\u{00A0}¤",
            13 => "00\u{00A0}Bn\u{00A0}¤",
            14 => "000\u{00A0}Bn\u{00A0}¤",
            _ => "0",
        }),
        _ => decimal_short(lang, exponent),
    }
}
