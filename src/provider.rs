//! Data-model types owned by the CLDR data provider, and the capability
//! trait the formatting core consumes. The core never reaches into global
//! state for locale data; everything arrives through a `NumberData`
//! reference (UTS 35 leaves the data source open, and so do we).

use fixed_decimal::Decimal;

/// Plural category per CLDR plural rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

/// One side of the currency-spacing rule (UTS 35 `currencySpacing`).
/// The match fields keep their UnicodeSet source text; the assembler
/// interprets the letter/digit case they describe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrencySpacing {
    pub match_currency: String,
    pub match_surrounding: String,
    pub insert_between: String,
}

impl CurrencySpacing {
    pub fn no_break_space() -> CurrencySpacing {
        CurrencySpacing {
            match_currency: "[:^S:]".to_string(),
            match_surrounding: "[:digit:]".to_string(),
            insert_between: "\u{00A0}".to_string(), // NBSP
        }
    }
}

/// Symbols for one (locale, number system) pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberSymbols {
    /// Zero codepoint of the digit set; the other nine digits follow it.
    pub zero_digit: char,
    pub decimal: String,
    pub group: String,
    pub exponential: String,
    pub plus_sign: String,
    pub minus_sign: String,
    pub percent_sign: String,
    pub permille_sign: String,
    pub infinity: String,
    pub nan: String,
    /// Monetary separators, when the locale distinguishes them.
    pub currency_decimal: Option<String>,
    pub currency_group: Option<String>,
    pub before_currency: CurrencySpacing,
    pub after_currency: CurrencySpacing,
}

/// Currency data for one (locale, ISO 4217 code) pair. The symbol fields
/// are locale-dependent ("THB" in en, "฿" in th); the digit and rounding
/// fields come from supplemental data and are locale-independent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrencyRecord {
    pub code: String,
    pub symbol: String,
    pub narrow_symbol: String,
    pub display_name_one: String,
    pub display_name_other: String,
    pub fraction_digits: u8,
    pub cash_fraction_digits: u8,
    /// Rounding increment in minor units (0 = none), e.g. CHF cash = 5.
    pub rounding_increment: u32,
    pub cash_rounding_increment: u32,
}

impl CurrencyRecord {
    pub fn display_name(&self, plural: PluralCategory) -> &str {
        match plural {
            PluralCategory::One => &self.display_name_one,
            _ => &self.display_name_other,
        }
    }
}

/// A digital-token (DTIF registry) record. Tokens have no intrinsic
/// fraction digits; the pattern's stand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigitalToken {
    pub id: String,
    pub short_name: String,
    pub long_name: String,
}

/// The named formats a locale's pattern table can define.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormatStyle {
    Standard,
    Currency,
    Accounting,
    Percent,
    Scientific,
    CurrencyNoSymbol,
    AccountingNoSymbol,
    CurrencyAlphaNextToNumber,
    AccountingAlphaNextToNumber,
    DecimalShort,
    DecimalLong,
    CurrencyShort,
    CurrencyLong,
}

impl FormatStyle {
    pub(crate) fn is_compact(self) -> bool {
        matches!(
            self,
            FormatStyle::DecimalShort
                | FormatStyle::DecimalLong
                | FormatStyle::CurrencyShort
                | FormatStyle::CurrencyLong
        )
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            FormatStyle::Standard => "standard",
            FormatStyle::Currency => "currency",
            FormatStyle::Accounting => "accounting",
            FormatStyle::Percent => "percent",
            FormatStyle::Scientific => "scientific",
            FormatStyle::CurrencyNoSymbol => "currency_no_symbol",
            FormatStyle::AccountingNoSymbol => "accounting_no_symbol",
            FormatStyle::CurrencyAlphaNextToNumber => "currency_alpha_next_to_number",
            FormatStyle::AccountingAlphaNextToNumber => "accounting_alpha_next_to_number",
            FormatStyle::DecimalShort => "decimal_short",
            FormatStyle::DecimalLong => "decimal_long",
            FormatStyle::CurrencyShort => "currency_short",
            FormatStyle::CurrencyLong => "currency_long",
        }
    }
}

/// The CLDR data the core consumes. Locale arguments are canonical BCP 47
/// tags with extensions already stripped by the options resolver.
pub trait NumberData {
    fn default_locale(&self) -> &str;

    fn is_known_locale(&self, locale: &str) -> bool;

    fn default_number_system(&self, locale: &str) -> &str;

    /// The locale's `native` number system (falls back to the default).
    fn native_number_system(&self, locale: &str) -> &str;

    fn is_known_number_system(&self, system: &str) -> bool;

    fn symbols(&self, locale: &str, system: &str) -> Option<NumberSymbols>;

    fn pattern(&self, locale: &str, system: &str, style: FormatStyle) -> Option<&str>;

    /// Whether plain `currency:` picks `Currency` or `Accounting`.
    fn default_currency_style(&self, locale: &str) -> FormatStyle;

    fn currency(&self, locale: &str, code: &str) -> Option<CurrencyRecord>;

    fn digital_token(&self, id: &str) -> Option<DigitalToken>;

    /// Currency of the locale's territory, for `currency: from_locale`.
    fn territory_currency(&self, locale: &str) -> Option<&str>;

    fn minimum_grouping_digits(&self, locale: &str) -> u8;

    fn plural_category(&self, locale: &str, value: &Decimal) -> PluralCategory;

    /// Compact pattern for 10^exponent and a plural category, e.g. `"0K"`,
    /// `"00 thousand"`, `"¤0M"`. `"0"` means no compact transform at this
    /// magnitude.
    fn compact_pattern(
        &self,
        locale: &str,
        style: FormatStyle,
        exponent: u8,
        plural: PluralCategory,
    ) -> Option<&str>;

    /// Largest exponent the locale's compact data defines (usually 14).
    fn max_compact_exponent(&self, locale: &str, style: FormatStyle) -> u8;
}
