//! Binds a resolved currency (ISO 4217 record or digital token) to the
//! placeholder ladder, fraction digits, and rounding increments the rest of
//! the pipeline consumes.

use crate::options::{CurrencyDigits, CurrencySymbol};
use crate::pattern::Increment;
use crate::provider::{CurrencyRecord, DigitalToken, PluralCategory};

#[derive(Clone, Debug)]
pub(crate) enum BoundCurrency {
    Iso(CurrencyRecord),
    Token(DigitalToken),
}

impl BoundCurrency {
    pub(crate) fn code(&self) -> &str {
        match self {
            BoundCurrency::Iso(rec) => &rec.code,
            BoundCurrency::Token(tok) => &tok.short_name,
        }
    }

    /// Expands a `¤`-run per the UTS 35 ladder: one sign is the symbol, two
    /// the ISO code, three the plural display name, four the narrow symbol.
    /// A caller-supplied `CurrencySymbol` overrides the ladder; digital
    /// tokens substitute their short and long names.
    pub(crate) fn symbol(
        &self,
        placeholder_count: u8,
        choice: Option<&CurrencySymbol>,
        plural: Option<PluralCategory>,
    ) -> String {
        match choice {
            Some(CurrencySymbol::Explicit(s)) => return s.clone(),
            Some(CurrencySymbol::Iso) => return self.iso_position(),
            Some(CurrencySymbol::Narrow) => return self.narrow_position(),
            Some(CurrencySymbol::Standard) | Some(CurrencySymbol::Symbol) => {
                return self.symbol_position();
            }
            None => {}
        }
        match placeholder_count {
            2 => self.iso_position(),
            3 => self.name_position(plural),
            4 => self.narrow_position(),
            _ => self.symbol_position(),
        }
    }

    fn symbol_position(&self) -> String {
        match self {
            BoundCurrency::Iso(rec) => rec.symbol.clone(),
            BoundCurrency::Token(tok) => tok.short_name.clone(),
        }
    }

    fn iso_position(&self) -> String {
        match self {
            BoundCurrency::Iso(rec) => rec.code.clone(),
            BoundCurrency::Token(tok) => tok.short_name.clone(),
        }
    }

    fn name_position(&self, plural: Option<PluralCategory>) -> String {
        match self {
            BoundCurrency::Iso(rec) => rec
                .display_name(plural.unwrap_or(PluralCategory::Other))
                .to_string(),
            BoundCurrency::Token(tok) => tok.long_name.clone(),
        }
    }

    fn narrow_position(&self) -> String {
        match self {
            BoundCurrency::Iso(rec) => rec.narrow_symbol.clone(),
            BoundCurrency::Token(tok) => tok.short_name.clone(),
        }
    }

    /// Effective fraction digits for the selected digits mode. Digital
    /// tokens have none; the pattern's digits stand.
    pub(crate) fn fraction_digits(&self, digits: CurrencyDigits) -> Option<u8> {
        match self {
            BoundCurrency::Iso(rec) => Some(match digits {
                CurrencyDigits::Cash => rec.cash_fraction_digits,
                CurrencyDigits::Accounting | CurrencyDigits::Iso => rec.fraction_digits,
            }),
            BoundCurrency::Token(_) => None,
        }
    }

    /// The currency's rounding increment (in minor units) as a decimal
    /// increment, or `None` when the currency does not round.
    pub(crate) fn rounding(&self, digits: CurrencyDigits) -> Option<Increment> {
        let BoundCurrency::Iso(rec) = self else {
            return None;
        };
        let (increment, scale_digits) = match digits {
            CurrencyDigits::Cash => (rec.cash_rounding_increment, rec.cash_fraction_digits),
            CurrencyDigits::Accounting | CurrencyDigits::Iso => {
                (rec.rounding_increment, rec.fraction_digits)
            }
        };
        if increment == 0 {
            return None;
        }
        Some(Increment {
            units: increment as i128,
            scale: -(scale_digits as i16),
        })
    }
}
