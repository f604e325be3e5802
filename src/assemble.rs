//! The format assembler: turns digit strings plus metadata, symbols, and a
//! bound currency into the final localized string. Prefix, body, and suffix
//! are built as tagged components so a caller-supplied wrapper can decorate
//! each one.

use crate::currency::BoundCurrency;
use crate::engine::DigitParts;
use crate::options::{CurrencySymbol, Section, Wrapper};
use crate::pattern::{Affix, PadPosition, SubPattern};
use crate::provider::{NumberSymbols, PluralCategory};

pub(crate) struct Assembly<'a> {
    pub sub: &'a SubPattern,
    pub symbols: &'a NumberSymbols,
    pub currency: Option<&'a BoundCurrency>,
    pub currency_symbol: Option<&'a CurrencySymbol>,
    pub plural: Option<PluralCategory>,
    pub minimum_grouping_digits: u8,
    pub currency_spacing: bool,
    pub wrapper: Option<&'a Wrapper>,
}

impl Assembly<'_> {
    fn wrap(&self, text: String, section: Section) -> String {
        match self.wrapper {
            Some(w) => w(&text, section),
            None => text,
        }
    }

    fn monetary(&self) -> bool {
        self.currency.is_some() && self.sub.currency_placeholder_count > 0
    }

    fn decimal_separator(&self) -> &str {
        if self.monetary() {
            if let Some(sep) = &self.symbols.currency_decimal {
                return sep;
            }
        }
        &self.symbols.decimal
    }

    fn group_separator(&self) -> &str {
        if self.monetary() {
            if let Some(sep) = &self.symbols.currency_group {
                return sep;
            }
        }
        &self.symbols.group
    }

    /// Maps an ASCII digit string through the number system's digit set.
    /// The ten localized digits are consecutive codepoints from zero, so the
    /// mapping is a bijection and idempotent on already-localized text.
    fn map_digits(&self, digits: &str) -> String {
        let zero = self.symbols.zero_digit as u32;
        digits
            .chars()
            .map(|c| match c.to_digit(10) {
                Some(d) => char::from_u32(zero + d).unwrap_or(c),
                None => c,
            })
            .collect()
    }

    fn currency_text(&self, count: u8) -> String {
        match self.currency {
            Some(bound) => bound.symbol(count, self.currency_symbol, self.plural),
            None => String::new(),
        }
    }

    fn render_affix(&self, tokens: &[Affix], out: &mut Vec<(String, Section)>) {
        for token in tokens {
            match token {
                Affix::Literal(text) => out.push((text.clone(), Section::Literal)),
                Affix::Currency(count) => {
                    out.push((self.currency_text(*count), Section::Currency))
                }
                Affix::Percent => {
                    out.push((self.symbols.percent_sign.clone(), Section::Symbol))
                }
                Affix::Permille => {
                    out.push((self.symbols.permille_sign.clone(), Section::Symbol))
                }
                Affix::MinusSign => {
                    out.push((self.symbols.minus_sign.clone(), Section::Symbol))
                }
                Affix::PlusSign => out.push((self.symbols.plus_sign.clone(), Section::Symbol)),
            }
        }
    }

    fn build_body(&self, parts: &DigitParts) -> String {
        let mut body = String::new();

        let int_count = parts.integer.chars().count();
        let primary = self.sub.grouping_primary as usize;
        let secondary = if self.sub.grouping_secondary > 0 {
            self.sub.grouping_secondary as usize
        } else {
            primary
        };
        let grouped = primary > 0
            && int_count >= primary + self.minimum_grouping_digits as usize;

        for (i, c) in parts.integer.chars().enumerate() {
            body.push(c);
            let from_right = int_count - i - 1;
            if grouped && from_right > 0 {
                let boundary = from_right == primary
                    || (from_right > primary && (from_right - primary) % secondary == 0);
                if boundary {
                    body.push_str(self.group_separator());
                }
            }
        }

        if !parts.fraction.is_empty() {
            body.push_str(self.decimal_separator());
            body.push_str(&parts.fraction);
        }

        if let Some(exp) = parts.exponent {
            body.push_str(&self.symbols.exponential);
            if exp < 0 {
                body.push_str(&self.symbols.minus_sign);
            } else if self.sub.exponent_show_positive {
                body.push_str(&self.symbols.plus_sign);
            }
            let mut digits = exp.unsigned_abs().to_string();
            while digits.len() < self.sub.exponent_digits as usize {
                digits.insert(0, '0');
            }
            body.push_str(&digits);
        }

        self.map_digits(&body)
    }

    /// UTS 35 currency spacing: when the currency sign sits directly against
    /// the digits and the rendered symbol ends (or starts) with a letter,
    /// the locale's separator is inserted between them.
    fn apply_currency_spacing(
        &self,
        prefix: &mut Vec<(String, Section)>,
        body: &str,
        suffix: &mut Vec<(String, Section)>,
    ) {
        if !self.currency_spacing || self.currency.is_none() {
            return;
        }
        if matches!(self.sub.prefix.last(), Some(Affix::Currency(_))) {
            let symbol_end = prefix
                .last()
                .and_then(|(text, _)| text.chars().next_back());
            let digit_start = body.chars().next();
            if symbol_end.is_some_and(|c| c.is_alphabetic())
                && digit_start.is_some_and(|c| c.is_numeric())
            {
                prefix.push((
                    self.symbols.after_currency.insert_between.clone(),
                    Section::Literal,
                ));
            }
        }
        if matches!(self.sub.suffix.first(), Some(Affix::Currency(_))) {
            let symbol_start = suffix.first().and_then(|(text, _)| text.chars().next());
            let digit_end = body.chars().next_back();
            if symbol_start.is_some_and(|c| c.is_alphabetic())
                && digit_end.is_some_and(|c| c.is_numeric())
            {
                suffix.insert(
                    0,
                    (
                        self.symbols.before_currency.insert_between.clone(),
                        Section::Literal,
                    ),
                );
            }
        }
    }

    fn concat(&self, prefix: Vec<(String, Section)>, body: String, suffix: Vec<(String, Section)>) -> String {
        let visible: usize = prefix
            .iter()
            .chain(suffix.iter())
            .map(|(text, _)| text.chars().count())
            .sum::<usize>()
            + body.chars().count();

        let pad = self.sub.padding.as_ref().and_then(|p| {
            (visible < p.width).then(|| {
                let fill: String = std::iter::repeat_n(p.ch, p.width - visible).collect();
                (fill, p.position)
            })
        });

        let mut out = String::new();
        if let Some((fill, PadPosition::BeforePrefix)) = &pad {
            out.push_str(&self.wrap(fill.clone(), Section::Pad));
        }
        for (text, section) in prefix {
            out.push_str(&self.wrap(text, section));
        }
        if let Some((fill, PadPosition::AfterPrefix)) = &pad {
            out.push_str(&self.wrap(fill.clone(), Section::Pad));
        }
        out.push_str(&self.wrap(body, Section::Number));
        if let Some((fill, PadPosition::BeforeSuffix)) = &pad {
            out.push_str(&self.wrap(fill.clone(), Section::Pad));
        }
        for (text, section) in suffix {
            out.push_str(&self.wrap(text, section));
        }
        if let Some((fill, PadPosition::AfterSuffix)) = &pad {
            out.push_str(&self.wrap(fill.clone(), Section::Pad));
        }
        out
    }

    pub(crate) fn assemble(&self, parts: &DigitParts) -> String {
        let mut prefix = Vec::new();
        let mut suffix = Vec::new();
        self.render_affix(&self.sub.prefix, &mut prefix);
        self.render_affix(&self.sub.suffix, &mut suffix);
        let body = self.build_body(parts);
        self.apply_currency_spacing(&mut prefix, &body, &mut suffix);
        self.concat(prefix, body, suffix)
    }

    /// NaN and infinity skip digit processing entirely; the symbol-table
    /// string is wrapped in the sign-appropriate affixes.
    pub(crate) fn assemble_non_finite(&self, body: &str) -> String {
        let mut prefix = Vec::new();
        let mut suffix = Vec::new();
        self.render_affix(&self.sub.prefix, &mut prefix);
        self.render_affix(&self.sub.suffix, &mut suffix);
        self.concat(prefix, body.to_string(), suffix)
    }
}
