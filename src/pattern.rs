//! Compiler for CLDR decimal format patterns (UTS 35 §3.2) into structured,
//! immutable metadata. Compiled metadata is cached process-wide by pattern
//! string; compilation is deterministic so racing inserts are harmless.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::error::CompileError;

/// One semantic token of a prefix or suffix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Affix {
    Literal(String),
    /// A run of 1..=4 currency signs.
    Currency(u8),
    Percent,  // %
    Permille, // ‰
    MinusSign, // -
    PlusSign,  // +
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PadPosition {
    BeforePrefix,
    AfterPrefix,
    BeforeSuffix,
    AfterSuffix,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Padding {
    pub ch: char,
    /// Total visible width the output must reach.
    pub width: usize,
    pub position: PadPosition,
}

/// A decimal rounding increment: `units × 10^scale`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Increment {
    pub units: i128,
    pub scale: i16,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubPattern {
    pub prefix: Vec<Affix>,
    pub suffix: Vec<Affix>,
    pub min_integer_digits: u8,
    /// 0 = unlimited; non-zero only under the engineering-notation rule.
    pub max_integer_digits: u8,
    pub min_fraction_digits: u8,
    pub max_fraction_digits: u8,
    /// 0 = the pattern does not use significant digits.
    pub min_significant_digits: u8,
    pub max_significant_digits: u8,
    pub rounding_increment: Option<Increment>,
    /// 0 = no grouping.
    pub grouping_primary: u8,
    pub grouping_secondary: u8,
    /// 0 = non-scientific.
    pub exponent_digits: u8,
    pub exponent_show_positive: bool,
    pub padding: Option<Padding>,
    pub currency_placeholder_count: u8,
    /// 2 for percent, 3 for permille, else 0. Applied before rounding.
    pub multiplier_pow10: u8,
    // Digit characters preserved for canonical re-serialization.
    int_digits: String,
    frac_digits: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PatternMetadata {
    pub positive: SubPattern,
    pub negative: SubPattern,
    pub has_explicit_negative: bool,
}

impl PatternMetadata {
    pub fn sub(&self, negative: bool) -> &SubPattern {
        if negative { &self.negative } else { &self.positive }
    }
}

static CACHE: Lazy<DashMap<String, Arc<PatternMetadata>>> = Lazy::new(DashMap::new);

/// Compiles a pattern, consulting the process-wide cache first.
pub fn compile(pattern: &str) -> Result<Arc<PatternMetadata>, CompileError> {
    if let Some(hit) = CACHE.get(pattern) {
        return Ok(hit.clone());
    }
    let meta = Arc::new(parse_pattern(pattern)?);
    CACHE.insert(pattern.to_string(), meta.clone());
    Ok(meta)
}

fn parse_pattern(pattern: &str) -> Result<PatternMetadata, CompileError> {
    let (pos_src, neg_src) = split_subpatterns(pattern)?;
    let positive = parse_subpattern(pos_src)?;
    let (negative, has_explicit_negative) = match neg_src {
        Some(src) => (parse_subpattern(src)?, true),
        None => {
            // Derived negative: same number section, minus sign prepended.
            let mut neg = positive.clone();
            neg.prefix.insert(0, Affix::MinusSign);
            (neg, false)
        }
    };
    Ok(PatternMetadata {
        positive,
        negative,
        has_explicit_negative,
    })
}

/// Splits at the first unquoted `;`.
fn split_subpatterns(pattern: &str) -> Result<(&str, Option<&str>), CompileError> {
    let mut in_quote = false;
    for (i, c) in pattern.char_indices() {
        match c {
            '\'' => in_quote = !in_quote,
            ';' if !in_quote => {
                return Ok((&pattern[..i], Some(&pattern[i + 1..])));
            }
            _ => {}
        }
    }
    if in_quote {
        return Err(CompileError {
            message: "unmatched quote in pattern".to_string(),
        });
    }
    Ok((pattern, None))
}

fn is_number_char(c: char) -> bool {
    matches!(c, '#' | '@' | ',' | '.') || c.is_ascii_digit()
}

fn parse_subpattern(src: &str) -> Result<SubPattern, CompileError> {
    // Locate the number section: the first unquoted digit-layout character
    // through the last, plus a trailing exponent introducer.
    let chars: Vec<char> = src.chars().collect();
    let mut in_quote = false;
    let mut num_start = None;
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '\'' => in_quote = !in_quote,
            c if !in_quote && is_number_char(c) => {
                num_start = Some(i);
                break;
            }
            _ => {}
        }
    }
    let num_start = match num_start {
        Some(i) => i,
        None => {
            return Err(CompileError {
                message: "pattern has no digit positions".to_string(),
            });
        }
    };
    let mut num_end = num_start;
    while num_end < chars.len() && is_number_char(chars[num_end]) {
        num_end += 1;
    }

    // Optional exponent: E, optional +, then digits.
    let mut exponent_digits: u8 = 0;
    let mut exponent_show_positive = false;
    let mut exp_end = num_end;
    if exp_end < chars.len() && chars[exp_end] == 'E' {
        let mut j = exp_end + 1;
        if j < chars.len() && chars[j] == '+' {
            exponent_show_positive = true;
            j += 1;
            if j < chars.len() && chars[j] == '+' {
                return Err(CompileError::before('+'));
            }
        }
        let digits_start = j;
        while j < chars.len() && chars[j].is_ascii_digit() {
            exponent_digits += 1;
            j += 1;
        }
        if j == digits_start {
            return Err(CompileError {
                message: "exponent has no digits".to_string(),
            });
        }
        exp_end = j;
    }

    let prefix_src: String = chars[..num_start].iter().collect();
    let number_src: String = chars[num_start..num_end].iter().collect();
    let suffix_src: String = chars[exp_end..].iter().collect();

    let (prefix, prefix_pad) = scan_affix(&prefix_src, true)?;
    let (suffix, suffix_pad) = scan_affix(&suffix_src, false)?;
    if prefix_pad.is_some() && suffix_pad.is_some() {
        return Err(CompileError {
            message: "duplicate padding specifier".to_string(),
        });
    }

    let num = parse_number_section(&number_src)?;

    let scientific = exponent_digits > 0;
    let max_integer_digits = if scientific && num.min_int > 1 {
        num.min_int + num.int_hash
    } else {
        0
    };

    let rounding_increment = if num.has_nonzero_digit {
        let mut digits = String::new();
        digits.push_str(&num.int_digits);
        digits.push_str(&num.frac_digits);
        let units: i128 = digits.parse().unwrap_or(0);
        Some(Increment {
            units,
            scale: -(num.frac_digits.chars().count() as i16),
        })
    } else {
        None
    };

    let padding = prefix_pad.or(suffix_pad).map(|(ch, position)| Padding {
        ch,
        width: visible_width(src),
        position,
    });

    let mut currency_placeholder_count = 0u8;
    let mut multiplier_pow10 = 0u8;
    for tok in prefix.iter().chain(suffix.iter()) {
        match tok {
            Affix::Currency(n) => currency_placeholder_count = currency_placeholder_count.max(*n),
            Affix::Percent => multiplier_pow10 = 2,
            Affix::Permille => multiplier_pow10 = 3,
            _ => {}
        }
    }

    Ok(SubPattern {
        prefix,
        suffix,
        min_integer_digits: num.min_int,
        max_integer_digits,
        min_fraction_digits: num.min_frac,
        max_fraction_digits: num.min_frac + num.frac_hash,
        min_significant_digits: num.sig_count,
        max_significant_digits: num.sig_count + num.sig_hash,
        rounding_increment,
        grouping_primary: num.grouping_primary,
        grouping_secondary: num.grouping_secondary,
        exponent_digits,
        exponent_show_positive,
        padding,
        currency_placeholder_count,
        multiplier_pow10,
        int_digits: num.int_digits,
        frac_digits: num.frac_digits,
    })
}

struct NumberSection {
    min_int: u8,
    int_hash: u8,
    min_frac: u8,
    frac_hash: u8,
    sig_count: u8,
    sig_hash: u8,
    grouping_primary: u8,
    grouping_secondary: u8,
    has_nonzero_digit: bool,
    int_digits: String,
    frac_digits: String,
}

fn parse_number_section(src: &str) -> Result<NumberSection, CompileError> {
    let mut min_int = 0u8;
    let mut int_hash = 0u8;
    let mut min_frac = 0u8;
    let mut frac_hash = 0u8;
    let mut sig_count = 0u8;
    let mut sig_hash = 0u8;
    let mut has_nonzero_digit = false;
    let mut int_digits = String::new();
    let mut frac_digits = String::new();
    // Digit-slot counts at each grouping separator, measured from the left.
    let mut comma_slots: Vec<u8> = Vec::new();
    let mut int_slots = 0u8;
    let mut in_fraction = false;

    for c in src.chars() {
        match c {
            '.' => {
                if in_fraction {
                    return Err(CompileError {
                        message: "two decimal points in pattern".to_string(),
                    });
                }
                in_fraction = true;
            }
            ',' => {
                if in_fraction {
                    return Err(CompileError {
                        message: "grouping separator in fraction part".to_string(),
                    });
                }
                comma_slots.push(int_slots);
            }
            '@' => {
                if in_fraction {
                    return Err(CompileError {
                        message: "significant digit marker in fraction part".to_string(),
                    });
                }
                if min_int > 0 || int_hash > 0 || sig_hash > 0 {
                    return Err(CompileError {
                        message: "significant digit marker mixed with digits".to_string(),
                    });
                }
                sig_count += 1;
                int_slots += 1;
            }
            '#' => {
                if in_fraction {
                    frac_hash += 1;
                } else if sig_count > 0 {
                    sig_hash += 1;
                    int_slots += 1;
                } else if min_int > 0 {
                    return Err(CompileError::before('#'));
                } else {
                    int_hash += 1;
                    int_slots += 1;
                }
            }
            d if d.is_ascii_digit() => {
                if sig_count > 0 {
                    return Err(CompileError {
                        message: "significant digit marker mixed with digits".to_string(),
                    });
                }
                if d != '0' {
                    has_nonzero_digit = true;
                }
                if in_fraction {
                    min_frac += 1;
                    frac_digits.push(d);
                } else {
                    min_int += 1;
                    int_digits.push(d);
                    int_slots += 1;
                }
            }
            other => return Err(CompileError::before(other)),
        }
    }

    // Grouping sizes: distance from the rightmost comma to the decimal
    // point, and between the last two commas.
    let (grouping_primary, grouping_secondary) = match comma_slots.len() {
        0 => (0, 0),
        n => {
            let primary = int_slots - comma_slots[n - 1];
            let secondary = if n >= 2 {
                comma_slots[n - 1] - comma_slots[n - 2]
            } else {
                primary
            };
            (primary, secondary)
        }
    };

    Ok(NumberSection {
        min_int,
        int_hash,
        min_frac,
        frac_hash,
        sig_count,
        sig_hash,
        grouping_primary,
        grouping_secondary,
        has_nonzero_digit,
        int_digits,
        frac_digits,
    })
}

fn scan_affix(
    src: &str,
    in_prefix: bool,
) -> Result<(Vec<Affix>, Option<(char, PadPosition)>), CompileError> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut pad: Option<(char, usize)> = None;
    let mut token_index = 0usize;
    let mut chars = src.chars().peekable();

    macro_rules! flush {
        () => {
            if !literal.is_empty() {
                tokens.push(Affix::Literal(std::mem::take(&mut literal)));
                token_index += 1;
            }
        };
    }

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    literal.push('\'');
                    continue;
                }
                let mut closed = false;
                while let Some(q) = chars.next() {
                    if q == '\'' {
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                            literal.push('\'');
                        } else {
                            closed = true;
                            break;
                        }
                    } else {
                        literal.push(q);
                    }
                }
                if !closed {
                    return Err(CompileError {
                        message: "unmatched quote in pattern".to_string(),
                    });
                }
            }
            '¤' => {
                flush!();
                let mut count = 1u8;
                while chars.peek() == Some(&'¤') {
                    chars.next();
                    count += 1;
                }
                if count > 4 {
                    return Err(CompileError {
                        message: "too many currency placeholders".to_string(),
                    });
                }
                tokens.push(Affix::Currency(count));
                token_index += 1;
            }
            '%' => {
                flush!();
                tokens.push(Affix::Percent);
                token_index += 1;
            }
            '‰' => {
                flush!();
                tokens.push(Affix::Permille);
                token_index += 1;
            }
            '-' => {
                flush!();
                tokens.push(Affix::MinusSign);
                token_index += 1;
            }
            '+' => {
                flush!();
                tokens.push(Affix::PlusSign);
                token_index += 1;
            }
            '*' => {
                let pad_char = match chars.next() {
                    Some(p) => p,
                    None => {
                        return Err(CompileError {
                            message: "padding specifier missing a pad character".to_string(),
                        });
                    }
                };
                if pad.is_some() {
                    return Err(CompileError {
                        message: "duplicate padding specifier".to_string(),
                    });
                }
                flush!();
                pad = Some((pad_char, token_index));
            }
            other => literal.push(other),
        }
    }
    flush!();

    let pad = pad.map(|(ch, index)| {
        let position = if in_prefix {
            if index == 0 {
                PadPosition::BeforePrefix
            } else {
                PadPosition::AfterPrefix
            }
        } else if index >= tokens.len() {
            PadPosition::AfterSuffix
        } else {
            PadPosition::BeforeSuffix
        };
        (ch, position)
    });

    Ok((tokens, pad))
}

/// The visible width of a subpattern: every pattern character counts one,
/// quoted text counts its own characters, the quote marks and the two-char
/// pad specifier count nothing.
fn visible_width(src: &str) -> usize {
    let mut width = 0usize;
    let mut chars = src.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    width += 1;
                    continue;
                }
                while let Some(q) = chars.next() {
                    if q == '\'' {
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                            width += 1;
                        } else {
                            break;
                        }
                    } else {
                        width += 1;
                    }
                }
            }
            '*' => {
                chars.next();
            }
            _ => width += 1,
        }
    }
    width
}

// ---------------------------------------------------------------------------
// Canonical re-serialization.

impl PatternMetadata {
    /// Renders the metadata back to a canonical pattern string. Compiling
    /// the result yields metadata equal to `self` up to literal quoting.
    pub fn to_pattern(&self) -> String {
        let mut out = serialize_sub(&self.positive);
        if self.has_explicit_negative {
            out.push(';');
            out.push_str(&serialize_sub(&self.negative));
        }
        out
    }
}

const AFFIX_SPECIALS: &[char] = &[
    '#', '@', ',', '.', ';', '*', '%', '‰', '¤', '-', '+', 'E', '\'', '0', '1', '2', '3', '4',
    '5', '6', '7', '8', '9',
];

fn serialize_affix(tokens: &[Affix], out: &mut String) {
    for tok in tokens {
        match tok {
            Affix::Literal(text) => {
                if text.contains(AFFIX_SPECIALS) {
                    out.push('\'');
                    for c in text.chars() {
                        if c == '\'' {
                            out.push_str("''");
                        } else {
                            out.push(c);
                        }
                    }
                    out.push('\'');
                } else {
                    out.push_str(text);
                }
            }
            Affix::Currency(n) => {
                for _ in 0..*n {
                    out.push('¤');
                }
            }
            Affix::Percent => out.push('%'),
            Affix::Permille => out.push('‰'),
            Affix::MinusSign => out.push('-'),
            Affix::PlusSign => out.push('+'),
        }
    }
}

fn serialize_sub(sub: &SubPattern) -> String {
    let mut out = String::new();
    if let Some(pad) = &sub.padding {
        if pad.position == PadPosition::BeforePrefix {
            out.push('*');
            out.push(pad.ch);
        }
    }
    serialize_affix(&sub.prefix, &mut out);
    if let Some(pad) = &sub.padding {
        if pad.position == PadPosition::AfterPrefix {
            out.push('*');
            out.push(pad.ch);
        }
    }

    // Integer slots, most significant first.
    let mut slots = String::new();
    if sub.min_significant_digits > 0 {
        for _ in 0..sub.min_significant_digits {
            slots.push('@');
        }
        for _ in 0..(sub.max_significant_digits - sub.min_significant_digits) {
            slots.push('#');
        }
    } else {
        let required = if sub.int_digits.is_empty() {
            "0".repeat(sub.min_integer_digits as usize)
        } else {
            sub.int_digits.clone()
        };
        let needed = if sub.grouping_primary > 0 {
            if sub.grouping_secondary != sub.grouping_primary {
                (sub.grouping_primary + sub.grouping_secondary + 1) as usize
            } else {
                (sub.grouping_primary + 1) as usize
            }
        } else {
            required.len().max(1)
        };
        let hashes = needed.saturating_sub(required.len());
        for _ in 0..hashes {
            slots.push('#');
        }
        slots.push_str(&required);
    }

    if sub.grouping_primary > 0 {
        let chars: Vec<char> = slots.chars().collect();
        let mut grouped = String::new();
        let len = chars.len();
        for (i, c) in chars.iter().enumerate() {
            let from_right = len - i;
            grouped.push(*c);
            let next_from_right = from_right - 1;
            if next_from_right > 0 {
                let boundary = next_from_right == sub.grouping_primary as usize
                    || (next_from_right > sub.grouping_primary as usize
                        && (next_from_right - sub.grouping_primary as usize)
                            == sub.grouping_secondary as usize);
                if boundary {
                    grouped.push(',');
                }
            }
        }
        slots = grouped;
    }
    out.push_str(&slots);

    if sub.min_significant_digits == 0 {
        let max_frac = sub.max_fraction_digits;
        if max_frac > 0 {
            out.push('.');
            if sub.frac_digits.is_empty() {
                for _ in 0..sub.min_fraction_digits {
                    out.push('0');
                }
            } else {
                out.push_str(&sub.frac_digits);
            }
            for _ in 0..(max_frac - sub.min_fraction_digits) {
                out.push('#');
            }
        }
    }

    if sub.exponent_digits > 0 {
        out.push('E');
        if sub.exponent_show_positive {
            out.push('+');
        }
        for _ in 0..sub.exponent_digits {
            out.push('0');
        }
    }

    if let Some(pad) = &sub.padding {
        if pad.position == PadPosition::BeforeSuffix {
            out.push('*');
            out.push(pad.ch);
        }
    }
    serialize_affix(&sub.suffix, &mut out);
    if let Some(pad) = &sub.padding {
        if pad.position == PadPosition::AfterSuffix {
            out.push('*');
            out.push(pad.ch);
        }
    }
    out
}
