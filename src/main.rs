use std::process::ExitCode;

use clap::Parser;

use cldrfmt::{
    format, CldrData, CurrencyChoice, CurrencyDigits, Format, FormatOptions, Number,
    NumberSystemChoice, RoundingMode,
};

#[derive(Parser)]
#[command(name = "cldrfmt", version, about = "Format numbers with CLDR locale rules")]
struct Cli {
    /// The number to format
    value: String,

    /// Locale tag, e.g. "fr" or "th-u-nu-thai"
    #[arg(short, long)]
    locale: Option<String>,

    /// Named format (standard, currency, accounting, percent, scientific,
    /// short, long, ...) or a raw pattern like "#,##0.00"
    #[arg(short, long)]
    format: Option<String>,

    /// ISO 4217 code, digital-token id, or "from_locale"
    #[arg(short, long)]
    currency: Option<String>,

    /// Use cash digits and rounding for the currency
    #[arg(long)]
    cash: bool,

    /// down, up, half_up, half_down, half_even, ceiling, floor
    #[arg(long)]
    rounding_mode: Option<String>,

    #[arg(long)]
    fractional_digits: Option<u8>,

    /// "default", "native", or a system name like "thai"
    #[arg(long)]
    number_system: Option<String>,

    #[arg(long)]
    minimum_grouping_digits: Option<u8>,

    #[arg(long)]
    round_nearest: Option<u32>,

    #[arg(long)]
    maximum_integer_digits: Option<u8>,
}

fn parse_value(s: &str) -> Option<Number> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::Int(i));
    }
    if let Ok(d) = s.parse::<fixed_decimal::Decimal>() {
        return Some(Number::Decimal(d));
    }
    s.parse::<f64>().ok().map(Number::Float)
}

fn parse_format(s: &str) -> Format {
    match s {
        "standard" => Format::Standard,
        "currency" => Format::Currency,
        "accounting" => Format::Accounting,
        "percent" => Format::Percent,
        "scientific" => Format::Scientific,
        "short" => Format::Short,
        "long" => Format::Long,
        "decimal_short" => Format::DecimalShort,
        "decimal_long" => Format::DecimalLong,
        "currency_short" => Format::CurrencyShort,
        "currency_long" => Format::CurrencyLong,
        "currency_no_symbol" => Format::CurrencyNoSymbol,
        "accounting_no_symbol" => Format::AccountingNoSymbol,
        other => Format::Pattern(other.to_string()),
    }
}

fn parse_rounding_mode(s: &str) -> Option<RoundingMode> {
    match s {
        "down" => Some(RoundingMode::Down),
        "up" => Some(RoundingMode::Up),
        "half_up" => Some(RoundingMode::HalfUp),
        "half_down" => Some(RoundingMode::HalfDown),
        "half_even" => Some(RoundingMode::HalfEven),
        "ceiling" => Some(RoundingMode::Ceiling),
        "floor" => Some(RoundingMode::Floor),
        _ => None,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let value = match parse_value(&cli.value) {
        Some(v) => v,
        None => {
            eprintln!("Not a number: {}", cli.value);
            return ExitCode::from(1);
        }
    };

    let rounding_mode = match cli.rounding_mode.as_deref() {
        Some(s) => match parse_rounding_mode(s) {
            Some(m) => Some(m),
            None => {
                eprintln!("Unknown rounding mode: {s}");
                return ExitCode::from(1);
            }
        },
        None => None,
    };

    let options = FormatOptions {
        format: cli.format.as_deref().map(parse_format),
        currency: cli.currency.as_deref().map(|c| match c {
            "from_locale" => CurrencyChoice::FromLocale,
            code => CurrencyChoice::Code(code.to_string()),
        }),
        currency_digits: cli.cash.then_some(CurrencyDigits::Cash),
        rounding_mode,
        fractional_digits: cli.fractional_digits,
        maximum_integer_digits: cli.maximum_integer_digits,
        round_nearest: cli.round_nearest,
        minimum_grouping_digits: cli.minimum_grouping_digits,
        locale: cli.locale,
        number_system: cli.number_system.as_deref().map(|s| match s {
            "default" => NumberSystemChoice::Default,
            "native" => NumberSystemChoice::Native,
            name => NumberSystemChoice::Named(name.to_string()),
        }),
        ..Default::default()
    };

    match format(value, &CldrData, &options) {
        Ok(formatted) => {
            println!("{formatted}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(1)
        }
    }
}
