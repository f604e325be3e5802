use fixed_decimal::{Decimal, FloatPrecision, Sign, SignDisplay};
use num_bigint::BigInt;

/// A numeric input value. Machine integers and doubles cover the common
/// cases; `Decimal` carries arbitrary precision and `BigInt` arbitrary
/// magnitude.
#[derive(Clone, Debug)]
pub enum Number {
    Int(i64),
    BigInt(BigInt),
    Float(f64),
    Decimal(Decimal),
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::Int(v)
    }
}

impl From<i32> for Number {
    fn from(v: i32) -> Self {
        Number::Int(v as i64)
    }
}

impl From<u32> for Number {
    fn from(v: u32) -> Self {
        Number::Int(v as i64)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Float(v)
    }
}

impl From<BigInt> for Number {
    fn from(v: BigInt) -> Self {
        Number::BigInt(v)
    }
}

impl From<Decimal> for Number {
    fn from(v: Decimal) -> Self {
        Number::Decimal(v)
    }
}

/// The value after canonicalization, with the sign decision already made.
/// A double's negative zero counts as positive; a decimal's sign field
/// decides even for zero.
pub(crate) enum Classified {
    NaN,
    Infinite { negative: bool },
    Finite { dec: Decimal, negative: bool },
}

pub(crate) fn classify(value: &Number) -> Classified {
    match value {
        Number::Int(i) => Classified::Finite {
            dec: Decimal::from(*i),
            negative: *i < 0,
        },
        Number::BigInt(b) => {
            let s = b.to_string();
            let dec = s.parse::<Decimal>().unwrap_or_else(|_| Decimal::from(0));
            Classified::Finite {
                negative: dec.sign == Sign::Negative && !dec.absolute.is_zero(),
                dec,
            }
        }
        Number::Float(f) => {
            if f.is_nan() {
                return Classified::NaN;
            }
            if f.is_infinite() {
                return Classified::Infinite { negative: *f < 0.0 };
            }
            let dec = match Decimal::try_from_f64(*f, FloatPrecision::RoundTrip) {
                Ok(d) => d,
                Err(_) => match Decimal::try_from_str(&format!("{f}")) {
                    Ok(d) => d,
                    Err(_) => Decimal::from(0),
                },
            };
            Classified::Finite {
                negative: *f < 0.0,
                dec,
            }
        }
        Number::Decimal(d) => Classified::Finite {
            dec: d.clone(),
            negative: d.sign == Sign::Negative,
        },
    }
}

/// Strips the sign, leaving the absolute value the engine works on.
pub(crate) fn into_absolute(mut dec: Decimal) -> Decimal {
    dec.apply_sign_display(SignDisplay::Never);
    dec
}
