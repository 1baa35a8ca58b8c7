//! Lenient deserializers for API numbers.
//!
//! The backend sends prices as decimal strings (`"10000.00"`), counts as
//! either strings or integers, and sometimes `null` where a zero is meant.
//! Anything else still fails deserialization.

use crate::money::{Currency, Money};
use serde::de::{self, Deserializer, Unexpected};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawNumber {
    fn to_f64<E: de::Error>(self) -> Result<f64, E> {
        match self {
            RawNumber::Int(v) => Ok(v as f64),
            RawNumber::Float(v) => Ok(v),
            RawNumber::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| E::invalid_value(Unexpected::Str(&s), &"a numeric string")),
        }
    }
}

/// Rupiah amount from a number or numeric string; `null` is zero.
pub fn idr<'de, D>(deserializer: D) -> Result<Money, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    let value = match raw {
        Some(raw) => raw.to_f64()?,
        None => return Ok(Money::zero(Currency::IDR)),
    };
    Money::from_decimal(value, Currency::IDR)
        .ok_or_else(|| de::Error::invalid_value(Unexpected::Float(value), &"a finite amount"))
}

/// Integer from a number or numeric string; `null` is zero.
pub fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    match raw {
        Some(RawNumber::Int(v)) => Ok(v),
        Some(other) => {
            let value = other.to_f64()?;
            if value.fract() != 0.0 || value < i64::MIN as f64 || value > i64::MAX as f64 {
                return Err(de::Error::invalid_value(
                    Unexpected::Float(value),
                    &"an integer",
                ));
            }
            Ok(value as i64)
        }
        None => Ok(0),
    }
}
