//! Money type for representing monetary values.
//!
//! Amounts are integers in the smallest unit of the currency. Rupiah has no
//! minor unit in circulation, so an IDR amount of `20000` is Rp20.000.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    IDR,
    USD,
    EUR,
    SGD,
    MYR,
}

impl Currency {
    /// Get the currency code (e.g., "IDR").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::IDR => "IDR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::SGD => "SGD",
            Currency::MYR => "MYR",
        }
    }

    /// Get the currency symbol (e.g., "Rp").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::IDR => "Rp",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::SGD => "S$",
            Currency::MYR => "RM",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::IDR => 0,
            _ => 2,
        }
    }

    /// Thousands and decimal separators used when displaying amounts.
    fn separators(&self) -> (char, char) {
        match self {
            Currency::IDR | Currency::EUR => ('.', ','),
            _ => (',', '.'),
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "IDR" => Some(Currency::IDR),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "SGD" => Some(Currency::SGD),
            "MYR" => Some(Currency::MYR),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the smallest currency unit.
    pub amount_minor: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    /// Create a rupiah amount.
    pub fn idr(amount: i64) -> Self {
        Self::new(amount, Currency::IDR)
    }

    /// Create a Money value from a decimal amount.
    ///
    /// Returns `None` for NaN, infinities and values outside the `i64` range.
    ///
    /// ```
    /// use kasir_core::money::{Money, Currency};
    /// let price = Money::from_decimal(49.99, Currency::USD).unwrap();
    /// assert_eq!(price.amount_minor, 4999);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        let multiplier = 10_i64.pow(currency.decimal_places()) as f64;
        let scaled = (amount * multiplier).round();
        if scaled < i64::MIN as f64 || scaled > i64::MAX as f64 {
            return None;
        }
        Some(Self::new(scaled as i64, currency))
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_minor < 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        let divisor = 10_i64.pow(self.currency.decimal_places());
        self.amount_minor as f64 / divisor as f64
    }

    /// Format as a display string (e.g., "Rp20.000").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format as a display string without symbol (e.g., "20.000").
    pub fn display_amount(&self) -> String {
        let (thousands, decimal) = self.currency.separators();
        let places = self.currency.decimal_places();
        let divisor = 10_u64.pow(places);
        let magnitude = self.amount_minor.unsigned_abs();
        let whole = group_digits(magnitude / divisor, thousands);
        let sign = if self.amount_minor < 0 { "-" } else { "" };

        if places == 0 {
            format!("{}{}", sign, whole)
        } else {
            let fraction = magnitude % divisor;
            format!(
                "{}{}{}{:0width$}",
                sign,
                whole,
                decimal,
                fraction,
                width = places as usize
            )
        }
    }

    /// Try to add another Money value, returning None on currency mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_minor
            .checked_add(other.amount_minor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Try to subtract another Money value.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_minor
            .checked_sub(other.amount_minor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Multiply by a scalar, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_minor
            .checked_mul(factor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Sum an iterator of Money values.
    ///
    /// Returns None if any value has a different currency or the sum overflows.
    pub fn try_sum<'a>(mut iter: impl Iterator<Item = &'a Money>, currency: Currency) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

fn group_digits(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_minor_units() {
        let m = Money::idr(20000);
        assert_eq!(m.amount_minor, 20000);
        assert_eq!(m.currency, Currency::IDR);
    }

    #[test]
    fn test_money_from_decimal() {
        let m = Money::from_decimal(49.99, Currency::USD).unwrap();
        assert_eq!(m.amount_minor, 4999);

        let m = Money::from_decimal(25000.0, Currency::IDR).unwrap();
        assert_eq!(m.amount_minor, 25000);

        assert!(Money::from_decimal(f64::NAN, Currency::IDR).is_none());
        assert!(Money::from_decimal(f64::INFINITY, Currency::IDR).is_none());
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::idr(20000).display(), "Rp20.000");
        assert_eq!(Money::idr(1250000).display(), "Rp1.250.000");
        assert_eq!(Money::idr(500).display(), "Rp500");
        assert_eq!(Money::idr(-5000).display(), "Rp-5.000");
        assert_eq!(Money::new(123456, Currency::USD).display(), "$1,234.56");
        assert_eq!(Money::new(5, Currency::USD).display_amount(), "0.05");
    }

    #[test]
    fn test_money_checked_arithmetic() {
        let a = Money::idr(1000);
        let b = Money::idr(300);
        assert_eq!(a.try_add(&b), Some(Money::idr(1300)));
        assert_eq!(a.try_subtract(&b), Some(Money::idr(700)));
        assert_eq!(a.try_multiply(3), Some(Money::idr(3000)));
        assert_eq!(Money::idr(i64::MAX).try_multiply(2), None);
    }

    #[test]
    fn test_money_currency_mismatch() {
        let idr = Money::idr(1000);
        let usd = Money::new(1000, Currency::USD);
        assert_eq!(idr.try_add(&usd), None);
        assert_eq!(idr.try_subtract(&usd), None);
    }

    #[test]
    fn test_money_try_sum() {
        let values = [Money::idr(100), Money::idr(250)];
        assert_eq!(
            Money::try_sum(values.iter(), Currency::IDR),
            Some(Money::idr(350))
        );
        assert_eq!(
            Money::try_sum(std::iter::empty(), Currency::IDR),
            Some(Money::zero(Currency::IDR))
        );
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("IDR"), Some(Currency::IDR));
        assert_eq!(Currency::from_code("usd"), Some(Currency::USD));
        assert_eq!(Currency::from_code("INVALID"), None);
    }
}
