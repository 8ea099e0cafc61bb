//! Money type for representing monetary values.
//!
//! Amounts are integer minor units (paise, cents) so cart totals are exact.
//! The amount itself carries no currency: a marketplace deals in a single
//! currency, and [`Currency`] only matters when parsing decimal prices off
//! the wire and when formatting for display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};

/// Supported display currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
    JPY,
}

impl Currency {
    /// Get the currency code (e.g., "INR").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::INR => "INR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
        }
    }

    /// Get the currency symbol (e.g., "₹").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::INR => "\u{20b9}",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::JPY => "\u{00a5}",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "INR" => Some(Currency::INR),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            _ => None,
        }
    }

    fn minor_per_major(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A monetary amount in minor currency units.
///
/// Arithmetic saturates at the `i64` bounds, so aggregates over a cart are
/// total functions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Money = Money(0);

    /// Create a Money value from minor units.
    pub const fn from_minor(amount_minor: i64) -> Self {
        Self(amount_minor)
    }

    /// Create a Money value from a decimal major-unit amount.
    ///
    /// Returns `None` for NaN, infinities, or values outside the `i64` range.
    ///
    /// ```
    /// use campus_commerce::money::{Currency, Money};
    /// let price = Money::from_decimal(49.99, Currency::INR).unwrap();
    /// assert_eq!(price.amount_minor(), 4999);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        let minor = (amount * currency.minor_per_major() as f64).round();
        if minor < i64::MIN as f64 || minor > i64::MAX as f64 {
            return None;
        }
        Some(Self(minor as i64))
    }

    /// Amount in minor units.
    pub const fn amount_minor(&self) -> i64 {
        self.0
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Convert to a decimal major-unit value.
    pub fn to_decimal(&self, currency: Currency) -> f64 {
        self.0 as f64 / currency.minor_per_major() as f64
    }

    /// Multiply by a quantity, saturating on overflow.
    pub fn times(&self, quantity: u32) -> Money {
        Money(self.0.saturating_mul(i64::from(quantity)))
    }

    /// Add another amount, saturating on overflow.
    pub fn saturating_add(&self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Format with the currency symbol (e.g., "₹49.99").
    pub fn display(&self, currency: Currency) -> String {
        format!("{}{}", currency.symbol(), self.display_amount(currency))
    }

    /// Format without symbol (e.g., "49.99").
    pub fn display_amount(&self, currency: Currency) -> String {
        let places = currency.decimal_places() as usize;
        if places == 0 {
            return self.0.to_string();
        }
        let unit = currency.minor_per_major();
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let unit = unit.unsigned_abs();
        format!("{sign}{}.{:0places$}", abs / unit, abs % unit)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        self.saturating_add(other)
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, quantity: u32) -> Money {
        self.times(quantity)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc.saturating_add(m))
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}
