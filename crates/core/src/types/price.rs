//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts are carried at full precision through every computation. Rounding
//! to two decimal places (round-half-up) happens only at the display
//! boundary, via [`round_currency`], [`Price::rounded`], or [`Price::format`].

use core::fmt;
use core::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Round an amount to two decimal places, half-up (away from zero).
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., reais, not centavos).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// The amount rounded for display.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        round_currency(self.amount)
    }

    /// Format for display, e.g. `R$ 3.999,90` or `$3,999.90`.
    #[must_use]
    pub fn format(&self) -> String {
        let rounded = self.rounded();
        // Scale is at most 2 after rounding, so this is exact.
        let cents = (rounded * Decimal::ONE_HUNDRED).to_i128().unwrap_or(0);
        let negative = cents < 0;
        let cents = cents.unsigned_abs();

        let whole = group_thousands(cents / 100, self.currency_code.thousands_separator());
        let fraction = cents % 100;
        let sign = if negative { "-" } else { "" };

        format!(
            "{sign}{}{whole}{}{fraction:02}",
            self.currency_code.prefix(),
            self.currency_code.decimal_separator()
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

fn group_thousands(mut value: u128, separator: char) -> String {
    if value == 0 {
        return "0".to_owned();
    }

    let mut groups = Vec::new();
    while value > 0 {
        groups.push(value % 1000);
        value /= 1000;
    }

    let mut out = String::new();
    for (i, group) in groups.iter().rev().enumerate() {
        if i == 0 {
            out.push_str(&group.to_string());
        } else {
            out.push(separator);
            out.push_str(&format!("{group:03}"));
        }
    }
    out
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    BRL,
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Currency symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::BRL => "R$",
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::BRL => "BRL",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }

    const fn prefix(self) -> &'static str {
        match self {
            Self::BRL => "R$ ",
            _ => self.symbol(),
        }
    }

    const fn thousands_separator(self) -> char {
        match self {
            Self::BRL => '.',
            _ => ',',
        }
    }

    const fn decimal_separator(self) -> char {
        match self {
            Self::BRL => ',',
            _ => '.',
        }
    }
}

/// Error returned when parsing an unknown currency code.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unsupported currency code: {0}")]
pub struct UnknownCurrency(pub String);

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BRL" => Ok(Self::BRL),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            _ => Err(UnknownCurrency(s.to_owned())),
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
