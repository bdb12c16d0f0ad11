//! Money handling with decimal arithmetic.
//!
//! All amounts in the system are [`rust_decimal::Decimal`] values in the
//! currency's standard unit (euros, not cents). Rounding happens at
//! computation boundaries via [`round_to_cents`]; stored amounts are
//! already rounded.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Round an amount to whole cents, half-up.
#[must_use]
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// ISO 4217 currency codes the boutique trades in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    EUR,
    USD,
    GBP,
}

impl CurrencyCode {
    /// Currency symbol for display.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::EUR => "€",
            Self::USD => "$",
            Self::GBP => "£",
        }
    }
}

/// An amount paired with its currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: CurrencyCode,
}

impl Price {
    /// Create a new price, rounding the amount to cents.
    #[must_use]
    pub fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self {
            amount: round_to_cents(amount),
            currency,
        }
    }

    /// Create a price in euros.
    #[must_use]
    pub fn eur(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::EUR)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", self.currency.symbol(), self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up() {
        let amount: Decimal = "10.005".parse().expect("decimal");
        assert_eq!(round_to_cents(amount).to_string(), "10.01");

        let amount: Decimal = "10.004".parse().expect("decimal");
        assert_eq!(round_to_cents(amount).to_string(), "10.00");
    }

    #[test]
    fn display_includes_symbol_and_cents() {
        let price = Price::eur("54.99".parse().expect("decimal"));
        assert_eq!(price.to_string(), "€54.99");

        let price = Price::new("5".parse().expect("decimal"), CurrencyCode::GBP);
        assert_eq!(price.to_string(), "£5.00");
    }
}
