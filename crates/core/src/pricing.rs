//! Discount and installment arithmetic.
//!
//! Every function here works at full decimal precision and never rounds;
//! callers round once, at the formatting boundary (see [`crate::Price`]), so
//! that chaining several discounts does not compound rounding error.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Errors from pricing helpers that cannot produce a meaningful amount.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PricingError {
    /// A price was negative.
    #[error("price cannot be negative: {0}")]
    NegativePrice(Decimal),

    /// A discount percentage outside `0..=100`.
    #[error("discount must be between 0 and 100 percent: {0}")]
    InvalidDiscount(Decimal),

    /// Zero installments requested.
    #[error("installment count must be at least 1")]
    ZeroInstallments,
}

/// Price after applying a percentage discount.
///
/// `base × (1 − pct/100)`, with an absent discount treated as zero.
#[must_use]
pub fn discounted_price(base: Decimal, discount_percent: Option<Decimal>) -> Decimal {
    let pct = discount_percent.unwrap_or(Decimal::ZERO);
    base * (Decimal::ONE - pct / Decimal::ONE_HUNDRED)
}

/// Amount saved by a discount: `base − discounted_price(base, pct)`.
#[must_use]
pub fn savings(base: Decimal, discount_percent: Option<Decimal>) -> Decimal {
    base - discounted_price(base, discount_percent)
}

/// Check that a discount percentage lies in `0..=100`.
///
/// # Errors
///
/// Returns `PricingError::InvalidDiscount` otherwise.
pub fn validate_discount(discount_percent: Decimal) -> Result<Decimal, PricingError> {
    if discount_percent < Decimal::ZERO || discount_percent > Decimal::ONE_HUNDRED {
        return Err(PricingError::InvalidDiscount(discount_percent));
    }
    Ok(discount_percent)
}

/// Per-installment amount when a total is split into `installments` equal
/// payments.
///
/// # Errors
///
/// Returns `PricingError::ZeroInstallments` for `installments == 0` and
/// `PricingError::NegativePrice` for a negative total.
pub fn installment_amount(total: Decimal, installments: u32) -> Result<Decimal, PricingError> {
    if installments == 0 {
        return Err(PricingError::ZeroInstallments);
    }
    if total < Decimal::ZERO {
        return Err(PricingError::NegativePrice(total));
    }
    Ok(total / Decimal::from(installments))
}

/// Whole-number percentage off between an original and a current price.
///
/// Returns `None` when there is no markdown (original not positive, or the
/// current price is not lower).
#[must_use]
pub fn discount_percent_between(original: Decimal, current: Decimal) -> Option<Decimal> {
    if original <= Decimal::ZERO || current >= original {
        return None;
    }
    let pct = (original - current) / original * Decimal::ONE_HUNDRED;
    Some(pct.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
}
