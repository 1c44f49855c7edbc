//! Price calculation commands.

use std::fmt::Write;

use rust_decimal::Decimal;

use voltshop_core::{PricingError, pricing};
use voltshop_storefront::{AppError, StorefrontConfig};

use super::money;

/// Apply a discount to `base` and optionally split it into installments.
///
/// # Errors
///
/// Returns `PricingError` for a negative base, a discount outside 0-100, or
/// zero installments.
pub fn discount(
    config: &StorefrontConfig,
    base: Decimal,
    percent: Option<Decimal>,
    installments: Option<u32>,
) -> Result<String, AppError> {
    if base < Decimal::ZERO {
        return Err(PricingError::NegativePrice(base).into());
    }
    let percent = percent.map(pricing::validate_discount).transpose()?;

    let price = pricing::discounted_price(base, percent);
    let mut out = format!("Price:   {}", money(config, price));
    if let Some(pct) = percent.filter(|p| !p.is_zero()) {
        let _ = write!(
            out,
            "\nWas:     {}\nSavings: {} ({pct}%)",
            money(config, base),
            money(config, pricing::savings(base, percent))
        );
    }
    if let Some(count) = installments {
        let each = pricing::installment_amount(price, count)?;
        let _ = write!(out, "\nOr {count}x of {}", money(config, each));
    }
    Ok(out)
}
