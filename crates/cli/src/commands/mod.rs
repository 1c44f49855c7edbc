//! Command implementations.
//!
//! Each command returns its output as a string; `main` does the printing.

pub mod cart;
pub mod catalog;
pub mod price;

use rust_decimal::Decimal;
use voltshop_core::Price;
use voltshop_storefront::StorefrontConfig;

/// Format an amount in the configured currency.
fn money(config: &StorefrontConfig, amount: Decimal) -> String {
    Price::new(amount, config.currency).format()
}
