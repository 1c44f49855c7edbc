//! Cart commands.
//!
//! The cart lives in `FileStorage` under the configured data directory, so
//! every invocation picks up where the last one left off.

use std::fmt::Write;

use voltshop_core::ProductId;
use voltshop_storefront::storage::FileStorage;
use voltshop_storefront::{AppError, CartStore, CatalogProvider, InMemoryCatalog, StorefrontConfig};

use super::money;

/// Restore the persisted cart.
#[must_use]
pub fn open(config: &StorefrontConfig) -> CartStore<FileStorage> {
    CartStore::restore(FileStorage::new(&config.data_dir)).with_policy(config.snapshot_policy)
}

/// Add a catalog product to the cart.
///
/// # Errors
///
/// Returns `CatalogError::ProductNotFound` for an unknown product and
/// `CartError::Validation` for a bad quantity.
pub fn add(
    cart: &mut CartStore<FileStorage>,
    config: &StorefrontConfig,
    id: &str,
    quantity: i64,
) -> Result<String, AppError> {
    let product = InMemoryCatalog::seeded().require(&ProductId::new(id))?;
    cart.add_product(&product, quantity)?;

    let line = cart
        .find_item(&product.id)
        .map_or(0, |item| item.quantity);
    Ok(format!(
        "Added {quantity} x {} ({} in cart)\n{}",
        product.name,
        line,
        totals(cart, config)
    ))
}

/// Remove a product's line.
#[must_use]
pub fn remove(cart: &mut CartStore<FileStorage>, id: &str) -> String {
    if cart.remove_item(&ProductId::new(id)) {
        format!("Removed {id}")
    } else {
        format!("{id} was not in the cart")
    }
}

/// Set a line's quantity; zero or less removes it.
///
/// # Errors
///
/// Returns `CartError::NotFound` for a positive quantity on a product that
/// is not in the cart.
pub fn update(
    cart: &mut CartStore<FileStorage>,
    config: &StorefrontConfig,
    id: &str,
    quantity: i64,
) -> Result<String, AppError> {
    let product_id = ProductId::new(id);
    cart.update_quantity(&product_id, quantity)?;

    let status = match cart.find_item(&product_id) {
        Some(item) => format!("{id}: quantity {}", item.quantity),
        None => format!("{id}: removed"),
    };
    Ok(format!("{status}\n{}", totals(cart, config)))
}

/// Render the cart contents.
#[must_use]
pub fn show(cart: &CartStore<FileStorage>, config: &StorefrontConfig) -> String {
    if cart.state().is_empty() {
        return "Your cart is empty.".to_string();
    }

    let mut out = String::new();
    for item in cart.state().items() {
        let _ = writeln!(
            out,
            "{:<20} {:<46} {:>3} x {:>14} = {:>14}",
            item.product_id.as_str(),
            item.name,
            item.quantity,
            money(config, item.unit_price),
            money(config, item.line_total())
        );
    }
    out.push_str(&totals(cart, config));
    out
}

/// Empty the cart.
#[must_use]
pub fn clear(cart: &mut CartStore<FileStorage>) -> String {
    let removed = cart.distinct_count();
    cart.clear();
    format!("Cleared {removed} line(s)")
}

fn totals(cart: &CartStore<FileStorage>, config: &StorefrontConfig) -> String {
    format!(
        "{} item(s), subtotal {}",
        cart.item_count(),
        money(config, cart.subtotal())
    )
}
