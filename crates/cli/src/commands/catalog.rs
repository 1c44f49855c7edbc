//! Catalog browsing commands.

use std::fmt::Write;

use voltshop_core::ProductId;
use voltshop_storefront::catalog::{CatalogError, CatalogProvider, InMemoryCatalog, ProductFilter};
use voltshop_storefront::models::{Category, Product};
use voltshop_storefront::{AppError, StorefrontConfig};

use super::money;

/// List catalog products matching the given filters.
///
/// # Errors
///
/// Returns `CatalogError::UnknownCategory` for a category that names no
/// department.
pub fn list(
    config: &StorefrontConfig,
    categories: &[String],
    brands: &[String],
    query: Option<String>,
    promotions_only: bool,
) -> Result<String, AppError> {
    let mut filter = ProductFilter::new();
    for category in categories {
        let category: Category = category.parse().map_err(CatalogError::from)?;
        filter = filter.category(category);
    }
    for brand in brands {
        filter = filter.brand(brand.as_str());
    }
    if let Some(query) = query {
        filter = filter.query(query);
    }
    if promotions_only {
        filter = filter.promotions_only();
    }

    let catalog = InMemoryCatalog::seeded();
    let products = catalog.filter(&filter);
    tracing::debug!(matches = products.len(), "Catalog listed");

    if products.is_empty() {
        return Ok("No products match.".to_string());
    }

    let mut out = String::new();
    for product in &products {
        let _ = writeln!(out, "{}", summary_line(config, product));
    }
    let _ = write!(out, "{} product(s)", products.len());
    Ok(out)
}

/// Show one product in detail.
///
/// # Errors
///
/// Returns `CatalogError::ProductNotFound` for an unknown ID.
pub fn show(config: &StorefrontConfig, id: &str) -> Result<String, AppError> {
    let catalog = InMemoryCatalog::seeded();
    let product = catalog.require(&ProductId::new(id))?;

    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", product.name, product.id);
    let _ = writeln!(out, "Brand:    {}", product.brand);
    let _ = writeln!(out, "Category: {}", product.category);
    let _ = writeln!(out, "Price:    {}", money(config, product.effective_price()));
    if let Some(original) = product.original_price.filter(|o| *o > product.price) {
        let _ = writeln!(out, "Was:      {}", money(config, original));
    }
    if let Some(pct) = product.badge_percent() {
        let _ = writeln!(out, "Discount: {pct}% (save {})", money(config, product.savings()));
    }
    if let Some(max) = product.max_quantity {
        let _ = writeln!(out, "Limit:    {max} per order");
    }
    if !product.description.is_empty() {
        let _ = writeln!(out, "\n{}", product.description);
    }
    Ok(out.trim_end().to_string())
}

fn summary_line(config: &StorefrontConfig, product: &Product) -> String {
    let mut tags = Vec::new();
    if product.is_new {
        tags.push("new".to_string());
    }
    if let Some(pct) = product.badge_percent() {
        tags.push(format!("-{pct}%"));
    } else if product.is_promotion {
        tags.push("sale".to_string());
    }

    let tags = if tags.is_empty() {
        String::new()
    } else {
        format!("  [{}]", tags.join(", "))
    };
    format!(
        "{:<20} {:<46} {:>14}{tags}",
        product.id.as_str(),
        product.name,
        money(config, product.effective_price())
    )
}
