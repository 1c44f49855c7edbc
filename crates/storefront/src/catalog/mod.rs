//! Product catalog.
//!
//! The cart never talks to the catalog directly; callers look a product up
//! here and hand it to [`CartStore::add_product`](crate::cart::CartStore::add_product),
//! which snapshots the fields it needs.

mod filter;
mod seed;

use rust_decimal::Decimal;
use thiserror::Error;

use voltshop_core::ProductId;

use crate::models::{Product, product::UnknownCategory};

pub use filter::ProductFilter;

/// Errors from catalog lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A category name that maps to no department.
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),

    /// No product with this ID.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),
}

/// Read access to product records.
pub trait CatalogProvider {
    /// Look up a product by ID.
    fn product(&self, id: &ProductId) -> Option<Product>;

    /// Every product, in catalog order.
    fn products(&self) -> Vec<Product>;

    /// Products matching `filter`, in catalog order.
    fn filter(&self, filter: &ProductFilter) -> Vec<Product> {
        self.products()
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect()
    }

    /// Like [`product`](Self::product), but missing IDs are an error.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if no product has this ID.
    fn require(&self, id: &ProductId) -> Result<Product, CatalogError> {
        self.product(id)
            .ok_or_else(|| CatalogError::ProductNotFound(id.clone()))
    }
}

/// A fixed product list held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The demo catalog shipped with the storefront.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(seed::products())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinct brand names, sorted.
    #[must_use]
    pub fn brands(&self) -> Vec<&str> {
        let mut brands: Vec<&str> = self.products.iter().map(|p| p.brand.as_str()).collect();
        brands.sort_unstable();
        brands.dedup();
        brands
    }

    /// Lowest and highest effective price, for the price slider.
    #[must_use]
    pub fn price_bounds(&self) -> Option<(Decimal, Decimal)> {
        let mut prices = self.products.iter().map(Product::effective_price);
        let first = prices.next()?;
        Some(prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

impl CatalogProvider for InMemoryCatalog {
    fn product(&self, id: &ProductId) -> Option<Product> {
        self.products.iter().find(|p| &p.id == id).cloned()
    }

    fn products(&self) -> Vec<Product> {
        self.products.clone()
    }
}
