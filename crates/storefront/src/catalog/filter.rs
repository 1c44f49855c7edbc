//! Catalog filtering for the shop grid.

use std::collections::BTreeSet;

use rust_decimal::Decimal;

use crate::models::{Category, Product};

/// Filter criteria. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Allowed categories (any of).
    pub categories: BTreeSet<Category>,
    /// Allowed brands (any of, case-insensitive).
    pub brands: Vec<String>,
    /// Inclusive bounds on the effective price.
    pub price_range: Option<(Decimal, Decimal)>,
    /// Substring matched against name, brand, and description.
    pub query: Option<String>,
    /// Only products on sale.
    pub promotions_only: bool,
}

impl ProductFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.categories.insert(category);
        self
    }

    #[must_use]
    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brands.push(brand.into());
        self
    }

    #[must_use]
    pub const fn price_range(mut self, min: Decimal, max: Decimal) -> Self {
        self.price_range = Some((min, max));
        self
    }

    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query = (!query.trim().is_empty()).then_some(query);
        self
    }

    #[must_use]
    pub const fn promotions_only(mut self) -> Self {
        self.promotions_only = true;
        self
    }

    /// Whether `product` passes every criterion.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if !self.categories.is_empty() && !self.categories.contains(&product.category) {
            return false;
        }

        if !self.brands.is_empty()
            && !self
                .brands
                .iter()
                .any(|b| b.trim().eq_ignore_ascii_case(&product.brand))
        {
            return false;
        }

        if let Some((min, max)) = self.price_range {
            let price = product.effective_price();
            if price < min || price > max {
                return false;
            }
        }

        if let Some(query) = &self.query {
            let needle = query.trim().to_lowercase();
            let hit = [&product.name, &product.brand, &product.description]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        !self.promotions_only || product.on_sale()
    }
}
