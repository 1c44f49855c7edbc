//! Catalog product records.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use voltshop_core::{ProductId, pricing};

/// A product as supplied by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// List price before any `discount_percent` is applied.
    pub price: Decimal,
    /// "Was" price shown struck through, if the product is marked down.
    pub original_price: Option<Decimal>,
    /// Percentage off `price`, applied at add-to-cart time.
    pub discount_percent: Option<Decimal>,
    pub image: String,
    pub brand: String,
    pub category: Category,
    pub is_new: bool,
    pub is_promotion: bool,
    /// Largest quantity a single order may contain.
    pub max_quantity: Option<u32>,
}

impl Product {
    /// Price the customer pays: `price` with `discount_percent` applied.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        pricing::discounted_price(self.price, self.discount_percent)
    }

    /// Amount saved against the highest reference price.
    #[must_use]
    pub fn savings(&self) -> Decimal {
        let reference = self.original_price.unwrap_or(self.price).max(self.price);
        reference - self.effective_price()
    }

    /// Percentage off shown on the product badge.
    #[must_use]
    pub fn badge_percent(&self) -> Option<Decimal> {
        match (self.discount_percent, self.original_price) {
            (Some(pct), _) if pct > Decimal::ZERO => Some(pct),
            (_, Some(original)) => pricing::discount_percent_between(original, self.price),
            _ => None,
        }
    }

    /// Whether the product is shown with a sale marker.
    #[must_use]
    pub fn on_sale(&self) -> bool {
        self.is_promotion || self.badge_percent().is_some()
    }
}

/// Storefront departments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Notebooks,
    Tablets,
    Smartphones,
    Tvs,
    Audio,
    Photography,
    Games,
    Accessories,
    Components,
    Toys,
    Electronics,
}

impl Category {
    /// All categories, in menu order.
    pub const ALL: [Self; 11] = [
        Self::Notebooks,
        Self::Tablets,
        Self::Smartphones,
        Self::Tvs,
        Self::Audio,
        Self::Photography,
        Self::Games,
        Self::Accessories,
        Self::Components,
        Self::Toys,
        Self::Electronics,
    ];

    /// URL slug.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Notebooks => "notebooks",
            Self::Tablets => "tablets",
            Self::Smartphones => "smartphones",
            Self::Tvs => "tvs",
            Self::Audio => "audio",
            Self::Photography => "photography",
            Self::Games => "games",
            Self::Accessories => "accessories",
            Self::Components => "components",
            Self::Toys => "toys",
            Self::Electronics => "electronics",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Error returned for a slug that names no category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts the English slugs plus the Portuguese department and
    /// subcategory names used in the legacy catalog menus.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = fold_accents(s.trim()).to_lowercase();
        let category = match key.as_str() {
            "notebooks" | "laptops" => Self::Notebooks,
            "tablets" => Self::Tablets,
            "smartphones" | "iphone" | "android" | "basicos" | "celulares" => Self::Smartphones,
            "tvs" | "smart tvs" | "tv & home" | "home theater" => Self::Tvs,
            "audio" | "fones" | "caixas de som" => Self::Audio,
            "photography" | "fotografia" | "cameras" | "lentes" | "tripes" | "iluminacao" => {
                Self::Photography
            }
            "games" | "jogos" | "consoles" => Self::Games,
            "accessories" | "acessorios" => Self::Accessories,
            "components" | "componentes" => Self::Components,
            "toys" | "brinquedos" => Self::Toys,
            "electronics" | "eletronicos" => Self::Electronics,
            _ => return Err(UnknownCategory(s.to_owned())),
        };
        Ok(category)
    }
}

fn fold_accents(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'Á' | 'À' | 'Â' | 'Ã' => 'a',
            'é' | 'ê' | 'É' | 'Ê' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'ô' | 'õ' | 'Ó' | 'Ô' | 'Õ' => 'o',
            'ú' | 'Ú' => 'u',
            'ç' | 'Ç' => 'c',
            other => other,
        })
        .collect()
}
