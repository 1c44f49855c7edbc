//! Cart line items and cart state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use voltshop_core::ProductId;

/// One entry in the cart: a product snapshot and the quantity selected.
///
/// `name`, `unit_price`, and `image_ref` are copied from the catalog when the
/// product is added. Later catalog changes do not reach into the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Catalog product this line refers to.
    pub product_id: ProductId,
    /// Display name at add time.
    pub name: String,
    /// Unit price at add time (non-negative, unrounded).
    pub unit_price: Decimal,
    /// Image URI at add time.
    pub image_ref: String,
    /// Units selected, always at least 1.
    pub quantity: u32,
    /// Per-order cap copied from the catalog, if the product has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_quantity: Option<u32>,
}

impl LineItem {
    /// `unit_price × quantity`, unrounded. Saturates at `Decimal::MAX`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }

    /// `unit_price × quantity`, or `None` if it does not fit in a `Decimal`.
    #[must_use]
    pub fn checked_line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Ordered cart contents, unique by product ID.
///
/// Only the cart store mutates this; everything else gets a shared borrow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    items: Vec<LineItem>,
}

impl CartState {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Look up a line by product ID.
    #[must_use]
    pub fn find(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.product_id == product_id)
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of line totals, unrounded. Saturates at `Decimal::MAX`; state
    /// built by the cart store never gets there.
    #[must_use]
    pub fn raw_subtotal(&self) -> Decimal {
        self.items
            .iter()
            .map(LineItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    pub(crate) fn find_mut(&mut self, product_id: &ProductId) -> Option<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|item| &item.product_id == product_id)
    }

    pub(crate) fn push(&mut self, item: LineItem) {
        self.items.push(item);
    }

    pub(crate) fn remove(&mut self, product_id: &ProductId) -> Option<LineItem> {
        let index = self
            .items
            .iter()
            .position(|item| &item.product_id == product_id)?;
        Some(self.items.remove(index))
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    /// Repair state that did not come through the cart store (e.g. restored
    /// from storage): drops zero-quantity and negative-price lines, merges
    /// duplicate product IDs into the first occurrence, clamps quantities to
    /// the line's maximum, and drops lines whose total would overflow.
    #[must_use]
    pub fn normalized(self) -> Self {
        let mut out = Self::new();
        for item in self.items {
            if item.quantity == 0 || item.unit_price < Decimal::ZERO {
                continue;
            }
            match out.find_mut(&item.product_id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => out.push(item),
            }
        }

        let mut total = Decimal::ZERO;
        out.items.retain_mut(|item| {
            if let Some(max) = item.max_quantity {
                item.quantity = item.quantity.min(max);
            }
            let next = item
                .checked_line_total()
                .and_then(|line| total.checked_add(line));
            match next {
                Some(next) if item.quantity > 0 => {
                    total = next;
                    true
                }
                _ => false,
            }
        });
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: &str, price: &str, quantity: u32) -> LineItem {
        LineItem {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            unit_price: price.parse().unwrap(),
            image_ref: format!("/img/{id}.jpg"),
            quantity,
            max_quantity: None,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line("p1", "19.99", 3).line_total(), "59.97".parse().unwrap());
    }

    #[test]
    fn test_totals() {
        let mut state = CartState::new();
        state.push(line("a", "10.00", 2));
        state.push(line("b", "5.50", 3));

        assert_eq!(state.total_quantity(), 5);
        assert_eq!(state.len(), 2);
        assert_eq!(state.raw_subtotal(), "36.50".parse().unwrap());
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut state = CartState::new();
        state.push(line("a", "1", 1));
        state.push(line("b", "1", 1));
        state.push(line("c", "1", 1));

        assert!(state.remove(&ProductId::new("b")).is_some());
        assert!(state.remove(&ProductId::new("b")).is_none());

        let ids: Vec<_> = state.items().iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn test_normalized_repairs_invariants() {
        let json = r#"{"items":[
            {"product_id":"a","name":"A","unit_price":"10","image_ref":"/a","quantity":1},
            {"product_id":"b","name":"B","unit_price":"3","image_ref":"/b","quantity":0},
            {"product_id":"a","name":"A2","unit_price":"12","image_ref":"/a2","quantity":2},
            {"product_id":"c","name":"C","unit_price":"-1","image_ref":"/c","quantity":1}
        ]}"#;
        let state: CartState = serde_json::from_str(json).unwrap();
        let state = state.normalized();

        assert_eq!(state.len(), 1);
        let a = state.find(&ProductId::new("a")).unwrap();
        assert_eq!(a.quantity, 3);
        assert_eq!(a.name, "A");
    }

    #[test]
    fn test_normalized_clamps_merged_lines_to_cap() {
        let json = r#"{"items":[
            {"product_id":"tv","name":"TV","unit_price":"10","image_ref":"","quantity":2,"max_quantity":3},
            {"product_id":"tv","name":"TV","unit_price":"10","image_ref":"","quantity":2,"max_quantity":3},
            {"product_id":"cam","name":"Cam","unit_price":"5","image_ref":"","quantity":9,"max_quantity":4}
        ]}"#;
        let state: CartState = serde_json::from_str(json).unwrap();
        let state = state.normalized();

        assert_eq!(state.find(&ProductId::new("tv")).unwrap().quantity, 3);
        assert_eq!(state.find(&ProductId::new("cam")).unwrap().quantity, 4);
        assert_eq!(state.total_quantity(), 7);
    }

    #[test]
    fn test_normalized_drops_lines_that_overflow() {
        let json = r#"{"items":[
            {"product_id":"a","name":"A","unit_price":"10","image_ref":"","quantity":1},
            {"product_id":"big","name":"Big","unit_price":"100000000000000000000","image_ref":"","quantity":1000000000},
            {"product_id":"b","name":"B","unit_price":"5","image_ref":"","quantity":2}
        ]}"#;
        let state: CartState = serde_json::from_str(json).unwrap();
        let state = state.normalized();

        let ids: Vec<_> = state.items().iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(state.raw_subtotal(), Decimal::from(20));
    }

    #[test]
    fn test_totals_saturate_instead_of_panicking() {
        let mut state = CartState::new();
        state.push(line("big", "100000000000000000000", 1_000_000_000));
        assert_eq!(state.items().first().unwrap().checked_line_total(), None);
        assert_eq!(state.raw_subtotal(), Decimal::MAX);
    }

    #[test]
    fn test_serde_roundtrip_omits_missing_cap() {
        let mut state = CartState::new();
        state.push(line("p1", "100.00", 1));
        let json = serde_json::to_string(&state).unwrap();
        assert!(!json.contains("max_quantity"));

        let back: CartState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
