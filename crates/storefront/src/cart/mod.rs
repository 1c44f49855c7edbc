//! Cart store.
//!
//! [`CartStore`] owns the [`CartState`] for one shopping session. The view
//! layer holds the store by reference, calls its operations, and subscribes
//! to changes; nothing else can mutate the cart.
//!
//! # Guarantees
//!
//! - Line items are unique by product ID; re-adding a product bumps its
//!   quantity instead of appending a second line.
//! - No line ever has quantity 0. Updating a line to 0 removes it.
//! - A rejected operation changes nothing and notifies no one.
//! - Subscribers run synchronously, in subscription order, after every
//!   operation that changed the state.
//! - The state is written through to [`Storage`] after each change. Storage
//!   failures are logged and never fail the operation.

mod error;

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;

use voltshop_core::{ProductId, round_currency};

use crate::error::add_breadcrumb;
use crate::models::{CartState, LineItem, Product};
use crate::storage::{NoopStorage, Storage, keys, load_json, save_json};

pub use error::CartError;

/// What happens to a line's display snapshot when its product is added again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotPolicy {
    /// Name, price, and image are replaced by the latest add.
    #[default]
    Refresh,
    /// The first add's snapshot is kept; later adds only change quantity.
    KeepFirst,
}

impl FromStr for SnapshotPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "refresh" => Ok(Self::Refresh),
            "keep_first" | "keep-first" => Ok(Self::KeepFirst),
            other => Err(format!("expected `refresh` or `keep_first`, got `{other}`")),
        }
    }
}

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&CartState)>;

struct Subscriber {
    id: SubscriptionId,
    listener: Listener,
}

/// The session's cart.
pub struct CartStore<S: Storage = NoopStorage> {
    state: CartState,
    storage: S,
    policy: SnapshotPolicy,
    subscribers: Vec<Subscriber>,
    next_subscription: u64,
}

impl CartStore<NoopStorage> {
    /// An empty cart with no persistence.
    #[must_use]
    pub fn new() -> Self {
        Self::with_storage(NoopStorage)
    }
}

impl Default for CartStore<NoopStorage> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Storage> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &self.state)
            .field("policy", &self.policy)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl<S: Storage> CartStore<S> {
    /// An empty cart that writes through to `storage`. Nothing is loaded.
    #[must_use]
    pub const fn with_storage(storage: S) -> Self {
        Self {
            state: CartState::new(),
            storage,
            policy: SnapshotPolicy::Refresh,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// A cart restored from `storage` on a best-effort basis.
    ///
    /// Missing, unreadable, or corrupt data yields an empty cart. Restored
    /// lines are re-checked against the cart invariants.
    #[must_use]
    pub fn restore(storage: S) -> Self {
        let state = match load_json::<CartState>(&storage, keys::CART) {
            Ok(Some(state)) => {
                let state = state.normalized();
                tracing::info!(
                    items = state.len(),
                    quantity = state.total_quantity(),
                    "Restored cart from storage"
                );
                state
            }
            Ok(None) => CartState::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable stored cart");
                CartState::new()
            }
        };

        Self {
            state,
            ..Self::with_storage(storage)
        }
    }

    /// Set the re-add snapshot policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: SnapshotPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub const fn policy(&self) -> SnapshotPolicy {
        self.policy
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` units of a product, snapshotting its display fields.
    ///
    /// If the product is already in the cart its quantity is increased;
    /// the snapshot is handled according to the store's [`SnapshotPolicy`].
    ///
    /// # Errors
    ///
    /// Returns `CartError::Validation` if `quantity < 1`, `unit_price` is
    /// negative, the resulting quantity would overflow or exceed the line's
    /// maximum, or the cart total would no longer be representable.
    pub fn add_item(
        &mut self,
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: Decimal,
        image_ref: impl Into<String>,
        quantity: i64,
    ) -> Result<&CartState, CartError> {
        let line = LineItem {
            product_id: product_id.into(),
            name: name.into(),
            unit_price,
            image_ref: image_ref.into(),
            quantity: positive_quantity(quantity)?,
            max_quantity: None,
        };
        self.add_line(line)
    }

    /// [`add_item`](Self::add_item) with a quantity of one.
    ///
    /// # Errors
    ///
    /// Same as `add_item`.
    pub fn add_one(
        &mut self,
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: Decimal,
        image_ref: impl Into<String>,
    ) -> Result<&CartState, CartError> {
        self.add_item(product_id, name, unit_price, image_ref, 1)
    }

    /// Add a catalog product, capturing its discounted price and its
    /// per-order maximum.
    ///
    /// # Errors
    ///
    /// Same as `add_item`.
    pub fn add_product(&mut self, product: &Product, quantity: i64) -> Result<&CartState, CartError> {
        let line = LineItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.effective_price(),
            image_ref: product.image.clone(),
            quantity: positive_quantity(quantity)?,
            max_quantity: product.max_quantity,
        };
        self.add_line(line)
    }

    fn add_line(&mut self, incoming: LineItem) -> Result<&CartState, CartError> {
        if incoming.unit_price < Decimal::ZERO {
            return Err(CartError::validation(format!(
                "unit price cannot be negative (got {})",
                incoming.unit_price
            )));
        }

        let policy = self.policy;
        let (quantity, unit_price, cap) = match self.state.find(&incoming.product_id) {
            Some(existing) => {
                let quantity = existing
                    .quantity
                    .checked_add(incoming.quantity)
                    .ok_or_else(|| CartError::validation("quantity is too large"))?;
                match policy {
                    SnapshotPolicy::Refresh => (
                        quantity,
                        incoming.unit_price,
                        incoming.max_quantity.or(existing.max_quantity),
                    ),
                    SnapshotPolicy::KeepFirst => {
                        (quantity, existing.unit_price, existing.max_quantity)
                    }
                }
            }
            None => (incoming.quantity, incoming.unit_price, incoming.max_quantity),
        };
        check_cap(cap, quantity)?;
        self.check_totals(&incoming.product_id, unit_price, quantity)?;

        match self.state.find_mut(&incoming.product_id) {
            Some(existing) => {
                existing.quantity = quantity;
                existing.max_quantity = cap;
                if policy == SnapshotPolicy::Refresh {
                    existing.name = incoming.name;
                    existing.unit_price = incoming.unit_price;
                    existing.image_ref = incoming.image_ref;
                }
            }
            None => self.state.push(incoming),
        }

        self.commit("add_item");
        Ok(&self.state)
    }

    /// Remove a product's line.
    ///
    /// Returns `false` without notifying anyone if the product was not in
    /// the cart.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        if self.state.remove(product_id).is_none() {
            return false;
        }
        self.commit("remove_item");
        true
    }

    /// Set a line's quantity exactly. A quantity of zero or less removes
    /// the line (and is a no-op if the product is absent).
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` for a positive quantity on a product
    /// that is not in the cart, and `CartError::Validation` if the quantity
    /// exceeds the line's maximum, does not fit in a `u32`, or would make the
    /// cart total overflow.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        new_quantity: i64,
    ) -> Result<&CartState, CartError> {
        if new_quantity <= 0 {
            self.remove_item(product_id);
            return Ok(&self.state);
        }

        let quantity = positive_quantity(new_quantity)?;
        let item = self
            .state
            .find(product_id)
            .ok_or_else(|| CartError::NotFound(product_id.clone()))?;
        check_cap(item.max_quantity, quantity)?;
        if item.quantity == quantity {
            return Ok(&self.state);
        }
        self.check_totals(product_id, item.unit_price, quantity)?;

        if let Some(item) = self.state.find_mut(product_id) {
            item.quantity = quantity;
        }
        self.commit("update_quantity");
        Ok(&self.state)
    }

    /// Add one unit to an existing line.
    ///
    /// # Errors
    ///
    /// Same as `update_quantity`.
    pub fn increment(&mut self, product_id: &ProductId) -> Result<&CartState, CartError> {
        let current = self.current_quantity(product_id)?;
        self.update_quantity(product_id, current + 1)
    }

    /// Take one unit off an existing line, removing it at zero.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` if the product is not in the cart.
    pub fn decrement(&mut self, product_id: &ProductId) -> Result<&CartState, CartError> {
        let current = self.current_quantity(product_id)?;
        self.update_quantity(product_id, current - 1)
    }

    /// Reject a change that would push a line total or the cart total past
    /// what `Decimal` can hold.
    fn check_totals(
        &self,
        product_id: &ProductId,
        unit_price: Decimal,
        quantity: u32,
    ) -> Result<(), CartError> {
        let overflow = || CartError::validation("cart total is too large");
        let line = unit_price
            .checked_mul(Decimal::from(quantity))
            .ok_or_else(overflow)?;
        self.state
            .items()
            .iter()
            .filter(|item| &item.product_id != product_id)
            .try_fold(line, |total, item| {
                item.checked_line_total()
                    .and_then(|line| total.checked_add(line))
            })
            .map(|_| ())
            .ok_or_else(overflow)
    }

    fn current_quantity(&self, product_id: &ProductId) -> Result<i64, CartError> {
        self.state
            .find(product_id)
            .map(|item| i64::from(item.quantity))
            .ok_or_else(|| CartError::NotFound(product_id.clone()))
    }

    /// Empty the cart. Notifies only if there was something to remove.
    pub fn clear(&mut self) {
        if self.state.is_empty() {
            return;
        }
        self.state.clear();
        self.commit("clear");
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// Total units across all lines (the badge count).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.state.total_quantity()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn distinct_count(&self) -> usize {
        self.state.len()
    }

    /// Sum of `unit_price × quantity`, rounded half-up to two decimals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        round_currency(self.state.raw_subtotal())
    }

    #[must_use]
    pub fn find_item(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.state.find(product_id)
    }

    /// Lines whose name contains `query`, ignoring case. A blank query
    /// matches everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&LineItem> {
        let needle = query.trim().to_lowercase();
        self.state
            .items()
            .iter()
            .filter(|item| needle.is_empty() || item.name.to_lowercase().contains(&needle))
            .collect()
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register a callback that receives the full state after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&CartState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push(Subscriber {
            id,
            listener: Box::new(listener),
        });
        id
    }

    /// Drop a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    fn commit(&mut self, action: &'static str) {
        tracing::debug!(
            action,
            items = self.state.len(),
            quantity = self.state.total_quantity(),
            "Cart updated"
        );
        add_breadcrumb("cart", action, None);

        let state = &self.state;
        for subscriber in &mut self.subscribers {
            (subscriber.listener)(state);
        }

        if let Err(e) = save_json(&self.storage, keys::CART, &self.state) {
            tracing::warn!(error = %e, action, "Failed to persist cart");
        }
    }
}

fn positive_quantity(quantity: i64) -> Result<u32, CartError> {
    if quantity < 1 {
        return Err(CartError::validation(format!(
            "quantity must be at least 1 (got {quantity})"
        )));
    }
    u32::try_from(quantity).map_err(|_| CartError::validation("quantity is too large"))
}

fn check_cap(cap: Option<u32>, quantity: u32) -> Result<(), CartError> {
    match cap {
        Some(max) if quantity > max => Err(CartError::validation(format!(
            "at most {max} units per order (requested {quantity})"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::sync::Arc;

    use super::*;
    use crate::models::Category;
    use crate::storage::{MemoryStorage, StorageError};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn id(s: &str) -> ProductId {
        ProductId::new(s)
    }

    fn mouse(store: &mut CartStore<impl Storage>, quantity: i64) {
        store
            .add_item("p1", "Mouse", dec("100.00"), "/img.jpg", quantity)
            .unwrap();
    }

    fn product(max_quantity: Option<u32>) -> Product {
        Product {
            id: id("s23"),
            name: "Smartphone Galaxy S23".to_string(),
            description: String::new(),
            price: dec("4999.90"),
            original_price: Some(dec("5999.90")),
            discount_percent: Some(dec("10")),
            image: "/smartphone-s23.jpg".to_string(),
            brand: "Samsung".to_string(),
            category: Category::Smartphones,
            is_new: false,
            is_promotion: true,
            max_quantity,
        }
    }

    struct FailingStorage;

    impl Storage for FailingStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("offline".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("offline".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("offline".to_string()))
        }
    }

    // -------------------------------------------------------------------------
    // add_item
    // -------------------------------------------------------------------------

    #[test]
    fn test_repeated_adds_merge_into_one_line() {
        let mut store = CartStore::new();
        mouse(&mut store, 1);
        mouse(&mut store, 2);

        assert_eq!(store.distinct_count(), 1);
        let line = store.find_item(&id("p1")).unwrap();
        assert_eq!(line.quantity, 3);
        assert_eq!(store.subtotal(), dec("300.00"));
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut store = CartStore::new();
        mouse(&mut store, 1);

        let err = store
            .add_item("p1", "Mouse", dec("100"), "/img.jpg", 0)
            .unwrap_err();
        assert!(matches!(err, CartError::Validation(_)));
        assert!(store.add_item("p2", "Pad", dec("5"), "/pad.jpg", -3).is_err());

        assert_eq!(store.item_count(), 1);
        assert!(store.find_item(&id("p2")).is_none());
    }

    #[test]
    fn test_add_rejects_negative_price() {
        let mut store = CartStore::new();
        let err = store.add_one("p1", "Mouse", dec("-0.01"), "/img.jpg").unwrap_err();
        assert!(matches!(err, CartError::Validation(_)));
        assert!(store.state().is_empty());
    }

    #[test]
    fn test_add_allows_free_items() {
        let mut store = CartStore::new();
        store.add_one("gift", "Brinde", Decimal::ZERO, "/gift.png").unwrap();
        assert_eq!(store.item_count(), 1);
        assert_eq!(store.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn test_add_rejects_quantity_overflow() {
        let mut store = CartStore::new();
        store
            .add_item("p1", "Cabo", dec("1"), "/c.jpg", i64::from(u32::MAX))
            .unwrap();
        assert!(store.add_item("p1", "Cabo", dec("1"), "/c.jpg", 1).is_err());
        assert!(store.add_item("p2", "Cabo", dec("1"), "/c.jpg", i64::MAX).is_err());
        assert_eq!(store.item_count(), u64::from(u32::MAX));
    }

    #[test]
    fn test_add_rejects_line_total_overflow() {
        let mut store = CartStore::new();
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        store.subscribe(move |_| counter.set(counter.get() + 1));

        let err = store
            .add_item("p1", "Rack", dec("100000000000000000000"), "/r.jpg", 1_000_000_000)
            .unwrap_err();
        assert!(matches!(err, CartError::Validation(_)));
        assert!(store.state().is_empty());
        assert_eq!(store.subtotal(), Decimal::ZERO);
        assert_eq!(seen.get(), 0);
    }

    #[test]
    fn test_add_rejects_cart_total_overflow() {
        let mut store = CartStore::new();
        store
            .add_item("a", "Rack", dec("50000000000000000000"), "/a.jpg", 1_000_000_000)
            .unwrap();
        let before = store.state().clone();

        let err = store
            .add_item("b", "Rack", dec("50000000000000000000"), "/b.jpg", 1_000_000_000)
            .unwrap_err();
        assert!(matches!(err, CartError::Validation(_)));
        assert_eq!(store.state(), &before);
        assert_eq!(store.subtotal(), dec("50000000000000000000000000000"));
    }

    #[test]
    fn test_update_rejects_total_overflow() {
        let mut store = CartStore::new();
        store
            .add_item("p1", "Rack", dec("100000000000000000000"), "/r.jpg", 1)
            .unwrap();

        assert!(matches!(
            store.update_quantity(&id("p1"), 1_000_000_000),
            Err(CartError::Validation(_))
        ));
        assert_eq!(store.item_count(), 1);
        assert_eq!(store.subtotal(), dec("100000000000000000000"));
    }

    #[test]
    fn test_refresh_policy_updates_snapshot() {
        let mut store = CartStore::new();
        store.add_one("p1", "Mouse", dec("100"), "/old.jpg").unwrap();
        store.add_one("p1", "Mouse Pro", dec("120"), "/new.jpg").unwrap();

        let line = store.find_item(&id("p1")).unwrap();
        assert_eq!(line.name, "Mouse Pro");
        assert_eq!(line.unit_price, dec("120"));
        assert_eq!(line.image_ref, "/new.jpg");
        assert_eq!(store.subtotal(), dec("240.00"));
    }

    #[test]
    fn test_keep_first_policy_locks_snapshot() {
        let mut store = CartStore::new().with_policy(SnapshotPolicy::KeepFirst);
        store.add_one("p1", "Mouse", dec("100"), "/old.jpg").unwrap();
        store.add_one("p1", "Mouse Pro", dec("120"), "/new.jpg").unwrap();

        let line = store.find_item(&id("p1")).unwrap();
        assert_eq!(line.name, "Mouse");
        assert_eq!(line.unit_price, dec("100"));
        assert_eq!(line.quantity, 2);
        assert_eq!(store.subtotal(), dec("200.00"));
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut store = CartStore::new();
        store.add_one("b", "B", dec("1"), "/b").unwrap();
        store.add_one("a", "A", dec("1"), "/a").unwrap();
        store.add_one("b", "B", dec("1"), "/b").unwrap();

        let ids: Vec<_> = store
            .state()
            .items()
            .iter()
            .map(|i| i.product_id.as_str())
            .collect();
        assert_eq!(ids, ["b", "a"]);
    }

    // -------------------------------------------------------------------------
    // add_product
    // -------------------------------------------------------------------------

    #[test]
    fn test_add_product_snapshots_discounted_price() {
        let mut store = CartStore::new();
        store.add_product(&product(None), 2).unwrap();

        let line = store.find_item(&id("s23")).unwrap();
        assert_eq!(line.unit_price, dec("4499.91"));
        assert_eq!(line.image_ref, "/smartphone-s23.jpg");
        assert_eq!(store.subtotal(), dec("8999.82"));
    }

    #[test]
    fn test_add_product_enforces_max_quantity() {
        let mut store = CartStore::new();
        let p = product(Some(5));
        store.add_product(&p, 4).unwrap();

        let err = store.add_product(&p, 2).unwrap_err();
        assert!(matches!(err, CartError::Validation(_)));
        assert_eq!(store.item_count(), 4);

        store.add_product(&p, 1).unwrap();
        assert_eq!(store.item_count(), 5);
        assert!(store.update_quantity(&id("s23"), 6).is_err());
        assert!(store.increment(&id("s23")).is_err());
    }

    #[test]
    fn test_catalog_price_change_does_not_reprice_cart() {
        let mut store = CartStore::new().with_policy(SnapshotPolicy::KeepFirst);
        let mut p = product(None);
        store.add_product(&p, 1).unwrap();

        p.price = dec("1.00");
        assert_eq!(store.find_item(&id("s23")).unwrap().unit_price, dec("4499.91"));
    }

    // -------------------------------------------------------------------------
    // remove_item / update_quantity / clear
    // -------------------------------------------------------------------------

    #[test]
    fn test_remove_scenario() {
        let mut store = CartStore::new();
        store.add_one("p1", "Mouse", dec("100"), "/m.jpg").unwrap();
        store.add_one("p2", "Teclado", dec("200"), "/t.jpg").unwrap();

        assert!(store.remove_item(&id("p1")));

        let ids: Vec<_> = store
            .state()
            .items()
            .iter()
            .map(|i| i.product_id.as_str())
            .collect();
        assert_eq!(ids, ["p2"]);
        assert_eq!(store.item_count(), 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut store = CartStore::new();
        mouse(&mut store, 2);
        let before = store.state().clone();

        assert!(!store.remove_item(&id("nope")));
        assert!(!store.remove_item(&id("nope")));
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn test_update_quantity_sets_exact_value() {
        let mut store = CartStore::new();
        mouse(&mut store, 2);

        store.update_quantity(&id("p1"), 7).unwrap();
        assert_eq!(store.find_item(&id("p1")).unwrap().quantity, 7);
        assert_eq!(store.subtotal(), dec("700.00"));
    }

    #[test]
    fn test_update_quantity_to_zero_removes() {
        let mut store = CartStore::new();
        mouse(&mut store, 2);

        store.update_quantity(&id("p1"), 0).unwrap();
        assert!(store.find_item(&id("p1")).is_none());

        mouse(&mut store, 1);
        store.update_quantity(&id("p1"), -4).unwrap();
        assert!(store.state().is_empty());
    }

    #[test]
    fn test_update_quantity_missing_product() {
        let mut store = CartStore::new();
        assert_eq!(
            store.update_quantity(&id("ghost"), 3).unwrap_err(),
            CartError::NotFound(id("ghost"))
        );
        assert!(store.update_quantity(&id("ghost"), 0).is_ok());
    }

    #[test]
    fn test_increment_and_decrement() {
        let mut store = CartStore::new();
        mouse(&mut store, 1);

        store.increment(&id("p1")).unwrap();
        assert_eq!(store.item_count(), 2);

        store.decrement(&id("p1")).unwrap();
        store.decrement(&id("p1")).unwrap();
        assert!(store.state().is_empty());

        assert_eq!(
            store.decrement(&id("p1")).unwrap_err(),
            CartError::NotFound(id("p1"))
        );
    }

    #[test]
    fn test_clear_resets_totals() {
        let mut store = CartStore::new();
        store.add_item("a", "A", dec("10.00"), "/a", 2).unwrap();
        store.add_item("b", "B", dec("20.00"), "/b", 3).unwrap();
        assert_eq!(store.item_count(), 5);
        assert_eq!(store.distinct_count(), 2);

        store.clear();
        assert_eq!(store.item_count(), 0);
        assert_eq!(store.subtotal(), Decimal::ZERO);
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    #[test]
    fn test_subtotal_rounds_half_up() {
        let mut store = CartStore::new();
        store.add_item("a", "A", dec("0.125"), "/a", 1).unwrap();
        assert_eq!(store.subtotal(), dec("0.13"));

        store.add_item("b", "B", dec("2699.991"), "/b", 1).unwrap();
        assert_eq!(store.subtotal(), dec("2700.12"));
    }

    #[test]
    fn test_empty_cart_totals() {
        let store = CartStore::new();
        assert_eq!(store.item_count(), 0);
        assert_eq!(store.subtotal(), Decimal::ZERO);
        assert!(store.find_item(&id("p1")).is_none());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut store = CartStore::new();
        store.add_one("a", "iPhone 14 Pro Max", dec("1"), "/a").unwrap();
        store.add_one("b", "Samsung Galaxy S23", dec("1"), "/b").unwrap();

        let hits = store.search("GALAXY");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].product_id, id("b"));
        assert_eq!(store.search("  ").len(), 2);
        assert!(store.search("nokia").is_empty());
    }

    // -------------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------------

    #[test]
    fn test_subscribers_see_state_after_each_change() {
        let mut store = CartStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(move |state| sink.borrow_mut().push(state.total_quantity()));

        mouse(&mut store, 1);
        mouse(&mut store, 2);
        store.update_quantity(&id("p1"), 5).unwrap();
        store.remove_item(&id("p1"));

        assert_eq!(*seen.borrow(), [1, 3, 5, 0]);
    }

    #[test]
    fn test_no_notification_without_change() {
        let mut store = CartStore::new();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        store.subscribe(move |_| counter.set(counter.get() + 1));

        store.clear();
        store.remove_item(&id("absent"));
        let _ = store.add_item("p1", "Mouse", dec("1"), "/m", 0);
        let _ = store.update_quantity(&id("absent"), 2);
        assert_eq!(calls.get(), 0);

        mouse(&mut store, 2);
        store.update_quantity(&id("p1"), 2).unwrap();
        assert_eq!(calls.get(), 1);

        store.clear();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut store = CartStore::new();
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let (a, b) = (Rc::clone(&first), Rc::clone(&second));
        let sub_a = store.subscribe(move |_| a.set(a.get() + 1));
        store.subscribe(move |_| b.set(b.get() + 1));

        mouse(&mut store, 1);
        assert!(store.unsubscribe(sub_a));
        assert!(!store.unsubscribe(sub_a));
        mouse(&mut store, 1);

        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 2);
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    #[test]
    fn test_changes_are_written_through() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = CartStore::with_storage(Arc::clone(&storage));
        mouse(&mut store, 2);

        let saved: CartState = load_json(&storage, keys::CART).unwrap().unwrap();
        assert_eq!(&saved, store.state());

        store.clear();
        let saved: CartState = load_json(&storage, keys::CART).unwrap().unwrap();
        assert!(saved.is_empty());
    }

    #[test]
    fn test_restore_picks_up_saved_cart() {
        let storage = Arc::new(MemoryStorage::new());
        {
            let mut store = CartStore::with_storage(Arc::clone(&storage));
            mouse(&mut store, 3);
        }

        let store = CartStore::restore(Arc::clone(&storage));
        assert_eq!(store.item_count(), 3);
        assert_eq!(store.subtotal(), dec("300.00"));
    }

    #[test]
    fn test_restore_tolerates_corrupt_data() {
        let storage = MemoryStorage::new();
        storage.set(keys::CART, "not json").unwrap();

        let store = CartStore::restore(&storage);
        assert!(store.state().is_empty());
    }

    #[test]
    fn test_storage_failures_do_not_fail_mutations() {
        let mut store = CartStore::restore(FailingStorage);
        assert!(store.state().is_empty());

        mouse(&mut store, 1);
        assert!(store.remove_item(&id("p1")));
        assert!(store.state().is_empty());
    }

    #[test]
    fn test_snapshot_policy_from_str() {
        assert_eq!("refresh".parse::<SnapshotPolicy>().unwrap(), SnapshotPolicy::Refresh);
        assert_eq!(
            "KEEP_FIRST".parse::<SnapshotPolicy>().unwrap(),
            SnapshotPolicy::KeepFirst
        );
        assert!("latest".parse::<SnapshotPolicy>().is_err());
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    mod properties {
        use proptest::prelude::*;

        use super::*;

        const PRICES: [&str; 4] = ["0", "19.99", "100.05", "4999.90"];

        #[derive(Debug, Clone)]
        enum Op {
            Add(usize, i64),
            Remove(usize),
            Update(usize, i64),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0..PRICES.len(), 1..6_i64).prop_map(|(p, q)| Op::Add(p, q)),
                (0..PRICES.len()).prop_map(Op::Remove),
                (0..PRICES.len(), -1..6_i64).prop_map(|(p, q)| Op::Update(p, q)),
            ]
        }

        fn product_id(index: usize) -> ProductId {
            ProductId::new(format!("p{index}"))
        }

        fn price(index: usize) -> Decimal {
            dec(PRICES.get(index).unwrap())
        }

        proptest! {
            #[test]
            fn prop_cart_invariants_hold(ops in prop::collection::vec(op(), 0..40)) {
                let mut store = CartStore::new();

                for op in ops {
                    let before = store.state().clone();
                    match op {
                        Op::Add(p, q) => {
                            let had = before.find(&product_id(p)).map_or(0, |i| i.quantity);
                            store
                                .add_item(product_id(p), "Item", price(p), "/i.jpg", q)
                                .unwrap();
                            let now = store.find_item(&product_id(p)).unwrap().quantity;
                            prop_assert_eq!(i64::from(now), i64::from(had) + q);
                        }
                        Op::Remove(p) => {
                            let removed = store.remove_item(&product_id(p));
                            if !removed {
                                prop_assert_eq!(store.state(), &before);
                            }
                            prop_assert!(store.find_item(&product_id(p)).is_none());
                        }
                        Op::Update(p, q) => {
                            let result = store.update_quantity(&product_id(p), q);
                            if before.find(&product_id(p)).is_none() && q > 0 {
                                prop_assert!(result.is_err());
                                prop_assert_eq!(store.state(), &before);
                            } else {
                                prop_assert!(result.is_ok());
                            }
                        }
                    }

                    let items = store.state().items();
                    let mut ids: Vec<_> = items.iter().map(|i| i.product_id.as_str()).collect();
                    ids.sort_unstable();
                    ids.dedup();
                    prop_assert_eq!(ids.len(), items.len());
                    prop_assert!(items.iter().all(|i| i.quantity >= 1));

                    let units: u64 = items.iter().map(|i| u64::from(i.quantity)).sum();
                    prop_assert_eq!(store.item_count(), units);

                    let raw: Decimal = items
                        .iter()
                        .map(|i| i.unit_price * Decimal::from(i.quantity))
                        .sum();
                    prop_assert_eq!(store.subtotal(), round_currency(raw));
                }
            }
        }
    }
}
