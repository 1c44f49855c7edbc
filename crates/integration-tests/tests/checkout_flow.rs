//! From catalog to placed order.

#![allow(clippy::unwrap_used)]

use tempfile::TempDir;
use voltshop_core::ProductId;
use voltshop_integration_tests::{dec, filled_form, record};
use voltshop_storefront::services::{CheckoutError, OrderSummary, place_order};
use voltshop_storefront::storage::FileStorage;
use voltshop_storefront::{CartStore, CatalogProvider, InMemoryCatalog};

#[test]
fn test_place_order_empties_persisted_cart() {
    let dir = TempDir::new().unwrap();
    let catalog = InMemoryCatalog::seeded();

    let mut cart = CartStore::restore(FileStorage::new(dir.path()));
    cart.add_product(&catalog.require(&ProductId::new("starlink")).unwrap(), 2)
        .unwrap();
    cart.add_product(&catalog.require(&ProductId::new("nokia-105")).unwrap(), 1)
        .unwrap();
    let seen = record(&mut cart);

    let confirmation = place_order(&filled_form(), &mut cart).unwrap();
    assert_eq!(confirmation.summary.item_count, 3);
    assert_eq!(confirmation.summary.subtotal, dec("649.97"));
    assert_eq!(confirmation.summary.lines.len(), 2);
    assert_eq!(confirmation.card_last4, "1111");

    assert!(cart.state().is_empty());
    assert_eq!(seen.borrow().len(), 1);
    assert!(CartStore::restore(FileStorage::new(dir.path())).state().is_empty());
}

#[test]
fn test_invalid_form_keeps_cart() {
    let mut cart = CartStore::new();
    cart.add_one("p1", "Mouse", dec("100.00"), "").unwrap();

    let mut form = filled_form();
    form.set_card_cvv("1");
    assert_eq!(place_order(&form, &mut cart).unwrap_err(), CheckoutError::InvalidCvv);

    let mut form = filled_form();
    form.city = "  ".to_string();
    assert_eq!(
        place_order(&form, &mut cart).unwrap_err(),
        CheckoutError::MissingField("city")
    );

    assert_eq!(cart.item_count(), 1);
}

#[test]
fn test_empty_cart_cannot_check_out() {
    let mut cart = CartStore::new();
    assert_eq!(
        place_order(&filled_form(), &mut cart).unwrap_err(),
        CheckoutError::EmptyCart
    );
}

#[test]
fn test_order_summary_installments() {
    let catalog = InMemoryCatalog::seeded();
    let mut cart = CartStore::new();
    cart.add_product(&catalog.require(&ProductId::new("smart-tv-oled-55")).unwrap(), 1)
        .unwrap();

    let summary = OrderSummary::from_cart(cart.state());
    assert_eq!(summary.installment(10).unwrap(), dec("399.99"));
    assert!(summary.installment(0).is_err());
}

#[test]
fn test_order_ids_are_unique() {
    let mut cart = CartStore::new();
    cart.add_one("p1", "Mouse", dec("100.00"), "").unwrap();
    let first = place_order(&filled_form(), &mut cart).unwrap();
    cart.add_one("p1", "Mouse", dec("100.00"), "").unwrap();
    let second = place_order(&filled_form(), &mut cart).unwrap();
    assert_ne!(first.order_id, second.order_id);
}
