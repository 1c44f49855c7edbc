//! Integration tests for Voltshop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p voltshop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart store behaviour across storage and catalog
//! - `account_flow` - Registration, login, and profile edits against the mock backend
//! - `checkout_flow` - From catalog to placed order
//!
//! This library holds the fixtures the test files share.

use std::cell::RefCell;
use std::rc::Rc;

use rust_decimal::Decimal;
use secrecy::SecretString;
use voltshop_storefront::CartStore;
use voltshop_storefront::models::CartState;
use voltshop_storefront::services::CheckoutForm;
use voltshop_storefront::storage::Storage;

/// Parse a decimal literal.
///
/// # Panics
///
/// Panics on a malformed literal; fixtures only pass constants.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// Wrap a password.
#[must_use]
pub fn secret(s: &str) -> SecretString {
    SecretString::from(s)
}

/// Snapshots of every state a cart broadcast, in order.
pub type Recorded = Rc<RefCell<Vec<CartState>>>;

/// Subscribe a recorder to `cart`.
pub fn record<S: Storage>(cart: &mut CartStore<S>) -> Recorded {
    let seen: Recorded = Rc::default();
    let sink = Rc::clone(&seen);
    cart.subscribe(move |state| sink.borrow_mut().push(state.clone()));
    seen
}

/// A checkout form that passes validation.
#[must_use]
pub fn filled_form() -> CheckoutForm {
    let mut form = CheckoutForm::new();
    form.full_name = "Ana Souza".to_string();
    form.email = "ana@example.com".to_string();
    form.address = "Rua Teste, 123".to_string();
    form.city = "São Paulo".to_string();
    form.state = "SP".to_string();
    form.zip_code = "01001-000".to_string();
    form.card_holder = "ANA SOUZA".to_string();
    form.set_card_number("4111 1111 1111 1111");
    form.set_card_expiry("12/30");
    form.set_card_cvv("123");
    form
}
