//! Checkout.
//!
//! Collects contact, shipping, and card details, checks them, and turns the
//! cart into an order confirmation. No payment is processed; the card is
//! only validated for shape.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use voltshop_core::{Email, EmailError, OrderId, PricingError, pricing, round_currency};

use crate::cart::CartStore;
use crate::error::add_breadcrumb;
use crate::models::{CartState, LineItem};
use crate::storage::Storage;

const CARD_NUMBER_MAX_DIGITS: usize = 16;
const CARD_NUMBER_MIN_DIGITS: usize = 13;
const EXPIRY_MAX_DIGITS: usize = 4;
const CVV_MAX_DIGITS: usize = 4;
const CVV_MIN_DIGITS: usize = 3;

/// Errors that can occur while placing an order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// A required field was left blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("card number must have 13 to 16 digits")]
    InvalidCardNumber,

    #[error("expiry must be a valid MM/YY date")]
    InvalidExpiry,

    #[error("CVV must have 3 or 4 digits")]
    InvalidCvv,

    /// Nothing to order.
    #[error("cart is empty")]
    EmptyCart,
}

// =============================================================================
// Input normalization
// =============================================================================

fn digits(input: &str, max: usize) -> String {
    input.chars().filter(char::is_ascii_digit).take(max).collect()
}

/// Keep at most 16 digits of a card number.
#[must_use]
pub fn normalize_card_number(input: &str) -> String {
    digits(input, CARD_NUMBER_MAX_DIGITS)
}

/// Keep at most 4 digits of an expiry date and format a complete one as
/// `MM/YY`. Partial input is returned as bare digits.
#[must_use]
pub fn normalize_expiry(input: &str) -> String {
    let raw = digits(input, EXPIRY_MAX_DIGITS);
    match (raw.get(..2), raw.get(2..)) {
        (Some(month), Some(year)) if raw.len() == EXPIRY_MAX_DIGITS => format!("{month}/{year}"),
        _ => raw,
    }
}

/// Keep at most 4 digits of a CVV.
#[must_use]
pub fn normalize_cvv(input: &str) -> String {
    digits(input, CVV_MAX_DIGITS)
}

// =============================================================================
// Form
// =============================================================================

/// The checkout form.
///
/// Card fields are normalized on assignment, as the form does while the
/// customer types. `Debug` redacts the card number and CVV.
#[derive(Clone, Default)]
pub struct CheckoutForm {
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub card_holder: String,
    card_number: String,
    card_expiry: String,
    card_cvv: String,
}

impl std::fmt::Debug for CheckoutForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutForm")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("address", &self.address)
            .field("city", &self.city)
            .field("state", &self.state)
            .field("zip_code", &self.zip_code)
            .field("card_holder", &self.card_holder)
            .field("card_number", &"[REDACTED]")
            .field("card_expiry", &self.card_expiry)
            .field("card_cvv", &"[REDACTED]")
            .finish()
    }
}

impl CheckoutForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_card_number(&mut self, input: &str) {
        self.card_number = normalize_card_number(input);
    }

    pub fn set_card_expiry(&mut self, input: &str) {
        self.card_expiry = normalize_expiry(input);
    }

    pub fn set_card_cvv(&mut self, input: &str) {
        self.card_cvv = normalize_cvv(input);
    }

    #[must_use]
    pub fn card_number(&self) -> &str {
        &self.card_number
    }

    #[must_use]
    pub fn card_expiry(&self) -> &str {
        &self.card_expiry
    }

    /// Last four digits of the card, for receipts.
    #[must_use]
    pub fn card_last4(&self) -> &str {
        let start = self.card_number.len().saturating_sub(4);
        self.card_number.get(start..).unwrap_or_default()
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, in form order.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let required = [
            ("full_name", &self.full_name),
            ("email", &self.email),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zip_code", &self.zip_code),
            ("card_number", &self.card_number),
            ("card_holder", &self.card_holder),
            ("card_expiry", &self.card_expiry),
            ("card_cvv", &self.card_cvv),
        ];
        if let Some((name, _)) = required.into_iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(CheckoutError::MissingField(name));
        }

        Email::parse(&self.email)?;

        if !(CARD_NUMBER_MIN_DIGITS..=CARD_NUMBER_MAX_DIGITS).contains(&self.card_number.len()) {
            return Err(CheckoutError::InvalidCardNumber);
        }

        let month = self
            .card_expiry
            .split_once('/')
            .and_then(|(month, _)| month.parse::<u8>().ok())
            .ok_or(CheckoutError::InvalidExpiry)?;
        if !(1..=12).contains(&month) {
            return Err(CheckoutError::InvalidExpiry);
        }

        if !(CVV_MIN_DIGITS..=CVV_MAX_DIGITS).contains(&self.card_cvv.len()) {
            return Err(CheckoutError::InvalidCvv);
        }

        Ok(())
    }
}

// =============================================================================
// Orders
// =============================================================================

/// What the customer is paying for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub lines: Vec<LineItem>,
    pub item_count: u64,
    /// Rounded to cents.
    pub subtotal: Decimal,
}

impl OrderSummary {
    #[must_use]
    pub fn from_cart(cart: &CartState) -> Self {
        Self {
            lines: cart.items().to_vec(),
            item_count: cart.total_quantity(),
            subtotal: round_currency(cart.raw_subtotal()),
        }
    }

    /// Amount of each installment when the subtotal is split `count` ways,
    /// rounded to cents.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::ZeroInstallments` for `count == 0`.
    pub fn installment(&self, count: u32) -> Result<Decimal, PricingError> {
        pricing::installment_amount(self.subtotal, count).map(round_currency)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub placed_at: DateTime<Utc>,
    pub summary: OrderSummary,
    pub card_last4: String,
}

/// Validate the form, turn the cart into an order, and empty the cart.
///
/// # Errors
///
/// Returns a validation error from [`CheckoutForm::validate`] or
/// `CheckoutError::EmptyCart`. On error the cart is untouched.
pub fn place_order<S: Storage>(
    form: &CheckoutForm,
    cart: &mut CartStore<S>,
) -> Result<OrderConfirmation, CheckoutError> {
    form.validate()?;
    if cart.state().is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let confirmation = OrderConfirmation {
        order_id: OrderId::generate(),
        placed_at: Utc::now(),
        summary: OrderSummary::from_cart(cart.state()),
        card_last4: form.card_last4().to_owned(),
    };
    cart.clear();

    tracing::info!(
        order_id = %confirmation.order_id,
        items = confirmation.summary.item_count,
        subtotal = %confirmation.summary.subtotal,
        "Order placed"
    );
    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_id", confirmation.order_id.as_str())]),
    );

    Ok(confirmation)
}
