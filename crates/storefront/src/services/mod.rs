//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Session, login, registration, password rules
//! - `account` - Profile and address editing for the signed-in user
//! - `backend` - The async account backend and its in-memory mock
//! - `checkout` - Checkout form validation and order placement
//! - `support` - FAQ, contact chat, and return requests

pub mod account;
pub mod auth;
pub mod backend;
pub mod checkout;
pub mod support;

pub use account::AccountService;
pub use auth::{AuthError, AuthService};
pub use backend::{AccountBackend, MockAccountBackend};
pub use checkout::{CheckoutError, CheckoutForm, OrderConfirmation, OrderSummary, place_order};
pub use support::{
    MockSupportBackend, ReturnReason, ReturnRequest, ReturnTicket, SupportBackend, SupportError,
    SupportService,
};
