//! Domain models for the storefront.
//!
//! Plain data types shared by the cart store, catalog, and account services.
//! Behavior lives in the owning modules; these types only carry data and
//! derive values from it.

pub mod cart;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{CartState, LineItem};
pub use product::{Category, Product};
pub use session::Session;
pub use user::{Address, AddressField, UserProfile};
