//! Voltshop storefront library.
//!
//! The storefront's state and business rules, independent of any UI:
//!
//! - [`cart`] - The cart store: line items, totals, change subscriptions
//! - [`catalog`] - Product lookup and filtering
//! - [`services`] - Accounts, authentication, checkout, customer support
//! - [`storage`] - Best-effort key/value persistence
//! - [`config`] / [`error`] - Environment configuration and error reporting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use cart::{CartError, CartStore, SnapshotPolicy, SubscriptionId};
pub use catalog::{CatalogError, CatalogProvider, InMemoryCatalog, ProductFilter};
pub use config::{ConfigError, StorefrontConfig};
pub use error::AppError;
