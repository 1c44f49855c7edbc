//! Voltshop Core - Shared types library.
//!
//! This crate provides common types used across all Voltshop components:
//! - `storefront` - Cart store, catalog, storage shim, and account services
//! - `cli` - Command-line front end driving the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! storage, no async runtime. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and phones
//! - [`pricing`] - Discount, savings, and installment arithmetic

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod pricing;
pub mod types;

pub use pricing::PricingError;
pub use types::*;
