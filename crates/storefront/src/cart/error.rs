//! Cart error types.

use thiserror::Error;

use voltshop_core::ProductId;

/// Errors returned by cart store operations.
///
/// A rejected operation leaves the cart exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Caller passed an out-of-contract argument.
    #[error("invalid cart operation: {0}")]
    Validation(String),

    /// The product is not in the cart.
    #[error("product not in cart: {0}")]
    NotFound(ProductId),
}

impl CartError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
