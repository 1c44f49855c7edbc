//! Authentication and account error types.

use thiserror::Error;

use voltshop_core::{EmailError, PhoneError};

/// Errors that can occur during authentication and account operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Invalid phone number.
    #[error("invalid phone: {0}")]
    InvalidPhone(#[from] PhoneError),

    /// A required field was blank or malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// A value and its confirmation differ.
    #[error("{0} confirmation does not match")]
    ConfirmationMismatch(&'static str),

    /// The operation needs a signed-in user.
    #[error("not signed in")]
    NotAuthenticated,

    /// The account backend failed.
    #[error("account backend error: {0}")]
    Backend(String),
}
