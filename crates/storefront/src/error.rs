//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for the storefront surfaces (the CLI
//! today). Internal failures are captured to Sentry when [`AppError::report`]
//! is called; everything else is a user mistake and only logged.

use thiserror::Error;

use voltshop_core::PricingError;

use crate::cart::CartError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;
use crate::services::support::SupportError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart operation rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Catalog lookup failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Authentication or account operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout rejected.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Support request rejected.
    #[error("Support error: {0}")]
    Support(#[from] SupportError),

    /// Pricing input out of range.
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// Persistence failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Bad configuration.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this is our fault rather than the user's.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Storage(_)
                | Self::Internal(_)
                | Self::Auth(AuthError::Backend(_))
                | Self::Support(SupportError::Backend(_))
        )
    }

    /// Message safe to show the user. Internal details are never exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage(_) | Self::Internal(_) => "Internal error, please try again".to_string(),
            Self::Cart(err) => match err {
                CartError::Validation(msg) => msg.clone(),
                CartError::NotFound(id) => format!("Product {id} is not in your cart"),
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::UserNotFound => {
                    "Invalid credentials".to_string()
                }
                AuthError::UserAlreadyExists => {
                    "An account with this email already exists".to_string()
                }
                AuthError::WeakPassword(msg) | AuthError::InvalidInput(msg) => msg.clone(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::InvalidPhone(_) => "Invalid phone number".to_string(),
                AuthError::ConfirmationMismatch(what) => {
                    format!("The {what} confirmation does not match")
                }
                AuthError::NotAuthenticated => "Please sign in first".to_string(),
                AuthError::Backend(_) => {
                    "Account service unavailable, please try again".to_string()
                }
            },
            Self::Support(err) => match err {
                SupportError::EmptyMessage => "Please type a message".to_string(),
                SupportError::InvalidRequest(msg) => msg.clone(),
                SupportError::Backend(_) => {
                    "Support is unavailable right now, please try again".to_string()
                }
            },
            Self::Catalog(err) => err.to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::Pricing(err) => err.to_string(),
            Self::Config(err) => err.to_string(),
        }
    }

    /// Log the error, capturing internal errors to Sentry.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Operation failed"
            );
        } else {
            tracing::warn!(error = %self, "Operation rejected");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "add_item", Some(&[("product_id", "starlink")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
