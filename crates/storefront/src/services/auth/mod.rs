//! Authentication service.
//!
//! Owns the [`Session`] and mirrors the signed-in profile to storage under
//! [`keys::USER`] so a restart can pick it up again.

mod error;
mod password;

pub use error::AuthError;
pub use password::{MIN_PASSWORD_LENGTH, PasswordChecklist, PasswordStrength, SPECIAL_CHARACTERS};

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use voltshop_core::Email;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::{Session, UserProfile};
use crate::services::account::AccountService;
use crate::services::backend::AccountBackend;
use crate::storage::{NoopStorage, Storage, keys, load_json, save_json};

/// Authentication service.
///
/// Handles registration, login, and logout against an [`AccountBackend`].
pub struct AuthService<B, S = NoopStorage> {
    pub(crate) backend: B,
    pub(crate) storage: S,
    pub(crate) session: Session,
}

impl<B: AccountBackend, S: Storage> AuthService<B, S> {
    /// Create a service with an anonymous session.
    #[must_use]
    pub const fn new(backend: B, storage: S) -> Self {
        Self {
            backend,
            storage,
            session: Session::Anonymous,
        }
    }

    /// Create a service, restoring a previously signed-in profile from
    /// storage. Unreadable data leaves the session anonymous.
    #[must_use]
    pub fn restore(backend: B, storage: S) -> Self {
        let session = match load_json::<UserProfile>(&storage, keys::USER) {
            Ok(Some(user)) => {
                tracing::info!(user_id = %user.id, "Restored signed-in user");
                Session::Authenticated(user)
            }
            Ok(None) => Session::Anonymous,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable stored user");
                Session::Anonymous
            }
        };

        Self {
            backend,
            storage,
            session,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Account management for the signed-in user.
    pub const fn account(&mut self) -> AccountService<'_, B, S> {
        AccountService::new(self)
    }

    // =========================================================================
    // Password Authentication
    // =========================================================================

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    #[instrument(skip(self, password))]
    pub async fn login(
        &mut self,
        email: &str,
        password: &SecretString,
    ) -> Result<UserProfile, AuthError> {
        let email = Email::parse(email)?;
        if password.expose_secret().is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self.backend.login(&email, password).await?;

        tracing::info!(user_id = %user.id, "User logged in");
        self.sign_in(user.clone());
        Ok(user)
    }

    /// Register a new user and sign them in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidInput` if the name is blank.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip(self, password))]
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<UserProfile, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::InvalidInput("name cannot be blank".to_string()));
        }
        let email = Email::parse(email)?;
        validate_password(password)?;

        let user = self.backend.register(name, &email, password).await?;

        tracing::info!(user_id = %user.id, "User registered");
        self.sign_in(user.clone());
        Ok(user)
    }

    /// Sign out and forget the stored profile.
    pub fn logout(&mut self) {
        if let Session::Authenticated(user) = &self.session {
            tracing::info!(user_id = %user.id, "User logged out");
        }
        self.session = Session::Anonymous;
        clear_sentry_user();

        if let Err(e) = self.storage.remove(keys::USER) {
            tracing::warn!(error = %e, "Failed to remove stored user");
        }
    }

    fn sign_in(&mut self, user: UserProfile) {
        set_sentry_user(&user.id, Some(user.email.as_str()));
        self.session = Session::Authenticated(user);
        self.persist_session();
    }

    /// Mirror the current profile to storage.
    pub(crate) fn persist_session(&self) {
        let Some(user) = self.session.user() else {
            return;
        };
        if let Err(e) = save_json(&self.storage, keys::USER, user) {
            tracing::warn!(error = %e, user_id = %user.id, "Failed to persist user");
        }
    }
}

impl<B, S> std::fmt::Debug for AuthService<B, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Validate password meets registration requirements.
fn validate_password(password: &SecretString) -> Result<(), AuthError> {
    let checklist = PasswordChecklist::check(password.expose_secret());
    if checklist.is_satisfied() {
        return Ok(());
    }
    Err(AuthError::WeakPassword(format!(
        "password needs {}",
        checklist.missing().join(", ")
    )))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::services::backend::MockAccountBackend;
    use crate::storage::MemoryStorage;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s)
    }

    fn service() -> AuthService<MockAccountBackend, Arc<MemoryStorage>> {
        AuthService::new(MockAccountBackend::new(), Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password(&secret("Senha#2024")).is_ok());
        let err = validate_password(&secret("senha")).unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword(ref msg) if msg.contains("uppercase")));
    }

    #[tokio::test]
    async fn test_register_signs_in_and_persists() {
        let mut auth = service();
        let user = auth
            .register("Ana Souza", "ana@example.com", &secret("Senha#2024"))
            .await
            .unwrap();

        assert_eq!(auth.session().user(), Some(&user));
        let stored: UserProfile = load_json(&auth.storage, keys::USER).unwrap().unwrap();
        assert_eq!(stored, user);
    }

    #[tokio::test]
    async fn test_register_validation_leaves_session_anonymous() {
        let mut auth = service();
        assert!(matches!(
            auth.register("  ", "ana@example.com", &secret("Senha#2024")).await,
            Err(AuthError::InvalidInput(_))
        ));
        assert!(matches!(
            auth.register("Ana", "not-an-email", &secret("Senha#2024")).await,
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(matches!(
            auth.register("Ana", "ana@example.com", &secret("fraca")).await,
            Err(AuthError::WeakPassword(_))
        ));
        assert!(!auth.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_login_logout_cycle() {
        let mut auth = service();
        auth.register("Ana", "ana@example.com", &secret("Senha#2024"))
            .await
            .unwrap();
        auth.logout();
        assert!(!auth.session().is_authenticated());
        assert_eq!(auth.storage.get(keys::USER).unwrap(), None);

        assert_eq!(
            auth.login("ana@example.com", &secret("")).await.unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            auth.login("ana@example.com", &secret("Senha#2025")).await.unwrap_err(),
            AuthError::InvalidCredentials
        );

        let user = auth
            .login("ana@example.com", &secret("Senha#2024"))
            .await
            .unwrap();
        assert_eq!(user.name, "Ana");
        assert!(auth.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_restore_from_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let mut auth = AuthService::new(MockAccountBackend::new(), Arc::clone(&storage));
        let user = auth
            .register("Ana", "ana@example.com", &secret("Senha#2024"))
            .await
            .unwrap();

        let restored = AuthService::restore(MockAccountBackend::new(), Arc::clone(&storage));
        assert_eq!(restored.session().user(), Some(&user));
    }

    #[test]
    fn test_restore_ignores_corrupt_user() {
        let storage = MemoryStorage::new();
        storage.set(keys::USER, "{\"id\":").unwrap();
        let auth = AuthService::restore(MockAccountBackend::new(), &storage);
        assert_eq!(auth.session(), &Session::Anonymous);
    }
}
