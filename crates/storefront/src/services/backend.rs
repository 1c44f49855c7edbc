//! Account backend.
//!
//! Everything the account pages do that would reach a server goes through
//! [`AccountBackend`]. The storefront ships [`MockAccountBackend`], which
//! keeps accounts in memory and simulates latency; a real HTTP client would
//! implement the same trait.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use voltshop_core::{Email, UserId};

use crate::models::{Address, UserProfile};
use crate::services::auth::AuthError;

/// Remote account operations.
pub trait AccountBackend: Send + Sync {
    /// Check credentials and return the stored profile.
    fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<UserProfile, AuthError>> + Send;

    /// Create an account.
    fn register(
        &self,
        name: &str,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<UserProfile, AuthError>> + Send;

    /// Replace a profile's name, email, and phone. Returns the stored profile.
    fn update_profile(
        &self,
        profile: &UserProfile,
    ) -> impl Future<Output = Result<UserProfile, AuthError>> + Send;

    fn update_password(
        &self,
        user_id: &UserId,
        password: &SecretString,
    ) -> impl Future<Output = Result<(), AuthError>> + Send;

    fn update_address(
        &self,
        user_id: &UserId,
        address: &Address,
    ) -> impl Future<Output = Result<Address, AuthError>> + Send;
}

impl<T: AccountBackend> AccountBackend for Arc<T> {
    fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<UserProfile, AuthError>> + Send {
        (**self).login(email, password)
    }

    fn register(
        &self,
        name: &str,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<UserProfile, AuthError>> + Send {
        (**self).register(name, email, password)
    }

    fn update_profile(
        &self,
        profile: &UserProfile,
    ) -> impl Future<Output = Result<UserProfile, AuthError>> + Send {
        (**self).update_profile(profile)
    }

    fn update_password(
        &self,
        user_id: &UserId,
        password: &SecretString,
    ) -> impl Future<Output = Result<(), AuthError>> + Send {
        (**self).update_password(user_id, password)
    }

    fn update_address(
        &self,
        user_id: &UserId,
        address: &Address,
    ) -> impl Future<Output = Result<Address, AuthError>> + Send {
        (**self).update_address(user_id, address)
    }
}

struct MockAccount {
    profile: UserProfile,
    password: SecretString,
}

/// In-memory account backend.
///
/// Every call first sleeps for the configured delay, then runs against the
/// in-memory table. Tests use a zero delay or paused tokio time.
#[derive(Default)]
pub struct MockAccountBackend {
    accounts: Mutex<HashMap<UserId, MockAccount>>,
    delay: Duration,
    offline: AtomicBool,
}

impl std::fmt::Debug for MockAccountBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockAccountBackend")
            .field("delay", &self.delay)
            .field("offline", &self.offline.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl MockAccountBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated round-trip latency applied to every call.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// While offline, every call fails with `AuthError::Backend`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    /// Number of registered accounts.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.accounts().map_or(0, |accounts| accounts.len())
    }

    /// Stored profile for a user, if any.
    #[must_use]
    pub fn profile(&self, user_id: &UserId) -> Option<UserProfile> {
        self.accounts()
            .ok()?
            .get(user_id)
            .map(|account| account.profile.clone())
    }

    async fn round_trip(&self) -> Result<(), AuthError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.offline.load(Ordering::Relaxed) {
            return Err(AuthError::Backend("backend unavailable".to_string()));
        }
        Ok(())
    }

    fn accounts(&self) -> Result<MutexGuard<'_, HashMap<UserId, MockAccount>>, AuthError> {
        self.accounts
            .lock()
            .map_err(|e| AuthError::Backend(e.to_string()))
    }
}

fn email_taken(
    accounts: &HashMap<UserId, MockAccount>,
    email: &Email,
    except: Option<&UserId>,
) -> bool {
    accounts
        .iter()
        .any(|(id, account)| &account.profile.email == email && Some(id) != except)
}

impl AccountBackend for MockAccountBackend {
    async fn login(&self, email: &Email, password: &SecretString) -> Result<UserProfile, AuthError> {
        self.round_trip().await?;

        let accounts = self.accounts()?;
        let account = accounts
            .values()
            .find(|account| &account.profile.email == email)
            .ok_or(AuthError::InvalidCredentials)?;

        if account.password.expose_secret() != password.expose_secret() {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(account.profile.clone())
    }

    async fn register(
        &self,
        name: &str,
        email: &Email,
        password: &SecretString,
    ) -> Result<UserProfile, AuthError> {
        self.round_trip().await?;

        let mut accounts = self.accounts()?;
        if email_taken(&accounts, email, None) {
            return Err(AuthError::UserAlreadyExists);
        }

        let profile = UserProfile::new(UserId::generate(), name.to_owned(), email.clone());
        accounts.insert(
            profile.id.clone(),
            MockAccount {
                profile: profile.clone(),
                password: password.clone(),
            },
        );
        Ok(profile)
    }

    async fn update_profile(&self, profile: &UserProfile) -> Result<UserProfile, AuthError> {
        self.round_trip().await?;

        let mut accounts = self.accounts()?;
        if email_taken(&accounts, &profile.email, Some(&profile.id)) {
            return Err(AuthError::UserAlreadyExists);
        }

        let account = accounts
            .get_mut(&profile.id)
            .ok_or(AuthError::UserNotFound)?;
        account.profile.name.clone_from(&profile.name);
        account.profile.email = profile.email.clone();
        account.profile.phone.clone_from(&profile.phone);
        Ok(account.profile.clone())
    }

    async fn update_password(
        &self,
        user_id: &UserId,
        password: &SecretString,
    ) -> Result<(), AuthError> {
        self.round_trip().await?;

        let mut accounts = self.accounts()?;
        let account = accounts.get_mut(user_id).ok_or(AuthError::UserNotFound)?;
        account.password = password.clone();
        Ok(())
    }

    async fn update_address(&self, user_id: &UserId, address: &Address) -> Result<Address, AuthError> {
        self.round_trip().await?;

        let mut accounts = self.accounts()?;
        let account = accounts.get_mut(user_id).ok_or(AuthError::UserNotFound)?;
        account.profile.address = Some(address.clone());
        Ok(address.clone())
    }
}
