//! Account page operations for the signed-in user.
//!
//! Every remote update goes through the backend first; the session (and its
//! stored mirror) only changes once the backend has accepted it. A failed
//! call leaves the profile exactly as it was.

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use voltshop_core::{Email, Phone};

use crate::models::{Address, AddressField, UserProfile};
use crate::services::auth::{AuthError, AuthService, PasswordStrength};
use crate::services::backend::AccountBackend;
use crate::storage::Storage;

/// Profile editing, borrowed from an [`AuthService`].
pub struct AccountService<'a, B, S> {
    auth: &'a mut AuthService<B, S>,
}

impl<'a, B: AccountBackend, S: Storage> AccountService<'a, B, S> {
    pub(crate) const fn new(auth: &'a mut AuthService<B, S>) -> Self {
        Self { auth }
    }

    /// The signed-in profile.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` for an anonymous session.
    pub fn profile(&self) -> Result<&UserProfile, AuthError> {
        self.auth.session.user().ok_or(AuthError::NotAuthenticated)
    }

    /// Change the display name.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidInput` for a blank name, plus any backend
    /// error.
    #[instrument(skip(self))]
    pub async fn update_name(&mut self, name: &str) -> Result<UserProfile, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::InvalidInput("name cannot be blank".to_string()));
        }

        let mut profile = self.profile()?.clone();
        profile.name = name.to_owned();
        self.save_profile(profile).await
    }

    /// Change the email address. `confirmation` must repeat it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ConfirmationMismatch` if the two differ,
    /// `AuthError::InvalidEmail` if it does not parse, and
    /// `AuthError::UserAlreadyExists` if another account uses it.
    #[instrument(skip(self))]
    pub async fn update_email(
        &mut self,
        email: &str,
        confirmation: &str,
    ) -> Result<UserProfile, AuthError> {
        let mut profile = self.profile()?.clone();
        if email.trim() != confirmation.trim() {
            return Err(AuthError::ConfirmationMismatch("email"));
        }
        profile.email = Email::parse(email)?;
        self.save_profile(profile).await
    }

    /// Change the phone number.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidPhone` if the number does not have 10 or 11
    /// digits.
    #[instrument(skip(self))]
    pub async fn update_phone(&mut self, phone: &str) -> Result<UserProfile, AuthError> {
        let mut profile = self.profile()?.clone();
        profile.phone = Some(Phone::parse(phone)?);
        self.save_profile(profile).await
    }

    /// Change the password. `confirmation` must repeat it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` for a blank or weak password and
    /// `AuthError::ConfirmationMismatch` if the two differ.
    #[instrument(skip_all)]
    pub async fn update_password(
        &mut self,
        password: &SecretString,
        confirmation: &SecretString,
    ) -> Result<(), AuthError> {
        let user_id = self.profile()?.id.clone();
        let raw = password.expose_secret();

        if raw.trim().is_empty() {
            return Err(AuthError::WeakPassword("password cannot be blank".to_string()));
        }
        if PasswordStrength::evaluate(raw) == PasswordStrength::Weak {
            return Err(AuthError::WeakPassword("password is too weak".to_string()));
        }
        if raw != confirmation.expose_secret() {
            return Err(AuthError::ConfirmationMismatch("password"));
        }

        self.auth.backend.update_password(&user_id, password).await?;
        tracing::info!(user_id = %user_id, "Password updated");
        Ok(())
    }

    /// Edit one address field locally, without a backend round trip.
    ///
    /// Used while the address form is being filled in; call
    /// [`update_full_address`](Self::update_full_address) to submit.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` for an anonymous session.
    pub fn update_address_field(
        &mut self,
        field: AddressField,
        value: impl Into<String>,
    ) -> Result<(), AuthError> {
        let user = self
            .auth
            .session
            .user_mut()
            .ok_or(AuthError::NotAuthenticated)?;
        user.address
            .get_or_insert_with(Address::default)
            .set(field, value.into());
        self.auth.persist_session();
        Ok(())
    }

    /// Submit a complete address.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidInput` naming the missing fields if any
    /// required field is blank, plus any backend error.
    #[instrument(skip(self, address))]
    pub async fn update_full_address(&mut self, address: Address) -> Result<Address, AuthError> {
        let user_id = self.profile()?.id.clone();

        let missing = address.missing_fields();
        if !missing.is_empty() {
            return Err(AuthError::InvalidInput(format!(
                "address is missing: {}",
                missing.join(", ")
            )));
        }

        let saved = self.auth.backend.update_address(&user_id, &address).await?;
        if let Some(user) = self.auth.session.user_mut() {
            user.address = Some(saved.clone());
        }
        self.auth.persist_session();

        tracing::info!(user_id = %user_id, "Address updated");
        Ok(saved)
    }

    async fn save_profile(&mut self, profile: UserProfile) -> Result<UserProfile, AuthError> {
        let mut saved = self.auth.backend.update_profile(&profile).await?;
        // The backend only owns name, email, and phone.
        saved.address = profile.address;

        if let Some(user) = self.auth.session.user_mut() {
            *user = saved.clone();
        }
        self.auth.persist_session();

        tracing::info!(user_id = %saved.id, "Profile updated");
        Ok(saved)
    }
}
