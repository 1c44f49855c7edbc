//! Account profile types.

use serde::{Deserialize, Serialize};

use voltshop_core::{Email, Phone, UserId};

/// A signed-in customer's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub phone: Option<Phone>,
    pub address: Option<Address>,
}

impl UserProfile {
    /// A freshly registered profile with no contact details beyond email.
    #[must_use]
    pub const fn new(id: UserId, name: String, email: Email) -> Self {
        Self {
            id,
            name,
            email,
            phone: None,
            address: None,
        }
    }
}

/// Shipping address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub number: String,
    pub complement: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// One editable field of an [`Address`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressField {
    Street,
    Number,
    Complement,
    Neighborhood,
    City,
    State,
    ZipCode,
}

impl Address {
    /// Replace a single field.
    pub fn set(&mut self, field: AddressField, value: String) {
        let slot = match field {
            AddressField::Street => &mut self.street,
            AddressField::Number => &mut self.number,
            AddressField::Complement => &mut self.complement,
            AddressField::Neighborhood => &mut self.neighborhood,
            AddressField::City => &mut self.city,
            AddressField::State => &mut self.state,
            AddressField::ZipCode => &mut self.zip_code,
        };
        *slot = value;
    }

    /// Names of required fields that are blank. `complement` is optional.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("street", &self.street),
            ("number", &self.number),
            ("neighborhood", &self.neighborhood),
            ("city", &self.city),
            ("state", &self.state),
            ("zip_code", &self.zip_code),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}
