//! Brazilian phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input has no digits at all.
    #[error("phone number cannot be empty")]
    Empty,
    /// Wrong number of digits once punctuation is stripped.
    #[error("phone number must have 10 or 11 digits including area code (got {0})")]
    InvalidLength(usize),
}

/// A phone number stored as digits: two-digit area code followed by an
/// eight-digit landline or nine-digit mobile number.
///
/// Any punctuation in the input is ignored, so `"(11) 99999-9999"` and
/// `"11999999999"` parse to the same value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    /// Parse a phone number from free-form input.
    ///
    /// # Errors
    ///
    /// Returns `PhoneError::Empty` when the input has no digits and
    /// `PhoneError::InvalidLength` unless it has 10 or 11 digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let digits: String = s.chars().filter(char::is_ascii_digit).collect();
        match digits.len() {
            0 => Err(PhoneError::Empty),
            10 | 11 => Ok(Self(digits)),
            n => Err(PhoneError::InvalidLength(n)),
        }
    }

    /// The bare digits.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// Two-digit area code.
    #[must_use]
    pub fn area_code(&self) -> &str {
        self.0.get(..2).unwrap_or_default()
    }
}

impl fmt::Display for Phone {
    /// Formats as `(11) 99999-9999` or `(11) 9999-9999`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let local = self.0.get(2..).unwrap_or_default();
        let split = local.len().saturating_sub(4);
        let (head, tail) = local.split_at(split);
        write!(f, "({}) {head}-{tail}", self.area_code())
    }
}

impl TryFrom<String> for Phone {
    type Error = PhoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Phone> for String {
    fn from(phone: Phone) -> Self {
        phone.0
    }
}
