//! Password rules.
//!
//! Two checks exist. Registration demands the full [`PasswordChecklist`];
//! changing a password from the account page only rejects
//! [`PasswordStrength::Weak`].

use core::fmt;

/// Characters that count as "special" for the registration checklist.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Minimum password length for registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Coarse strength rating shown under the password field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    /// Rate a password.
    ///
    /// Length earns 2 points at 8+ characters (1 point at 6+); uppercase,
    /// digits, and non-alphanumerics earn 1 point each. 4+ is strong, 2+ is
    /// medium.
    #[must_use]
    pub fn evaluate(password: &str) -> Self {
        match score(password) {
            4.. => Self::Strong,
            2..=3 => Self::Medium,
            _ => Self::Weak,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Medium => "medium",
            Self::Strong => "strong",
        }
    }
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn score(password: &str) -> u8 {
    let length = password.chars().count();
    let mut score = match length {
        8.. => 2,
        6..=7 => 1,
        _ => 0,
    };
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        score += 1;
    }
    score
}

/// Registration requirements, one flag per rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct PasswordChecklist {
    pub min_length: bool,
    pub uppercase: bool,
    pub lowercase: bool,
    pub digit: bool,
    pub special: bool,
}

impl PasswordChecklist {
    #[must_use]
    pub fn check(password: &str) -> Self {
        Self {
            min_length: password.chars().count() >= MIN_PASSWORD_LENGTH,
            uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
            digit: password.chars().any(|c| c.is_ascii_digit()),
            special: password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)),
        }
    }

    #[must_use]
    pub const fn is_satisfied(&self) -> bool {
        self.min_length && self.uppercase && self.lowercase && self.digit && self.special
    }

    /// Human-readable descriptions of the unmet rules.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (self.min_length, "at least 8 characters"),
            (self.uppercase, "an uppercase letter"),
            (self.lowercase, "a lowercase letter"),
            (self.digit, "a digit"),
            (self.special, "a special character"),
        ]
        .into_iter()
        .filter_map(|(ok, rule)| (!ok).then_some(rule))
        .collect()
    }
}
