//! Account Data

use rust_decimal::Decimal;

use crate::{
    auth::check_password_strength,
    domain::accounts::records::UserUuid,
    validation::{FieldErrors, looks_like_email},
};

const MAX_USERNAME_CHARS: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRole {
    Customer,
    Administrator,
}

impl AccountRole {
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Administrator)
    }

    /// Balance a new profile starts with.
    #[must_use]
    pub const fn opening_balance(self) -> Option<Decimal> {
        match self {
            Self::Customer => Some(Decimal::ZERO),
            Self::Administrator => None,
        }
    }
}

/// New Account Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub uuid: UserUuid,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl NewAccount {
    /// # Errors
    ///
    /// Returns the rejected fields.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        errors.require("username", &self.username);
        errors.max_chars("username", &self.username, MAX_USERNAME_CHARS);

        if !self
            .username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            errors.push(
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        }

        if !self.email.is_empty() && !looks_like_email(&self.email) {
            errors.push("email", "Enter a valid email address.");
        }

        check_password_strength(&mut errors, "password", &self.password);

        errors.into_result()
    }
}
