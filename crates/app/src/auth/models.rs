//! Auth data models.

use uuid::Uuid;

use crate::{
    auth::password::check_password_strength, domain::accounts::records::UserUuid,
    validation::FieldErrors,
};

/// A user that is not an administrator.
///
/// Balance, checkout and cancellation operations take this type, so an
/// administrative principal cannot reach them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CustomerUuid(UserUuid);

impl CustomerUuid {
    /// The caller vouches that `user` is not an administrator.
    #[must_use]
    pub const fn from_user(user: UserUuid) -> Self {
        Self(user)
    }

    #[must_use]
    pub const fn user(self) -> UserUuid {
        self.0
    }

    #[must_use]
    pub const fn into_uuid(self) -> Uuid {
        self.0.into_uuid()
    }
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    Customer(CustomerUuid),
    Administrator(UserUuid),
}

impl Principal {
    #[must_use]
    pub const fn from_user(user: UserUuid, is_staff: bool) -> Self {
        if is_staff {
            Self::Administrator(user)
        } else {
            Self::Customer(CustomerUuid::from_user(user))
        }
    }

    #[must_use]
    pub const fn user_uuid(self) -> UserUuid {
        match self {
            Self::Customer(customer) => customer.user(),
            Self::Administrator(user) => user,
        }
    }

    #[must_use]
    pub const fn is_administrator(self) -> bool {
        matches!(self, Self::Administrator(_))
    }

    #[must_use]
    pub const fn customer(self) -> Option<CustomerUuid> {
        match self {
            Self::Customer(customer) => Some(customer),
            Self::Administrator(_) => None,
        }
    }
}

/// Login input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Password change input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordChange {
    /// Check the new password before any stored state is touched.
    ///
    /// # Errors
    ///
    /// Returns the rejected fields.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        errors.require("old_password", &self.old_password);
        check_password_strength(&mut errors, "new_password", &self.new_password);

        if self.new_password != self.confirm_password {
            errors.push("confirm_password", "New passwords don't match.");
        }

        errors.into_result()
    }
}
