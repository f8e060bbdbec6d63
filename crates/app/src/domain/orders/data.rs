//! Order Data

use crate::validation::{FieldErrors, looks_like_email};

const MAX_FULL_NAME_CHARS: usize = 100;
const MAX_PHONE_CHARS: usize = 20;

/// Delivery details captured at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingDetails {
    pub full_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl ShippingDetails {
    /// # Errors
    ///
    /// Returns every offending field.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        errors.require("full_name", &self.full_name);
        errors.max_chars("full_name", &self.full_name, MAX_FULL_NAME_CHARS);
        errors.require("address", &self.address);
        errors.require("phone", &self.phone);
        errors.max_chars("phone", &self.phone, MAX_PHONE_CHARS);
        errors.require("email", &self.email);

        if !self.email.trim().is_empty() && !looks_like_email(&self.email) {
            errors.push("email", "Enter a valid email address.");
        }

        errors.into_result()
    }
}
