//! Catalog Data

use rust_decimal::Decimal;

use crate::{
    domain::{
        catalog::records::{CategoryUuid, ProductUuid},
        money::max_amount,
    },
    validation::FieldErrors,
};

const MAX_NAME_CHARS: usize = 255;

/// New Category Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub uuid: CategoryUuid,
    pub name: String,
    pub description: String,
}

impl NewCategory {
    /// # Errors
    ///
    /// Returns the rejected fields.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        errors.require("name", &self.name);
        errors.max_chars("name", &self.name, MAX_NAME_CHARS);

        errors.into_result()
    }
}

/// Product fields shared by creation and full updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetails {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: u32,
    pub category_uuid: CategoryUuid,
}

impl ProductDetails {
    /// # Errors
    ///
    /// Returns the rejected fields.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        errors.require("name", &self.name);
        errors.max_chars("name", &self.name, MAX_NAME_CHARS);

        if self.price.is_sign_negative() {
            errors.push("price", "Ensure this value is greater than or equal to 0.");
        } else if self.price > max_amount() {
            errors.push("price", "Ensure that there are no more than 10 digits in total.");
        }

        if self.price.round_dp(2) != self.price {
            errors.push("price", "Ensure that there are no more than 2 decimal places.");
        }

        if i32::try_from(self.stock).is_err() {
            errors.push("stock", "Ensure this value is less than or equal to 2147483647.");
        }

        errors.into_result()
    }
}

/// New Product Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub details: ProductDetails,
}
