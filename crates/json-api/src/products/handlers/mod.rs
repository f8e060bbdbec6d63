//! Catalog Handlers

pub(crate) mod all;
pub(crate) mod categories;
pub(crate) mod create;
pub(crate) mod create_category;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update;

use rust_decimal::Decimal;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shop_app::domain::catalog::data::ProductDetails;

use crate::extensions::parse_money;

/// Product fields accepted by create and update.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductRequest {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Decimal price, e.g. `"10.00"`
    pub price: String,

    pub stock: u32,

    /// Category UUID
    pub category: Uuid,
}

impl ProductRequest {
    fn into_details(self) -> Result<ProductDetails, StatusError> {
        let price: Decimal = parse_money("price", &self.price)?;

        Ok(ProductDetails {
            name: self.name,
            description: self.description,
            price,
            stock: self.stock,
            category_uuid: self.category.into(),
        })
    }
}
