//! Cart Handlers

pub(crate) mod add;
pub(crate) mod remove;
pub(crate) mod view;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shop_app::domain::carts::records::CartLineRecord;

use crate::extensions::format_money;

/// Cart Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineResponse {
    pub uuid: Uuid,
    pub product: Uuid,
    pub product_name: String,

    /// Current unit price of the product
    pub price: String,

    pub quantity: u32,

    /// `price * quantity`
    pub subtotal: String,
}

impl From<CartLineRecord> for CartLineResponse {
    fn from(line: CartLineRecord) -> Self {
        Self {
            subtotal: format_money(line.subtotal()),
            uuid: line.uuid.into_uuid(),
            product: line.product_uuid.into_uuid(),
            product_name: line.product_name,
            price: format_money(line.unit_price),
            quantity: line.quantity,
        }
    }
}

#[cfg(test)]
pub(crate) fn make_line(price: rust_decimal::Decimal, quantity: u32) -> CartLineRecord {
    use jiff::Timestamp;
    use shop_app::domain::{carts::records::CartLineUuid, catalog::records::ProductUuid};

    CartLineRecord {
        uuid: CartLineUuid::new(),
        product_uuid: ProductUuid::new(),
        product_name: "Teapot".to_string(),
        unit_price: price,
        quantity,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
