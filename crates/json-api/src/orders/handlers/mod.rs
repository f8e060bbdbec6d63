//! Order Handlers

pub(crate) mod cancel;
pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod status;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shop_app::domain::orders::records::{OrderLineRecord, OrderRecord};

use crate::extensions::format_money;

/// Order Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderLineResponse {
    pub uuid: Uuid,
    pub product: Uuid,
    pub product_name: String,
    pub quantity: u32,

    /// Unit price paid at checkout
    pub price: String,
}

impl From<OrderLineRecord> for OrderLineResponse {
    fn from(line: OrderLineRecord) -> Self {
        Self {
            uuid: line.uuid.into_uuid(),
            product: line.product_uuid.into_uuid(),
            product_name: line.product_name,
            quantity: line.quantity,
            price: format_money(line.price),
        }
    }
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,
    pub user: Uuid,
    pub full_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,

    /// One of `PENDING`, `PROCESSING`, `SHIPPED`, `DELIVERED`, `CANCELLED`
    pub status: String,

    pub total_amount: String,
    pub items: Vec<OrderLineResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        Self {
            uuid: order.uuid.into_uuid(),
            user: order.user_uuid.into_uuid(),
            full_name: order.shipping.full_name,
            address: order.shipping.address,
            phone: order.shipping.phone,
            email: order.shipping.email,
            status: order.status.as_str().to_string(),
            total_amount: format_money(order.total_amount),
            items: order.lines.into_iter().map(Into::into).collect(),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

#[cfg(test)]
pub(crate) fn make_order(
    uuid: shop_app::domain::orders::records::OrderUuid,
    status: shop_app::domain::orders::status::OrderStatus,
    total: rust_decimal::Decimal,
) -> OrderRecord {
    use jiff::Timestamp;
    use shop_app::domain::{
        catalog::records::ProductUuid,
        orders::{data::ShippingDetails, records::OrderLineUuid},
    };

    OrderRecord {
        uuid,
        user_uuid: crate::test_helpers::TEST_USER_UUID,
        shipping: ShippingDetails {
            full_name: "Ada Lovelace".to_string(),
            address: "12 St James's Square".to_string(),
            phone: "+44 20 7946 0000".to_string(),
            email: "ada@example.com".to_string(),
        },
        status,
        total_amount: total,
        lines: vec![OrderLineRecord {
            uuid: OrderLineUuid::new(),
            product_uuid: ProductUuid::new(),
            product_name: "Teapot".to_string(),
            quantity: 1,
            price: total,
        }],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
