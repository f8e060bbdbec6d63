//! Order Records

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    domain::{
        accounts::records::UserUuid,
        catalog::records::ProductUuid,
        orders::{data::ShippingDetails, status::OrderStatus},
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub shipping: ShippingDetails,
    pub status: OrderStatus,
    /// Fixed at checkout.
    pub total_amount: Decimal,
    pub lines: Vec<OrderLineRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl OrderRecord {
    /// Sum of the line snapshots.
    #[must_use]
    pub fn lines_total(&self) -> Decimal {
        self.lines.iter().map(OrderLineRecord::subtotal).sum()
    }
}

/// Order Line UUID
pub type OrderLineUuid = TypedUuid<OrderLineRecord>;

/// Order Line Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineRecord {
    pub uuid: OrderLineUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub quantity: u32,
    /// Unit price at the time of purchase.
    pub price: Decimal,
}

impl OrderLineRecord {
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Outcome of a successful cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelledOrder {
    pub uuid: OrderUuid,
    pub refunded: Decimal,
}
