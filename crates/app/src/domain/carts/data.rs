//! Cart Data

use crate::domain::catalog::records::ProductUuid;

/// Request to add units of a product to the caller's cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCartLine {
    pub product_uuid: ProductUuid,
    /// Units to add; must be positive.
    pub quantity: i64,
}
