//! Cart stock rules.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::money::{fits_column, max_amount};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddItemError {
    #[error("Quantity must be greater than zero.")]
    NonPositiveQuantity,

    #[error("Product '{product}' is out of stock.")]
    OutOfStock { product: String },

    #[error(
        "Cannot add {requested} more units of '{product}'. Only {available} more units available."
    )]
    LimitedStock {
        product: String,
        requested: i64,
        available: u32,
    },

    #[error("Cart total cannot exceed {limit}.")]
    TotalTooLarge { limit: Decimal },
}

/// Quantity the cart line holds after adding `requested` units.
///
/// `in_cart` is what the line already holds; the combined quantity may not
/// exceed `stock`.
///
/// # Errors
///
/// Returns an error when `requested` is not positive or stock cannot cover
/// the combined quantity.
pub fn quantity_after_add(
    product: &str,
    stock: u32,
    in_cart: u32,
    requested: i64,
) -> Result<u32, AddItemError> {
    if requested <= 0 {
        return Err(AddItemError::NonPositiveQuantity);
    }

    let combined = i64::from(in_cart).saturating_add(requested);

    if combined <= i64::from(stock) {
        return u32::try_from(combined).map_err(|_overflow| AddItemError::OutOfStock {
            product: product.to_string(),
        });
    }

    match stock.checked_sub(in_cart) {
        Some(available) if available > 0 => Err(AddItemError::LimitedStock {
            product: product.to_string(),
            requested,
            available,
        }),
        _ => Err(AddItemError::OutOfStock {
            product: product.to_string(),
        }),
    }
}

/// Cart total after `added` more units at `unit_price`.
///
/// # Errors
///
/// Returns [`AddItemError::TotalTooLarge`] when the total would not fit the
/// cart's money column.
pub fn total_after_add(
    cart_total: Decimal,
    unit_price: Decimal,
    added: u32,
) -> Result<Decimal, AddItemError> {
    unit_price
        .checked_mul(Decimal::from(added))
        .and_then(|subtotal| cart_total.checked_add(subtotal))
        .filter(|total| fits_column(*total))
        .ok_or_else(|| AddItemError::TotalTooLarge {
            limit: max_amount(),
        })
}
