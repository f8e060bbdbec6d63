//! Checkout planning.
//!
//! Runs against rows already locked by the caller; nothing here touches the
//! database.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::domain::{
    accounts::ledger::CustomerBalance,
    carts::records::CartLineRecord,
    catalog::records::{ProductRecord, ProductUuid},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty. Please add items to your cart before placing an order.")]
    EmptyCart,

    #[error("Insufficient balance. Your balance: {balance}, Order total: {required}")]
    InsufficientFunds { balance: Decimal, required: Decimal },

    #[error("Not enough stock for '{product}'. Available: {available}")]
    InsufficientStock { product: String, available: u32 },
}

/// One order line to be written, priced at the current catalog price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedLine {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub price: Decimal,
}

impl PlannedLine {
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPlan {
    pub lines: Vec<PlannedLine>,
    /// Re-derived from the planned lines; authoritative over the cart total.
    pub total: Decimal,
}

/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] when there are no lines.
pub fn ensure_not_empty(lines: &[CartLineRecord]) -> Result<(), CheckoutError> {
    if lines.is_empty() {
        Err(CheckoutError::EmptyCart)
    } else {
        Ok(())
    }
}

/// # Errors
///
/// Returns [`CheckoutError::InsufficientFunds`] when the balance is unset or
/// below `required`.
pub fn ensure_affordable(balance: &CustomerBalance, required: Decimal) -> Result<(), CheckoutError> {
    match balance.amount() {
        Some(amount) if amount >= required => Ok(()),
        _ => Err(CheckoutError::InsufficientFunds {
            balance: balance.available(),
            required,
        }),
    }
}

/// Snapshot cart lines against locked product rows.
///
/// # Errors
///
/// Returns [`CheckoutError::InsufficientStock`] for the first line whose
/// quantity exceeds current stock. A product that no longer exists counts as
/// having none.
pub fn plan_checkout(
    lines: &[CartLineRecord],
    products: &[ProductRecord],
) -> Result<CheckoutPlan, CheckoutError> {
    ensure_not_empty(lines)?;

    let by_uuid: FxHashMap<ProductUuid, &ProductRecord> = products
        .iter()
        .map(|product| (product.uuid, product))
        .collect();

    let mut planned = Vec::with_capacity(lines.len());

    for line in lines {
        let Some(product) = by_uuid.get(&line.product_uuid) else {
            return Err(CheckoutError::InsufficientStock {
                product: line.product_name.clone(),
                available: 0,
            });
        };

        if line.quantity > product.stock {
            return Err(CheckoutError::InsufficientStock {
                product: product.name.clone(),
                available: product.stock,
            });
        }

        planned.push(PlannedLine {
            product_uuid: product.uuid,
            quantity: line.quantity,
            price: product.price,
        });
    }

    let total = planned.iter().map(PlannedLine::subtotal).sum();

    Ok(CheckoutPlan {
        lines: planned,
        total,
    })
}
