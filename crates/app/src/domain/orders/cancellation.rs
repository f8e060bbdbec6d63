//! Cancellation rules.

use rust_decimal::Decimal;

use crate::domain::orders::records::{OrderRecord, OrderUuid};

/// Ledger description for the refund of a cancelled order.
#[must_use]
pub fn refund_description(order: OrderUuid) -> String {
    format!("Refund for cancelled order #{order}")
}

/// Replacement total for orders persisted with a zero total before totals were
/// recorded at checkout. `None` when the stored total stands.
#[must_use]
pub fn reconciled_total(order: &OrderRecord) -> Option<Decimal> {
    if !order.total_amount.is_zero() {
        return None;
    }

    let derived = order.lines_total();

    (derived > Decimal::ZERO).then_some(derived)
}
