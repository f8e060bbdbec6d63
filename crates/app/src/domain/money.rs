//! Money column bounds.

use rust_decimal::Decimal;

/// Largest amount a `NUMERIC(10, 2)` column holds.
#[must_use]
pub fn max_amount() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

/// Whether `amount` can be stored in a money column without overflowing it.
#[must_use]
pub fn fits_column(amount: Decimal) -> bool {
    amount.abs() <= max_amount()
}
