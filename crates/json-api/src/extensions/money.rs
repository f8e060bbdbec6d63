//! Decimal money on the wire.
//!
//! Amounts travel as strings (`"30.00"`) so no precision is lost to JSON
//! floats.

use rust_decimal::Decimal;
use salvo::prelude::StatusError;

use shop_app::domain::money::fits_column;

const MAX_DECIMAL_PLACES: u32 = 2;

/// Parse a money amount submitted for `field`.
pub(crate) fn parse_money(field: &str, value: &str) -> Result<Decimal, StatusError> {
    let amount = value
        .trim()
        .parse::<Decimal>()
        .map_err(|_ignored| {
            StatusError::bad_request().brief(format!("{field}: A valid number is required."))
        })?
        .normalize();

    if amount.scale() > MAX_DECIMAL_PLACES {
        return Err(StatusError::bad_request().brief(format!(
            "{field}: Ensure that there are no more than {MAX_DECIMAL_PLACES} decimal places."
        )));
    }

    if !fits_column(amount) {
        return Err(StatusError::bad_request().brief(format!(
            "{field}: Ensure that there are no more than 10 digits in total."
        )));
    }

    Ok(amount)
}

/// Two decimal places, as stored.
pub(crate) fn format_money(amount: Decimal) -> String {
    format!("{amount:.2}")
}
