//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{
    database::is_numeric_overflow,
    domain::{
        accounts::ledger::LedgerError,
        orders::{checkout::CheckoutError, status::StatusTransitionError},
    },
    validation::FieldErrors,
};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order not found")]
    NotFound,

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error("invalid shipping details: {0}")]
    InvalidShipping(FieldErrors),

    #[error(transparent)]
    Status(#[from] StatusTransitionError),

    #[error("Failed to process refund.")]
    RefundFailed(#[source] LedgerError),

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        if is_numeric_overflow(&error) {
            return Self::InvalidData;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
