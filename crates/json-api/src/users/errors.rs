//! User Errors

use salvo::http::StatusError;
use tracing::error;

use shop_app::{
    auth::AuthServiceError,
    domain::{
        accounts::{AccountsServiceError, ledger::LedgerError},
        money::max_amount,
    },
};

use crate::extensions::{format_money, operation_failed, validation_error};

pub(crate) fn into_status_error(error: AccountsServiceError) -> StatusError {
    match error {
        AccountsServiceError::AlreadyExists => StatusError::bad_request()
            .brief("username: A user with that username already exists."),
        AccountsServiceError::NotFound => StatusError::not_found().brief("User not found."),
        AccountsServiceError::InvalidReference
        | AccountsServiceError::MissingRequiredData
        | AccountsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid account payload")
        }
        AccountsServiceError::Validation(errors) => validation_error(&errors),
        AccountsServiceError::Ledger(LedgerError::NonPositiveAmount) => {
            StatusError::bad_request().brief("Amount must be positive")
        }
        AccountsServiceError::Ledger(LedgerError::NoBalance) => {
            StatusError::forbidden().brief("Admin users cannot have a balance")
        }
        AccountsServiceError::Ledger(ledger @ LedgerError::InsufficientFunds { .. }) => {
            StatusError::bad_request().brief(ledger.to_string())
        }
        AccountsServiceError::Ledger(LedgerError::AmountTooLarge { .. }) => {
            StatusError::bad_request().brief(format!(
                "amount: Balance cannot exceed {}.",
                format_money(max_amount())
            ))
        }
        AccountsServiceError::Password(source) => {
            error!("failed to process password: {source}");

            StatusError::internal_server_error()
        }
        AccountsServiceError::Sql(source) => operation_failed("account storage failure", &source),
    }
}

pub(crate) fn auth_into_status_error(error: AuthServiceError) -> StatusError {
    match error {
        AuthServiceError::InvalidToken(_) | AuthServiceError::Revoked => {
            StatusError::bad_request().brief("Token is invalid or expired")
        }
        AuthServiceError::TokenMismatch => {
            StatusError::bad_request().brief("Token does not belong to the current user.")
        }
        AuthServiceError::UnknownUser => StatusError::unauthorized().brief("User not found."),
        AuthServiceError::InvalidCredentials => {
            StatusError::unauthorized().brief("Invalid credentials")
        }
        AuthServiceError::WrongPassword => StatusError::bad_request().brief("Wrong password."),
        AuthServiceError::Validation(errors) => validation_error(&errors),
        AuthServiceError::Issue(source) => {
            error!("failed to issue session tokens: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Password(source) => {
            error!("failed to process password: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Sql(source) => operation_failed("auth storage failure", &source),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn insufficient_funds_detail_names_both_amounts() {
        let error = into_status_error(AccountsServiceError::Ledger(
            LedgerError::InsufficientFunds {
                balance: dec!(5.00),
                required: dec!(7.50),
            },
        ));

        assert_eq!(error.code, StatusCode::BAD_REQUEST);
        assert!(error.brief.contains("5.00"), "got {}", error.brief);
        assert!(error.brief.contains("7.50"), "got {}", error.brief);
    }

    #[test]
    fn oversized_deposits_name_the_ceiling() {
        let error = into_status_error(AccountsServiceError::Ledger(LedgerError::AmountTooLarge {
            balance: dec!(0.00),
            amount: dec!(100000000),
        }));

        assert_eq!(error.code, StatusCode::BAD_REQUEST);
        assert_eq!(error.brief, "amount: Balance cannot exceed 99999999.99.");
    }

    #[test]
    fn revoked_tokens_are_bad_requests() {
        let error = auth_into_status_error(AuthServiceError::Revoked);

        assert_eq!(error.code, StatusCode::BAD_REQUEST);
        assert_eq!(error.brief, "Token is invalid or expired");
    }

    #[test]
    fn store_failures_are_bad_requests() {
        let accounts = into_status_error(AccountsServiceError::Sql(sqlx::Error::PoolTimedOut));
        let auth = auth_into_status_error(AuthServiceError::Sql(sqlx::Error::PoolTimedOut));

        assert_eq!(accounts.code, StatusCode::BAD_REQUEST);
        assert_eq!(auth.code, StatusCode::BAD_REQUEST);
        assert_eq!(accounts.brief, "Operation failed, please retry.");
    }
}
