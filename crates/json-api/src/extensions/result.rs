//! Result helper extensions for HTTP handlers.

use std::fmt::Display;

use salvo::prelude::StatusError;
use tracing::error;

use shop_app::validation::FieldErrors;

/// Map errors to HTTP errors, logging the ones the caller cannot act on.
pub(crate) trait ResultExt<T> {
    fn or_500(self, context: &str) -> Result<T, StatusError>;

    fn or_400(self, brief: &str) -> Result<T, StatusError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Display,
{
    fn or_500(self, context: &str) -> Result<T, StatusError> {
        self.map_err(|error| {
            error!("{context}: {error}");

            StatusError::internal_server_error()
        })
    }

    fn or_400(self, brief: &str) -> Result<T, StatusError> {
        self.map_err(|error| StatusError::bad_request().brief(brief).cause(error.to_string()))
    }
}

/// 400 for a store failure the caller may retry; the cause is logged, not returned.
pub(crate) fn operation_failed(context: &str, source: &dyn Display) -> StatusError {
    error!("{context}: {source}");

    StatusError::bad_request().brief("Operation failed, please retry.")
}

/// 400 whose detail names every rejected field.
pub(crate) fn validation_error(errors: &FieldErrors) -> StatusError {
    StatusError::bad_request().brief(errors.to_string())
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn validation_error_names_fields() {
        let mut errors = FieldErrors::new();

        errors.push("email", "Enter a valid email address.");
        errors.push("phone", "This field is required.");

        let error = validation_error(&errors);

        assert_eq!(error.code, StatusCode::BAD_REQUEST);
        assert_eq!(
            error.brief,
            "email: Enter a valid email address.; phone: This field is required."
        );
    }

    #[test]
    fn store_failures_are_retryable_bad_requests() {
        let error = operation_failed("orders storage failure", &sqlx::Error::PoolTimedOut);

        assert_eq!(error.code, StatusCode::BAD_REQUEST);
        assert_eq!(error.brief, "Operation failed, please retry.");
        assert!(
            !error.brief.contains("pool"),
            "the store error should stay in the logs"
        );
    }

    #[test]
    fn or_400_keeps_the_brief() {
        let result: Result<(), &str> = Err("boom");

        let error = result.or_400("could not parse amount").err();

        assert_eq!(
            error.map(|error| (error.code, error.brief)),
            Some((StatusCode::BAD_REQUEST, "could not parse amount".to_string()))
        );
    }
}
