//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use shop_app::domain::orders::OrdersServiceError;

use crate::extensions::{operation_failed, validation_error};

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found."),
        OrdersServiceError::Checkout(rejection) => {
            StatusError::bad_request().brief(rejection.to_string())
        }
        OrdersServiceError::InvalidShipping(errors) => validation_error(&errors),
        OrdersServiceError::Status(rejection) => {
            StatusError::bad_request().brief(rejection.to_string())
        }
        OrdersServiceError::RefundFailed(source) => {
            error!("refund failed: {source}");

            StatusError::bad_request().brief("Failed to process refund.")
        }
        OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::Sql(source) => operation_failed("orders storage failure", &source),
    }
}
