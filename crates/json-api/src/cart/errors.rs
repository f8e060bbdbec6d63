//! Cart Errors

use salvo::http::StatusError;

use shop_app::domain::carts::CartsServiceError;

use crate::extensions::operation_failed;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::NotFound => StatusError::not_found().brief("Cart item not found."),
        CartsServiceError::ProductNotFound => StatusError::not_found().brief("Product not found."),
        CartsServiceError::Rejected(rejection) => {
            StatusError::bad_request().brief(rejection.to_string())
        }
        CartsServiceError::InvalidData => StatusError::bad_request().brief("Invalid cart payload"),
        CartsServiceError::Sql(source) => operation_failed("cart storage failure", &source),
    }
}
