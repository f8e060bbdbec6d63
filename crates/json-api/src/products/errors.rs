//! Catalog Errors

use salvo::http::StatusError;

use shop_app::domain::catalog::CatalogServiceError;

use crate::extensions::{operation_failed, validation_error};

pub(crate) fn into_status_error(error: CatalogServiceError) -> StatusError {
    match error {
        CatalogServiceError::AlreadyExists => {
            StatusError::conflict().brief("name: An entry with this name already exists.")
        }
        CatalogServiceError::NotFound => StatusError::not_found().brief("Product not found."),
        CatalogServiceError::InvalidReference => {
            StatusError::bad_request().brief("category: Category not found.")
        }
        CatalogServiceError::InUse => StatusError::bad_request()
            .brief("Cannot delete a product that is referenced by existing orders."),
        CatalogServiceError::MissingRequiredData | CatalogServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid product payload")
        }
        CatalogServiceError::Validation(errors) => validation_error(&errors),
        CatalogServiceError::PageOutOfRange => StatusError::not_found().brief("Invalid page."),
        CatalogServiceError::Sql(source) => operation_failed("catalog storage failure", &source),
    }
}
