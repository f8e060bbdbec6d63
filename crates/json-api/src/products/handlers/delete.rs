//! Delete Product Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, products::errors::into_status_error, state::State};

/// Delete Product Handler
///
/// Products that appear on any order cannot be deleted.
#[endpoint(
    tags("products"),
    summary = "Delete Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Product deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Product is referenced by orders"),
        (status_code = StatusCode::FORBIDDEN, description = "Caller is not an administrator"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "products.delete", skip(product, depot), err)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.administrator_or_403()?;

    let product = product.into_inner();

    state
        .app
        .catalog
        .delete_product(product.into())
        .await
        .map_err(into_status_error)?;

    tracing::info!(product_uuid = %product, "deleted product");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use shop_app::domain::catalog::{
        CatalogServiceError, MockCatalogService, records::ProductUuid,
    };

    use crate::test_helpers::{Mocks, administrator_service, customer_service};

    use super::*;

    fn route() -> Router {
        Router::with_path("products/{product}/delete").delete(handler)
    }

    fn mocks(catalog: MockCatalogService) -> Mocks {
        Mocks {
            catalog: Some(catalog),
            ..Mocks::default()
        }
    }

    #[tokio::test]
    async fn test_delete_product_returns_204() -> TestResult {
        let uuid = ProductUuid::new();

        let mut catalog = MockCatalogService::new();

        catalog
            .expect_delete_product()
            .once()
            .withf(move |u| *u == uuid)
            .return_once(|_| Ok(()));

        let res = TestClient::delete(format!("http://example.com/products/{uuid}/delete"))
            .send(&administrator_service(mocks(catalog), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_ordered_product_returns_400() -> TestResult {
        let mut catalog = MockCatalogService::new();

        catalog
            .expect_delete_product()
            .once()
            .return_once(|_| Err(CatalogServiceError::InUse));

        let res = TestClient::delete(format!("http://example.com/products/{}/delete", Uuid::now_v7()))
            .send(&administrator_service(mocks(catalog), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_cannot_delete_product() -> TestResult {
        let res = TestClient::delete(format!("http://example.com/products/{}/delete", Uuid::now_v7()))
            .send(&customer_service(Mocks::default(), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
