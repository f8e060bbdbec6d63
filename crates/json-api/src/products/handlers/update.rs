//! Update Product Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    extensions::*,
    products::{ProductRequest, errors::into_status_error, get::ProductResponse},
    state::State,
};

/// Update Product Handler
///
/// Replaces every product field. Carts holding the product are repriced.
#[endpoint(
    tags("products"),
    summary = "Update Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Caller is not an administrator"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.update",
    skip(product, json, depot),
    fields(
        product_uuid = tracing::field::Empty,
        price = tracing::field::Empty,
        stock = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<ProductRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.administrator_or_403()?;

    let product = product.into_inner();
    let details = json.into_inner().into_details()?;

    let span = tracing::Span::current();

    span.record("product_uuid", tracing::field::display(product));
    span.record("price", tracing::field::display(details.price));
    span.record("stock", details.stock);

    let updated = state
        .app
        .catalog
        .update_product(product.into(), details)
        .await
        .map_err(into_status_error)?;

    tracing::info!(product_uuid = %product, "updated product");

    Ok(Json(updated.into()))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use shop_app::domain::catalog::{
        CatalogServiceError, MockCatalogService, records::ProductUuid,
    };

    use crate::test_helpers::{Mocks, administrator_service, customer_service, make_product};

    use super::*;

    fn route() -> Router {
        Router::with_path("products/{product}").put(handler)
    }

    fn mocks(catalog: MockCatalogService) -> Mocks {
        Mocks {
            catalog: Some(catalog),
            ..Mocks::default()
        }
    }

    fn body() -> serde_json::Value {
        json!({
            "name": "Teapot",
            "price": "12.50",
            "stock": 3,
            "category": Uuid::now_v7(),
        })
    }

    #[tokio::test]
    async fn test_update_product_success() -> TestResult {
        let uuid = ProductUuid::new();

        let mut catalog = MockCatalogService::new();

        catalog
            .expect_update_product()
            .once()
            .withf(move |u, details| *u == uuid && details.price == dec!(12.5) && details.stock == 3)
            .return_once(|u, details| Ok(make_product(u, details.price, details.stock)));

        let mut res = TestClient::put(format!("http://example.com/products/{uuid}"))
            .json(&body())
            .send(&administrator_service(mocks(catalog), route()))
            .await;

        let updated: ProductResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(updated.price, "12.50");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_product_returns_404() -> TestResult {
        let mut catalog = MockCatalogService::new();

        catalog
            .expect_update_product()
            .once()
            .return_once(|_, _| Err(CatalogServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/products/{}", Uuid::now_v7()))
            .json(&body())
            .send(&administrator_service(mocks(catalog), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_with_fractional_cents_returns_400() -> TestResult {
        let mut request = body();
        request["price"] = json!("1.001");

        let res = TestClient::put(format!("http://example.com/products/{}", Uuid::now_v7()))
            .json(&request)
            .send(&administrator_service(Mocks::default(), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_cannot_update_product() -> TestResult {
        let res = TestClient::put(format!("http://example.com/products/{}", Uuid::now_v7()))
            .json(&body())
            .send(&customer_service(Mocks::default(), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
