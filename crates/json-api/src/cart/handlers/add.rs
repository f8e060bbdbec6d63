//! Add Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shop_app::domain::carts::data::NewCartLine;

use crate::{
    cart::{CartLineResponse, errors::into_status_error},
    extensions::*,
    state::State,
};

const fn default_quantity() -> i64 {
    1
}

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddItemRequest {
    pub product_id: Uuid,

    /// Units to add, defaults to 1
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

/// Add Cart Item Handler
///
/// Creates the caller's cart on first use. Adding a product already in the
/// cart increases that line's quantity.
#[endpoint(
    tags("cart"),
    summary = "Add Cart Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Item added"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Quantity rejected"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "cart.add",
    skip(json, depot, res),
    fields(
        user_uuid = tracing::field::Empty,
        product_uuid = tracing::field::Empty,
        quantity = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<AddItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartLineResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(principal.user_uuid()));
    span.record("product_uuid", tracing::field::display(request.product_id));
    span.record("quantity", request.quantity);

    let line = state
        .app
        .carts
        .add_item(
            principal.user_uuid(),
            NewCartLine {
                product_uuid: request.product_id.into(),
                quantity: request.quantity,
            },
        )
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(line.into()))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use shop_app::domain::carts::{
        CartsServiceError, MockCartsService, rules::AddItemError,
    };

    use crate::{
        cart::make_line,
        test_helpers::{Mocks, TEST_USER_UUID, anonymous_service, customer_service},
    };

    use super::*;

    fn route() -> Router {
        Router::with_path("cart/add").post(handler)
    }

    fn mocks(carts: MockCartsService) -> Mocks {
        Mocks {
            carts: Some(carts),
            ..Mocks::default()
        }
    }

    #[tokio::test]
    async fn test_add_item_defaults_quantity_to_one() -> TestResult {
        let product = Uuid::now_v7();

        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .withf(move |user, line| {
                *user == TEST_USER_UUID
                    && line.product_uuid.into_uuid() == product
                    && line.quantity == 1
            })
            .return_once(|_, _| Ok(make_line(dec!(10.00), 1)));

        let mut res = TestClient::post("http://example.com/cart/add")
            .json(&json!({ "product_id": product }))
            .send(&customer_service(mocks(carts), route()))
            .await;

        let line: CartLineResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(line.quantity, 1);
        assert_eq!(line.subtotal, "10.00");

        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_beyond_stock_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_add_item().once().return_once(|_, _| {
            Err(CartsServiceError::Rejected(AddItemError::OutOfStock {
                product: "Teapot".to_string(),
            }))
        });

        let res = TestClient::post("http://example.com/cart/add")
            .json(&json!({ "product_id": Uuid::now_v7(), "quantity": 3 }))
            .send(&customer_service(mocks(carts), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_unknown_product_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::ProductNotFound));

        let res = TestClient::post("http://example.com/cart/add")
            .json(&json!({ "product_id": Uuid::now_v7() }))
            .send(&customer_service(mocks(carts), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_requires_authentication() -> TestResult {
        let res = TestClient::post("http://example.com/cart/add")
            .json(&json!({ "product_id": Uuid::now_v7() }))
            .send(&anonymous_service(Mocks::default(), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
