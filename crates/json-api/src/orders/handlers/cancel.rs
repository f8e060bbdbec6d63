//! Cancel Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    observability::{OrderEvent, observe_order_event},
    orders::errors::into_status_error,
    responses::MessageResponse,
    state::State,
};

/// Cancel Order Handler
///
/// Restocks every line and refunds the order total to the caller's balance.
#[endpoint(
    tags("orders"),
    summary = "Cancel Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order cancelled"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Order cannot be cancelled"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrators cannot cancel orders"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.cancel",
    skip(order, depot),
    fields(order_uuid = tracing::field::Empty, refunded = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<MessageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_or_403()?;

    let order = order.into_inner();

    let span = tracing::Span::current();

    span.record("order_uuid", tracing::field::display(order));

    let cancelled = state
        .app
        .orders
        .cancel_order(customer, order.into())
        .await
        .map_err(into_status_error)?;

    span.record("refunded", tracing::field::display(cancelled.refunded));

    observe_order_event(OrderEvent::Cancelled);

    Ok(Json(MessageResponse::new(format!(
        "Order cancelled successfully. Amount refunded: {}",
        format_money(cancelled.refunded)
    ))))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use shop_app::domain::orders::{
        MockOrdersService, OrdersServiceError,
        records::CancelledOrder,
        status::{OrderStatus, StatusTransitionError},
    };

    use crate::test_helpers::{Mocks, TEST_CUSTOMER, administrator_service, customer_service};

    use super::*;

    fn route() -> Router {
        Router::with_path("orders/{order}/cancel").delete(handler)
    }

    fn mocks(orders: MockOrdersService) -> Mocks {
        Mocks {
            orders: Some(orders),
            ..Mocks::default()
        }
    }

    #[tokio::test]
    async fn test_cancel_order_reports_refund() -> TestResult {
        let order = Uuid::now_v7();

        let mut orders = MockOrdersService::new();

        orders
            .expect_cancel_order()
            .once()
            .withf(move |customer, o| *customer == TEST_CUSTOMER && o.into_uuid() == order)
            .return_once(|_, o| {
                Ok(CancelledOrder {
                    uuid: o,
                    refunded: dec!(20),
                })
            });

        let mut res = TestClient::delete(format!("http://example.com/orders/{order}/cancel"))
            .send(&customer_service(mocks(orders), route()))
            .await;

        let body: MessageResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(
            body.message,
            "Order cancelled successfully. Amount refunded: 20.00"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_shipped_order_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_cancel_order().once().return_once(|_, _| {
            Err(OrdersServiceError::Status(
                StatusTransitionError::NotCancellable {
                    status: OrderStatus::Shipped,
                },
            ))
        });

        let res = TestClient::delete(format!(
            "http://example.com/orders/{}/cancel",
            Uuid::now_v7()
        ))
        .send(&customer_service(mocks(orders), route()))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_unknown_order_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_cancel_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::NotFound));

        let res = TestClient::delete(format!(
            "http://example.com/orders/{}/cancel",
            Uuid::now_v7()
        ))
        .send(&customer_service(mocks(orders), route()))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_administrator_cannot_cancel() -> TestResult {
        let res = TestClient::delete(format!(
            "http://example.com/orders/{}/cancel",
            Uuid::now_v7()
        ))
        .send(&administrator_service(Mocks::default(), route()))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
