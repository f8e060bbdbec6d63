//! Create Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use shop_app::domain::orders::{OrdersServiceError, data::ShippingDetails};

use crate::{
    extensions::*,
    observability::{OrderEvent, observe_order_event},
    orders::{OrderResponse, errors::into_status_error},
    state::State,
};

/// Shipping details for checkout.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    #[serde(default)]
    pub full_name: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub email: String,
}

impl From<CreateOrderRequest> for ShippingDetails {
    fn from(request: CreateOrderRequest) -> Self {
        Self {
            full_name: request.full_name,
            address: request.address,
            phone: request.phone,
            email: request.email,
        }
    }
}

/// Create Order Handler
///
/// Checks out the caller's cart. Stock, balance and cart change together or
/// not at all.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Checkout rejected"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrators cannot check out"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.create",
    skip(json, depot, res),
    fields(
        customer_uuid = tracing::field::Empty,
        order_uuid = tracing::field::Empty,
        total_amount = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_or_403()?;

    let span = tracing::Span::current();

    span.record("customer_uuid", tracing::field::display(customer.user()));

    let order = state
        .app
        .orders
        .create_order(customer, json.into_inner().into())
        .await
        .inspect_err(|error| {
            if matches!(error, OrdersServiceError::Checkout(_)) {
                observe_order_event(OrderEvent::CheckoutRejected);
            }
        })
        .map_err(into_status_error)?;

    observe_order_event(OrderEvent::Placed);

    span.record("order_uuid", tracing::field::display(order.uuid));
    span.record("total_amount", tracing::field::display(order.total_amount));

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
