//! Deposit Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, state::State, users::errors::into_status_error};

/// Deposit Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DepositRequest {
    /// Decimal amount, e.g. `"50.00"`
    pub amount: String,
}

/// Deposit Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DepositResponse {
    pub message: String,

    /// Balance after the deposit
    pub new_balance: String,
}

/// Deposit Handler
///
/// Credits the caller's balance. Administrators hold no balance and are refused.
#[endpoint(
    tags("users"),
    summary = "Deposit Funds",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Deposit successful"),
        (status_code = StatusCode::BAD_REQUEST, description = "Amount must be positive"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrators cannot hold a balance"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "users.deposit",
    skip(json, depot),
    fields(user_uuid = tracing::field::Empty, amount = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<DepositRequest>,
    depot: &mut Depot,
) -> Result<Json<DepositResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_or_403()?;
    let amount = parse_money("amount", &json.into_inner().amount)?;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(customer.user()));
    span.record("amount", tracing::field::display(amount));

    let balance = state
        .app
        .accounts
        .deposit(customer, amount)
        .await
        .map_err(into_status_error)?;

    Ok(Json(DepositResponse {
        message: "Deposit successful".to_string(),
        new_balance: format_money(balance),
    }))
}
