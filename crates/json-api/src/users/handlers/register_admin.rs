//! Register Administrator Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use shop_app::domain::accounts::data::AccountRole;

use crate::{
    extensions::*,
    state::State,
    users::{
        errors::into_status_error,
        register::{RegisterRequest, RegisteredResponse},
    },
};

/// Register Administrator Handler
///
/// Creates a staff account without a balance. Only administrators may call it.
#[endpoint(
    tags("users"),
    summary = "Register Administrator",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Administrator registered"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid data provided"),
        (status_code = StatusCode::FORBIDDEN, description = "Caller is not an administrator"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "users.register_admin",
    skip(json, depot, res),
    fields(registered_by = tracing::field::Empty, user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<RegisterRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<RegisteredResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let administrator = depot.administrator_or_403()?;

    let span = tracing::Span::current();

    span.record("registered_by", tracing::field::display(administrator));

    let user = state
        .app
        .accounts
        .create_account(json.into_inner().into(), AccountRole::Administrator)
        .await
        .map_err(into_status_error)?;

    span.record("user_uuid", tracing::field::display(user.uuid));

    res.status_code(StatusCode::CREATED);

    Ok(Json(RegisteredResponse {
        message: "Admin user registered successfully".to_string(),
        uuid: user.uuid.into_uuid(),
    }))
}
