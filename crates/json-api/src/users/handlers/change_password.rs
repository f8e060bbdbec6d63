//! Change Password Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use shop_app::auth::PasswordChange;

use crate::{
    extensions::*, responses::MessageResponse, state::State,
    users::errors::auth_into_status_error,
};

/// Change Password Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl From<ChangePasswordRequest> for PasswordChange {
    fn from(request: ChangePasswordRequest) -> Self {
        PasswordChange {
            old_password: request.old_password,
            new_password: request.new_password,
            confirm_password: request.confirm_password,
        }
    }
}

/// Change Password Handler
#[endpoint(
    tags("users"),
    summary = "Change Password",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Password changed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid data provided"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "users.change_password", skip(json, depot), err)]
pub(crate) async fn handler(
    json: JsonBody<ChangePasswordRequest>,
    depot: &mut Depot,
) -> Result<Json<MessageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    state
        .app
        .auth
        .change_password(principal, json.into_inner().into())
        .await
        .map_err(auth_into_status_error)?;

    Ok(Json(MessageResponse::new("Password changed successfully")))
}
