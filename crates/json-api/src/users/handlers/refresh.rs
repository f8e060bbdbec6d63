//! Refresh Access Token Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use shop_app::auth::AuthServiceError;

use crate::{extensions::*, state::State, users::errors::auth_into_status_error};

/// Refresh Token Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RefreshRequest {
    pub refresh: String,
}

/// Access Token Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AccessTokenResponse {
    /// New short-lived bearer token
    pub access: String,
}

/// Refresh Access Token Handler
#[endpoint(
    tags("users"),
    summary = "Refresh Access Token",
    responses(
        (status_code = StatusCode::OK, description = "Access token issued"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Token is invalid or expired"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "users.refresh", skip(json, depot), err)]
pub(crate) async fn handler(
    json: JsonBody<RefreshRequest>,
    depot: &mut Depot,
) -> Result<Json<AccessTokenResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let access = state
        .app
        .auth
        .refresh(&json.into_inner().refresh)
        .await
        .map_err(|error| match error {
            AuthServiceError::InvalidToken(_)
            | AuthServiceError::Revoked
            | AuthServiceError::UnknownUser => {
                StatusError::unauthorized().brief("Token is invalid or expired")
            }
            error => auth_into_status_error(error),
        })?;

    Ok(Json(AccessTokenResponse { access }))
}
