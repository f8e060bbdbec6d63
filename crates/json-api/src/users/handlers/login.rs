//! Login Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use shop_app::auth::Credentials;

use crate::{extensions::*, state::State, users::errors::auth_into_status_error};

/// Login Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl From<LoginRequest> for Credentials {
    fn from(request: LoginRequest) -> Self {
        Credentials {
            username: request.username,
            password: request.password,
        }
    }
}

/// Token Pair Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TokenPairResponse {
    /// Short-lived bearer token
    pub access: String,

    /// Token used to obtain new access tokens and to log out
    pub refresh: String,
}

/// Login Handler
///
/// Exchanges credentials for an access/refresh token pair.
#[endpoint(
    tags("users"),
    summary = "Log In",
    responses(
        (status_code = StatusCode::OK, description = "Login successful"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid credentials"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "users.login", skip(json, depot), err)]
pub(crate) async fn handler(
    json: JsonBody<LoginRequest>,
    depot: &mut Depot,
) -> Result<Json<TokenPairResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let tokens = state
        .app
        .auth
        .login(json.into_inner().into())
        .await
        .map_err(auth_into_status_error)?;

    Ok(Json(TokenPairResponse {
        access: tokens.access,
        refresh: tokens.refresh,
    }))
}
