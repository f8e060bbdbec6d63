//! Logout Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    extensions::*,
    state::State,
    users::{errors::auth_into_status_error, refresh::RefreshRequest},
};

/// Logout Handler
///
/// Revokes the session the refresh token belongs to. The access token issued
/// alongside it stops working too.
#[endpoint(
    tags("users"),
    summary = "Log Out",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::RESET_CONTENT, description = "Logged out"),
        (status_code = StatusCode::BAD_REQUEST, description = "Token is invalid or expired"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "users.logout",
    skip(json, depot),
    fields(user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<RefreshRequest>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    tracing::Span::current().record(
        "user_uuid",
        tracing::field::display(principal.user_uuid()),
    );

    state
        .app
        .auth
        .logout(principal, &json.into_inner().refresh)
        .await
        .map_err(auth_into_status_error)?;

    tracing::info!("logged out");

    Ok(StatusCode::RESET_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use shop_app::auth::{AuthServiceError, MockAuthService, Principal};

    use crate::test_helpers::{Mocks, TEST_CUSTOMER, customer_service};

    use super::*;

    fn make_service(auth: MockAuthService) -> Service {
        customer_service(
            Mocks {
                auth: Some(auth),
                ..Mocks::default()
            },
            Router::with_path("users/logout").post(handler),
        )
    }

    #[tokio::test]
    async fn test_logout_returns_205() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_logout()
            .once()
            .withf(|principal, token| {
                *principal == Principal::Customer(TEST_CUSTOMER) && token == "refresh-token"
            })
            .return_once(|_, _| Ok(()));

        let res = TestClient::post("http://example.com/users/logout")
            .json(&json!({ "refresh": "refresh-token" }))
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::RESET_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_second_logout_returns_400() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_logout()
            .once()
            .return_once(|_, _| Err(AuthServiceError::Revoked));

        let res = TestClient::post("http://example.com/users/logout")
            .json(&json!({ "refresh": "refresh-token" }))
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_logout_without_refresh_token_returns_400() -> TestResult {
        let res = TestClient::post("http://example.com/users/logout")
            .json(&json!({}))
            .send(&make_service(MockAuthService::new()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
