//! Delete Account Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, state::State, users::errors::auth_into_status_error};

/// Delete Account Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DeleteAccountRequest {
    /// Current password, re-checked before deletion
    pub password: String,
}

/// Delete Account Handler
///
/// Removes the caller together with their profile, cart, ledger and orders.
#[endpoint(
    tags("users"),
    summary = "Delete Account",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Account deleted"),
        (status_code = StatusCode::BAD_REQUEST, description = "Wrong password"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "users.delete",
    skip(json, depot),
    fields(user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<DeleteAccountRequest>,
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
        .delete_account(principal, &json.into_inner().password)
        .await
        .map_err(auth_into_status_error)?;

    tracing::info!("deleted account");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use shop_app::auth::{AuthServiceError, MockAuthService};

    use crate::test_helpers::{Mocks, customer_service};

    use super::*;

    fn make_service(auth: MockAuthService) -> Service {
        customer_service(
            Mocks {
                auth: Some(auth),
                ..Mocks::default()
            },
            Router::with_path("users/delete").delete(handler),
        )
    }

    #[tokio::test]
    async fn test_delete_account_returns_204() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_delete_account()
            .once()
            .withf(|_, password| password == "hunter22")
            .return_once(|_, _| Ok(()));

        let res = TestClient::delete("http://example.com/users/delete")
            .json(&json!({ "password": "hunter22" }))
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_account_with_wrong_password_returns_400() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_delete_account()
            .once()
            .return_once(|_, _| Err(AuthServiceError::WrongPassword));

        let res = TestClient::delete("http://example.com/users/delete")
            .json(&json!({ "password": "nope" }))
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
