//! Register Customer Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shop_app::domain::accounts::{
    data::{AccountRole, NewAccount},
    records::UserUuid,
};

use crate::{extensions::*, state::State, users::errors::into_status_error};

/// Registration Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterRequest {
    pub username: String,

    #[serde(default)]
    pub email: String,

    pub password: String,
}

impl From<RegisterRequest> for NewAccount {
    fn from(request: RegisterRequest) -> Self {
        NewAccount {
            uuid: UserUuid::new(),
            username: request.username,
            email: request.email,
            password: request.password,
        }
    }
}

/// Registered Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisteredResponse {
    /// Outcome message
    pub message: String,

    /// New user UUID
    pub uuid: Uuid,
}

/// Register Customer Handler
///
/// Creates a customer account with a zero balance.
#[endpoint(
    tags("users"),
    summary = "Register User",
    responses(
        (status_code = StatusCode::CREATED, description = "User registered"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid data provided"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "users.register",
    skip(json, depot, res),
    fields(user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<RegisterRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<RegisteredResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let user = state
        .app
        .accounts
        .create_account(json.into_inner().into(), AccountRole::Customer)
        .await
        .map_err(into_status_error)?;

    tracing::Span::current().record("user_uuid", tracing::field::display(user.uuid));

    res.status_code(StatusCode::CREATED);

    Ok(Json(RegisteredResponse {
        message: "User registered successfully".to_string(),
        uuid: user.uuid.into_uuid(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use shop_app::{
        domain::accounts::{AccountsServiceError, MockAccountsService},
        validation::FieldErrors,
    };

    use crate::test_helpers::{Mocks, anonymous_service};

    use super::{super::tests::make_user, *};

    fn make_service(accounts: MockAccountsService) -> Service {
        anonymous_service(
            Mocks {
                accounts: Some(accounts),
                ..Mocks::default()
            },
            Router::with_path("users/register").post(handler),
        )
    }

    #[tokio::test]
    async fn test_register_creates_customer() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_create_account()
            .once()
            .withf(|account, role| {
                account.username == "ada"
                    && account.email == "ada@example.com"
                    && account.password == "hunter22"
                    && *role == AccountRole::Customer
            })
            .return_once(|account, _| Ok(make_user(account.uuid, "ada", false)));

        let mut res = TestClient::post("http://example.com/users/register")
            .json(&json!({
                "username": "ada",
                "email": "ada@example.com",
                "password": "hunter22",
            }))
            .send(&make_service(accounts))
            .await;

        let body: RegisteredResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.message, "User registered successfully");

        Ok(())
    }

    #[tokio::test]
    async fn test_register_duplicate_username_returns_400() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_create_account()
            .once()
            .return_once(|_, _| Err(AccountsServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/users/register")
            .json(&json!({ "username": "ada", "password": "hunter22" }))
            .send(&make_service(accounts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_register_short_password_returns_400() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts.expect_create_account().once().return_once(|_, _| {
            let mut errors = FieldErrors::new();
            errors.push("password", "Ensure this field has at least 6 characters.");

            Err(AccountsServiceError::Validation(errors))
        });

        let res = TestClient::post("http://example.com/users/register")
            .json(&json!({ "username": "ada", "password": "123" }))
            .send(&make_service(accounts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_register_missing_fields_returns_400() -> TestResult {
        let res = TestClient::post("http://example.com/users/register")
            .json(&json!({ "email": "ada@example.com" }))
            .send(&make_service(MockAccountsService::new()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
