//! Profile Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shop_app::domain::accounts::records::ProfileRecord;

use crate::{extensions::*, state::State, users::errors::into_status_error};

/// Profile Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProfileResponse {
    pub uuid: Uuid,
    pub username: String,
    pub email: String,
    pub is_admin: bool,

    /// Decimal balance; absent for administrators
    pub balance: Option<String>,
}

impl From<ProfileRecord> for ProfileResponse {
    fn from(profile: ProfileRecord) -> Self {
        Self {
            uuid: profile.user.uuid.into_uuid(),
            username: profile.user.username,
            email: profile.user.email,
            is_admin: profile.user.is_staff,
            balance: profile.balance.map(format_money),
        }
    }
}

/// Profile Handler
///
/// Returns the caller's account, including their balance.
#[endpoint(
    tags("users"),
    summary = "Get Profile",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Profile"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ProfileResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let profile = state
        .app
        .accounts
        .get_profile(principal.user_uuid())
        .await
        .map_err(into_status_error)?;

    Ok(Json(profile.into()))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use shop_app::domain::accounts::{AccountsServiceError, MockAccountsService};

    use crate::test_helpers::{
        Mocks, TEST_USER_UUID, administrator_service, anonymous_service, customer_service,
    };

    use super::{super::tests::make_user, *};

    fn route() -> Router {
        Router::with_path("users/profile").get(handler)
    }

    fn mocks(accounts: MockAccountsService) -> Mocks {
        Mocks {
            accounts: Some(accounts),
            ..Mocks::default()
        }
    }

    #[tokio::test]
    async fn test_customer_profile_includes_balance() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_get_profile()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(|user| {
                Ok(ProfileRecord {
                    user: make_user(user, "ada", false),
                    balance: Some(dec!(100)),
                })
            });

        let mut res = TestClient::get("http://example.com/users/profile")
            .send(&customer_service(mocks(accounts), route()))
            .await;

        let body: ProfileResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.username, "ada");
        assert!(!body.is_admin, "customer should not be an admin");
        assert_eq!(body.balance.as_deref(), Some("100.00"));

        Ok(())
    }

    #[tokio::test]
    async fn test_administrator_profile_has_no_balance() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts.expect_get_profile().once().return_once(|user| {
            Ok(ProfileRecord {
                user: make_user(user, "root", true),
                balance: None,
            })
        });

        let body: ProfileResponse = TestClient::get("http://example.com/users/profile")
            .send(&administrator_service(mocks(accounts), route()))
            .await
            .take_json()
            .await?;

        assert!(body.is_admin, "administrator should be an admin");
        assert_eq!(body.balance, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_deleted_account_returns_404() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_get_profile()
            .once()
            .return_once(|_| Err(AccountsServiceError::NotFound));

        let res = TestClient::get("http://example.com/users/profile")
            .send(&customer_service(mocks(accounts), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_anonymous_profile_returns_401() -> TestResult {
        let res = TestClient::get("http://example.com/users/profile")
            .send(&anonymous_service(Mocks::default(), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
