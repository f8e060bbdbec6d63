//! Category Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shop_app::domain::catalog::records::CategoryRecord;

use crate::{extensions::*, products::errors::into_status_error, state::State};

/// Category Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoryResponse {
    pub uuid: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: String,
}

impl From<CategoryRecord> for CategoryResponse {
    fn from(category: CategoryRecord) -> Self {
        Self {
            uuid: category.uuid.into_uuid(),
            name: category.name,
            description: category.description,
            created_at: category.created_at.to_string(),
        }
    }
}

/// Category Index Handler
///
/// Returns every category ordered by name.
#[endpoint(tags("products"), summary = "List Categories")]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Vec<CategoryResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let categories = state
        .app
        .catalog
        .list_categories()
        .await
        .map_err(into_status_error)?;

    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use shop_app::domain::catalog::{MockCatalogService, records::CategoryUuid};

    use crate::test_helpers::{Mocks, anonymous_service};

    use super::*;

    #[tokio::test]
    async fn test_categories_are_listed() -> TestResult {
        let mut catalog = MockCatalogService::new();

        catalog.expect_list_categories().once().return_once(|| {
            Ok(vec![CategoryRecord {
                uuid: CategoryUuid::new(),
                name: "Kitchen".to_string(),
                description: String::new(),
                created_at: Timestamp::UNIX_EPOCH,
            }])
        });

        let service = anonymous_service(
            Mocks {
                catalog: Some(catalog),
                ..Mocks::default()
            },
            Router::with_path("products").get(handler),
        );

        let body: Vec<CategoryResponse> = TestClient::get("http://example.com/products")
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(body.len(), 1, "expected one category");
        assert_eq!(body.first().map(|c| c.name.as_str()), Some("Kitchen"));

        Ok(())
    }
}
