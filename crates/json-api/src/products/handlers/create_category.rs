//! Create Category Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use shop_app::domain::catalog::{data::NewCategory, records::CategoryUuid};

use crate::{
    extensions::*,
    products::{categories::CategoryResponse, errors::into_status_error},
    state::State,
};

/// Create Category Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCategoryRequest {
    pub name: String,

    #[serde(default)]
    pub description: String,
}

impl From<CreateCategoryRequest> for NewCategory {
    fn from(request: CreateCategoryRequest) -> Self {
        NewCategory {
            uuid: CategoryUuid::new(),
            name: request.name,
            description: request.description,
        }
    }
}

/// Create Category Handler
#[endpoint(
    tags("products"),
    summary = "Create Category",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Category created"),
        (status_code = StatusCode::CONFLICT, description = "Category already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Caller is not an administrator"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "products.create_category", skip(json, depot, res), err)]
pub(crate) async fn handler(
    json: JsonBody<CreateCategoryRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CategoryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.administrator_or_403()?;

    let category = state
        .app
        .catalog
        .create_category(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    tracing::info!(category_uuid = %category.uuid, "created category");

    res.status_code(StatusCode::CREATED);

    Ok(Json(category.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use shop_app::domain::catalog::{
        CatalogServiceError, MockCatalogService, records::CategoryRecord,
    };

    use crate::test_helpers::{Mocks, administrator_service, customer_service};

    use super::*;

    fn route() -> Router {
        Router::with_path("products/categories").post(handler)
    }

    fn mocks(catalog: MockCatalogService) -> Mocks {
        Mocks {
            catalog: Some(catalog),
            ..Mocks::default()
        }
    }

    #[tokio::test]
    async fn test_create_category_returns_201() -> TestResult {
        let mut catalog = MockCatalogService::new();

        catalog
            .expect_create_category()
            .once()
            .withf(|new| new.name == "Kitchen")
            .return_once(|new| {
                Ok(CategoryRecord {
                    uuid: new.uuid,
                    name: new.name,
                    description: new.description,
                    created_at: Timestamp::UNIX_EPOCH,
                })
            });

        let res = TestClient::post("http://example.com/products/categories")
            .json(&json!({ "name": "Kitchen" }))
            .send(&administrator_service(mocks(catalog), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_category_returns_409() -> TestResult {
        let mut catalog = MockCatalogService::new();

        catalog
            .expect_create_category()
            .once()
            .return_once(|_| Err(CatalogServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/products/categories")
            .json(&json!({ "name": "Kitchen" }))
            .send(&administrator_service(mocks(catalog), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_cannot_create_category() -> TestResult {
        let res = TestClient::post("http://example.com/products/categories")
            .json(&json!({ "name": "Kitchen" }))
            .send(&customer_service(Mocks::default(), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
