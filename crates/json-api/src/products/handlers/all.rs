//! All Products Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::ProductResponse},
    state::State,
};

/// All Products Handler
///
/// Returns every product, newest first, without pagination.
#[endpoint(tags("products"), summary = "List All Products")]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Vec<ProductResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let products = state
        .app
        .catalog
        .list_products()
        .await
        .map_err(into_status_error)?;

    Ok(Json(products.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use shop_app::domain::catalog::{MockCatalogService, records::ProductUuid};

    use crate::test_helpers::{Mocks, anonymous_service, make_product};

    use super::*;

    #[tokio::test]
    async fn test_all_products_keeps_service_order() -> TestResult {
        let newest = ProductUuid::new();
        let oldest = ProductUuid::new();

        let mut catalog = MockCatalogService::new();

        catalog.expect_list_products().once().return_once(move || {
            Ok(vec![
                make_product(newest, dec!(2), 1),
                make_product(oldest, dec!(1), 1),
            ])
        });

        let service = anonymous_service(
            Mocks {
                catalog: Some(catalog),
                ..Mocks::default()
            },
            Router::with_path("products/all").get(handler),
        );

        let body: Vec<ProductResponse> = TestClient::get("http://example.com/products/all")
            .send(&service)
            .await
            .take_json()
            .await?;

        let uuids = body.iter().map(|p| p.uuid).collect::<Vec<_>>();

        assert_eq!(uuids, [newest.into_uuid(), oldest.into_uuid()]);

        Ok(())
    }
}
