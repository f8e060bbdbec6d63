//! Product Search Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shop_app::domain::catalog::query::{Page, ProductOrdering, ProductPage, ProductQuery};

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::ProductResponse},
    state::State,
};

/// Paginated Products Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductPageResponse {
    /// Size of the whole filtered result set
    pub count: u64,

    pub page: u32,
    pub page_size: u32,
    pub has_next: bool,
    pub has_previous: bool,
    pub results: Vec<ProductResponse>,
}

impl From<ProductPage> for ProductPageResponse {
    fn from(page: ProductPage) -> Self {
        Self {
            count: page.total,
            page: page.page.number(),
            page_size: page.page.size(),
            has_next: page.has_next(),
            has_previous: page.has_previous(),
            results: page.products.into_iter().map(Into::into).collect(),
        }
    }
}

/// Product Search Handler
///
/// Filters by search term, category and exact price. `ordering` takes
/// `name`, `price`, `stock` or `created_at`, prefixed with `-` for descending.
#[endpoint(
    tags("products"),
    summary = "Search Products",
    responses(
        (status_code = StatusCode::OK, description = "One page of products"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid filter"),
        (status_code = StatusCode::NOT_FOUND, description = "Invalid page"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.search",
    skip(search, category, price, ordering, page, page_size, depot),
    err
)]
pub(crate) async fn handler(
    search: QueryParam<String, false>,
    category: QueryParam<Uuid, false>,
    price: QueryParam<String, false>,
    ordering: QueryParam<String, false>,
    page: QueryParam<u32, false>,
    page_size: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<ProductPageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let query = ProductQuery {
        search: search.into_inner(),
        category: category.into_inner().map(Into::into),
        price: price
            .into_inner()
            .map(|price| parse_money("price", &price))
            .transpose()?,
        ordering: ordering
            .into_inner()
            .map(|ordering| ordering.parse::<ProductOrdering>())
            .transpose()
            .or_400("ordering: Select a valid ordering.")?
            .unwrap_or_default(),
        page: Page::new(page.into_inner(), page_size.into_inner())
            .map_err(|errors| validation_error(&errors))?,
    };

    let page = state
        .app
        .catalog
        .search_products(query)
        .await
        .map_err(into_status_error)?;

    Ok(Json(page.into()))
}
