//! View Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shop_app::domain::carts::records::CartRecord;

use crate::{
    cart::{CartLineResponse, errors::into_status_error},
    extensions::*,
    state::State,
};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// Absent until the first item is added
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Uuid>,

    pub items: Vec<CartLineResponse>,

    /// Decimal sum of line subtotals
    pub total_amount: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CartResponse {
    fn empty(uuid: Option<Uuid>) -> Self {
        Self {
            uuid,
            items: Vec::new(),
            total_amount: format_money(rust_decimal::Decimal::ZERO),
            detail: Some("Cart is empty.".to_string()),
        }
    }
}

impl From<Option<CartRecord>> for CartResponse {
    fn from(cart: Option<CartRecord>) -> Self {
        match cart {
            None => Self::empty(None),
            Some(cart) if cart.is_empty() => Self::empty(Some(cart.uuid.into_uuid())),
            Some(cart) => Self {
                uuid: Some(cart.uuid.into_uuid()),
                total_amount: format_money(cart.total),
                items: cart.lines.into_iter().map(Into::into).collect(),
                detail: None,
            },
        }
    }
}

/// View Cart Handler
#[endpoint(
    tags("cart"),
    summary = "View Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart, or an empty-cart notice"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let cart = state
        .app
        .carts
        .view_cart(principal.user_uuid())
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
