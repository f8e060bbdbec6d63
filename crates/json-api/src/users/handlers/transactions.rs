//! Transaction History Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shop_app::domain::accounts::records::LedgerEntryRecord;

use crate::{extensions::*, state::State, users::errors::into_status_error};

/// Ledger Entry Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TransactionResponse {
    pub uuid: Uuid,

    /// Signed decimal amount; withdrawals are negative
    pub amount: String,

    /// `DEPOSIT`, `WITHDRAWAL` or `REFUND`
    pub transaction_type: String,

    pub description: String,
    pub created_at: String,
}

impl From<LedgerEntryRecord> for TransactionResponse {
    fn from(entry: LedgerEntryRecord) -> Self {
        Self {
            uuid: entry.uuid.into_uuid(),
            amount: format_money(entry.amount),
            transaction_type: entry.kind.to_string(),
            description: entry.description,
            created_at: entry.created_at.to_string(),
        }
    }
}

/// Transaction History Handler
///
/// Returns the caller's ledger, newest first.
#[endpoint(
    tags("users"),
    summary = "Transaction History",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Ledger entries"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Vec<TransactionResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let entries = state
        .app
        .accounts
        .list_transactions(principal.user_uuid())
        .await
        .map_err(into_status_error)?;

    Ok(Json(entries.into_iter().map(Into::into).collect()))
}
