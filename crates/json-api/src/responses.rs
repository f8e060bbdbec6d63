//! Shared response bodies.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

/// Human-readable outcome of an operation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MessageResponse {
    /// Outcome message
    pub message: String,
}

impl MessageResponse {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
