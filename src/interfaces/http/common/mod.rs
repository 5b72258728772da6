//! Shared HTTP building blocks: error body, extractors, links.

pub mod error;
pub mod links;
pub mod query;
pub mod validated_json;

pub use error::{AppError, AppResult};
pub use links::LinkDto;
pub use query::ResourceQuery;
pub use validated_json::ValidatedJson;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by every endpoint: `{"success": false, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    pub error: String,
}

impl ApiResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}
