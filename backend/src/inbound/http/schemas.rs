//! Shared OpenAPI schema types for error responses.

use serde::Serialize;
use utoipa::ToSchema;

/// JSON envelope returned for every failed request.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "conflict")]
    pub code: String,
    /// Human-readable explanation.
    #[schema(example = "illegal transition ACCEPTED -> ACCEPTED")]
    pub message: String,
    /// Optional structured context (field names, offending values).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
