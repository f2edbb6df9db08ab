//! Data models for the catalog

pub mod author;
pub mod book;
pub mod coerce;

// Re-export commonly used types
pub use author::{Author, AuthorPayload, NewAuthor};
pub use book::{Book, BookDraft, BookPayload, BookWithAuthor, NewBook};

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Result of a full-field replace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    /// Records whose id matched (0 or 1)
    pub matched: u64,
    /// Records whose stored fields actually changed (0 or 1)
    pub modified: u64,
}

/// Body returned after a successful create
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub message: String,
    pub id: Uuid,
}

/// Body returned after a successful update
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedResponse {
    pub message: String,
    pub modified_count: u64,
}

/// Body returned after a successful delete
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Parse a store identifier, reporting `message` when malformed
pub fn parse_id(raw: &str, message: &str) -> crate::AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| crate::AppError::InvalidId(message.to_string()))
}
