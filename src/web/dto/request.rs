//! Request DTOs for the vimi web API.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Compose message request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ComposeMessageRequest {
    /// Comma separated recipient usernames.
    #[validate(length(min = 1, message = "At least one recipient is required"))]
    #[schema(example = "bob, carol")]
    pub recipients: String,
    /// Message title.
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title must be between 1 and 255 characters"
    ))]
    pub title: String,
    /// Message body.
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}
