use crate::models::content::ContentRecord;
use serde::Serialize;
use utoipa::ToSchema;

// =============================================================================
// RESPONSE TYPES
// =============================================================================

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct ContentListResponse {
    pub success: bool,
    pub contents: Vec<ContentRecord>,
}

#[derive(Serialize, ToSchema)]
pub struct ContentResponse {
    pub success: bool,
    pub content: ContentRecord,
}
