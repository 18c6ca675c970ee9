use utoipa::OpenApi;

use crate::handlers::api;
use crate::models::{ContentListResponse, ContentRecord, ContentResponse, ContentType, ErrorResponse};

#[derive(OpenApi)]
#[openapi(
    paths(api::list_contents, api::get_content),
    components(schemas(
        ContentRecord,
        ContentType,
        ContentListResponse,
        ContentResponse,
        ErrorResponse
    )),
    tags((name = "contents", description = "Read-only access to website content"))
)]
pub struct ApiDoc;

pub fn openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
