use actix_web::{web, HttpResponse, Result};

use crate::models::{ContentListResponse, ContentResponse, ErrorResponse, ServiceError};
use crate::services::ContentService;

#[utoipa::path(
    get,
    path = "/api/contents",
    responses(
        (status = 200, description = "All content records", body = ContentListResponse),
        (status = 500, description = "Content store unavailable", body = ErrorResponse)
    )
)]
pub async fn list_contents(
    content_service: web::Data<ContentService>,
) -> Result<HttpResponse, ServiceError> {
    let contents = content_service.list().await?;

    Ok(HttpResponse::Ok().json(ContentListResponse {
        success: true,
        contents,
    }))
}

#[utoipa::path(
    get,
    path = "/api/contents/{id}",
    params(
        ("id" = i64, Path, description = "Content ID")
    ),
    responses(
        (status = 200, description = "Content record found", body = ContentResponse),
        (status = 404, description = "Content not found", body = ErrorResponse)
    )
)]
pub async fn get_content(
    content_service: web::Data<ContentService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ServiceError> {
    let content = content_service.get(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ContentResponse {
        success: true,
        content,
    }))
}
