use actix_multipart::Multipart;
use actix_web::{http::header, http::StatusCode, web, HttpResponse};
use askama::Template;

use crate::handlers::forms::{read_content_form, ContentForm};
use crate::handlers::{error_page, render};
use crate::models::{ContentInput, ContentRecord, ServiceError};
use crate::services::ContentService;

const ADMIN_INDEX: &str = "/admin";

#[derive(Template)]
#[template(path = "admin/index.html")]
pub struct AdminIndexPage {
    pub contents: Vec<ContentRecord>,
}

/// Per-field messages shown next to the inputs; empty means no error.
#[derive(Default)]
pub struct FieldErrors {
    pub key: String,
    pub content_type: String,
    pub value: String,
    pub file: String,
    pub general: String,
}

impl FieldErrors {
    fn from_error(error: &ServiceError) -> Self {
        let mut errors = FieldErrors::default();
        match error {
            ServiceError::ValidationError { field, message } => match field.as_str() {
                "key" => errors.key = message.clone(),
                "type" => errors.content_type = message.clone(),
                "value" => errors.value = message.clone(),
                "file" => errors.file = message.clone(),
                _ => errors.general = message.clone(),
            },
            _ => errors.general = "An error occurred while saving the content.".to_string(),
        }
        errors
    }
}

#[derive(Template)]
#[template(path = "admin/form.html")]
pub struct ContentFormPage {
    pub heading: String,
    pub action: String,
    pub id: String,
    pub key: String,
    pub content_type: String,
    pub value: String,
    pub current_image: String,
    pub errors: FieldErrors,
}

impl ContentFormPage {
    fn for_create(input: &ContentInput, errors: FieldErrors) -> Self {
        Self {
            heading: "Create content".to_string(),
            action: "/admin/create".to_string(),
            id: String::new(),
            key: input.key.clone(),
            content_type: input.content_type.clone(),
            value: input.value.clone(),
            current_image: String::new(),
            errors,
        }
    }

    fn for_edit(id: i64, input: &ContentInput, current_image: String, errors: FieldErrors) -> Self {
        Self {
            heading: format!("Edit content #{}", id),
            action: format!("/admin/edit/{}", id),
            id: id.to_string(),
            key: input.key.clone(),
            content_type: input.content_type.clone(),
            value: input.value.clone(),
            current_image,
            errors,
        }
    }
}

#[derive(Template)]
#[template(path = "admin/delete.html")]
pub struct DeleteConfirmPage {
    pub content: ContentRecord,
    pub error: String,
}

fn redirect_to_index() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, ADMIN_INDEX))
        .finish()
}

fn not_found_page(id: i64) -> HttpResponse {
    error_page(
        StatusCode::NOT_FOUND,
        "Not found",
        &format!("Content {} does not exist.", id),
    )
}

fn failure_status(error: &ServiceError) -> StatusCode {
    match error {
        ServiceError::ValidationError { .. } => StatusCode::BAD_REQUEST,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn input_from_record(record: &ContentRecord) -> ContentInput {
    ContentInput {
        id: Some(record.id),
        key: record.key.clone(),
        content_type: record.content_type.to_string(),
        value: if record.is_image() {
            String::new()
        } else {
            record.value.clone()
        },
    }
}

pub async fn admin_index(content_service: web::Data<ContentService>) -> HttpResponse {
    match content_service.list().await {
        Ok(contents) => render(StatusCode::OK, &AdminIndexPage { contents }),
        Err(e) => {
            tracing::error!("Error loading content: {}", e);
            error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error",
                "An error occurred while loading content.",
            )
        }
    }
}

pub async fn create_form() -> HttpResponse {
    let input = ContentInput {
        content_type: "Text".to_string(),
        ..ContentInput::default()
    };
    render(
        StatusCode::OK,
        &ContentFormPage::for_create(&input, FieldErrors::default()),
    )
}

pub async fn create(
    content_service: web::Data<ContentService>,
    payload: Multipart,
) -> HttpResponse {
    let ContentForm { input, file, error } =
        match read_content_form(payload, content_service.max_upload_size()).await {
            Ok(form) => form,
            Err(e) => {
                return render(
                    StatusCode::BAD_REQUEST,
                    &ContentFormPage::for_create(&ContentInput::default(), FieldErrors::from_error(&e)),
                )
            }
        };

    if let Some(e) = error {
        return render(
            failure_status(&e),
            &ContentFormPage::for_create(&input, FieldErrors::from_error(&e)),
        );
    }

    match content_service.create(input.clone(), file).await {
        Ok(_) => redirect_to_index(),
        Err(e) => {
            if !matches!(e, ServiceError::ValidationError { .. }) {
                tracing::error!("Error creating content: {}", e);
            }
            render(
                failure_status(&e),
                &ContentFormPage::for_create(&input, FieldErrors::from_error(&e)),
            )
        }
    }
}

pub async fn edit_form(
    content_service: web::Data<ContentService>,
    path: web::Path<i64>,
) -> HttpResponse {
    let id = path.into_inner();

    match content_service.get(id).await {
        Ok(record) => {
            let current_image = if record.is_image() {
                record.value.clone()
            } else {
                String::new()
            };
            render(
                StatusCode::OK,
                &ContentFormPage::for_edit(
                    id,
                    &input_from_record(&record),
                    current_image,
                    FieldErrors::default(),
                ),
            )
        }
        Err(ServiceError::NotFound(_)) => {
            tracing::warn!("Edit action: content with id {} not found", id);
            not_found_page(id)
        }
        Err(e) => {
            tracing::error!("Error loading content {}: {}", id, e);
            error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error",
                "An error occurred while loading content.",
            )
        }
    }
}

pub async fn edit(
    content_service: web::Data<ContentService>,
    path: web::Path<i64>,
    payload: Multipart,
) -> HttpResponse {
    let id = path.into_inner();

    // Existing image is shown again when the form has to be re-rendered.
    let current_image = match content_service.get(id).await {
        Ok(record) if record.is_image() => record.value,
        Ok(_) => String::new(),
        Err(ServiceError::NotFound(_)) => return not_found_page(id),
        Err(e) => {
            tracing::error!("Error loading content {}: {}", id, e);
            return error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error",
                "An error occurred while loading content.",
            );
        }
    };

    let ContentForm { input, file, error } =
        match read_content_form(payload, content_service.max_upload_size()).await {
            Ok(form) => form,
            Err(e) => {
                return render(
                    StatusCode::BAD_REQUEST,
                    &ContentFormPage::for_edit(
                        id,
                        &ContentInput::default(),
                        current_image,
                        FieldErrors::from_error(&e),
                    ),
                )
            }
        };

    if let Some(e) = error {
        return render(
            failure_status(&e),
            &ContentFormPage::for_edit(id, &input, current_image, FieldErrors::from_error(&e)),
        );
    }

    match content_service.update(id, input.clone(), file).await {
        Ok(_) => redirect_to_index(),
        Err(ServiceError::NotFound(_)) => not_found_page(id),
        Err(e) => {
            if !matches!(e, ServiceError::ValidationError { .. }) {
                tracing::error!("Error editing content {}: {}", id, e);
            }
            render(
                failure_status(&e),
                &ContentFormPage::for_edit(id, &input, current_image, FieldErrors::from_error(&e)),
            )
        }
    }
}

pub async fn delete_confirm(
    content_service: web::Data<ContentService>,
    path: web::Path<i64>,
) -> HttpResponse {
    let id = path.into_inner();

    match content_service.get(id).await {
        Ok(content) => render(
            StatusCode::OK,
            &DeleteConfirmPage {
                content,
                error: String::new(),
            },
        ),
        Err(ServiceError::NotFound(_)) => not_found_page(id),
        Err(e) => {
            tracing::error!("Error loading content {}: {}", id, e);
            error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error",
                "An error occurred while loading content.",
            )
        }
    }
}

pub async fn delete(
    content_service: web::Data<ContentService>,
    path: web::Path<i64>,
) -> HttpResponse {
    let id = path.into_inner();

    match content_service.delete(id).await {
        Ok(_) => redirect_to_index(),
        Err(ServiceError::NotFound(_)) => {
            tracing::warn!("Delete action: content with id {} not found", id);
            not_found_page(id)
        }
        Err(e) => {
            tracing::error!("Error deleting content {}: {}", id, e);
            match content_service.get(id).await {
                Ok(content) => render(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &DeleteConfirmPage {
                        content,
                        error: "An error occurred while deleting the content.".to_string(),
                    },
                ),
                Err(_) => error_page(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error",
                    "An error occurred while deleting the content.",
                ),
            }
        }
    }
}
