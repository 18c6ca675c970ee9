use actix_multipart::{Field, Multipart};
use futures::TryStreamExt;

use crate::models::{ContentInput, ServiceError, UploadedFile};

/// Upper bound for the plain text fields of the content form.
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// A parsed content form. Field-level problems found while reading the stream are
/// reported through `error` so the form can be shown again with what was submitted.
pub struct ContentForm {
    pub input: ContentInput,
    pub file: Option<UploadedFile>,
    pub error: Option<ServiceError>,
}

pub async fn read_content_form(
    mut payload: Multipart,
    max_file_size: usize,
) -> Result<ContentForm, ServiceError> {
    let mut form = ContentForm {
        input: ContentInput::default(),
        file: None,
        error: None,
    };

    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        let (name, file_name) = match field.content_disposition() {
            Some(disposition) => (
                disposition.get_name().unwrap_or_default().to_string(),
                disposition.get_filename().map(str::to_string),
            ),
            None => (String::new(), None),
        };

        match name.as_str() {
            "file" => {
                let bytes = read_field(&mut field, max_file_size).await?;
                match bytes {
                    Some(bytes) => {
                        let file_name = file_name.unwrap_or_default();
                        // Browsers send an empty part when no file was chosen.
                        if !(bytes.is_empty() && file_name.is_empty()) {
                            form.file = Some(UploadedFile { file_name, bytes });
                        }
                    }
                    None => record_error(&mut form, ServiceError::validation("file", "file too large")),
                }
            }
            "id" | "key" | "type" | "value" => {
                let text = match read_field(&mut field, MAX_TEXT_FIELD_BYTES).await? {
                    Some(bytes) => match String::from_utf8(bytes) {
                        Ok(text) => text,
                        Err(_) => {
                            record_error(&mut form, ServiceError::validation(&name, "must be valid UTF-8"));
                            continue;
                        }
                    },
                    None => {
                        record_error(&mut form, ServiceError::validation(&name, "field too large"));
                        continue;
                    }
                };
                apply_text_field(&mut form, &name, text);
            }
            other => {
                tracing::debug!("Ignoring unexpected form field '{}'", other);
                read_field(&mut field, 0).await?;
            }
        }
    }

    Ok(form)
}

fn apply_text_field(form: &mut ContentForm, name: &str, text: String) {
    match name {
        "id" => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return;
            }
            match trimmed.parse::<i64>() {
                Ok(id) => form.input.id = Some(id),
                Err(_) => record_error(form, ServiceError::validation("id", "invalid id")),
            }
        }
        "key" => form.input.key = text,
        "type" => form.input.content_type = text,
        "value" => form.input.value = text,
        _ => {}
    }
}

fn record_error(form: &mut ContentForm, error: ServiceError) {
    if form.error.is_none() {
        form.error = Some(error);
    }
}

/// Reads the whole field. Returns `None` once it exceeds `limit`; the rest of the field
/// is drained so the following parts can still be read.
async fn read_field(field: &mut Field, limit: usize) -> Result<Option<Vec<u8>>, ServiceError> {
    let mut data = Vec::new();
    let mut too_large = false;

    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        if too_large {
            continue;
        }
        if data.len() + chunk.len() > limit {
            too_large = true;
            data.clear();
            continue;
        }
        data.extend_from_slice(&chunk);
    }

    Ok(if too_large { None } else { Some(data) })
}

fn malformed(err: actix_multipart::MultipartError) -> ServiceError {
    tracing::warn!("Malformed multipart form: {}", err);
    ServiceError::validation("form", "malformed form data")
}
