use crate::models::{
    ContentInput, ContentRecord, ContentType, DeleteAction, DeleteOutcome, NewContent,
    ServiceError, UploadedFile, MAX_KEY_CHARS, MAX_VALUE_CHARS,
};
use crate::repositories::ContentRepository;
use crate::services::FileStorage;
use std::sync::Arc;

pub struct ContentService {
    repository: Arc<dyn ContentRepository>,
    storage: Arc<dyn FileStorage>,
}

impl ContentService {
    pub fn new(repository: Arc<dyn ContentRepository>, storage: Arc<dyn FileStorage>) -> Self {
        Self {
            repository,
            storage,
        }
    }

    pub fn max_upload_size(&self) -> usize {
        self.storage.max_file_size()
    }

    pub async fn list(&self) -> Result<Vec<ContentRecord>, ServiceError> {
        self.repository.find_all().await
    }

    pub async fn get(&self, id: i64) -> Result<ContentRecord, ServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(id))
    }

    pub async fn create(
        &self,
        input: ContentInput,
        file: Option<UploadedFile>,
    ) -> Result<ContentRecord, ServiceError> {
        let content_type = parse_content_type(&input.content_type)?;
        let key = validate_key(&input.key)?;
        let file = file.filter(|f| !f.is_empty());

        let value = match content_type {
            ContentType::Image => {
                let file = file.ok_or_else(|| ServiceError::validation("file", "file required"))?;
                self.storage.store(&file).await?
            }
            ContentType::Text => validate_text_value(input.value)?,
        };

        let record = self
            .repository
            .insert(&NewContent {
                key,
                value,
                content_type,
            })
            .await?;

        tracing::info!(
            "Created content {} ({}, {})",
            record.id,
            record.key,
            record.content_type
        );
        Ok(record)
    }

    pub async fn update(
        &self,
        id: i64,
        input: ContentInput,
        file: Option<UploadedFile>,
    ) -> Result<ContentRecord, ServiceError> {
        if let Some(form_id) = input.id {
            if form_id != id {
                tracing::warn!("Edit of content {} submitted with mismatched id {}", id, form_id);
                return Err(ServiceError::not_found(id));
            }
        }

        let existing = self.get(id).await?;

        let content_type = parse_content_type(&input.content_type)?;
        let key = validate_key(&input.key)?;
        let file = file.filter(|f| !f.is_empty());

        let value = match (content_type, file) {
            (ContentType::Image, Some(file)) => self.storage.store(&file).await?,
            // Keep the image already on record when no new file is sent.
            (ContentType::Image, None) if existing.is_image() => existing.value.clone(),
            (ContentType::Image, None) => {
                return Err(ServiceError::validation("file", "file required"))
            }
            (ContentType::Text, _) => validate_text_value(input.value)?,
        };

        let updated = ContentRecord {
            id,
            key,
            value,
            content_type,
        };

        if !self.repository.update(&updated).await? {
            tracing::warn!("Content {} disappeared before it could be updated", id);
            return Err(ServiceError::not_found(id));
        }

        tracing::info!("Updated content {} ({})", id, updated.key);
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<DeleteOutcome, ServiceError> {
        let content = self.get(id).await?;

        tracing::info!(
            "Deleting content {} with key {} ({})",
            id,
            content.key,
            content.content_type
        );

        let action = if content.is_image() && !content.is_placeholder() {
            DeleteAction::ReplacedWithPlaceholder
        } else {
            DeleteAction::Removed
        };

        let dependents_replaced = match self.repository.apply_delete(&content, action).await? {
            Some(count) => count,
            None => {
                tracing::warn!("Content {} disappeared before it could be deleted", id);
                return Err(ServiceError::not_found(id));
            }
        };

        if dependents_replaced > 0 {
            tracing::info!(
                "Replaced {} hero/carousel item(s) sharing '{}' with the placeholder",
                dependents_replaced,
                content.value
            );
        }
        match action {
            DeleteAction::ReplacedWithPlaceholder => {
                tracing::info!("Content {} kept with placeholder image", id)
            }
            DeleteAction::Removed => tracing::info!("Content {} removed", id),
        }

        Ok(DeleteOutcome {
            action,
            dependents_replaced,
        })
    }
}

fn parse_content_type(raw: &str) -> Result<ContentType, ServiceError> {
    raw.parse::<ContentType>()
        .map_err(|_| ServiceError::validation("type", "invalid content type"))
}

fn validate_key(raw: &str) -> Result<String, ServiceError> {
    let key = raw.trim();
    if key.is_empty() {
        return Err(ServiceError::validation("key", "key required"));
    }
    if key.chars().count() > MAX_KEY_CHARS {
        return Err(ServiceError::validation(
            "key",
            format!("key must be at most {} characters", MAX_KEY_CHARS),
        ));
    }
    Ok(key.to_string())
}

fn validate_text_value(value: String) -> Result<String, ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::validation("value", "value required"));
    }
    if value.chars().count() > MAX_VALUE_CHARS {
        return Err(ServiceError::validation(
            "value",
            format!("value must be at most {} characters", MAX_VALUE_CHARS),
        ));
    }
    Ok(value)
}
