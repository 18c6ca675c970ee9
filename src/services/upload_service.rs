use crate::models::{ServiceError, UploadedFile};
use async_trait::async_trait;
use std::path::PathBuf;

/// Public URL prefix under which stored uploads are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Cap on the sanitized original name; the uuid prefix adds 33 more bytes.
const MAX_SANITIZED_NAME_LEN: usize = 100;
/// Longest extension (including the dot) kept when a name is shortened.
const MAX_EXTENSION_LEN: usize = 16;

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Stores the file and returns the public path to record in the content value.
    async fn store(&self, file: &UploadedFile) -> Result<String, ServiceError>;

    /// Largest accepted upload, in bytes.
    fn max_file_size(&self) -> usize;
}

pub struct LocalFileStorage {
    root: PathBuf,
    max_file_size: usize,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>, max_file_size: usize) -> Self {
        Self {
            root: root.into(),
            max_file_size,
        }
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store(&self, file: &UploadedFile) -> Result<String, ServiceError> {
        if file.bytes.len() > self.max_file_size {
            return Err(ServiceError::validation("file", "file too large"));
        }

        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            ServiceError::UploadError(format!(
                "Failed to create uploads directory {}: {}",
                self.root.display(),
                e
            ))
        })?;

        let file_name = unique_file_name(&file.file_name);
        let target = self.root.join(&file_name);

        tokio::fs::write(&target, &file.bytes).await.map_err(|e| {
            ServiceError::UploadError(format!("Failed to write {}: {}", target.display(), e))
        })?;

        tracing::info!("Stored upload {} ({} bytes)", target.display(), file.bytes.len());
        Ok(format!("{}/{}", UPLOADS_URL_PREFIX, file_name))
    }

    fn max_file_size(&self) -> usize {
        self.max_file_size
    }
}

/// `<random token>_<sanitized original name>`
pub fn unique_file_name(original: &str) -> String {
    format!(
        "{}_{}",
        uuid::Uuid::new_v4().simple(),
        sanitize_file_name(original)
    )
}

/// Keeps only the last path component, maps anything outside `[A-Za-z0-9._-]` to `_`
/// and shortens long names while keeping their extension.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        return "upload".to_string();
    }

    truncate_keeping_extension(cleaned, MAX_SANITIZED_NAME_LEN)
}

// Input is ASCII after sanitizing, so byte offsets are char boundaries.
fn truncate_keeping_extension(name: &str, max_len: usize) -> String {
    if name.len() <= max_len {
        return name.to_string();
    }

    let extension = match name.rfind('.') {
        Some(dot) if name.len() - dot <= MAX_EXTENSION_LEN => &name[dot..],
        _ => "",
    };
    let stem = &name[..max_len - extension.len()];
    format!("{}{}", stem, extension)
}
