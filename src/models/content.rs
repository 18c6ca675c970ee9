use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Stored in place of an image whose upload was deleted.
pub const PLACEHOLDER_PATH: &str = "/assets/placeholder.png";

pub const MAX_KEY_CHARS: usize = 50;
pub const MAX_VALUE_CHARS: usize = 5000;

/// Keys that render as part of the hero/carousel section of the home page.
pub const HERO_IMAGE_KEY: &str = "HeroImage";
pub const CAROUSEL_KEY_PREFIX: &str = "Carousel";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ContentType {
    Text,
    Image,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "Text",
            ContentType::Image => "Image",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("text") {
            Ok(ContentType::Text)
        } else if trimmed.eq_ignore_ascii_case("image") {
            Ok(ContentType::Image)
        } else {
            Err(format!("unknown content type '{}'", trimmed))
        }
    }
}

/// One editable piece of site content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContentRecord {
    pub id: i64,
    pub key: String,
    pub value: String,
    pub content_type: ContentType,
}

impl ContentRecord {
    pub fn is_image(&self) -> bool {
        self.content_type == ContentType::Image
    }

    pub fn is_placeholder(&self) -> bool {
        self.value == PLACEHOLDER_PATH
    }
}

/// A validated record that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContent {
    pub key: String,
    pub value: String,
    pub content_type: ContentType,
}

/// Row shape of the `WebsiteContents` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContentRow {
    pub id: i64,
    pub content_key: String,
    pub content_value: String,
    pub content_type: String,
}

impl TryFrom<ContentRow> for ContentRecord {
    type Error = String;

    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        let content_type = row
            .content_type
            .parse::<ContentType>()
            .map_err(|e| format!("row {}: {}", row.id, e))?;

        Ok(Self {
            id: row.id,
            key: row.content_key,
            value: row.content_value,
            content_type,
        })
    }
}

/// Raw field values as submitted by the admin forms.
#[derive(Debug, Clone, Default)]
pub struct ContentInput {
    pub id: Option<i64>,
    pub key: String,
    pub content_type: String,
    pub value: String,
}

/// An uploaded file as read off the multipart stream.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteAction {
    Removed,
    ReplacedWithPlaceholder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub action: DeleteAction,
    pub dependents_replaced: u64,
}
