use crate::models::{
    ContentRecord, ContentRow, DeleteAction, NewContent, ServiceError, CAROUSEL_KEY_PREFIX,
    HERO_IMAGE_KEY, PLACEHOLDER_PATH,
};
use async_trait::async_trait;
use sqlx::SqlitePool;

#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<ContentRecord>, ServiceError>;
    async fn find_all(&self) -> Result<Vec<ContentRecord>, ServiceError>;
    async fn count(&self) -> Result<i64, ServiceError>;
    async fn insert(&self, content: &NewContent) -> Result<ContentRecord, ServiceError>;
    /// Returns `false` when no row with the record's id exists anymore.
    async fn update(&self, content: &ContentRecord) -> Result<bool, ServiceError>;
    /// Deletes `content` in one transaction: every other hero/carousel record sharing its
    /// value is pointed at the placeholder, then the row itself is rewritten or removed
    /// according to `action`.
    ///
    /// Returns the number of dependents rewritten, or `None` (nothing committed) when the
    /// row no longer exists.
    async fn apply_delete(
        &self,
        content: &ContentRecord,
        action: DeleteAction,
    ) -> Result<Option<u64>, ServiceError>;
}

const SELECT_COLUMNS: &str = "SELECT Id AS id, ContentKey AS content_key, ContentValue AS content_value, ContentType AS content_type FROM WebsiteContents";

pub struct SqliteContentRepository {
    pool: SqlitePool,
}

impl SqliteContentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn into_record(row: ContentRow) -> Result<ContentRecord, ServiceError> {
    ContentRecord::try_from(row).map_err(ServiceError::DatabaseError)
}

#[async_trait]
impl ContentRepository for SqliteContentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<ContentRecord>, ServiceError> {
        let row = sqlx::query_as::<_, ContentRow>(&format!("{} WHERE Id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(into_record).transpose()
    }

    async fn find_all(&self) -> Result<Vec<ContentRecord>, ServiceError> {
        let rows = sqlx::query_as::<_, ContentRow>(&format!("{} ORDER BY Id", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(into_record).collect()
    }

    async fn count(&self) -> Result<i64, ServiceError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM WebsiteContents")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn insert(&self, content: &NewContent) -> Result<ContentRecord, ServiceError> {
        let result = sqlx::query(
            "INSERT INTO WebsiteContents (ContentKey, ContentValue, ContentType) VALUES (?, ?, ?)",
        )
        .bind(&content.key)
        .bind(&content.value)
        .bind(content.content_type.as_str())
        .execute(&self.pool)
        .await?;

        Ok(ContentRecord {
            id: result.last_insert_rowid(),
            key: content.key.clone(),
            value: content.value.clone(),
            content_type: content.content_type,
        })
    }

    async fn update(&self, content: &ContentRecord) -> Result<bool, ServiceError> {
        let result = sqlx::query(
            "UPDATE WebsiteContents SET ContentKey = ?, ContentValue = ?, ContentType = ? WHERE Id = ?",
        )
        .bind(&content.key)
        .bind(&content.value)
        .bind(content.content_type.as_str())
        .bind(content.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn apply_delete(
        &self,
        content: &ContentRecord,
        action: DeleteAction,
    ) -> Result<Option<u64>, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let dependents_replaced = if content.is_placeholder() {
            0
        } else {
            // GLOB is case-sensitive, LIKE is not.
            sqlx::query(
                "UPDATE WebsiteContents SET ContentValue = ? \
                 WHERE Id != ? AND ContentValue = ? \
                 AND (ContentKey = ? OR ContentKey GLOB ?)",
            )
            .bind(PLACEHOLDER_PATH)
            .bind(content.id)
            .bind(&content.value)
            .bind(HERO_IMAGE_KEY)
            .bind(format!("{}*", CAROUSEL_KEY_PREFIX))
            .execute(&mut *tx)
            .await?
            .rows_affected()
        };

        let target = match action {
            DeleteAction::ReplacedWithPlaceholder => {
                sqlx::query("UPDATE WebsiteContents SET ContentValue = ? WHERE Id = ?")
                    .bind(PLACEHOLDER_PATH)
                    .bind(content.id)
                    .execute(&mut *tx)
                    .await?
            }
            DeleteAction::Removed => {
                sqlx::query("DELETE FROM WebsiteContents WHERE Id = ?")
                    .bind(content.id)
                    .execute(&mut *tx)
                    .await?
            }
        };

        if target.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(dependents_replaced))
    }
}
