use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use website_cms::{
    database::seed_if_empty,
    models::{
        ContentInput, ContentRecord, ContentType, DeleteAction, NewContent, ServiceError,
        UploadedFile, PLACEHOLDER_PATH,
    },
    repositories::{ContentRepository, SqliteContentRepository},
    services::{ContentService, FileStorage, LocalFileStorage},
};

mod common;
use common::TestApp;

struct FailingStorage;

#[async_trait]
impl FileStorage for FailingStorage {
    async fn store(&self, _file: &UploadedFile) -> Result<String, ServiceError> {
        Err(ServiceError::UploadError("disk full".to_string()))
    }

    fn max_file_size(&self) -> usize {
        1024
    }
}

fn input(key: &str, content_type: &str, value: &str) -> ContentInput {
    ContentInput {
        id: None,
        key: key.to_string(),
        content_type: content_type.to_string(),
        value: value.to_string(),
    }
}

fn png(name: &str) -> UploadedFile {
    UploadedFile {
        file_name: name.to_string(),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }
}

fn field_of(err: &ServiceError) -> &str {
    match err {
        ServiceError::ValidationError { field, .. } => field,
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[actix_web::test]
async fn test_create_text_assigns_new_id() {
    let test_app = TestApp::new().await;
    let service = test_app.content_service();

    let first = service
        .create(input("HeroTitle", "Text", "Welcome"), None)
        .await
        .unwrap();
    let second = service
        .create(input("HeroTitle", "Text", "Hello again"), None)
        .await
        .unwrap();

    assert_eq!(first.value, "Welcome");
    assert_eq!(first.content_type, ContentType::Text);
    assert_ne!(first.id, second.id);
    // Keys are not unique
    assert_eq!(service.list().await.unwrap().len(), 2);
}

#[actix_web::test]
async fn test_create_image_without_file_fails_on_file_field() {
    let test_app = TestApp::new().await;
    let service = test_app.content_service();

    let err = service
        .create(input("Banner", "Image", ""), None)
        .await
        .unwrap_err();
    assert_eq!(field_of(&err), "file");
}

#[actix_web::test]
async fn test_create_validates_type_and_key() {
    let test_app = TestApp::new().await;
    let service = test_app.content_service();

    let err = service
        .create(input("Banner", "Audio", "x"), None)
        .await
        .unwrap_err();
    assert_eq!(field_of(&err), "type");

    let err = service
        .create(input("  ", "Text", "x"), None)
        .await
        .unwrap_err();
    assert_eq!(field_of(&err), "key");

    let err = service
        .create(input(&"K".repeat(51), "Text", "x"), None)
        .await
        .unwrap_err();
    assert_eq!(field_of(&err), "key");

    let err = service
        .create(input("About", "Text", &"v".repeat(5001)), None)
        .await
        .unwrap_err();
    assert_eq!(field_of(&err), "value");

    assert!(service.list().await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_create_text_ignores_uploaded_file() {
    let test_app = TestApp::new().await;
    let service = test_app.content_service();

    let record = service
        .create(input("HeroTitle", "Text", "Welcome"), Some(png("a.png")))
        .await
        .unwrap();

    assert_eq!(record.value, "Welcome");
    assert!(test_app.uploaded_files().is_empty());
}

#[actix_web::test]
async fn test_upload_failure_is_reported_and_nothing_is_stored() {
    let test_app = TestApp::new().await;
    let service = ContentService::new(test_app.repository.clone(), Arc::new(FailingStorage));

    let err = service
        .create(input("Banner", "Image", ""), Some(png("banner.png")))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::UploadError(_)));
    assert!(test_app.all().await.is_empty());
}

#[actix_web::test]
async fn test_read_missing_is_not_found() {
    let test_app = TestApp::new().await;
    let service = test_app.content_service();

    let err = service.get(42).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[actix_web::test]
async fn test_update_image_keeps_value_without_new_file() {
    let test_app = TestApp::new().await;
    let service = test_app.content_service();
    let created = service
        .create(input("HeroImage", "Image", ""), Some(png("hero.png")))
        .await
        .unwrap();

    let updated = service
        .update(created.id, input("HeroImage", "Image", ""), None)
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.value, created.value);
}

#[actix_web::test]
async fn test_update_text_to_image_requires_file() {
    let test_app = TestApp::new().await;
    let service = test_app.content_service();
    let created = service
        .create(input("HeroTitle", "Text", "Welcome"), None)
        .await
        .unwrap();

    let err = service
        .update(created.id, input("HeroTitle", "Image", ""), None)
        .await
        .unwrap_err();
    assert_eq!(field_of(&err), "file");

    let updated = service
        .update(created.id, input("HeroTitle", "Image", ""), Some(png("title.png")))
        .await
        .unwrap();
    assert_eq!(updated.content_type, ContentType::Image);
    assert!(updated.value.starts_with("/uploads/"));
}

#[actix_web::test]
async fn test_update_missing_is_not_found() {
    let test_app = TestApp::new().await;
    let service = test_app.content_service();

    let err = service
        .update(7, input("HeroTitle", "Text", "Welcome"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[actix_web::test]
async fn test_delete_outcomes() {
    let test_app = TestApp::new().await;
    let service = test_app.content_service();

    let image = test_app
        .insert("Banner", "/uploads/x_banner.png", ContentType::Image)
        .await;

    let outcome = service.delete(image.id).await.unwrap();
    assert_eq!(outcome.action, DeleteAction::ReplacedWithPlaceholder);
    assert_eq!(test_app.find(image.id).await.unwrap().value, PLACEHOLDER_PATH);

    // A second delete removes the placeholder row
    let outcome = service.delete(image.id).await.unwrap();
    assert_eq!(outcome.action, DeleteAction::Removed);
    assert!(test_app.find(image.id).await.is_none());

    let err = service.delete(image.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[actix_web::test]
async fn test_delete_replaces_dependents_of_any_type() {
    let test_app = TestApp::new().await;
    let service = test_app.content_service();

    let shared = "/uploads/x_a.png";
    let gallery = test_app.insert("Gallery", shared, ContentType::Image).await;
    let caption = test_app
        .insert("CarouselCaption1", shared, ContentType::Text)
        .await;
    let slide = test_app
        .insert("CarouselItem1", shared, ContentType::Image)
        .await;
    let hero = test_app.insert("HeroImage", shared, ContentType::Image).await;
    let unrelated = test_app.insert("Footer", shared, ContentType::Text).await;

    let outcome = service.delete(gallery.id).await.unwrap();
    assert_eq!(outcome.action, DeleteAction::ReplacedWithPlaceholder);
    assert_eq!(outcome.dependents_replaced, 3);
    assert_eq!(test_app.find(caption.id).await.unwrap().value, PLACEHOLDER_PATH);
    assert_eq!(test_app.find(slide.id).await.unwrap().value, PLACEHOLDER_PATH);
    assert_eq!(test_app.find(hero.id).await.unwrap().value, PLACEHOLDER_PATH);
    assert_eq!(test_app.find(unrelated.id).await.unwrap().value, shared);
}

#[actix_web::test]
async fn test_delete_of_text_rewrites_matching_dependents() {
    let test_app = TestApp::new().await;
    let service = test_app.content_service();

    let text = test_app.insert("Tagline", "Explore", ContentType::Text).await;
    let caption = test_app
        .insert("CarouselCaption1", "Explore", ContentType::Text)
        .await;

    let outcome = service.delete(text.id).await.unwrap();
    assert_eq!(outcome.action, DeleteAction::Removed);
    assert_eq!(outcome.dependents_replaced, 1);
    assert!(test_app.find(text.id).await.is_none());
    assert_eq!(test_app.find(caption.id).await.unwrap().value, PLACEHOLDER_PATH);
}

/// Removes the target row right before the delete is applied, as a concurrent
/// request would.
struct VanishingRowRepository {
    inner: Arc<SqliteContentRepository>,
    pool: SqlitePool,
}

#[async_trait]
impl ContentRepository for VanishingRowRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<ContentRecord>, ServiceError> {
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<ContentRecord>, ServiceError> {
        self.inner.find_all().await
    }

    async fn count(&self) -> Result<i64, ServiceError> {
        self.inner.count().await
    }

    async fn insert(&self, content: &NewContent) -> Result<ContentRecord, ServiceError> {
        self.inner.insert(content).await
    }

    async fn update(&self, content: &ContentRecord) -> Result<bool, ServiceError> {
        self.inner.update(content).await
    }

    async fn apply_delete(
        &self,
        content: &ContentRecord,
        action: DeleteAction,
    ) -> Result<Option<u64>, ServiceError> {
        sqlx::query("DELETE FROM WebsiteContents WHERE Id = ?")
            .bind(content.id)
            .execute(&self.pool)
            .await?;
        self.inner.apply_delete(content, action).await
    }
}

#[actix_web::test]
async fn test_failed_delete_leaves_dependents_untouched() {
    let test_app = TestApp::new().await;
    let storage = Arc::new(LocalFileStorage::new(test_app.uploads_dir.clone(), 1024));
    let repository = Arc::new(VanishingRowRepository {
        inner: test_app.repository.clone(),
        pool: test_app.pool.clone(),
    });
    let service = ContentService::new(repository, storage);

    let shared = "/uploads/x_slide.png";
    let image = test_app.insert("Gallery", shared, ContentType::Image).await;
    let slide = test_app
        .insert("CarouselItem1", shared, ContentType::Image)
        .await;

    let err = service.delete(image.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(test_app.find(slide.id).await.unwrap().value, shared);
}

#[actix_web::test]
async fn test_apply_delete_on_missing_row_commits_nothing() {
    let test_app = TestApp::new().await;

    let shared = "/uploads/x_hero.png";
    let hero = test_app.insert("HeroImage", shared, ContentType::Image).await;
    let stale = ContentRecord {
        id: hero.id + 100,
        key: "Gallery".to_string(),
        value: shared.to_string(),
        content_type: ContentType::Text,
    };

    let result = test_app
        .repository
        .apply_delete(&stale, DeleteAction::Removed)
        .await
        .unwrap();

    assert_eq!(result, None);
    assert_eq!(test_app.find(hero.id).await.unwrap().value, shared);
}

#[actix_web::test]
async fn test_carousel_prefix_is_case_sensitive() {
    let test_app = TestApp::new().await;
    let service = test_app.content_service();

    let shared = "/uploads/x_slide.png";
    let deleted = test_app.insert("Gallery", shared, ContentType::Image).await;
    let lower = test_app.insert("carouselItem1", shared, ContentType::Image).await;

    let outcome = service.delete(deleted.id).await.unwrap();
    assert_eq!(outcome.dependents_replaced, 0);
    assert_eq!(test_app.find(lower.id).await.unwrap().value, shared);
}

#[actix_web::test]
async fn test_seed_inserts_three_records_once() {
    let test_app = TestApp::new().await;

    let inserted = seed_if_empty(test_app.repository.as_ref()).await.unwrap();
    assert_eq!(inserted, 3);

    let contents = test_app.all().await;
    let keys: Vec<_> = contents.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["HeroImage", "HeroTitle", "HeroButtonText"]);
    assert_eq!(contents[0].content_type, ContentType::Image);
    assert_eq!(contents[1].value, "Creating Exceptional Workspaces");

    let inserted = seed_if_empty(test_app.repository.as_ref()).await.unwrap();
    assert_eq!(inserted, 0);
    assert_eq!(test_app.repository.count().await.unwrap(), 3);
}

#[actix_web::test]
async fn test_seed_leaves_existing_content_alone() {
    let test_app = TestApp::new().await;
    test_app.insert("Custom", "Mine", ContentType::Text).await;

    let inserted = seed_if_empty(test_app.repository.as_ref()).await.unwrap();
    assert_eq!(inserted, 0);

    let contents = test_app.all().await;
    assert_eq!(contents.len(), 1);
    assert_eq!(contents[0].key, "Custom");
}
