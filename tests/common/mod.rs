use actix_web::{web, App};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use website_cms::{
    database,
    handlers,
    models::{ContentRecord, ContentType, NewContent},
    repositories::{ContentRepository, SqliteContentRepository},
    services::{ContentService, LocalFileStorage},
};

pub const BOUNDARY: &str = "----cmsTestBoundary7MA4YWxkTrZu0gW";
pub const MAX_UPLOAD_BYTES: usize = 1024;

pub struct TestApp {
    #[allow(dead_code)]
    pub pool: SqlitePool,
    pub repository: Arc<SqliteContentRepository>,
    pub uploads_dir: PathBuf,
    #[allow(dead_code)]
    pub temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        // Create temporary database
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let database_url = format!("sqlite://{}?mode=rwc", db_path.display());

        // Create connection pool
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&database_url)
            .await
            .expect("Failed to create database pool");

        database::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let repository = Arc::new(SqliteContentRepository::new(pool.clone()));
        let uploads_dir = temp_dir.path().join("uploads");

        Self {
            pool,
            repository,
            uploads_dir,
            temp_dir,
        }
    }

    pub fn content_service(&self) -> ContentService {
        let storage = Arc::new(LocalFileStorage::new(
            self.uploads_dir.clone(),
            MAX_UPLOAD_BYTES,
        ));
        ContentService::new(self.repository.clone(), storage)
    }

    pub fn create_app(&self) -> actix_web::App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.content_service()))
            .configure(handlers::configure)
    }

    pub async fn insert(&self, key: &str, value: &str, content_type: ContentType) -> ContentRecord {
        self.repository
            .insert(&NewContent {
                key: key.to_string(),
                value: value.to_string(),
                content_type,
            })
            .await
            .expect("Failed to insert content")
    }

    pub async fn find(&self, id: i64) -> Option<ContentRecord> {
        self.repository
            .find_by_id(id)
            .await
            .expect("Failed to query content")
    }

    pub async fn all(&self) -> Vec<ContentRecord> {
        self.repository
            .find_all()
            .await
            .expect("Failed to query content")
    }

    /// Names of the files written to the uploads directory.
    pub fn uploaded_files(&self) -> Vec<String> {
        match std::fs::read_dir(&self.uploads_dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Builds a `multipart/form-data` body; returns the content-type header value and the body.
#[allow(dead_code)]
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> (String, Vec<u8>) {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    if let Some((file_name, bytes)) = file {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
                file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}
