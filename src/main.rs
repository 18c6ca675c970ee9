use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use website_cms::config::AppConfig;
use website_cms::database;
use website_cms::handlers;
use website_cms::openapi_config::openapi_spec;
use website_cms::repositories::SqliteContentRepository;
use website_cms::services::{ContentService, LocalFileStorage};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    // Initialize database
    let pool = database::initialize_database(&config.database_url).await?;
    let content_repository = Arc::new(SqliteContentRepository::new(pool));

    // Seed the home page content on first run
    database::seed_if_empty(content_repository.as_ref()).await?;

    tokio::fs::create_dir_all(&config.uploads_dir).await?;
    tokio::fs::create_dir_all(&config.assets_dir).await?;

    let storage = Arc::new(LocalFileStorage::new(
        config.uploads_dir.clone(),
        config.max_upload_bytes,
    ));
    let content_service = web::Data::new(ContentService::new(content_repository, storage));

    let openapi = openapi_spec();
    let uploads_dir = config.uploads_dir.clone();
    let assets_dir = config.assets_dir.clone();

    tracing::info!("Website CMS listening on http://{}", config.bind_address);
    tracing::info!("API documentation: http://{}/swagger-ui/", config.bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(content_service.clone())
            .wrap(Logger::default())
            .service(
                utoipa_swagger_ui::SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            .service(Files::new("/uploads", uploads_dir.clone()))
            .service(Files::new("/assets", assets_dir.clone()))
            .configure(handlers::configure)
    })
    .bind(config.bind_address)?
    .run()
    .await?;

    Ok(())
}
