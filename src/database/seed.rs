use crate::models::{ContentType, NewContent, ServiceError};
use crate::repositories::ContentRepository;

/// Initial home page content, inserted into an empty store.
pub fn default_contents() -> Vec<NewContent> {
    vec![
        NewContent {
            key: "HeroImage".to_string(),
            value: "/assets/image4.png".to_string(),
            content_type: ContentType::Image,
        },
        NewContent {
            key: "HeroTitle".to_string(),
            value: "Creating Exceptional Workspaces".to_string(),
            content_type: ContentType::Text,
        },
        NewContent {
            key: "HeroButtonText".to_string(),
            value: "Explore Our Work".to_string(),
            content_type: ContentType::Text,
        },
    ]
}

/// Returns the number of rows inserted; zero when the store already had content.
pub async fn seed_if_empty(repository: &dyn ContentRepository) -> Result<usize, ServiceError> {
    if repository.count().await? > 0 {
        tracing::debug!("Content store already populated, skipping seed");
        return Ok(0);
    }

    let contents = default_contents();
    for content in &contents {
        repository.insert(content).await?;
    }

    tracing::info!("Seeded {} content records", contents.len());
    Ok(contents.len())
}
