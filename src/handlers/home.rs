use actix_web::{http::StatusCode, web, HttpResponse};
use askama::Template;

use crate::handlers::{error_page, render};
use crate::models::{ContentRecord, CAROUSEL_KEY_PREFIX, HERO_IMAGE_KEY};
use crate::services::ContentService;

const HERO_TITLE_KEY: &str = "HeroTitle";
const HERO_BUTTON_TEXT_KEY: &str = "HeroButtonText";

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage {
    pub hero_image: String,
    pub hero_title: String,
    pub hero_button_text: String,
    pub carousel: Vec<ContentRecord>,
    pub texts: Vec<ContentRecord>,
}

impl HomePage {
    pub fn from_contents(contents: Vec<ContentRecord>) -> Self {
        let value_of = |key: &str| {
            contents
                .iter()
                .find(|c| c.key == key)
                .map(|c| c.value.clone())
                .unwrap_or_default()
        };

        let hero_image = value_of(HERO_IMAGE_KEY);
        let hero_title = value_of(HERO_TITLE_KEY);
        let hero_button_text = value_of(HERO_BUTTON_TEXT_KEY);

        let (mut carousel, rest): (Vec<_>, Vec<_>) = contents
            .into_iter()
            .partition(|c| c.is_image() && c.key.starts_with(CAROUSEL_KEY_PREFIX));
        carousel.sort_by(|a, b| a.key.cmp(&b.key));

        let texts = rest
            .into_iter()
            .filter(|c| {
                !c.is_image() && c.key != HERO_TITLE_KEY && c.key != HERO_BUTTON_TEXT_KEY
            })
            .collect();

        Self {
            hero_image,
            hero_title,
            hero_button_text,
            carousel,
            texts,
        }
    }
}

pub async fn home_page(content_service: web::Data<ContentService>) -> HttpResponse {
    match content_service.list().await {
        Ok(contents) => render(StatusCode::OK, &HomePage::from_contents(contents)),
        Err(e) => {
            tracing::error!("Error loading home page content: {}", e);
            error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error",
                "The page could not be loaded. Please try again later.",
            )
        }
    }
}
