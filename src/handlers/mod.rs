pub mod admin;
pub mod api;
pub mod forms;
pub mod home;

// Re-export all handler functions for easy importing
pub use admin::*;
pub use api::*;
pub use home::*;

use actix_web::{http::StatusCode, web, HttpResponse};
use askama::Template;

/// Registers the HTML and JSON routes. Static file services are mounted by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home::home_page))
        .route("/admin", web::get().to(admin::admin_index))
        .service(
            web::resource("/admin/create")
                .route(web::get().to(admin::create_form))
                .route(web::post().to(admin::create)),
        )
        .service(
            web::resource("/admin/edit/{id}")
                .route(web::get().to(admin::edit_form))
                .route(web::post().to(admin::edit)),
        )
        .service(
            web::resource("/admin/delete/{id}")
                .route(web::get().to(admin::delete_confirm))
                .route(web::post().to(admin::delete)),
        )
        .route("/api/contents", web::get().to(api::list_contents))
        .route("/api/contents/{id}", web::get().to(api::get_content));
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub title: String,
    pub message: String,
}

pub(crate) fn render<T: Template>(status: StatusCode, template: &T) -> HttpResponse {
    match template.render() {
        Ok(body) => HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            tracing::error!("Template rendering failed: {}", e);
            HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body("Internal server error")
        }
    }
}

pub(crate) fn error_page(status: StatusCode, title: &str, message: &str) -> HttpResponse {
    render(
        status,
        &ErrorPage {
            title: title.to_string(),
            message: message.to_string(),
        },
    )
}
