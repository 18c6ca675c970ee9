pub mod content_service;
pub mod upload_service;

pub use content_service::*;
pub use upload_service::*;
