// Re-export all models organized by domain
pub mod api;
pub mod content;
pub mod errors;

pub use api::*;
pub use content::*;
pub use errors::*;
