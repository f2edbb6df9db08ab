//! Library Catalog
//!
//! REST JSON API over two collections, authors and books, with field
//! validation and referential integrity between them: a book always
//! references an existing author, isbns are unique, and an author cannot
//! be removed while books still reference it.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod validation;

pub use api::create_router;
pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}
