//! Repository layer for catalog storage.
//!
//! Services talk to a [`CatalogStore`] through the shared [`Repository`]
//! handle. The handle is created empty at process start and the store is
//! installed once the connection is up; until then every operation fails
//! fast with a configuration error.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Author, BookWithAuthor, NewAuthor, NewBook, UpdateOutcome},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Collection-level operations over the `authors` and `books` collections
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Check the store is reachable
    async fn ping(&self) -> AppResult<()>;

    async fn authors_list(&self) -> AppResult<Vec<Author>>;

    async fn authors_find(&self, id: Uuid) -> AppResult<Option<Author>>;

    /// Insert an author, returning the generated id
    async fn authors_insert(&self, author: &NewAuthor) -> AppResult<Uuid>;

    /// Replace every field of an author
    async fn authors_replace(&self, id: Uuid, author: &NewAuthor) -> AppResult<UpdateOutcome>;

    /// Delete an author, returning the number of records removed.
    /// Fails with a conflict while books still reference it.
    async fn authors_delete(&self, id: Uuid) -> AppResult<u64>;

    /// Whether any book references the given author
    async fn books_any_by_author(&self, author: Uuid) -> AppResult<bool>;

    /// All books, each joined with its author
    async fn books_list_joined(&self) -> AppResult<Vec<BookWithAuthor>>;

    async fn books_find_joined(&self, id: Uuid) -> AppResult<Option<BookWithAuthor>>;

    /// Whether a book other than `excluding` already uses `isbn`
    async fn books_isbn_taken(&self, isbn: &str, excluding: Option<Uuid>) -> AppResult<bool>;

    /// Insert a book, returning the generated id.
    /// Fails when the isbn is taken or the author does not exist.
    async fn books_insert(&self, book: &NewBook) -> AppResult<Uuid>;

    async fn books_replace(&self, id: Uuid, book: &NewBook) -> AppResult<UpdateOutcome>;

    async fn books_delete(&self, id: Uuid) -> AppResult<u64>;
}

/// Shared handle to the catalog store
#[derive(Clone, Default)]
pub struct Repository {
    store: Arc<OnceCell<Arc<dyn CatalogStore>>>,
}

impl Repository {
    /// Create a handle with the store already installed
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        let repository = Self::uninitialized();
        repository.install(store);
        repository
    }

    /// Create a handle with no store; operations fail until [`install`](Self::install)
    pub fn uninitialized() -> Self {
        Self::default()
    }

    /// Install the store. A second installation is ignored.
    pub fn install(&self, store: Arc<dyn CatalogStore>) {
        if self.store.set(store).is_err() {
            tracing::warn!("Database is already initialized");
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.store.get().is_some()
    }

    /// Borrow the installed store
    pub fn store(&self) -> AppResult<&dyn CatalogStore> {
        self.store
            .get()
            .map(|store| store.as_ref())
            .ok_or_else(|| AppError::Configuration("Database not initialized".to_string()))
    }
}
