//! Book management service.
//!
//! Writes enforce referential integrity against the author collection and
//! isbn uniqueness across books before touching the store. The checks and
//! the write are separate store calls; the PostgreSQL schema backs both
//! rules with constraints so a racing request still surfaces the same error.

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{parse_id, BookDraft, BookPayload, BookWithAuthor, NewBook},
    repository::Repository,
    validation,
};

const INVALID_ID: &str = "Invalid book ID format";
const NOT_FOUND: &str = "Book not found";

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All books, each with its author details
    pub async fn list(&self) -> AppResult<Vec<BookWithAuthor>> {
        self.repository.store()?.books_list_joined().await
    }

    pub async fn get(&self, id: &str) -> AppResult<BookWithAuthor> {
        let id = parse_id(id, INVALID_ID)?;
        self.repository
            .store()?
            .books_find_joined(id)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    /// Coerce and validate a request body
    fn prepare(payload: BookPayload) -> AppResult<NewBook> {
        let draft = BookDraft::from_payload(payload)?;
        validation::validated_book(draft, validation::current_year())
            .map_err(AppError::validation_failed)
    }

    /// Insert a book whose author exists and whose isbn is unused
    pub async fn create(&self, payload: BookPayload) -> AppResult<Uuid> {
        let book = Self::prepare(payload)?;
        let store = self.repository.store()?;

        if store.authors_find(book.author).await?.is_none() {
            return Err(AppError::unknown_author());
        }
        if store.books_isbn_taken(&book.isbn, None).await? {
            tracing::warn!(isbn = %book.isbn, "Refusing duplicate ISBN");
            return Err(AppError::isbn_taken());
        }

        let id = store.books_insert(&book).await?;
        tracing::info!(book_id = %id, isbn = %book.isbn, "Book created");
        Ok(id)
    }

    /// Replace every field of a book, returning the modified count (0 or 1)
    pub async fn update(&self, id: &str, payload: BookPayload) -> AppResult<u64> {
        let id = parse_id(id, INVALID_ID)?;
        let book = Self::prepare(payload)?;
        let store = self.repository.store()?;

        if store.books_isbn_taken(&book.isbn, Some(id)).await? {
            tracing::warn!(book_id = %id, isbn = %book.isbn, "Refusing duplicate ISBN");
            return Err(AppError::isbn_taken());
        }

        let outcome = store.books_replace(id, &book).await?;
        if outcome.matched == 0 {
            return Err(AppError::NotFound(NOT_FOUND.to_string()));
        }

        tracing::info!(book_id = %id, modified = outcome.modified, "Book updated");
        Ok(outcome.modified)
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let id = parse_id(id, INVALID_ID)?;
        if self.repository.store()?.books_delete(id).await? == 0 {
            return Err(AppError::NotFound(NOT_FOUND.to_string()));
        }

        tracing::info!(book_id = %id, "Book deleted");
        Ok(())
    }
}
