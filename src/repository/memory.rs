//! In-process catalog store for tests and local development.
//!
//! Collections keep insertion order and enforce the same constraints as the
//! PostgreSQL schema: unique isbn, books must reference an existing author,
//! and authors cannot be removed while referenced.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use super::CatalogStore;
use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, BookWithAuthor, NewAuthor, NewBook, UpdateOutcome},
};

#[derive(Default)]
struct Collections {
    authors: Vec<Author>,
    books: Vec<Book>,
}

impl Collections {
    fn author(&self, id: Uuid) -> Option<&Author> {
        self.authors.iter().find(|a| a.id == id)
    }

    fn isbn_taken(&self, isbn: &str, excluding: Option<Uuid>) -> bool {
        self.books
            .iter()
            .any(|b| b.isbn == isbn && Some(b.id) != excluding)
    }

    fn join(&self, book: &Book) -> BookWithAuthor {
        BookWithAuthor {
            book: book.clone(),
            author_details: self.author(book.author).cloned().into_iter().collect(),
        }
    }

    fn check_book(&self, book: &NewBook, excluding: Option<Uuid>) -> AppResult<()> {
        if self.isbn_taken(&book.isbn, excluding) {
            return Err(AppError::isbn_taken());
        }
        if self.author(book.author).is_none() {
            return Err(AppError::unknown_author());
        }
        Ok(())
    }
}

/// Insertion-ordered store. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, Collections>> {
        self.collections
            .read()
            .map_err(|_| AppError::Internal("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, Collections>> {
        self.collections
            .write()
            .map_err(|_| AppError::Internal("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        self.read().map(|_| ())
    }

    async fn authors_list(&self) -> AppResult<Vec<Author>> {
        Ok(self.read()?.authors.clone())
    }

    async fn authors_find(&self, id: Uuid) -> AppResult<Option<Author>> {
        Ok(self.read()?.author(id).cloned())
    }

    async fn authors_insert(&self, author: &NewAuthor) -> AppResult<Uuid> {
        let id = Uuid::new_v4();
        self.write()?.authors.push(author.clone().into_author(id));
        Ok(id)
    }

    async fn authors_replace(&self, id: Uuid, author: &NewAuthor) -> AppResult<UpdateOutcome> {
        let mut collections = self.write()?;
        let Some(slot) = collections.authors.iter_mut().find(|a| a.id == id) else {
            return Ok(UpdateOutcome::default());
        };

        let replacement = author.clone().into_author(id);
        let modified = u64::from(*slot != replacement);
        *slot = replacement;
        Ok(UpdateOutcome { matched: 1, modified })
    }

    async fn authors_delete(&self, id: Uuid) -> AppResult<u64> {
        let mut collections = self.write()?;
        if collections.books.iter().any(|b| b.author == id) {
            return Err(AppError::author_has_books());
        }
        let before = collections.authors.len();
        collections.authors.retain(|a| a.id != id);
        Ok((before - collections.authors.len()) as u64)
    }

    async fn books_any_by_author(&self, author: Uuid) -> AppResult<bool> {
        Ok(self.read()?.books.iter().any(|b| b.author == author))
    }

    async fn books_list_joined(&self) -> AppResult<Vec<BookWithAuthor>> {
        let collections = self.read()?;
        Ok(collections.books.iter().map(|b| collections.join(b)).collect())
    }

    async fn books_find_joined(&self, id: Uuid) -> AppResult<Option<BookWithAuthor>> {
        let collections = self.read()?;
        Ok(collections
            .books
            .iter()
            .find(|b| b.id == id)
            .map(|b| collections.join(b)))
    }

    async fn books_isbn_taken(&self, isbn: &str, excluding: Option<Uuid>) -> AppResult<bool> {
        Ok(self.read()?.isbn_taken(isbn, excluding))
    }

    async fn books_insert(&self, book: &NewBook) -> AppResult<Uuid> {
        let mut collections = self.write()?;
        collections.check_book(book, None)?;
        let id = Uuid::new_v4();
        collections.books.push(book.clone().into_book(id));
        Ok(id)
    }

    async fn books_replace(&self, id: Uuid, book: &NewBook) -> AppResult<UpdateOutcome> {
        let mut collections = self.write()?;
        if !collections.books.iter().any(|b| b.id == id) {
            return Ok(UpdateOutcome::default());
        }
        collections.check_book(book, Some(id))?;

        let replacement = book.clone().into_book(id);
        let mut outcome = UpdateOutcome { matched: 1, modified: 0 };
        if let Some(slot) = collections.books.iter_mut().find(|b| b.id == id) {
            outcome.modified = u64::from(*slot != replacement);
            *slot = replacement;
        }
        Ok(outcome)
    }

    async fn books_delete(&self, id: Uuid) -> AppResult<u64> {
        let mut collections = self.write()?;
        let before = collections.books.len();
        collections.books.retain(|b| b.id != id);
        Ok((before - collections.books.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_author() -> NewAuthor {
        NewAuthor {
            first_name: "F. Scott".into(),
            last_name: "Fitzgerald".into(),
            birth_date: NaiveDate::from_ymd_opt(1896, 9, 24).unwrap(),
            nationality: "American".into(),
            biography: Some("American novelist and short story writer".into()),
        }
    }

    fn new_book(author: Uuid, isbn: &str) -> NewBook {
        NewBook {
            title: "The Great Gatsby".into(),
            author,
            isbn: isbn.into(),
            publish_year: 1925,
            genre: vec!["Fiction".into(), "Classic".into()],
            pages: 180,
            publisher: "Scribner".into(),
            language: Some("English".into()),
            in_stock: true,
        }
    }

    #[tokio::test]
    async fn test_author_replace_reports_modified() {
        let store = MemoryStore::new();
        let id = store.authors_insert(&new_author()).await.unwrap();

        let same = store.authors_replace(id, &new_author()).await.unwrap();
        assert_eq!(same, UpdateOutcome { matched: 1, modified: 0 });

        let changed = NewAuthor {
            nationality: "US".into(),
            ..new_author()
        };
        let outcome = store.authors_replace(id, &changed).await.unwrap();
        assert_eq!(outcome, UpdateOutcome { matched: 1, modified: 1 });

        let missing = store.authors_replace(Uuid::new_v4(), &changed).await.unwrap();
        assert_eq!(missing, UpdateOutcome::default());
    }

    #[tokio::test]
    async fn test_books_keep_insertion_order_and_join() {
        let store = MemoryStore::new();
        let author = store.authors_insert(&new_author()).await.unwrap();
        store.books_insert(&new_book(author, "9780743273565")).await.unwrap();
        store.books_insert(&new_book(author, "0743273567")).await.unwrap();

        let books = store.books_list_joined().await.unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].book.isbn, "9780743273565");
        assert_eq!(books[1].author_details[0].id, author);
    }

    #[tokio::test]
    async fn test_constraints() {
        let store = MemoryStore::new();
        let author = store.authors_insert(&new_author()).await.unwrap();
        let book = store.books_insert(&new_book(author, "9780743273565")).await.unwrap();

        let duplicate = store.books_insert(&new_book(author, "9780743273565")).await;
        assert!(matches!(duplicate, Err(AppError::Conflict(_))));

        let orphan = store.books_insert(&new_book(Uuid::new_v4(), "0743273567")).await;
        assert!(matches!(orphan, Err(AppError::Validation { .. })));

        let referenced = store.authors_delete(author).await;
        assert!(matches!(referenced, Err(AppError::Conflict(_))));

        assert!(store.books_isbn_taken("9780743273565", None).await.unwrap());
        assert!(!store.books_isbn_taken("9780743273565", Some(book)).await.unwrap());

        assert_eq!(store.books_delete(book).await.unwrap(), 1);
        assert_eq!(store.authors_delete(author).await.unwrap(), 1);
        assert_eq!(store.authors_delete(author).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_isbn_uniqueness_compares_stored_text() {
        let store = MemoryStore::new();
        let author = store.authors_insert(&new_author()).await.unwrap();
        store.books_insert(&new_book(author, "978-0-74-327356-5")).await.unwrap();

        assert!(store.books_isbn_taken("978-0-74-327356-5", None).await.unwrap());
        assert!(!store.books_isbn_taken("9780743273565", None).await.unwrap());
        store.books_insert(&new_book(author, "9780743273565")).await.unwrap();
        assert_eq!(store.books_list_joined().await.unwrap().len(), 2);
    }
}
