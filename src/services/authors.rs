//! Author management service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{parse_id, Author, AuthorPayload},
    repository::Repository,
    validation,
};

const INVALID_ID: &str = "Invalid author ID format";
const NOT_FOUND: &str = "Author not found";

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All authors in store order
    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository.store()?.authors_list().await
    }

    pub async fn get(&self, id: &str) -> AppResult<Author> {
        let id = parse_id(id, INVALID_ID)?;
        self.repository
            .store()?
            .authors_find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    /// Validate and insert an author, returning the new id
    pub async fn create(&self, payload: AuthorPayload) -> AppResult<Uuid> {
        let author = validation::validated_author(payload).map_err(AppError::validation_failed)?;
        let id = self.repository.store()?.authors_insert(&author).await?;
        tracing::info!(author_id = %id, "Author created");
        Ok(id)
    }

    /// Replace every field of an author, returning the modified count (0 or 1)
    pub async fn update(&self, id: &str, payload: AuthorPayload) -> AppResult<u64> {
        let id = parse_id(id, INVALID_ID)?;
        let author = validation::validated_author(payload).map_err(AppError::validation_failed)?;

        let outcome = self.repository.store()?.authors_replace(id, &author).await?;
        if outcome.matched == 0 {
            return Err(AppError::NotFound(NOT_FOUND.to_string()));
        }

        tracing::info!(author_id = %id, modified = outcome.modified, "Author updated");
        Ok(outcome.modified)
    }

    /// Delete an author that no book references
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let id = parse_id(id, INVALID_ID)?;
        let store = self.repository.store()?;

        if store.books_any_by_author(id).await? {
            tracing::warn!(author_id = %id, "Refusing to delete author with existing books");
            return Err(AppError::author_has_books());
        }

        if store.authors_delete(id).await? == 0 {
            return Err(AppError::NotFound(NOT_FOUND.to_string()));
        }

        tracing::info!(author_id = %id, "Author deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::{
        models::NewBook,
        repository::{CatalogStore, MemoryStore, MockCatalogStore},
    };

    fn payload() -> AuthorPayload {
        AuthorPayload {
            first_name: Some("Jane".into()),
            last_name: Some("Austen".into()),
            birth_date: Some("1775-12-16".into()),
            nationality: Some("British".into()),
            biography: Some("English novelist known for romantic fiction".into()),
        }
    }

    fn service() -> (AuthorsService, MemoryStore) {
        let store = MemoryStore::new();
        let service = AuthorsService::new(Repository::new(Arc::new(store.clone())));
        (service, store)
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let (service, _) = service();
        let id = service.create(payload()).await.unwrap();

        let author = service.get(&id.to_string()).await.unwrap();
        assert_eq!(author.id, id);
        assert_eq!(author.first_name, "Jane");
        assert_eq!(author.last_name, "Austen");
        assert_eq!(author.birth_date, NaiveDate::from_ymd_opt(1775, 12, 16).unwrap());
        assert_eq!(author.nationality, "British");
        assert_eq!(
            author.biography.as_deref(),
            Some("English novelist known for romantic fiction")
        );
    }

    #[tokio::test]
    async fn test_create_reports_every_missing_field() {
        let (service, store) = service();
        let err = service
            .create(AuthorPayload {
                first_name: None,
                birth_date: None,
                ..payload()
            })
            .await
            .unwrap_err();

        match err {
            AppError::Validation { message, errors } => {
                assert_eq!(message, "Validation failed");
                assert_eq!(errors, vec!["First name is required", "Birth date is required"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(store.authors_list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_counts_modifications() {
        let (service, _) = service();
        let id = service.create(payload()).await.unwrap().to_string();

        assert_eq!(service.update(&id, payload()).await.unwrap(), 0);

        let changed = AuthorPayload {
            biography: None,
            ..payload()
        };
        assert_eq!(service.update(&id, changed).await.unwrap(), 1);
        assert_eq!(service.get(&id).await.unwrap().biography, None);
    }

    #[tokio::test]
    async fn test_update_validates_id_before_fields() {
        let (service, _) = service();
        let err = service.update("not-an-id", AuthorPayload::default()).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidId(_)));

        let missing = Uuid::new_v4().to_string();
        let err = service.update(&missing, AuthorPayload::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let err = service.update(&missing, payload()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Author not found"));
    }

    #[tokio::test]
    async fn test_delete_refuses_referenced_author() {
        let (service, store) = service();
        let id = service.create(payload()).await.unwrap();
        let book = store
            .books_insert(&NewBook {
                title: "Pride and Prejudice".into(),
                author: id,
                isbn: "9780141439518".into(),
                publish_year: 1813,
                genre: vec!["Romance".into()],
                pages: 432,
                publisher: "Penguin Classics".into(),
                language: None,
                in_stock: false,
            })
            .await
            .unwrap();

        let err = service.delete(&id.to_string()).await.unwrap_err();
        assert!(
            matches!(err, AppError::Conflict(msg) if msg == "Cannot delete author with existing books")
        );

        store.books_delete(book).await.unwrap();
        service.delete(&id.to_string()).await.unwrap();

        let err = service.get(&id.to_string()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = service.delete(&id.to_string()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_malformed_ids_never_reach_the_store() {
        // No expectations: any store call panics
        let service = AuthorsService::new(Repository::new(Arc::new(MockCatalogStore::new())));

        assert!(matches!(service.get("not-an-id").await, Err(AppError::InvalidId(_))));
        assert!(matches!(
            service.update("not-an-id", payload()).await,
            Err(AppError::InvalidId(_))
        ));
        assert!(matches!(service.delete("not-an-id").await, Err(AppError::InvalidId(_))));
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let mut store = MockCatalogStore::new();
        store
            .expect_authors_list()
            .returning(|| Err(AppError::Database(sqlx::Error::PoolTimedOut)));
        let service = AuthorsService::new(Repository::new(Arc::new(store)));

        assert!(matches!(service.list().await, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_uninitialized_repository_fails_fast() {
        let service = AuthorsService::new(Repository::uninitialized());
        assert!(matches!(service.list().await, Err(AppError::Configuration(_))));
        assert!(matches!(service.create(payload()).await, Err(AppError::Configuration(_))));
    }
}
