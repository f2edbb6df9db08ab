//! PostgreSQL catalog store

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, Pool, Postgres};
use uuid::Uuid;

use super::CatalogStore;
use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, BookWithAuthor, NewAuthor, NewBook, UpdateOutcome},
};

const AUTHOR_COLUMNS: &str = "id, first_name, last_name, birth_date, nationality, biography";

const JOINED_BOOKS: &str = r#"
    SELECT b.id, b.title, b.author, b.isbn, b.publish_year, b.genre, b.pages,
           b.publisher, b.language, b.in_stock,
           a.id          AS author_id,
           a.first_name  AS author_first_name,
           a.last_name   AS author_last_name,
           a.birth_date  AS author_birth_date,
           a.nationality AS author_nationality,
           a.biography   AS author_biography
    FROM books b
    LEFT JOIN authors a ON a.id = b.author
"#;

/// A book row with the left-joined author columns
#[derive(FromRow)]
struct JoinedRow {
    #[sqlx(flatten)]
    book: Book,
    author_id: Option<Uuid>,
    author_first_name: Option<String>,
    author_last_name: Option<String>,
    author_birth_date: Option<NaiveDate>,
    author_nationality: Option<String>,
    author_biography: Option<String>,
}

impl From<JoinedRow> for BookWithAuthor {
    fn from(row: JoinedRow) -> Self {
        let author = match (
            row.author_id,
            row.author_first_name,
            row.author_last_name,
            row.author_birth_date,
            row.author_nationality,
        ) {
            (Some(id), Some(first_name), Some(last_name), Some(birth_date), Some(nationality)) => {
                Some(Author {
                    id,
                    first_name,
                    last_name,
                    birth_date,
                    nationality,
                    biography: row.author_biography,
                })
            }
            _ => None,
        };

        BookWithAuthor {
            book: row.book,
            author_details: author.into_iter().collect(),
        }
    }
}

/// Map constraint violations raised by book writes to their API errors
fn book_write_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::isbn_taken(),
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => AppError::unknown_author(),
        _ => AppError::Database(e),
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn authors_list(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(&format!(
            "SELECT {} FROM authors ORDER BY crea_date, id",
            AUTHOR_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn authors_find(&self, id: Uuid) -> AppResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>(&format!(
            "SELECT {} FROM authors WHERE id = $1",
            AUTHOR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn authors_insert(&self, author: &NewAuthor) -> AppResult<Uuid> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO authors (first_name, last_name, birth_date, nationality, biography)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&author.first_name)
        .bind(&author.last_name)
        .bind(author.birth_date)
        .bind(&author.nationality)
        .bind(&author.biography)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn authors_replace(&self, id: Uuid, author: &NewAuthor) -> AppResult<UpdateOutcome> {
        // Rows whose values are unchanged are matched but not modified
        let (matched, modified): (i64, i64) = sqlx::query_as(
            r#"
            WITH target AS (
                SELECT id FROM authors WHERE id = $1
            ),
            changed AS (
                UPDATE authors
                SET first_name = $2, last_name = $3, birth_date = $4,
                    nationality = $5, biography = $6, modif_date = NOW()
                WHERE id = $1
                  AND (first_name, last_name, birth_date, nationality, biography)
                      IS DISTINCT FROM ($2::text, $3::text, $4::date, $5::text, $6::text)
                RETURNING id
            )
            SELECT (SELECT COUNT(*) FROM target), (SELECT COUNT(*) FROM changed)
            "#,
        )
        .bind(id)
        .bind(&author.first_name)
        .bind(&author.last_name)
        .bind(author.birth_date)
        .bind(&author.nationality)
        .bind(&author.biography)
        .fetch_one(&self.pool)
        .await?;

        Ok(UpdateOutcome {
            matched: matched as u64,
            modified: modified as u64,
        })
    }

    async fn authors_delete(&self, id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    AppError::author_has_books()
                }
                _ => AppError::Database(e),
            })?;
        Ok(result.rows_affected())
    }

    async fn books_any_by_author(&self, author: Uuid) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE author = $1)")
                .bind(author)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn books_list_joined(&self) -> AppResult<Vec<BookWithAuthor>> {
        let rows = sqlx::query_as::<_, JoinedRow>(&format!(
            "{} ORDER BY b.crea_date, b.id",
            JOINED_BOOKS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(BookWithAuthor::from).collect())
    }

    async fn books_find_joined(&self, id: Uuid) -> AppResult<Option<BookWithAuthor>> {
        let row = sqlx::query_as::<_, JoinedRow>(&format!("{} WHERE b.id = $1", JOINED_BOOKS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(BookWithAuthor::from))
    }

    async fn books_isbn_taken(&self, isbn: &str, excluding: Option<Uuid>) -> AppResult<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(isbn)
        .bind(excluding)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    async fn books_insert(&self, book: &NewBook) -> AppResult<Uuid> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, author, isbn, publish_year, genre, pages, publisher, language, in_stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(book.author)
        .bind(&book.isbn)
        .bind(book.publish_year)
        .bind(&book.genre)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.language)
        .bind(book.in_stock)
        .fetch_one(&self.pool)
        .await
        .map_err(book_write_error)?;
        Ok(id)
    }

    async fn books_replace(&self, id: Uuid, book: &NewBook) -> AppResult<UpdateOutcome> {
        let (matched, modified): (i64, i64) = sqlx::query_as(
            r#"
            WITH target AS (
                SELECT id FROM books WHERE id = $1
            ),
            changed AS (
                UPDATE books
                SET title = $2, author = $3, isbn = $4, publish_year = $5, genre = $6,
                    pages = $7, publisher = $8, language = $9, in_stock = $10,
                    modif_date = NOW()
                WHERE id = $1
                  AND (title, author, isbn, publish_year, genre, pages, publisher, language, in_stock)
                      IS DISTINCT FROM ($2::text, $3::uuid, $4::text, $5::int, $6::text[],
                                        $7::int, $8::text, $9::text, $10::bool)
                RETURNING id
            )
            SELECT (SELECT COUNT(*) FROM target), (SELECT COUNT(*) FROM changed)
            "#,
        )
        .bind(id)
        .bind(&book.title)
        .bind(book.author)
        .bind(&book.isbn)
        .bind(book.publish_year)
        .bind(&book.genre)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.language)
        .bind(book.in_stock)
        .fetch_one(&self.pool)
        .await
        .map_err(book_write_error)?;

        Ok(UpdateOutcome {
            matched: matched as u64,
            modified: modified as u64,
        })
    }

    async fn books_delete(&self, id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animal_farm(author: Uuid) -> Book {
        Book {
            id: Uuid::new_v4(),
            title: "Animal Farm".into(),
            author,
            isbn: "9780451526342".into(),
            publish_year: 1945,
            genre: vec!["Fiction".into(), "Satire".into()],
            pages: 112,
            publisher: "Secker and Warburg".into(),
            language: Some("English".into()),
            in_stock: true,
        }
    }

    #[test]
    fn test_unmatched_join_has_no_author_details() {
        let row = JoinedRow {
            book: animal_farm(Uuid::new_v4()),
            author_id: None,
            author_first_name: None,
            author_last_name: None,
            author_birth_date: None,
            author_nationality: None,
            author_biography: None,
        };

        let joined = BookWithAuthor::from(row);
        assert_eq!(joined.book.title, "Animal Farm");
        assert!(joined.author_details.is_empty());
    }

    #[test]
    fn test_matched_join_has_one_author() {
        let author = Uuid::new_v4();
        let row = JoinedRow {
            book: animal_farm(author),
            author_id: Some(author),
            author_first_name: Some("George".into()),
            author_last_name: Some("Orwell".into()),
            author_birth_date: NaiveDate::from_ymd_opt(1903, 6, 25),
            author_nationality: Some("British".into()),
            author_biography: None,
        };

        let joined = BookWithAuthor::from(row);
        assert_eq!(joined.author_details.len(), 1);
        assert_eq!(joined.author_details[0].id, author);
        assert_eq!(joined.author_details[0].last_name, "Orwell");
        assert_eq!(joined.author_details[0].biography, None);
    }
}
