//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{author::Author, coerce};
use crate::error::{AppError, AppResult};

/// Full book record from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    /// Id of the referenced author
    pub author: Uuid,
    pub isbn: String,
    pub publish_year: i32,
    pub genre: Vec<String>,
    pub pages: i32,
    pub publisher: String,
    pub language: Option<String>,
    pub in_stock: bool,
}

/// Book joined with the author it references.
///
/// `author_details` holds zero or one entry: empty when the reference
/// resolves to nothing.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookWithAuthor {
    #[serde(flatten)]
    pub book: Book,
    pub author_details: Vec<Author>,
}

/// Create or replace book request, as sent by clients
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub title: Option<String>,
    /// Author id
    pub author: Option<String>,
    #[schema(example = "978-0-14-143951-8")]
    pub isbn: Option<String>,
    /// Integer or numeric string
    #[serde(default, deserialize_with = "coerce::lenient_int")]
    #[schema(value_type = Option<i32>)]
    pub publish_year: Option<i64>,
    #[serde(default, deserialize_with = "coerce::lenient_tags")]
    pub genre: Option<Vec<String>>,
    /// Integer or numeric string
    #[serde(default, deserialize_with = "coerce::lenient_int")]
    #[schema(value_type = Option<i32>)]
    pub pages: Option<i64>,
    pub publisher: Option<String>,
    pub language: Option<String>,
    #[serde(default, deserialize_with = "coerce::lenient_bool")]
    pub in_stock: bool,
}

/// Book fields after identifier and number coercion, before validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookDraft {
    pub title: Option<String>,
    pub author: Option<Uuid>,
    pub isbn: Option<String>,
    pub publish_year: Option<i64>,
    pub genre: Option<Vec<String>>,
    pub pages: Option<i64>,
    pub publisher: Option<String>,
    pub language: Option<String>,
    pub in_stock: bool,
}

impl BookDraft {
    /// Coerce the author reference to an identifier.
    ///
    /// A missing reference is left for the validator; a malformed one is
    /// rejected here.
    pub fn from_payload(payload: BookPayload) -> AppResult<Self> {
        let author = payload
            .author
            .as_deref()
            .map(|raw| {
                Uuid::parse_str(raw)
                    .map_err(|_| AppError::InvalidId("Invalid author ID format".to_string()))
            })
            .transpose()?;

        Ok(Self {
            title: payload.title,
            author,
            isbn: payload.isbn,
            publish_year: payload.publish_year,
            genre: payload.genre,
            pages: payload.pages,
            publisher: payload.publisher,
            language: payload.language,
            in_stock: payload.in_stock,
        })
    }
}

/// Validated book fields ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: Uuid,
    pub isbn: String,
    pub publish_year: i32,
    pub genre: Vec<String>,
    pub pages: i32,
    pub publisher: String,
    pub language: Option<String>,
    pub in_stock: bool,
}

impl NewBook {
    pub fn into_book(self, id: Uuid) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            isbn: self.isbn,
            publish_year: self.publish_year,
            genre: self.genre,
            pages: self.pages,
            publisher: self.publisher,
            language: self.language,
            in_stock: self.in_stock,
        }
    }
}
