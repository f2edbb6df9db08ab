//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::coerce;

/// Full author record from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub nationality: String,
    pub biography: Option<String>,
}

/// Create or replace author request.
///
/// Every field is optional at the wire level so that missing values are
/// reported by the validator as a complete list.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp
    #[serde(default, deserialize_with = "coerce::lenient_text")]
    #[schema(value_type = Option<String>, example = "1903-06-25")]
    pub birth_date: Option<String>,
    pub nationality: Option<String>,
    pub biography: Option<String>,
}

impl AuthorPayload {
    /// Birth date parsed to a calendar date, if present and well-formed
    pub fn parsed_birth_date(&self) -> Option<NaiveDate> {
        self.birth_date.as_deref().and_then(coerce::parse_date)
    }
}

/// Validated author fields ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuthor {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub nationality: String,
    pub biography: Option<String>,
}

impl NewAuthor {
    pub fn into_author(self, id: Uuid) -> Author {
        Author {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            birth_date: self.birth_date,
            nationality: self.nationality,
            biography: self.biography,
        }
    }
}
