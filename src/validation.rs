//! Field validation for author and book records.
//!
//! Every check runs and every failing message is collected, in a fixed
//! order, so a client sees all problems in a single round trip. An empty
//! list means the record is valid.

use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{AuthorPayload, BookDraft, NewAuthor, NewBook};

static ISBN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10}(\d{3})?$").unwrap());

/// Earliest accepted publication year
pub const MIN_PUBLISH_YEAR: i64 = 1000;

fn blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Current calendar year, the upper bound for `publishYear`
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// ISBN-10 or ISBN-13 once hyphens are removed
pub fn is_valid_isbn(isbn: &str) -> bool {
    ISBN_RE.is_match(&isbn.replace('-', ""))
}

pub fn validate_author(author: &AuthorPayload) -> Vec<String> {
    let mut errors = Vec::new();

    if blank(author.first_name.as_deref()) {
        errors.push("First name is required".to_string());
    }
    if blank(author.last_name.as_deref()) {
        errors.push("Last name is required".to_string());
    }
    let birth_date_missing = blank(author.birth_date.as_deref());
    if birth_date_missing {
        errors.push("Birth date is required".to_string());
    }
    if blank(author.nationality.as_deref()) {
        errors.push("Nationality is required".to_string());
    }
    if !birth_date_missing && author.parsed_birth_date().is_none() {
        errors.push("Invalid birth date format".to_string());
    }

    errors
}

pub fn validate_book(book: &BookDraft, current_year: i32) -> Vec<String> {
    let mut errors = Vec::new();

    if blank(book.title.as_deref()) {
        errors.push("Title is required".to_string());
    }
    if book.author.is_none() {
        errors.push("Valid author ID is required".to_string());
    }
    match book.isbn.as_deref() {
        Some(isbn) if !isbn.trim().is_empty() => {
            if !is_valid_isbn(isbn) {
                errors.push("Invalid ISBN format".to_string());
            }
        }
        _ => errors.push("ISBN is required".to_string()),
    }
    let year_ok = book
        .publish_year
        .map_or(false, |y| (MIN_PUBLISH_YEAR..=i64::from(current_year)).contains(&y));
    if !year_ok {
        errors.push("Valid publish year is required".to_string());
    }
    if book.genre.as_ref().map_or(true, |g| g.is_empty()) {
        errors.push("At least one genre is required".to_string());
    }
    let pages_ok = book
        .pages
        .map_or(false, |p| p > 0 && i32::try_from(p).is_ok());
    if !pages_ok {
        errors.push("Valid number of pages is required".to_string());
    }
    if blank(book.publisher.as_deref()) {
        errors.push("Publisher is required".to_string());
    }

    errors
}

/// Validate and convert an author request into writable fields
pub fn validated_author(payload: AuthorPayload) -> Result<NewAuthor, Vec<String>> {
    let errors = validate_author(&payload);
    let birth_date = payload.parsed_birth_date();

    match (payload, birth_date) {
        (
            AuthorPayload {
                first_name: Some(first_name),
                last_name: Some(last_name),
                nationality: Some(nationality),
                biography,
                ..
            },
            Some(birth_date),
        ) if errors.is_empty() => Ok(NewAuthor {
            first_name,
            last_name,
            birth_date,
            nationality,
            biography,
        }),
        _ => Err(errors),
    }
}

/// Validate and convert a coerced book into writable fields
pub fn validated_book(draft: BookDraft, current_year: i32) -> Result<NewBook, Vec<String>> {
    let errors = validate_book(&draft, current_year);
    if !errors.is_empty() {
        return Err(errors);
    }

    let BookDraft {
        title: Some(title),
        author: Some(author),
        isbn: Some(isbn),
        publish_year: Some(publish_year),
        genre: Some(genre),
        pages: Some(pages),
        publisher: Some(publisher),
        language,
        in_stock,
    } = draft
    else {
        return Err(errors);
    };

    match (i32::try_from(publish_year), i32::try_from(pages)) {
        (Ok(publish_year), Ok(pages)) => Ok(NewBook {
            title,
            author,
            isbn,
            publish_year,
            genre,
            pages,
            publisher,
            language,
            in_stock,
        }),
        _ => Err(errors),
    }
}
