//! Book endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::AppResult,
    models::{BookPayload, BookWithAuthor, CreatedResponse, MessageResponse, UpdatedResponse},
    AppState,
};

use super::JsonBody;

/// List all books with their author details
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "Book list", body = Vec<BookWithAuthor>),
        (status = 500, description = "Store error", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<BookWithAuthor>>> {
    let books = state.services.books.list().await?;
    Ok(Json(books))
}

/// Get book by ID with its author details
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookWithAuthor),
        (status = 400, description = "Malformed ID", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookWithAuthor>> {
    let book = state.services.books.get(&id).await?;
    Ok(Json(book))
}

/// Create book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book created", body = CreatedResponse),
        (status = 400, description = "Validation failed, unknown author or duplicate ISBN", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): JsonBody<BookPayload>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let id = state.services.books.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Book created successfully".to_string(),
            id,
        }),
    ))
}

/// Replace book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = UpdatedResponse),
        (status = 400, description = "Validation failed or duplicate ISBN", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): JsonBody<BookPayload>,
) -> AppResult<Json<UpdatedResponse>> {
    let modified_count = state.services.books.update(&id, payload).await?;
    Ok(Json(UpdatedResponse {
        message: "Book updated successfully".to_string(),
        modified_count,
    }))
}

/// Delete book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 400, description = "Malformed ID", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.services.books.delete(&id).await?;
    Ok(Json(MessageResponse {
        message: "Book deleted successfully".to_string(),
    }))
}
