//! Author endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::AppResult,
    models::{Author, AuthorPayload, CreatedResponse, MessageResponse, UpdatedResponse},
    AppState,
};

use super::JsonBody;

/// List all authors
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    responses(
        (status = 200, description = "Author list", body = Vec<Author>),
        (status = 500, description = "Store error", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Json<Vec<Author>>> {
    let authors = state.services.authors.list().await?;
    Ok(Json(authors))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = Author),
        (status = 400, description = "Malformed ID", body = crate::error::ErrorResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Author>> {
    let author = state.services.authors.get(&id).await?;
    Ok(Json(author))
}

/// Create author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = AuthorPayload,
    responses(
        (status = 201, description = "Author created", body = CreatedResponse),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): JsonBody<AuthorPayload>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let id = state.services.authors.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Author created successfully".to_string(),
            id,
        }),
    ))
}

/// Replace author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    request_body = AuthorPayload,
    responses(
        (status = 200, description = "Author updated", body = UpdatedResponse),
        (status = 400, description = "Malformed ID or validation failed", body = crate::error::ErrorResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): JsonBody<AuthorPayload>,
) -> AppResult<Json<UpdatedResponse>> {
    let modified_count = state.services.authors.update(&id, payload).await?;
    Ok(Json(UpdatedResponse {
        message: "Author updated successfully".to_string(),
        modified_count,
    }))
}

/// Delete author
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author deleted", body = MessageResponse),
        (status = 400, description = "Malformed ID or author still has books", body = crate::error::ErrorResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.services.authors.delete(&id).await?;
    Ok(Json(MessageResponse {
        message: "Author deleted successfully".to_string(),
    }))
}
