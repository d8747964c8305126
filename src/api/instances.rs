//! Book instance (copy) endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{book_instance::BookInstanceInput, BookInstance, BookInstanceDetail},
    AppState,
};

use super::{
    deleted,
    extract::{AppJson, AppPath},
    AuthenticatedUser, CatalogManager, Deleted,
};

/// Copy with its book title; the borrower is included for librarians and the borrower
#[utoipa::path(
    get,
    path = "/instances/{id}",
    tag = "instances",
    params(("id" = Uuid, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Book instance details", body = BookInstanceDetail),
        (status = 404, description = "Book instance not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_instance(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<BookInstanceDetail>> {
    let claims = user.map(|AuthenticatedUser(claims)| claims);
    let instance = state.services.catalog.get_instance(claims.as_ref(), id).await?;
    Ok(Json(instance))
}

/// Add a copy of a book
#[utoipa::path(
    post,
    path = "/books/{id}/instances",
    tag = "instances",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookInstanceInput,
    responses(
        (status = 201, description = "Book instance created", body = BookInstance),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing catalog.manage", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_instance(
    State(state): State<AppState>,
    CatalogManager(claims): CatalogManager,
    AppPath(book_id): AppPath<i32>,
    AppJson(input): AppJson<BookInstanceInput>,
) -> AppResult<(StatusCode, Json<BookInstance>)> {
    let instance = state
        .services
        .catalog
        .create_instance(&claims, book_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(instance)))
}

/// Replace a copy's imprint, status, due date and borrower
#[utoipa::path(
    put,
    path = "/instances/{id}",
    tag = "instances",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book instance ID")),
    request_body = BookInstanceInput,
    responses(
        (status = 200, description = "Book instance updated", body = BookInstance),
        (status = 400, description = "Invalid input or status change", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing catalog.manage", body = crate::error::ErrorResponse),
        (status = 404, description = "Book instance not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_instance(
    State(state): State<AppState>,
    CatalogManager(claims): CatalogManager,
    AppPath(id): AppPath<Uuid>,
    AppJson(input): AppJson<BookInstanceInput>,
) -> AppResult<Json<BookInstance>> {
    let instance = state.services.catalog.update_instance(&claims, id, input).await?;
    Ok(Json(instance))
}

#[utoipa::path(
    delete,
    path = "/instances/{id}",
    tag = "instances",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book instance ID")),
    responses(
        (status = 204, description = "Book instance deleted"),
        (status = 403, description = "Missing catalog.manage", body = crate::error::ErrorResponse),
        (status = 404, description = "Book instance not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Copy is on loan or reserved", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_instance(
    State(state): State<AppState>,
    CatalogManager(claims): CatalogManager,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Deleted> {
    state.services.catalog.delete_instance(&claims, id).await?;
    Ok(deleted("/api/v1/books"))
}
