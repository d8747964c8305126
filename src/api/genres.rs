//! Genre endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{genre::NameInput, Genre, GenreDetail, Page, PageQuery},
    AppState,
};

use super::{
    deleted,
    extract::{AppJson, AppPath, AppQuery},
    CatalogManager, Deleted,
};

#[utoipa::path(
    get,
    path = "/genres",
    tag = "genres",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of genres", body = Page<Genre>),
        (status = 404, description = "Invalid page", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_genres(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<Page<Genre>>> {
    let page = state.services.catalog.list_genres(query.page).await?;
    Ok(Json(page))
}

/// Genre with the books filed under it
#[utoipa::path(
    get,
    path = "/genres/{id}",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre details", body = GenreDetail),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_genre(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<GenreDetail>> {
    let genre = state.services.catalog.get_genre(id).await?;
    Ok(Json(genre))
}

#[utoipa::path(
    post,
    path = "/genres",
    tag = "genres",
    security(("bearer_auth" = [])),
    request_body = NameInput,
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing catalog.manage", body = crate::error::ErrorResponse),
        (status = 409, description = "Name already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    CatalogManager(claims): CatalogManager,
    AppJson(input): AppJson<NameInput>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    let genre = state.services.catalog.create_genre(&claims, input).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

#[utoipa::path(
    put,
    path = "/genres/{id}",
    tag = "genres",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Genre ID")),
    request_body = NameInput,
    responses(
        (status = 200, description = "Genre updated", body = Genre),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing catalog.manage", body = crate::error::ErrorResponse),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Name already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_genre(
    State(state): State<AppState>,
    CatalogManager(claims): CatalogManager,
    AppPath(id): AppPath<i32>,
    AppJson(input): AppJson<NameInput>,
) -> AppResult<Json<Genre>> {
    let genre = state.services.catalog.update_genre(&claims, id, input).await?;
    Ok(Json(genre))
}

/// Delete a genre; its books stay in the catalog
#[utoipa::path(
    delete,
    path = "/genres/{id}",
    tag = "genres",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 204, description = "Genre deleted"),
        (status = 403, description = "Missing catalog.manage", body = crate::error::ErrorResponse),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_genre(
    State(state): State<AppState>,
    CatalogManager(claims): CatalogManager,
    AppPath(id): AppPath<i32>,
) -> AppResult<Deleted> {
    state.services.catalog.delete_genre(&claims, id).await?;
    Ok(deleted("/api/v1/genres"))
}
