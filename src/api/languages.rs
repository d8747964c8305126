//! Language endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{genre::NameInput, Language, Page, PageQuery},
    AppState,
};

use super::{
    deleted,
    extract::{AppJson, AppPath, AppQuery},
    CatalogManager, Deleted,
};

#[utoipa::path(
    get,
    path = "/languages",
    tag = "languages",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of languages", body = Page<Language>),
        (status = 404, description = "Invalid page", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_languages(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<Page<Language>>> {
    let page = state.services.catalog.list_languages(query.page).await?;
    Ok(Json(page))
}

#[utoipa::path(
    post,
    path = "/languages",
    tag = "languages",
    security(("bearer_auth" = [])),
    request_body = NameInput,
    responses(
        (status = 201, description = "Language created", body = Language),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing catalog.manage", body = crate::error::ErrorResponse),
        (status = 409, description = "Name already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_language(
    State(state): State<AppState>,
    CatalogManager(claims): CatalogManager,
    AppJson(input): AppJson<NameInput>,
) -> AppResult<(StatusCode, Json<Language>)> {
    let language = state.services.catalog.create_language(&claims, input).await?;
    Ok((StatusCode::CREATED, Json(language)))
}

#[utoipa::path(
    put,
    path = "/languages/{id}",
    tag = "languages",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Language ID")),
    request_body = NameInput,
    responses(
        (status = 200, description = "Language updated", body = Language),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing catalog.manage", body = crate::error::ErrorResponse),
        (status = 404, description = "Language not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Name already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_language(
    State(state): State<AppState>,
    CatalogManager(claims): CatalogManager,
    AppPath(id): AppPath<i32>,
    AppJson(input): AppJson<NameInput>,
) -> AppResult<Json<Language>> {
    let language = state.services.catalog.update_language(&claims, id, input).await?;
    Ok(Json(language))
}

/// Delete a language no book is written in
#[utoipa::path(
    delete,
    path = "/languages/{id}",
    tag = "languages",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Language ID")),
    responses(
        (status = 204, description = "Language deleted"),
        (status = 403, description = "Missing catalog.manage", body = crate::error::ErrorResponse),
        (status = 404, description = "Language not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Language still used by books", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_language(
    State(state): State<AppState>,
    CatalogManager(claims): CatalogManager,
    AppPath(id): AppPath<i32>,
) -> AppResult<Deleted> {
    state.services.catalog.delete_language(&claims, id).await?;
    Ok(deleted("/api/v1/languages"))
}
