//! Loan endpoints: borrowed copies and renewal

use axum::{extract::State, Json};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        loan::{RenewLoan, RenewalConfirmation, RenewalForm},
        LoanEntry, Page, PageQuery,
    },
    AppState,
};

use super::{
    extract::{AppJson, AppPath, AppQuery},
    AuthenticatedUser, CatalogManager,
};

/// Copies currently on loan to the caller
#[utoipa::path(
    get,
    path = "/loans/mine",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Caller's loans, soonest due first", body = Page<LoanEntry>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Invalid page", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_my_loans(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<Page<LoanEntry>>> {
    let page = state.services.loans.list_my_loans(&claims, query.page).await?;
    Ok(Json(page))
}

/// Every copy on loan, with borrowers
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "All loans, soonest due first", body = Page<LoanEntry>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing catalog.manage", body = crate::error::ErrorResponse),
        (status = 404, description = "Invalid page", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_all_loans(
    State(state): State<AppState>,
    CatalogManager(claims): CatalogManager,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<Page<LoanEntry>>> {
    let page = state.services.loans.list_all_loans(&claims, query.page).await?;
    Ok(Json(page))
}

/// Renewal form data with the proposed new due date
#[utoipa::path(
    get,
    path = "/instances/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Renewal form", body = RenewalForm),
        (status = 403, description = "Missing catalog.manage", body = crate::error::ErrorResponse),
        (status = 404, description = "Book instance not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn renewal_form(
    State(state): State<AppState>,
    CatalogManager(claims): CatalogManager,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<RenewalForm>> {
    let form = state.services.loans.renewal_form(&claims, id).await?;
    Ok(Json(form))
}

/// Renew a loan up to four weeks from today
#[utoipa::path(
    post,
    path = "/instances/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book instance ID")),
    request_body = RenewLoan,
    responses(
        (status = 200, description = "Loan renewed", body = RenewalConfirmation),
        (status = 400, description = "Renewal date out of range", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing catalog.manage", body = crate::error::ErrorResponse),
        (status = 404, description = "Book instance not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Copy is not on loan", body = crate::error::ErrorResponse)
    )
)]
pub async fn renew(
    State(state): State<AppState>,
    CatalogManager(claims): CatalogManager,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<RenewLoan>,
) -> AppResult<Json<RenewalConfirmation>> {
    let confirmation = state
        .services
        .loans
        .renew(&claims, id, request.renewal_date)
        .await?;
    Ok(Json(confirmation))
}
