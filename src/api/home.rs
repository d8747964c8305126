//! Home page summary endpoint

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::{error::AppResult, models::HomeSummary, AppState};

/// Catalog counts and the visit counter of the caller's session
#[utoipa::path(
    get,
    path = "/home",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalog summary", body = HomeSummary),
        (status = 500, description = "Database or Redis failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn home(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<HomeSummary>)> {
    let cookie_name = state.config.session.cookie_name.clone();

    // Unknown or malformed ids are replaced by a fresh session
    let existing = jar
        .get(&cookie_name)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

    let (jar, session_id) = match existing {
        Some(id) => (jar, id),
        None => {
            let id = Uuid::new_v4();
            let cookie = Cookie::build((cookie_name, id.to_string()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax);
            (jar.add(cookie), id)
        }
    };

    let summary = state.services.summary.home(&session_id.to_string()).await?;
    Ok((jar, Json(summary)))
}
