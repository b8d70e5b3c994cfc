//! Share routes: the caller's own code, and the public read-only view.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;

use crate::routes::auth::AuthUser;
use crate::services::share::{self, ShareError, SharedRanking};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ShareLink {
    pub share_code: String,
    pub share_path: String,
}

impl ShareLink {
    fn new(code: &str) -> Self {
        Self { share_code: code.to_owned(), share_path: format!("/share/{code}") }
    }
}

pub(crate) fn share_error_to_status(err: ShareError) -> StatusCode {
    match err {
        ShareError::InvalidCode | ShareError::NotFound => StatusCode::NOT_FOUND,
        ShareError::Db(e) => {
            tracing::error!(error = %e, "share lookup failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// `GET /api/share` — the caller's share code and page path.
pub async fn my_share_link(auth: AuthUser) -> Json<ShareLink> {
    Json(ShareLink::new(&auth.user.share_code))
}

/// `GET /api/share/:code` — public; no session required.
pub async fn shared_ranking(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<SharedRanking>, StatusCode> {
    share::resolve_share_code(&state.pool, &code)
        .await
        .map(Json)
        .map_err(share_error_to_status)
}

#[cfg(test)]
#[path = "share_test.rs"]
mod tests;
