//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router serves the JSON API under `/api` and the SPA shell for
//! page routes. Signed-out visitors asking for a guarded page are redirected
//! to `/sign-in`; the shell itself is a static `index.html` from the
//! configured static directory, which also serves every other asset.

pub mod auth;
pub mod collection;
pub mod games;
pub mod notifications;
pub mod share;
pub mod top_games;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{MethodRouter, get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::services::session;
use crate::state::AppState;

pub(crate) const SIGN_IN_PATH: &str = "/sign-in";
const HOME_PATH: &str = "/home";
const GUARDED_PAGES: [&str; 3] = ["/home", "/explore", "/top-games"];
const PUBLIC_PAGES: [&str; 3] = ["/sign-in", "/sign-up", "/share/{code}"];

/// JSON API routes.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/games", get(games::list_games))
        .route("/api/games/{id}", get(games::get_game))
        .route("/api/genres", get(games::list_genres))
        .route("/api/platforms", get(games::list_platforms))
        .route("/api/collection", get(collection::list_collection).post(collection::add_game))
        .route("/api/collection/statuses", get(collection::status_map))
        .route("/api/collection/status/{game_id}", get(collection::game_status))
        .route("/api/collection/{id}", axum::routing::delete(collection::remove_game))
        .route("/api/collection/{id}/rank", put(collection::update_rank))
        .route("/api/top-games", get(top_games::top_games))
        .route("/api/share", get(share::my_share_link))
        .route("/api/share/{code}", get(share::shared_ranking))
        .route("/api/notifications", get(notifications::list_notifications))
        .route("/api/notifications/check", post(notifications::check_releases))
        .route("/api/notifications/{id}/dismiss", post(notifications::dismiss_notification))
        .route("/healthz", get(healthz))
}

/// Full application: API, page routes, and static assets.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let shell_path = Arc::new(static_dir.join("index.html"));
    let guarded = guarded_shell(Arc::clone(&shell_path));

    let mut router = api_routes().route("/", get(redirect_home));
    for page in GUARDED_PAGES {
        router = router.route(page, guarded.clone());
    }
    for page in PUBLIC_PAGES {
        router = router.route_service(page, ServeFile::new(shell_path.as_path()));
    }

    router
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn redirect_home() -> Redirect {
    Redirect::temporary(HOME_PATH)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// PAGE GUARD
// =============================================================================

fn guarded_shell(shell_path: Arc<PathBuf>) -> MethodRouter<AppState> {
    get(move |State(state): State<AppState>, headers: HeaderMap| {
        let shell_path = Arc::clone(&shell_path);
        async move { guarded_page(&state, &headers, &shell_path).await }
    })
}

/// Whether the request carries a live session.
async fn has_session(state: &AppState, headers: &HeaderMap) -> bool {
    let Some(token) = auth::session_token(headers) else {
        return false;
    };
    match session::validate_session(&state.pool, &token).await {
        Ok(user) => user.is_some(),
        Err(e) => {
            tracing::error!(error = %e, "session lookup failed on page guard");
            false
        }
    }
}

async fn guarded_page(state: &AppState, headers: &HeaderMap, shell_path: &Path) -> Response {
    if !has_session(state, headers).await {
        return Redirect::temporary(SIGN_IN_PATH).into_response();
    }
    match tokio::fs::read_to_string(shell_path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, path = %shell_path.display(), "SPA shell missing");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
