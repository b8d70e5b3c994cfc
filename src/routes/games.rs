//! Catalog routes: browse, search, and details proxied to RAWG.
//!
//! The API key never leaves the server; clients page with `page` and append
//! results while `next_page` is set.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;

use super::auth::AuthUser;
use crate::catalog::query::{BrowseTab, parse_id_list, preset_filters};
use crate::catalog::types::BrowsePage;
use crate::catalog::{CatalogError, GameDetails, GameFilters, Genre, ListResponse, Platform};
use crate::services::notification::today_utc;
use crate::state::AppState;

const LOAD_FAILED: &str = "Failed to load games. Please try again later.";

#[derive(Debug, Default, Deserialize)]
pub struct BrowseQuery {
    pub tab: Option<String>,
    pub page: Option<u32>,
    pub genres: Option<String>,
    pub platforms: Option<String>,
    pub ordering: Option<String>,
    pub dates: Option<String>,
    pub search: Option<String>,
    pub metacritic: Option<String>,
}

/// Resolve query params into a preset, caller filters, and a page number.
///
/// A `search` term without an explicit tab implies the search tab; the
/// search tab without a term is rejected.
pub(crate) fn browse_request(query: BrowseQuery) -> Result<(BrowseTab, GameFilters, u32), StatusCode> {
    let search = query.search.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty());

    let tab = match query.tab.as_deref() {
        Some(raw) => raw.parse::<BrowseTab>().map_err(|_| StatusCode::BAD_REQUEST)?,
        None if search.is_some() => BrowseTab::Search,
        None => BrowseTab::Popular,
    };
    if tab == BrowseTab::Search && search.is_none() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let filters = GameFilters {
        genres: parse_id_list(query.genres.as_deref()),
        platforms: parse_id_list(query.platforms.as_deref()),
        ordering: query.ordering,
        dates: query.dates,
        search,
        metacritic: query.metacritic,
    };
    Ok((tab, filters, query.page.unwrap_or(1).max(1)))
}

pub(crate) fn catalog_error_to_response(err: &CatalogError) -> Response {
    tracing::error!(error = %err, "catalog request failed");
    (StatusCode::BAD_GATEWAY, Json(serde_json::json!({ "error": LOAD_FAILED }))).into_response()
}

/// `GET /api/games` — one page of a browse preset or a search.
pub async fn list_games(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<BrowsePage>, Response> {
    let (tab, filters, page) = browse_request(query).map_err(IntoResponse::into_response)?;
    let filters = preset_filters(&tab, filters, today_utc());

    let response = state
        .catalog
        .games(&filters, page)
        .await
        .map_err(|e| catalog_error_to_response(&e))?;
    Ok(Json(BrowsePage::from_response(page, response)))
}

/// `GET /api/games/:id` — full details for one game.
pub async fn get_game(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(game_id): Path<i64>,
) -> Result<Json<GameDetails>, Response> {
    match state.catalog.game_details(game_id).await {
        Ok(details) => Ok(Json(details)),
        Err(CatalogError::Status { status: 404, .. }) => Err(StatusCode::NOT_FOUND.into_response()),
        Err(e) => Err(catalog_error_to_response(&e)),
    }
}

/// `GET /api/genres`
pub async fn list_genres(State(state): State<AppState>, _auth: AuthUser) -> Result<Json<ListResponse<Genre>>, Response> {
    state
        .catalog
        .genres()
        .await
        .map(Json)
        .map_err(|e| catalog_error_to_response(&e))
}

/// `GET /api/platforms`
pub async fn list_platforms(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<ListResponse<Platform>>, Response> {
    state
        .catalog
        .platforms()
        .await
        .map(Json)
        .map_err(|e| catalog_error_to_response(&e))
}

#[cfg(test)]
#[path = "games_test.rs"]
mod tests;
