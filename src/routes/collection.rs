//! Collection routes: list, add, remove, status lookup, and ranking.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::auth::AuthUser;
use crate::services::collection::{self, CollectionError, GameStatus, GameSummary, UserGame};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CollectionQuery {
    pub status: Option<String>,
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct AddGameBody {
    pub game: GameSummary,
    pub status: String,
}

#[derive(Deserialize)]
pub struct RankBody {
    pub rank: i32,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub game_id: i64,
    pub status: Option<GameStatus>,
}

/// Parse an optional status filter; blank or `all` means no filter.
pub(crate) fn parse_status_filter(raw: Option<&str>) -> Result<Option<GameStatus>, StatusCode> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|_| StatusCode::BAD_REQUEST),
    }
}

pub(crate) fn collection_error_to_status(err: CollectionError) -> StatusCode {
    match err {
        CollectionError::InvalidRank(_) => StatusCode::BAD_REQUEST,
        CollectionError::NotFound(_) => StatusCode::NOT_FOUND,
        CollectionError::Database(e) => {
            tracing::error!(error = %e, "collection query failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// `GET /api/collection` — the caller's games, optionally filtered.
pub async fn list_collection(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<CollectionQuery>,
) -> Result<Json<Vec<UserGame>>, StatusCode> {
    let status = parse_status_filter(query.status.as_deref())?;
    let games = collection::list_user_games(&state.pool, auth.user.id)
        .await
        .map_err(collection_error_to_status)?;
    Ok(Json(collection::filter_collection(games, status, query.q.as_deref().unwrap_or(""))))
}

/// `POST /api/collection` — add a game or change its status.
pub async fn add_game(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<AddGameBody>,
) -> Result<(StatusCode, Json<UserGame>), StatusCode> {
    let status: GameStatus = body.status.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
    if body.game.name.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let entry = collection::add_game(&state.pool, auth.user.id, &body.game, status)
        .await
        .map_err(collection_error_to_status)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// `DELETE /api/collection/:id`
pub async fn remove_game(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(entry_id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    collection::remove_game(&state.pool, auth.user.id, entry_id)
        .await
        .map_err(collection_error_to_status)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/collection/status/:game_id` — badge for one catalog game.
pub async fn game_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(game_id): Path<i64>,
) -> Json<StatusResponse> {
    let status = collection::game_status(&state.pool, auth.user.id, game_id).await;
    Json(StatusResponse { game_id, status })
}

/// `GET /api/collection/statuses` — `game_id -> status` for the explore grid.
pub async fn status_map(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<HashMap<i64, GameStatus>>, StatusCode> {
    let games = collection::list_user_games(&state.pool, auth.user.id)
        .await
        .map_err(collection_error_to_status)?;
    Ok(Json(collection::status_map(&games)))
}

/// `PUT /api/collection/:id/rank` — place on the board; `0` unranks.
pub async fn update_rank(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(entry_id): Path<Uuid>,
    Json(body): Json<RankBody>,
) -> Result<Json<UserGame>, StatusCode> {
    collection::update_rank(&state.pool, auth.user.id, entry_id, body.rank)
        .await
        .map(Json)
        .map_err(collection_error_to_status)
}

#[cfg(test)]
#[path = "collection_test.rs"]
mod tests;
