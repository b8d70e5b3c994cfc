//! Top-games route: the caller's 30-slot board and unranked candidates.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;

use super::collection::collection_error_to_status;
use crate::routes::auth::AuthUser;
use crate::services::collection;
use crate::services::ranking::{self, TopGamesBoard};
use crate::state::AppState;

/// `GET /api/top-games`
pub async fn top_games(State(state): State<AppState>, auth: AuthUser) -> Result<Json<TopGamesBoard>, StatusCode> {
    let games = collection::list_user_games(&state.pool, auth.user.id)
        .await
        .map_err(collection_error_to_status)?;
    Ok(Json(ranking::top_games_board(&games)))
}
