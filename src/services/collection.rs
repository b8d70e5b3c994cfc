//! Collection service: a user's tracked games.
//!
//! DESIGN
//! ======
//! Each row mirrors just enough catalog data (name, image, release date) to
//! render the collection and rankings without calling RAWG again.
//! Membership is unique per `(user_id, game_id)`; adding an existing game
//! upserts its status in one statement instead of read-then-write.
//!
//! Ranks are `1..=30`, with `NULL` meaning unranked, and unique per user
//! (partial unique index). Assigning a rank evicts whichever game held it,
//! inside a transaction that holds the user's row lock.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::ranking::TOP_SLOTS;
use crate::catalog::Game;
use crate::catalog::query::{format_date, parse_date};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("rank {0} is outside 0..=30")]
    InvalidRank(i32),
    #[error("collection entry not found: {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    Played,
    Playing,
    Watching,
}

impl GameStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Played => "Played",
            Self::Playing => "Playing",
            Self::Watching => "Watching",
        }
    }

}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown game status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for GameStatus {
    type Err = UnknownStatus;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "played" => Ok(Self::Played),
            "playing" => Ok(Self::Playing),
            "watching" => Ok(Self::Watching),
            _ => Err(UnknownStatus(raw.trim().to_owned())),
        }
    }
}

/// Minimal catalog data needed to add a game to a collection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameSummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub released: Option<String>,
}

impl From<&Game> for GameSummary {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id,
            name: game.name.clone(),
            background_image: game.background_image.clone(),
            released: game.released.clone(),
        }
    }
}

/// A row of `user_games`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserGame {
    pub id: Uuid,
    pub user_id: Uuid,
    pub game_id: i64,
    pub game_name: String,
    pub game_image: Option<String>,
    pub status: GameStatus,
    pub rank: Option<i32>,
    #[serde(serialize_with = "serialize_date")]
    pub released: Option<Date>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: OffsetDateTime,
}

impl UserGame {
    /// Rank if it places the game on the board.
    #[must_use]
    pub fn board_rank(&self) -> Option<i32> {
        self.rank.filter(|r| (1..=TOP_SLOTS).contains(r))
    }
}

fn serialize_date<S: Serializer>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error> {
    match date {
        Some(d) => serializer.serialize_some(&format_date(*d)),
        None => serializer.serialize_none(),
    }
}

pub(crate) fn serialize_timestamp<S: Serializer>(ts: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    let formatted = ts.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&formatted)
}

const USER_GAME_COLUMNS: &str = "id, user_id, game_id, game_name, game_image, status, rank, released, created_at";

fn user_game_from_row(row: &PgRow) -> UserGame {
    let status: String = row.get("status");
    UserGame {
        id: row.get("id"),
        user_id: row.get("user_id"),
        game_id: row.get("game_id"),
        game_name: row.get("game_name"),
        game_image: row.get("game_image"),
        // The column has a CHECK constraint; anything else is unreachable.
        status: status.parse().unwrap_or(GameStatus::Played),
        rank: row.get("rank"),
        released: row.get("released"),
        created_at: row.get("created_at"),
    }
}

// =============================================================================
// QUERIES
// =============================================================================

/// List a user's whole collection, newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_user_games(pool: &PgPool, user_id: Uuid) -> Result<Vec<UserGame>, CollectionError> {
    let rows = sqlx::query(&format!(
        "SELECT {USER_GAME_COLUMNS} FROM user_games WHERE user_id = $1 ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(user_game_from_row).collect())
}

/// Games currently placed on the board, by rank.
pub async fn list_ranked_games(pool: &PgPool, user_id: Uuid) -> Result<Vec<UserGame>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        "SELECT {USER_GAME_COLUMNS} FROM user_games
         WHERE user_id = $1 AND rank BETWEEN 1 AND $2
         ORDER BY rank ASC, created_at ASC"
    ))
    .bind(user_id)
    .bind(TOP_SLOTS)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(user_game_from_row).collect())
}

pub async fn list_watching_games(pool: &PgPool, user_id: Uuid) -> Result<Vec<UserGame>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        "SELECT {USER_GAME_COLUMNS} FROM user_games
         WHERE user_id = $1 AND status = 'Watching'
         ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(user_game_from_row).collect())
}

/// Users with at least one Watching game.
pub async fn users_with_watching_games(pool: &PgPool) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar("SELECT DISTINCT user_id FROM user_games WHERE status = 'Watching'")
        .fetch_all(pool)
        .await
}

/// Status of a catalog game in the user's collection.
///
/// Lookup failures are logged and reported as "not in collection".
pub async fn game_status(pool: &PgPool, user_id: Uuid, game_id: i64) -> Option<GameStatus> {
    let result = sqlx::query_scalar::<_, String>("SELECT status FROM user_games WHERE user_id = $1 AND game_id = $2")
        .bind(user_id)
        .bind(game_id)
        .fetch_optional(pool)
        .await;

    match result {
        Ok(status) => status.and_then(|s| s.parse().ok()),
        Err(e) => {
            tracing::error!(error = %e, %user_id, game_id, "game status lookup failed");
            None
        }
    }
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Add a game or change its status if already collected.
///
/// Re-adding keeps the original name and image; a missing release date is
/// filled in from the new summary.
///
/// # Errors
///
/// Returns a database error if the upsert fails.
pub async fn add_game(
    pool: &PgPool,
    user_id: Uuid,
    game: &GameSummary,
    status: GameStatus,
) -> Result<UserGame, CollectionError> {
    let released = game.released.as_deref().and_then(parse_date);
    let row = sqlx::query(&format!(
        "INSERT INTO user_games (user_id, game_id, game_name, game_image, status, released)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (user_id, game_id) DO UPDATE
             SET status = EXCLUDED.status,
                 released = COALESCE(user_games.released, EXCLUDED.released)
         RETURNING {USER_GAME_COLUMNS}"
    ))
    .bind(user_id)
    .bind(game.id)
    .bind(&game.name)
    .bind(&game.background_image)
    .bind(status.as_str())
    .bind(released)
    .fetch_one(pool)
    .await?;

    let entry = user_game_from_row(&row);
    tracing::info!(%user_id, game_id = game.id, status = status.as_str(), "collection entry saved");
    Ok(entry)
}

/// Remove an entry owned by `user_id`.
///
/// # Errors
///
/// `NotFound` if the entry does not exist or belongs to someone else.
pub async fn remove_game(pool: &PgPool, user_id: Uuid, entry_id: Uuid) -> Result<(), CollectionError> {
    let result = sqlx::query("DELETE FROM user_games WHERE id = $1 AND user_id = $2")
        .bind(entry_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CollectionError::NotFound(entry_id));
    }
    Ok(())
}

/// Check a requested rank; `0` means "remove from the board".
///
/// # Errors
///
/// `InvalidRank` outside `0..=30`.
pub fn validate_rank(rank: i32) -> Result<Option<i32>, CollectionError> {
    match rank {
        0 => Ok(None),
        r if (1..=TOP_SLOTS).contains(&r) => Ok(Some(r)),
        r => Err(CollectionError::InvalidRank(r)),
    }
}

/// Place an entry on the board (or take it off with rank `0`).
///
/// # Errors
///
/// `InvalidRank`, `NotFound`, or a database error.
pub async fn update_rank(pool: &PgPool, user_id: Uuid, entry_id: Uuid, rank: i32) -> Result<UserGame, CollectionError> {
    let rank = validate_rank(rank)?;
    let mut tx = pool.begin().await?;

    // Serialize rank changes per user: a concurrent update waits here, then
    // its eviction sees this one's committed rank.
    sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_optional(tx.as_mut())
        .await?
        .ok_or(CollectionError::NotFound(entry_id))?;

    if let Some(rank) = rank {
        sqlx::query("UPDATE user_games SET rank = NULL WHERE user_id = $1 AND rank = $2 AND id <> $3")
            .bind(user_id)
            .bind(rank)
            .bind(entry_id)
            .execute(tx.as_mut())
            .await?;
    }

    let row = sqlx::query(&format!(
        "UPDATE user_games SET rank = $3 WHERE id = $1 AND user_id = $2 RETURNING {USER_GAME_COLUMNS}"
    ))
    .bind(entry_id)
    .bind(user_id)
    .bind(rank)
    .fetch_optional(tx.as_mut())
    .await?
    .ok_or(CollectionError::NotFound(entry_id))?;

    tx.commit().await?;
    Ok(user_game_from_row(&row))
}

/// Record a release date learned from the catalog.
pub async fn set_release_date(pool: &PgPool, entry_id: Uuid, released: Date) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE user_games SET released = $2 WHERE id = $1")
        .bind(entry_id)
        .bind(released)
        .execute(pool)
        .await?;
    Ok(())
}

// =============================================================================
// VIEW HELPERS
// =============================================================================

/// `game_id -> status`, used to badge catalog results.
#[must_use]
pub fn status_map(games: &[UserGame]) -> HashMap<i64, GameStatus> {
    games.iter().map(|g| (g.game_id, g.status)).collect()
}

/// Narrow a collection by status and a case-insensitive name substring.
#[must_use]
pub fn filter_collection(games: Vec<UserGame>, status: Option<GameStatus>, query: &str) -> Vec<UserGame> {
    let needle = query.trim().to_lowercase();
    games
        .into_iter()
        .filter(|g| status.is_none_or(|s| g.status == s))
        .filter(|g| needle.is_empty() || g.game_name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
#[path = "collection_test.rs"]
mod tests;
