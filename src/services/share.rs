//! Share codes: public, read-only access to a user's top-30 board.
//!
//! Codes are assigned at registration and never rotate. Lookup requires no
//! session; only ranked games are exposed.

use rand::Rng;
use serde::Serialize;
use sqlx::{PgPool, Row};

use super::collection::{self, UserGame};
use super::ranking::{self, RankSlot};

pub const SHARE_CODE_LEN: usize = 8;
const SHARE_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const DEFAULT_OWNER_NAME: &str = "Player";

#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("invalid share code")]
    InvalidCode,
    #[error("share code not found")]
    NotFound,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Read-only view of someone's ranking.
#[derive(Debug, Clone, Serialize)]
pub struct SharedRanking {
    pub owner_name: String,
    pub slots: Vec<RankSlot>,
}

#[must_use]
pub fn generate_share_code() -> String {
    let mut rng = rand::rng();
    (0..SHARE_CODE_LEN)
        .map(|_| {
            let idx = rng.random_range(0..SHARE_CODE_ALPHABET.len());
            SHARE_CODE_ALPHABET[idx] as char
        })
        .collect()
}

/// Trim and uppercase a user-typed code; `None` if it cannot be a valid code.
#[must_use]
pub fn normalize_share_code(code: &str) -> Option<String> {
    let normalized = code.trim().to_ascii_uppercase();
    if normalized.len() != SHARE_CODE_LEN || !normalized.bytes().all(|b| SHARE_CODE_ALPHABET.contains(&b)) {
        return None;
    }
    Some(normalized)
}

#[must_use]
pub fn owner_display_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() { DEFAULT_OWNER_NAME.to_owned() } else { trimmed.to_owned() }
}

/// Resolve a share code to its owner's name and ranked slots.
///
/// # Errors
///
/// `InvalidCode` for malformed input, `NotFound` when no user owns the code.
pub async fn resolve_share_code(pool: &PgPool, code: &str) -> Result<SharedRanking, ShareError> {
    let code = normalize_share_code(code).ok_or(ShareError::InvalidCode)?;

    let owner = sqlx::query("SELECT id, name FROM users WHERE share_code = $1")
        .bind(&code)
        .fetch_optional(pool)
        .await?
        .ok_or(ShareError::NotFound)?;

    let owner_id: uuid::Uuid = owner.get("id");
    let owner_name: String = owner.get("name");
    let ranked: Vec<UserGame> = collection::list_ranked_games(pool, owner_id).await?;

    Ok(SharedRanking { owner_name: owner_display_name(&owner_name), slots: ranking::build_slots(&ranked) })
}

#[cfg(test)]
#[path = "share_test.rs"]
mod tests;
