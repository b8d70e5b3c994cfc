//! Notifications: inbox rows and the watched-game release check.
//!
//! DESIGN
//! ======
//! A release notification exists at most once per `(user, game)`; the partial
//! unique index lets concurrent checks (manual + background) race safely with
//! `ON CONFLICT DO NOTHING`.
//!
//! ERROR HANDLING
//! ==============
//! The release check is best-effort. A catalog or store failure for one game
//! is logged and that game is skipped; the rest still run.

use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use time::{Date, OffsetDateTime};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::collection::{self, UserGame, serialize_timestamp};
use crate::catalog::GameCatalog;
use crate::catalog::query::parse_date;

pub const RELEASE_TITLE: &str = "Game Released!";

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification not found: {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserNotification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub dismissed: bool,
    #[serde(serialize_with = "serialize_timestamp")]
    pub date_sent: OffsetDateTime,
    pub game_id: Option<i64>,
}

fn notification_from_row(row: &PgRow) -> UserNotification {
    UserNotification {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        message: row.get("message"),
        dismissed: row.get("dismissed"),
        date_sent: row.get("date_sent"),
        game_id: row.get("game_id"),
    }
}

/// Outcome of one release check run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Watching games looked at.
    pub examined: usize,
    /// Release dates filled in from the catalog.
    pub backfilled: usize,
    /// Notifications newly created.
    pub notified: usize,
}

// =============================================================================
// INBOX
// =============================================================================

/// Undismissed notifications, newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_active(pool: &PgPool, user_id: Uuid) -> Result<Vec<UserNotification>, NotificationError> {
    let rows = sqlx::query(
        "SELECT id, user_id, title, message, dismissed, date_sent, game_id
         FROM user_notifications
         WHERE user_id = $1 AND dismissed = false
         ORDER BY date_sent DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(notification_from_row).collect())
}

/// Create a notification. Returns `false` when the game already has one.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    title: &str,
    message: &str,
    game_id: Option<i64>,
) -> Result<bool, NotificationError> {
    let result = sqlx::query(
        "INSERT INTO user_notifications (user_id, title, message, game_id)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (user_id, game_id) WHERE game_id IS NOT NULL DO NOTHING",
    )
    .bind(user_id)
    .bind(title)
    .bind(message)
    .bind(game_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Mark one of the user's notifications dismissed.
///
/// # Errors
///
/// `NotFound` if the notification does not exist or belongs to someone else.
pub async fn dismiss(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), NotificationError> {
    let result = sqlx::query("UPDATE user_notifications SET dismissed = true WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(NotificationError::NotFound(id));
    }
    Ok(())
}

// =============================================================================
// RELEASE CHECK
// =============================================================================

/// Whether a release date has arrived. Both sides are UTC calendar dates.
#[must_use]
pub fn is_released(released: Date, today: Date) -> bool {
    released <= today
}

#[must_use]
pub fn release_message(game_name: &str) -> String {
    format!("{game_name} has been released!")
}

/// Today's date in UTC.
#[must_use]
pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Notify the user about every Watching game whose release date has passed.
///
/// Games with no stored date are looked up in the catalog first, and a date
/// found there is written back to the collection.
///
/// # Errors
///
/// Returns a database error only if the Watching list cannot be loaded.
pub async fn check_watching_games(
    pool: &PgPool,
    catalog: &dyn GameCatalog,
    user_id: Uuid,
    today: Date,
) -> Result<CheckReport, NotificationError> {
    let watching = collection::list_watching_games(pool, user_id).await?;
    let mut report = CheckReport { examined: watching.len(), ..CheckReport::default() };

    for game in &watching {
        let released = match game.released {
            Some(date) => Some(date),
            None => {
                let found = backfill_release_date(pool, catalog, game).await;
                if found.is_some() {
                    report.backfilled += 1;
                }
                found
            }
        };

        let Some(released) = released else {
            continue;
        };
        if !is_released(released, today) {
            continue;
        }

        match create(pool, user_id, RELEASE_TITLE, &release_message(&game.game_name), Some(game.game_id)).await {
            Ok(true) => {
                report.notified += 1;
                info!(%user_id, game_id = game.game_id, "release notification created");
            }
            Ok(false) => {}
            Err(e) => {
                error!(error = %e, %user_id, game = %game.game_name, "release notification insert failed");
            }
        }
    }

    Ok(report)
}

async fn backfill_release_date(pool: &PgPool, catalog: &dyn GameCatalog, game: &UserGame) -> Option<Date> {
    let details = match catalog.game_details(game.game_id).await {
        Ok(details) => details,
        Err(e) => {
            warn!(error = %e, game = %game.game_name, "release date lookup failed");
            return None;
        }
    };

    let released = details.game.released.as_deref().and_then(parse_date)?;
    if let Err(e) = collection::set_release_date(pool, game.id, released).await {
        error!(error = %e, game = %game.game_name, "release date backfill failed");
    }
    Some(released)
}

#[cfg(test)]
#[path = "notification_test.rs"]
mod tests;
