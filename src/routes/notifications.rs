//! Notification routes: inbox, dismissal, and an on-demand release check.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::routes::auth::AuthUser;
use crate::services::notification::{self, CheckReport, NotificationError, UserNotification};
use crate::state::AppState;

pub(crate) fn notification_error_to_status(err: NotificationError) -> StatusCode {
    match err {
        NotificationError::NotFound(_) => StatusCode::NOT_FOUND,
        NotificationError::Database(e) => {
            tracing::error!(error = %e, "notification query failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// `GET /api/notifications` — undismissed, newest first.
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<UserNotification>>, StatusCode> {
    notification::list_active(&state.pool, auth.user.id)
        .await
        .map(Json)
        .map_err(notification_error_to_status)
}

/// `POST /api/notifications/:id/dismiss`
pub async fn dismiss_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    notification::dismiss(&state.pool, auth.user.id, id)
        .await
        .map_err(notification_error_to_status)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/notifications/check` — run the release check for the caller now.
pub async fn check_releases(State(state): State<AppState>, auth: AuthUser) -> Result<Json<CheckReport>, StatusCode> {
    notification::check_watching_games(&state.pool, state.catalog.as_ref(), auth.user.id, notification::today_utc())
        .await
        .map(Json)
        .map_err(notification_error_to_status)
}

#[cfg(test)]
#[path = "notifications_test.rs"]
mod tests;
