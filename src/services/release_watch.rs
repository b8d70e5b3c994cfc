//! Release watcher: periodic background run of the release check.
//!
//! DESIGN
//! ======
//! One task walks every user with Watching games, then sleeps for the
//! configured interval. Users are processed sequentially so catalog traffic
//! stays at one request at a time.
//!
//! ERROR HANDLING
//! ==============
//! A failing user is logged and skipped; the loop itself never exits.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info};

use super::collection;
use super::notification::{self, CheckReport};
use crate::state::AppState;

/// Spawn the watcher. Returns `None` when `interval_secs` is zero.
pub fn spawn_release_watch_task(state: AppState, interval_secs: u64) -> Option<JoinHandle<()>> {
    if interval_secs == 0 {
        info!("release watcher disabled");
        return None;
    }
    info!(interval_secs, "release watcher configured");
    Some(tokio::spawn(async move {
        loop {
            run_release_sweep(&state).await;
            tokio::time::sleep(Duration::from_secs(interval_secs)).await;
        }
    }))
}

/// Run the release check once for every user with Watching games.
pub async fn run_release_sweep(state: &AppState) -> CheckReport {
    let users = match collection::users_with_watching_games(&state.pool).await {
        Ok(users) => users,
        Err(e) => {
            error!(error = %e, "release sweep could not list users");
            return CheckReport::default();
        }
    };

    let today = notification::today_utc();
    let mut total = CheckReport::default();
    for user_id in users {
        match notification::check_watching_games(&state.pool, state.catalog.as_ref(), user_id, today).await {
            Ok(report) => {
                total.examined += report.examined;
                total.backfilled += report.backfilled;
                total.notified += report.notified;
            }
            Err(e) => error!(error = %e, %user_id, "release check failed"),
        }
    }

    if total.notified > 0 || total.backfilled > 0 {
        info!(
            examined = total.examined,
            backfilled = total.backfilled,
            notified = total.notified,
            "release sweep finished"
        );
    }
    total
}

#[cfg(test)]
#[path = "release_watch_test.rs"]
mod tests;
