//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the database pool and the catalog client; all per-user data lives
//! in Postgres, so there is no in-memory cache to keep coherent.

use std::sync::Arc;

use sqlx::PgPool;

use crate::catalog::GameCatalog;

/// Shared application state, injected into Axum handlers via State extractor.
/// Cheap to clone: the pool and the catalog are both shared handles.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub catalog: Arc<dyn GameCatalog>,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, catalog: Arc<dyn GameCatalog>) -> Self {
        Self { pool, catalog }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
