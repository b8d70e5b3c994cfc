//! Catalog: RAWG game metadata client.
//!
//! DESIGN
//! ======
//! Handlers and the release watcher depend on the `GameCatalog` trait so
//! tests can substitute a mock. `RawgClient` is a thin HTTP wrapper; response
//! parsing lives in `parse_body` so it can be exercised without a network.
//!
//! ERROR HANDLING
//! ==============
//! Failures are reported once and never retried. Callers decide whether a
//! failure is fatal for their request.

pub mod query;
pub mod types;

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::config::CatalogConfig;
use query::build_game_query;
pub use types::{CatalogError, Game, GameDetails, GameFilters, GameResponse, Genre, ListResponse, Platform};

// =============================================================================
// TRAIT
// =============================================================================

#[async_trait::async_trait]
pub trait GameCatalog: Send + Sync {
    async fn genres(&self) -> Result<ListResponse<Genre>, CatalogError>;

    async fn platforms(&self) -> Result<ListResponse<Platform>, CatalogError>;

    async fn games(&self, filters: &GameFilters, page: u32) -> Result<GameResponse, CatalogError>;

    async fn game_details(&self, id: i64) -> Result<GameDetails, CatalogError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct RawgClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl RawgClient {
    /// Build a client from catalog config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| CatalogError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key: config.api_key.clone(), base_url: config.base_url.clone() })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&'static str, String)]) -> Result<T, CatalogError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        if !(200..300).contains(&status) {
            tracing::warn!(status, path, "catalog returned error status");
            return Err(CatalogError::Status { status, body: text });
        }

        parse_body(&text)
    }

    fn key_param(&self) -> [(&'static str, String); 1] {
        [("key", self.api_key.clone())]
    }
}

#[async_trait::async_trait]
impl GameCatalog for RawgClient {
    async fn genres(&self) -> Result<ListResponse<Genre>, CatalogError> {
        self.get("/genres", &self.key_param()).await
    }

    async fn platforms(&self) -> Result<ListResponse<Platform>, CatalogError> {
        self.get("/platforms", &self.key_param()).await
    }

    async fn games(&self, filters: &GameFilters, page: u32) -> Result<GameResponse, CatalogError> {
        let params = build_game_query(&self.api_key, filters, page);
        self.get("/games", &params).await
    }

    async fn game_details(&self, id: i64) -> Result<GameDetails, CatalogError> {
        self.get(&format!("/games/{id}"), &self.key_param()).await
    }
}

/// Deserialize a catalog response body.
pub(crate) fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T, CatalogError> {
    serde_json::from_str(text).map_err(|e| CatalogError::Parse(e.to_string()))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
