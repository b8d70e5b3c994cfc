//! Catalog wire types: RAWG response envelopes and query filters.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by catalog client operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The HTTP request to the catalog failed before a response arrived.
    #[error("catalog request failed: {0}")]
    Request(String),

    /// The catalog returned a non-success HTTP status.
    #[error("catalog response error: status {status}")]
    Status { status: u16, body: String },

    /// The response body could not be deserialized.
    #[error("catalog response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// ENTITIES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// RAWG nests each platform one level deep: `{"platform": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformEntry {
    pub platform: Platform,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

/// A catalog game as returned by list queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub name: String,
    /// `YYYY-MM-DD`, absent for unannounced titles.
    #[serde(default)]
    pub released: Option<String>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub metacritic: Option<i32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub platforms: Vec<PlatformEntry>,
}

/// Full game record from `/games/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDetails {
    #[serde(flatten)]
    pub game: Game,
    #[serde(default)]
    pub description_raw: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub reddit_url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genres: Vec<NamedRef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub publishers: Vec<NamedRef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub developers: Vec<NamedRef>,
    #[serde(default)]
    pub playtime: i64,
    #[serde(default)]
    pub achievements_count: i64,
    #[serde(default)]
    pub esrb_rating: Option<NamedRef>,
}

/// Paged result envelope shared by every RAWG list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub count: i64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

pub type GameResponse = ListResponse<Game>;

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// FILTERS
// =============================================================================

/// Optional narrowing applied to a `/games` list query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameFilters {
    #[serde(default)]
    pub genres: Vec<i64>,
    #[serde(default)]
    pub platforms: Vec<i64>,
    #[serde(default)]
    pub ordering: Option<String>,
    /// `"YYYY-MM-DD,YYYY-MM-DD"`.
    #[serde(default)]
    pub dates: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub metacritic: Option<String>,
}

/// One page of browse results, annotated for "load more".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowsePage {
    pub count: i64,
    pub page: u32,
    /// Next page to request, `None` once the catalog reports no more pages.
    pub next_page: Option<u32>,
    pub results: Vec<Game>,
}

impl BrowsePage {
    #[must_use]
    pub fn from_response(page: u32, response: GameResponse) -> Self {
        let next_page = response.next.as_ref().filter(|n| !n.is_empty()).and_then(|_| page.checked_add(1));
        Self { count: response.count, page, next_page, results: response.results }
    }
}
