//! Query construction for RAWG list endpoints.
//!
//! DESIGN
//! ======
//! Everything here is pure: browse presets take "today" as an argument so the
//! date windows can be tested without a clock.

use std::str::FromStr;

use time::{Date, Duration, Month};
use time::macros::format_description;

use super::types::GameFilters;

/// Fixed page size for every browse query.
pub const PAGE_SIZE: u32 = 12;

const CLASSICS_DATES: &str = "1980-01-01,2000-12-31";

/// Browse presets offered by the explore view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseTab {
    Popular,
    New,
    Upcoming,
    Classics,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown browse tab: {0}")]
pub struct UnknownTab(pub String);

impl FromStr for BrowseTab {
    type Err = UnknownTab;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "popular" => Ok(Self::Popular),
            "new" => Ok(Self::New),
            "upcoming" => Ok(Self::Upcoming),
            "classics" => Ok(Self::Classics),
            "search" => Ok(Self::Search),
            _ => Err(UnknownTab(raw.trim().to_owned())),
        }
    }
}

/// Apply a browse preset's defaults to caller filters.
///
/// Caller-supplied `ordering` and `dates` win over the preset. `Search` only
/// requires `filters.search` to be set; it carries no defaults of its own.
#[must_use]
pub fn preset_filters(tab: &BrowseTab, mut filters: GameFilters, today: Date) -> GameFilters {
    let (dates, ordering) = match tab {
        BrowseTab::Popular => (None, "-added"),
        BrowseTab::New => (Some(date_range(shift_years(today, -1), today)), "-released"),
        BrowseTab::Upcoming => {
            let tomorrow = today.saturating_add(Duration::days(1));
            (Some(date_range(tomorrow, shift_years(today, 1))), "-added")
        }
        BrowseTab::Classics => (Some(CLASSICS_DATES.to_owned()), "-metacritic"),
        BrowseTab::Search => return filters,
    };

    if filters.dates.as_deref().is_none_or(str::is_empty) {
        filters.dates = dates;
    }
    if filters.ordering.as_deref().is_none_or(str::is_empty) {
        filters.ordering = Some(ordering.to_owned());
    }
    filters
}

/// Build the query string pairs for `/games`.
///
/// Empty filter values are omitted entirely rather than sent blank.
#[must_use]
pub fn build_game_query(api_key: &str, filters: &GameFilters, page: u32) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("key", api_key.to_owned()),
        ("page_size", PAGE_SIZE.to_string()),
        ("page", page.max(1).to_string()),
    ];

    if !filters.genres.is_empty() {
        params.push(("genres", join_ids(&filters.genres)));
    }
    if !filters.platforms.is_empty() {
        params.push(("platforms", join_ids(&filters.platforms)));
    }

    let optional = [
        ("ordering", &filters.ordering),
        ("dates", &filters.dates),
        ("search", &filters.search),
        ("metacritic", &filters.metacritic),
    ];
    for (key, value) in optional {
        if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            params.push((key, value.to_owned()));
        }
    }

    params
}

/// Parse a comma-separated id list (`"4,51"`), skipping junk entries.
#[must_use]
pub fn parse_id_list(raw: Option<&str>) -> Vec<i64> {
    raw.unwrap_or_default()
        .split(',')
        .filter_map(|part| part.trim().parse::<i64>().ok())
        .collect()
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter().map(i64::to_string).collect::<Vec<_>>().join(",")
}

/// Format a `YYYY-MM-DD` date.
#[must_use]
pub fn format_date(date: Date) -> String {
    let format = format_description!("[year]-[month]-[day]");
    date.format(&format).unwrap_or_default()
}

/// Parse the leading `YYYY-MM-DD` of a catalog date or timestamp.
#[must_use]
pub fn parse_date(raw: &str) -> Option<Date> {
    let format = format_description!("[year]-[month]-[day]");
    let head = raw.trim().get(..10)?;
    Date::parse(head, &format).ok()
}

fn date_range(from: Date, to: Date) -> String {
    format!("{},{}", format_date(from), format_date(to))
}

/// Move a date by whole years; Feb 29 lands on Feb 28 in non-leap years.
#[must_use]
pub fn shift_years(date: Date, years: i32) -> Date {
    let year = date.year() + years;
    date.replace_year(year).unwrap_or_else(|_| {
        Date::from_calendar_date(year, Month::February, 28).unwrap_or(date)
    })
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
