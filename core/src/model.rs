use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of results the catalog returns per page.
pub const PAGE_SIZE: usize = 10;

/// Catalog entry type, also used as the optional search filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovieKind {
    Movie,
    Series,
    Episode,
    /// Anything else upstream reports (e.g. "game"). Never sent as a filter.
    #[serde(other)]
    Other,
}

impl MovieKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovieKind::Movie => "movie",
            MovieKind::Series => "series",
            MovieKind::Episode => "episode",
            MovieKind::Other => "other",
        }
    }
}

impl fmt::Display for MovieKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown type filter: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for MovieKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" | "movies" => Ok(MovieKind::Movie),
            "series" => Ok(MovieKind::Series),
            "episode" | "episodes" => Ok(MovieKind::Episode),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// One search hit. Field names follow the catalog wire format so the same
/// shape is used for responses and for the persisted starred set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    #[serde(rename = "imdbID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster_url: String,
    #[serde(rename = "Type")]
    pub kind: MovieKind,
}

/// A query identity (`term`, `kind`) plus the page being requested within it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    pub term: String,
    pub kind: Option<MovieKind>,
    pub page: u32,
}

/// One page as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchPage {
    pub items: Vec<MovieSummary>,
    pub total_results: u64,
}

impl SearchPage {
    pub fn empty() -> Self { Self::default() }
}

/// `ceil(total_results / PAGE_SIZE)`
pub fn total_pages(total_results: u64) -> u64 {
    total_results.div_ceil(PAGE_SIZE as u64)
}
