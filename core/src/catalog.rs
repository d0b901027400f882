use async_trait::async_trait;
use thiserror::Error;

use crate::model::{MovieKind, SearchPage};

/// Why a catalog fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Transport failure or non-success HTTP status.
    #[error("network error: {0}")]
    Network(String),
    /// Valid request, nothing matched. Callers treat this as an empty page.
    #[error("no results found")]
    NotFound,
    /// Payload could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// Upstream refused the request (bad key, query too broad, ...).
    #[error("{0}")]
    Rejected(String),
}

/// Remote movie catalog.
///
/// Contract: `total_results` is stable across pages of the same `(term, kind)`
/// and page `n` holds the results at offset `(n - 1) * PAGE_SIZE`.
#[async_trait]
pub trait MovieCatalogService: Send + Sync + 'static {
    async fn fetch(&self, term: &str, page: u32, kind: Option<MovieKind>) -> Result<SearchPage, CatalogError>;
}
