use std::collections::HashSet;

use crate::catalog::CatalogError;
use crate::model::{total_pages, MovieKind, MovieSummary, SearchPage, SearchQuery};
use crate::query::normalize_term;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// A fetch the driver must perform. `generation` ties the response back to the
/// query identity that asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub page: u32,
    pub term: String,
    pub kind: Option<MovieKind>,
}

/// What happened to a settled fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Applied,
    /// Response belonged to a superseded query identity (or an unexpected page) and was dropped.
    Discarded,
}

/// Search/pagination state machine. Performs no I/O: operations that need a
/// fetch return a [`FetchRequest`], and the caller reports the outcome through
/// [`SearchState::on_fetch_settled`].
#[derive(Debug, Default)]
pub struct SearchState {
    query: SearchQuery,
    items: Vec<MovieSummary>,
    ids: HashSet<String>,
    total_results: u64,
    status: SearchStatus,
    error_message: Option<String>,
    generation: u64,
    // highest page applied in the current generation
    loaded_page: u32,
    // a page past the first came back empty; stop asking even if total_results says otherwise
    drained: bool,
}

impl SearchState {
    pub fn new() -> Self { Self::default() }

    /// Start a new query identity. An empty term clears the results and issues nothing.
    ///
    /// The generation advances in both cases so responses to the previous
    /// identity are dropped when they arrive.
    pub fn submit_query(&mut self, term: &str, kind: Option<MovieKind>) -> Option<FetchRequest> {
        let term = normalize_term(term);
        self.generation += 1;
        self.query = SearchQuery { term, kind, page: 1 };
        self.items.clear();
        self.ids.clear();
        self.total_results = 0;
        self.loaded_page = 0;
        self.drained = false;
        self.error_message = None;

        if self.query.term.is_empty() {
            self.status = SearchStatus::Idle;
            tracing::debug!(generation = self.generation, "empty term, search reset");
            return None;
        }
        self.status = SearchStatus::Loading;
        tracing::debug!(generation = self.generation, term = %self.query.term, kind = ?kind, "new query");
        Some(self.request())
    }

    /// Same reset semantics as [`submit_query`](Self::submit_query), keeping the current term.
    pub fn change_filter(&mut self, kind: Option<MovieKind>) -> Option<FetchRequest> {
        let term = self.query.term.clone();
        self.submit_query(&term, kind)
    }

    /// Advance to the page after the last applied one. No-op while loading or once exhausted.
    pub fn request_next_page(&mut self) -> Option<FetchRequest> {
        if self.is_loading() || self.is_exhausted() {
            return None;
        }
        self.query.page = self.loaded_page + 1;
        self.status = SearchStatus::Loading;
        self.error_message = None;
        tracing::debug!(generation = self.generation, page = self.query.page, "next page");
        Some(self.request())
    }

    /// Apply the outcome of a fetch issued for `generation`/`page`.
    pub fn on_fetch_settled(&mut self, generation: u64, page: u32, result: Result<SearchPage, CatalogError>) -> Settlement {
        if generation != self.generation {
            tracing::info!(stale = generation, current = self.generation, page, "discarding stale response");
            return Settlement::Discarded;
        }
        if self.status != SearchStatus::Loading || page != self.query.page {
            tracing::warn!(generation, page, expected = self.query.page, "discarding unexpected page");
            return Settlement::Discarded;
        }

        match result {
            Ok(data) => self.apply_page(page, data),
            Err(CatalogError::NotFound) => self.apply_page(page, SearchPage::empty()),
            Err(e) => {
                tracing::debug!(generation, page, error = %e, "fetch failed");
                self.status = SearchStatus::Error;
                self.error_message = Some(e.to_string());
                self.query.page = self.loaded_page.max(1);
            }
        }
        Settlement::Applied
    }

    fn apply_page(&mut self, page: u32, data: SearchPage) {
        if page == 1 {
            self.items.clear();
            self.ids.clear();
            self.total_results = data.total_results;
        } else if data.total_results != self.total_results {
            tracing::warn!(kept = self.total_results, reported = data.total_results, page, "total results changed between pages");
        }

        let empty_page = data.items.is_empty();
        let mut truncated = 0usize;
        for movie in data.items {
            if self.ids.contains(&movie.id) {
                continue;
            }
            if self.items.len() as u64 >= self.total_results {
                truncated += 1;
                continue;
            }
            self.ids.insert(movie.id.clone());
            self.items.push(movie);
        }
        if truncated > 0 {
            tracing::warn!(truncated, total = self.total_results, page, "page overflows total results");
        }
        if page > 1 && empty_page && !self.is_exhausted() {
            tracing::warn!(page, loaded = self.items.len(), total = self.total_results, "empty page before total reached, treating results as exhausted");
            self.drained = true;
        }

        self.loaded_page = page;
        self.status = SearchStatus::Success;
        tracing::debug!(generation = self.generation, page, loaded = self.items.len(), total = self.total_results, "page applied");
    }

    fn request(&self) -> FetchRequest {
        FetchRequest {
            generation: self.generation,
            page: self.query.page,
            term: self.query.term.clone(),
            kind: self.query.kind,
        }
    }

    pub fn query(&self) -> &SearchQuery { &self.query }
    pub fn items(&self) -> &[MovieSummary] { &self.items }
    pub fn total_results(&self) -> u64 { self.total_results }
    pub fn total_pages(&self) -> u64 { total_pages(self.total_results) }
    pub fn status(&self) -> SearchStatus { self.status }
    pub fn error_message(&self) -> Option<&str> { self.error_message.as_deref() }
    pub fn generation(&self) -> u64 { self.generation }
    pub fn is_loading(&self) -> bool { self.status == SearchStatus::Loading }

    /// Every result of the current query is loaded (or there is no query).
    pub fn is_exhausted(&self) -> bool {
        self.drained || self.items.len() as u64 >= self.total_results
    }
}
