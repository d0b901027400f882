use std::sync::Arc;
use tokio::task::JoinSet;

use crate::catalog::{CatalogError, MovieCatalogService};
use crate::model::{MovieKind, SearchPage};
use crate::scroll::PageSource;
use crate::search::{FetchRequest, SearchState, Settlement};

struct Settled {
    request: FetchRequest,
    result: Result<SearchPage, CatalogError>,
}

/// Drives a [`SearchState`] against a catalog.
///
/// Operations spawn fetches on the tokio runtime and return immediately.
/// Completions are only applied when the owner calls [`settle_next`](Self::settle_next)
/// or [`settle_all`](Self::settle_all), so every state change happens through
/// `&mut self` on the owner's task. Superseded fetches are left to finish and
/// their results are dropped.
pub struct SearchController<C: MovieCatalogService> {
    catalog: Arc<C>,
    state: SearchState,
    in_flight: JoinSet<Settled>,
}

impl<C: MovieCatalogService> SearchController<C> {
    pub fn new(catalog: Arc<C>) -> Self {
        Self { catalog, state: SearchState::new(), in_flight: JoinSet::new() }
    }

    pub fn state(&self) -> &SearchState { &self.state }

    pub fn submit_query(&mut self, term: &str, kind: Option<MovieKind>) {
        if let Some(request) = self.state.submit_query(term, kind) {
            self.dispatch(request);
        }
    }

    pub fn change_filter(&mut self, kind: Option<MovieKind>) {
        if let Some(request) = self.state.change_filter(kind) {
            self.dispatch(request);
        }
    }

    /// Returns whether a fetch was issued.
    pub fn request_next_page(&mut self) -> bool {
        match self.state.request_next_page() {
            Some(request) => {
                self.dispatch(request);
                true
            }
            None => false,
        }
    }

    /// Fetches spawned and not yet settled, stale ones included.
    pub fn in_flight(&self) -> usize { self.in_flight.len() }

    /// Wait for the next fetch to complete and apply it. `None` if nothing is in flight.
    pub async fn settle_next(&mut self) -> Option<Settlement> {
        let joined = self.in_flight.join_next().await?;
        let settlement = match joined {
            Ok(Settled { request, result }) => self.state.on_fetch_settled(request.generation, request.page, result),
            Err(e) => {
                tracing::error!(error = %e, "fetch task did not complete");
                Settlement::Discarded
            }
        };

        // The current request is still loading but no task is left to answer it.
        if self.in_flight.is_empty() && self.state.is_loading() {
            let generation = self.state.generation();
            let page = self.state.query().page;
            self.state.on_fetch_settled(generation, page, Err(CatalogError::Network("fetch task aborted".into())));
        }
        Some(settlement)
    }

    /// Settle every in-flight fetch.
    pub async fn settle_all(&mut self) {
        while self.settle_next().await.is_some() {}
    }

    fn dispatch(&mut self, request: FetchRequest) {
        let catalog = Arc::clone(&self.catalog);
        tracing::debug!(generation = request.generation, page = request.page, in_flight = self.in_flight.len(), "dispatching fetch");
        self.in_flight.spawn(async move {
            let result = catalog.fetch(&request.term, request.page, request.kind).await;
            Settled { request, result }
        });
    }
}

impl<C: MovieCatalogService> PageSource for SearchController<C> {
    fn is_loading(&self) -> bool { self.state.is_loading() }
    fn is_exhausted(&self) -> bool { self.state.is_exhausted() }
    fn request_next_page(&mut self) -> bool { SearchController::request_next_page(self) }
}
