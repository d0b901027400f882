use async_trait::async_trait;
use reqwest::Client;
use scout_core::{CatalogError, MovieCatalogService, MovieKind, SearchPage};
use std::time::Duration;

use crate::models::{check_envelope, parse_detail, parse_search, MovieDetail};

/// Look up the full record of one title.
#[async_trait]
pub trait TitleLookup: Send + Sync + 'static {
    async fn details(&self, id: &str) -> Result<MovieDetail, CatalogError>;
}

pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com";

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout_secs: 12,
            user_agent: format!("scout/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client for an OMDb-compatible catalog.
pub struct OmdbClient {
    client: Client,
    config: CatalogConfig,
}

impl OmdbClient {
    pub fn new(config: CatalogConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn url(&self) -> String {
        format!("{}/", self.config.base_url.trim_end_matches('/'))
    }

    async fn get(&self, params: &[(&str, &str)]) -> Result<String, CatalogError> {
        let response = self
            .client
            .get(self.url())
            .query(&[("apikey", self.config.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| CatalogError::Network(e.to_string()))?;
        if !status.is_success() {
            tracing::debug!(%status, "catalog returned error status");
            // the catalog explains refusals (e.g. a bad key) in the usual envelope
            return match check_envelope(&body) {
                Err(e @ (CatalogError::Rejected(_) | CatalogError::NotFound)) => Err(e),
                _ => Err(CatalogError::Network(format!("HTTP {}", status.as_u16()))),
            };
        }
        Ok(body)
    }
}

#[async_trait]
impl TitleLookup for OmdbClient {
    /// Full plot included.
    async fn details(&self, id: &str) -> Result<MovieDetail, CatalogError> {
        let body = self.get(&[("i", id), ("plot", "full")]).await?;
        parse_detail(&body)
    }
}

#[async_trait]
impl MovieCatalogService for OmdbClient {
    async fn fetch(&self, term: &str, page: u32, kind: Option<MovieKind>) -> Result<SearchPage, CatalogError> {
        let page_param = page.to_string();
        let mut params = vec![("s", term), ("page", page_param.as_str())];
        if let Some(kind) = kind.filter(|k| *k != MovieKind::Other) {
            params.push(("type", kind.as_str()));
        }
        let started = std::time::Instant::now();
        let result = self.get(&params).await.and_then(|body| parse_search(&body));
        match &result {
            Ok(p) => tracing::debug!(term, page, items = p.items.len(), total = p.total_results, took_ms = started.elapsed().as_millis() as u64, "catalog page"),
            Err(e) => tracing::debug!(term, page, error = %e, "catalog fetch failed"),
        }
        result
    }
}
