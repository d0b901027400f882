pub mod client;
pub mod models;

pub use client::{CatalogConfig, OmdbClient, TitleLookup, DEFAULT_BASE_URL};
pub use models::{parse_detail, parse_search, MovieDetail};
