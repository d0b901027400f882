pub mod catalog;
pub mod controller;
pub mod model;
pub mod persist;
pub mod query;
pub mod scroll;
pub mod search;
pub mod starred;

pub use catalog::{CatalogError, MovieCatalogService};
pub use controller::SearchController;
pub use model::{MovieKind, MovieSummary, SearchPage, SearchQuery, UnknownKind, PAGE_SIZE};
pub use persist::{MemoryStore, PersistentKeyValueStore, SledStore, StoreError};
pub use scroll::{InfiniteScrollTrigger, LoadMoreViewport, PageSource, Viewport};
pub use search::{FetchRequest, SearchState, SearchStatus, Settlement};
pub use starred::StarredCollection;
