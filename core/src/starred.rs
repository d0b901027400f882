use std::collections::HashSet;

use crate::model::MovieSummary;
use crate::persist::PersistentKeyValueStore;

/// Key under which the full starred set is stored.
pub const STARRED_KEY: &str = "starredMovies";

/// Starred movies, unique by id, kept in the order they were starred.
///
/// The only way to build one is [`StarredCollection::load`], so the store is
/// read exactly once per collection. Every toggle rewrites the whole set.
pub struct StarredCollection<S: PersistentKeyValueStore> {
    store: S,
    movies: Vec<MovieSummary>,
    ids: HashSet<String>,
}

impl<S: PersistentKeyValueStore> StarredCollection<S> {
    /// Warm start from `store`. Missing, unreadable or malformed data yields an empty set.
    pub fn load(store: S) -> Self {
        let stored: Vec<MovieSummary> = match store.get(STARRED_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "discarding malformed starred set");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read starred set");
                Vec::new()
            }
        };

        let mut movies = Vec::with_capacity(stored.len());
        let mut ids = HashSet::with_capacity(stored.len());
        for movie in stored {
            if ids.insert(movie.id.clone()) {
                movies.push(movie);
            }
        }
        tracing::debug!(count = movies.len(), "loaded starred set");
        Self { store, movies, ids }
    }

    pub fn is_starred(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Star `movie` if it is not starred, otherwise unstar it. Returns whether it is starred now.
    ///
    /// A failed write is logged and otherwise ignored: the in-memory set still
    /// reflects the toggle for the rest of the session.
    pub fn toggle(&mut self, movie: &MovieSummary) -> bool {
        let starred = if self.ids.remove(&movie.id) {
            self.movies.retain(|m| m.id != movie.id);
            false
        } else {
            self.ids.insert(movie.id.clone());
            self.movies.push(movie.clone());
            true
        };
        self.persist();
        starred
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovieSummary> {
        self.movies.iter()
    }

    pub fn len(&self) -> usize { self.movies.len() }

    pub fn is_empty(&self) -> bool { self.movies.is_empty() }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.movies) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "could not serialize starred set");
                return;
            }
        };
        if let Err(e) = self.store.set(STARRED_KEY, &json) {
            tracing::warn!(error = %e, count = self.movies.len(), "starred set not persisted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MovieKind;
    use crate::persist::{MemoryStore, StoreError};

    fn movie(id: &str) -> MovieSummary {
        MovieSummary { id: id.into(), title: format!("Title {id}"), year: "1994".into(), poster_url: "N/A".into(), kind: MovieKind::Movie }
    }

    struct BrokenStore;

    impl PersistentKeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Read("disk gone".into()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Write("disk gone".into()))
        }
    }

    #[test]
    fn toggle_stars_then_unstars() {
        let mut starred = StarredCollection::load(MemoryStore::new());
        assert!(starred.toggle(&movie("tt1")));
        assert!(starred.is_starred("tt1"));
        assert!(!starred.toggle(&movie("tt1")));
        assert!(!starred.is_starred("tt1"));
        assert!(starred.is_empty());
    }

    #[test]
    fn keeps_insertion_order() {
        let mut starred = StarredCollection::load(MemoryStore::new());
        for id in ["tt3", "tt1", "tt2"] {
            starred.toggle(&movie(id));
        }
        starred.toggle(&movie("tt1"));
        let ids: Vec<&str> = starred.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["tt3", "tt2"]);
    }

    #[test]
    fn malformed_data_loads_empty() {
        let store = MemoryStore::new();
        store.set(STARRED_KEY, "{not json").unwrap();
        let starred = StarredCollection::load(&store);
        assert!(starred.is_empty());
    }

    #[test]
    fn duplicate_ids_collapse_on_load() {
        let store = MemoryStore::new();
        let raw = serde_json::to_string(&vec![movie("tt1"), movie("tt2"), movie("tt1")]).unwrap();
        store.set(STARRED_KEY, &raw).unwrap();
        let starred = StarredCollection::load(&store);
        assert_eq!(starred.len(), 2);
    }

    #[test]
    fn write_failure_keeps_session_state() {
        let mut starred = StarredCollection::load(BrokenStore);
        assert!(starred.is_empty());
        assert!(starred.toggle(&movie("tt1")));
        assert!(starred.is_starred("tt1"));
    }
}
