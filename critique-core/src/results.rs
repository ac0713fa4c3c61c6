// Latest result per review mode. Re-running a mode overwrites; there is no versioning.

use std::collections::BTreeMap;

use crate::mode::ReviewMode;
use crate::store::{Document, Domain, Store, touch};

const RESULTS_KEY: &str = "results";

#[derive(Debug, Clone, Copy)]
pub struct ResultCache<'a> {
    store: &'a dyn Store,
}

impl<'a> ResultCache<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Every stored result keyed by mode key, including keys this build does not know.
    pub fn load_all(&self) -> BTreeMap<String, String> {
        results_of(&self.store.load(Domain::Results))
    }

    pub fn get(&self, mode: ReviewMode) -> Option<String> {
        self.load_all().remove(mode.key())
    }

    pub fn set(&self, mode: ReviewMode, text: &str) {
        let mut doc = self.store.load(Domain::Results);
        with_results(&mut doc, |results| {
            results.insert(mode.key().into(), text.into());
        });
        touch(&mut doc);
        self.store.save(Domain::Results, &doc);
    }

    /// Remove the result for `mode`. Writes nothing if there was none.
    pub fn clear(&self, mode: ReviewMode) -> bool {
        let mut doc = self.store.load(Domain::Results);
        if with_results(&mut doc, |results| results.remove(mode.key())).is_none() {
            return false;
        }
        touch(&mut doc);
        self.store.save(Domain::Results, &doc);
        true
    }

    pub fn clear_all(&self) {
        let mut doc = Document::new();
        doc.insert(RESULTS_KEY.into(), serde_json::Value::Object(Document::new()));
        touch(&mut doc);
        self.store.save(Domain::Results, &doc);
    }
}

pub(crate) fn results_of(doc: &Document) -> BTreeMap<String, String> {
    doc.get(RESULTS_KEY)
        .and_then(serde_json::Value::as_object)
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

/// Run `f` on the `results` object of `doc`, replacing a missing or mistyped one.
fn with_results<R>(doc: &mut Document, f: impl FnOnce(&mut Document) -> R) -> R {
    let mut results = match doc.remove(RESULTS_KEY) {
        Some(serde_json::Value::Object(map)) => map,
        _ => Document::new(),
    };
    let out = f(&mut results);
    doc.insert(RESULTS_KEY.into(), serde_json::Value::Object(results));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, UPDATED_AT};

    #[test]
    fn set_then_set_overwrites() {
        let store = MemoryStore::new();
        let cache = ResultCache::new(&store);

        cache.set(ReviewMode::Refactoring, "X");
        cache.set(ReviewMode::Refactoring, "Y");

        assert_eq!(cache.get(ReviewMode::Refactoring).as_deref(), Some("Y"));
        assert_eq!(cache.load_all().len(), 1);
    }

    #[test]
    fn modes_are_independent() {
        let store = MemoryStore::new();
        let cache = ResultCache::new(&store);
        cache.set(ReviewMode::DesignFlaws, "design");
        cache.set(ReviewMode::SecurityReview, "security");

        assert!(cache.clear(ReviewMode::DesignFlaws));
        assert_eq!(cache.get(ReviewMode::DesignFlaws), None);
        assert_eq!(cache.get(ReviewMode::SecurityReview).as_deref(), Some("security"));
    }

    #[test]
    fn clear_absent_is_noop() {
        let store = MemoryStore::new();
        let cache = ResultCache::new(&store);
        assert!(!cache.clear(ReviewMode::TestGeneration));
        assert_eq!(store.written_domains(), 0);
    }

    #[test]
    fn clear_all_empties_and_stamps() {
        let store = MemoryStore::new();
        let cache = ResultCache::new(&store);
        cache.set(ReviewMode::FullReview, "a");
        cache.set(ReviewMode::ProjectReview, "b");

        cache.clear_all();

        assert!(cache.load_all().is_empty());
        let doc = store.load(Domain::Results);
        assert_eq!(doc["results"], serde_json::json!({}));
        assert!(doc.contains_key(UPDATED_AT));
    }

    #[test]
    fn mistyped_results_are_replaced_on_write() {
        let store = MemoryStore::new();
        let mut doc = Document::new();
        doc.insert("results".into(), serde_json::json!(["not", "a", "map"]));
        store.save(Domain::Results, &doc);

        let cache = ResultCache::new(&store);
        assert!(cache.load_all().is_empty());
        cache.set(ReviewMode::FullReview, "fresh");
        assert_eq!(cache.get(ReviewMode::FullReview).as_deref(), Some("fresh"));
    }

    #[test]
    fn unknown_keys_survive_writes() {
        let store = MemoryStore::new();
        let mut doc = Document::new();
        doc.insert("results".into(), serde_json::json!({"LEGACY_MODE": "old"}));
        store.save(Domain::Results, &doc);

        ResultCache::new(&store).set(ReviewMode::FullReview, "new");

        assert_eq!(ResultCache::new(&store).load_all()["LEGACY_MODE"], "old");
    }
}
