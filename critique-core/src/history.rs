//! Bounded, newest-first log of past analyses.
//!
//! Capacity is a pure count policy: after every write the log holds at most
//! [`MAX_HISTORY_ITEMS`] entries, and the oldest are dropped first regardless
//! of age. Entries are never edited; the only deletion is [`HistoryLog::clear`].

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm::TokenUsage;
use crate::mode::ReviewMode;
use crate::store::{Document, Domain, Store, touch};

pub const MAX_HISTORY_ITEMS: usize = 50;

/// Characters of code kept in [`HistoryEntry::code_preview`].
pub const PREVIEW_CHARS: usize = 100;

const HISTORY_KEY: &str = "history";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub code_preview: String,
    pub language: String,
    /// Display label of the mode, e.g. "Security Audit".
    pub mode: String,
    pub result: String,
    #[serde(default)]
    pub tokens: TokenUsage,
    #[serde(default)]
    pub cost: f64,
    pub model: String,
}

impl HistoryEntry {
    pub fn new(
        code: &str,
        language: &str,
        mode: ReviewMode,
        result: &str,
        tokens: TokenUsage,
        cost: f64,
        model: &str,
    ) -> Self {
        Self {
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            code_preview: preview(code),
            language: language.to_string(),
            mode: mode.label().to_string(),
            result: result.to_string(),
            tokens,
            cost,
            model: model.to_string(),
        }
    }

    /// One-line summary used in listings.
    pub fn headline(&self) -> String {
        format!(
            "{} | {} | {} | ${:.4}",
            self.timestamp, self.mode, self.language, self.cost
        )
    }
}

/// First [`PREVIEW_CHARS`] characters of `code`, with "..." when truncated.
pub fn preview(code: &str) -> String {
    match code.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &code[..cut]),
        None => code.to_string(),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HistoryLog<'a> {
    store: &'a dyn Store,
}

impl<'a> HistoryLog<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// All entries, newest first.
    pub fn load(&self) -> Vec<HistoryEntry> {
        entries_of(&self.store.load(Domain::History))
    }

    /// Insert `entry` at the front, enforce capacity, persist, and return the new log.
    pub fn append(&self, entry: HistoryEntry) -> Vec<HistoryEntry> {
        let mut entries = self.load();
        entries.insert(0, entry);
        entries.truncate(MAX_HISTORY_ITEMS);
        self.replace(&entries);
        entries
    }

    pub fn clear(&self) {
        self.replace(&[]);
    }

    /// Persist `entries` as the whole log, newest first, dropping any beyond capacity.
    pub fn replace(&self, entries: &[HistoryEntry]) {
        let kept = &entries[..entries.len().min(MAX_HISTORY_ITEMS)];
        let mut doc = Document::new();
        doc.insert(HISTORY_KEY.into(), serde_json::json!(kept));
        touch(&mut doc);
        self.store.save(Domain::History, &doc);
    }
}

/// Decode the `history` array, skipping entries that do not match the schema.
pub(crate) fn entries_of(doc: &Document) -> Vec<HistoryEntry> {
    let Some(items) = doc.get(HISTORY_KEY).and_then(serde_json::Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Skipping malformed history entry");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::store::{MemoryStore, UPDATED_AT};

    fn entry(n: usize) -> HistoryEntry {
        HistoryEntry::new(
            &format!("code #{n}"),
            "python",
            ReviewMode::FullReview,
            &format!("result #{n}"),
            TokenUsage::new(10, 5),
            0.001,
            "openai/gpt-4o-mini",
        )
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        assert_eq!(preview("short"), "short");
        let exact = "a".repeat(100);
        assert_eq!(preview(&exact), exact);

        let long = "é".repeat(150);
        let p = preview(&long);
        assert_eq!(p.chars().count(), 103);
        assert!(p.ends_with("..."));
    }

    #[test]
    fn append_puts_newest_first() {
        let store = MemoryStore::new();
        let log = HistoryLog::new(&store);
        log.append(entry(1));
        let returned = log.append(entry(2));

        assert_eq!(returned[0].result, "result #2");
        assert_eq!(log.load(), returned);
        assert!(store.load(Domain::History).contains_key(UPDATED_AT));
    }

    #[test]
    fn fifty_first_append_evicts_oldest() {
        let store = MemoryStore::new();
        let log = HistoryLog::new(&store);
        for n in 1..=51 {
            log.append(entry(n));
        }

        let entries = log.load();
        assert_eq!(entries.len(), 50);
        assert_eq!(entries[0].result, "result #51");
        assert_eq!(entries[49].result, "result #2");
        assert!(entries.iter().all(|e| e.result != "result #1"));
    }

    #[test]
    fn clear_persists_empty_log() {
        let store = MemoryStore::new();
        let log = HistoryLog::new(&store);
        log.append(entry(1));
        log.clear();

        assert!(log.load().is_empty());
        assert_eq!(store.load(Domain::History)["history"], serde_json::json!([]));
    }

    #[test]
    fn entry_records_mode_label() {
        let e = HistoryEntry::new(
            "x",
            "go",
            ReviewMode::SecurityReview,
            "r",
            TokenUsage::default(),
            0.0,
            "m",
        );
        assert_eq!(e.mode, "Security Audit");
        assert!(e.headline().contains("Security Audit | go | $0.0000"));
    }

    #[test]
    fn malformed_items_are_skipped() {
        let store = MemoryStore::new();
        let good = serde_json::to_value(entry(7)).unwrap();
        let mut doc = Document::new();
        doc.insert("history".into(), serde_json::json!([good, {"nope": true}, 3]));
        store.save(Domain::History, &doc);

        let entries = HistoryLog::new(&store).load();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].result, "result #7");
    }

    proptest! {
        #[test]
        fn capacity_and_order_hold(count in 1usize..120) {
            let store = MemoryStore::new();
            let log = HistoryLog::new(&store);
            for n in 0..count {
                let returned = log.append(entry(n));
                prop_assert!(returned.len() <= MAX_HISTORY_ITEMS);
                let expected = format!("result #{n}");
                prop_assert_eq!(&returned[0].result, &expected);
            }
            prop_assert_eq!(log.load().len(), count.min(MAX_HISTORY_ITEMS));
        }
    }
}
