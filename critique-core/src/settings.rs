// The singleton settings document: ledger totals plus the last-used selections.
//
// Every mutation is a read-modify-write of the whole document with a fresh
// `updated_at`. There is no locking; the last writer wins.

use serde::{Deserialize, Serialize};

use crate::mode::ReviewMode;
use crate::store::{Document, Domain, Store, touch};

pub const TOKENS: &str = "tokens";
pub const TOTAL_COST: &str = "total_cost";
pub const CODE_INPUT: &str = "code_input";
pub const REVIEW_MODE: &str = "review_mode";
pub const ANALYSIS_MODE: &str = "analysis_mode";

/// Whether the last session reviewed a single snippet or a whole project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    File,
    Project,
}

impl InputMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Project => "project",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Settings<'a> {
    store: &'a dyn Store,
}

impl<'a> Settings<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Document {
        self.store.load(Domain::Settings)
    }

    /// Load, apply `f`, stamp `updated_at` and save. Returns the written document.
    pub fn update(&self, f: impl FnOnce(&mut Document)) -> Document {
        let mut doc = self.load();
        f(&mut doc);
        touch(&mut doc);
        self.store.save(Domain::Settings, &doc);
        doc
    }

    pub fn code_input(&self) -> String {
        code_input_of(&self.load())
    }

    pub fn set_code_input(&self, code: &str) {
        self.update(|doc| {
            doc.insert(CODE_INPUT.into(), code.into());
        });
    }

    pub fn input_mode(&self) -> InputMode {
        input_mode_of(&self.load())
    }

    pub fn set_input_mode(&self, mode: InputMode) {
        self.update(|doc| {
            doc.insert(REVIEW_MODE.into(), mode.as_str().into());
        });
    }

    pub fn analysis_mode(&self) -> ReviewMode {
        analysis_mode_of(&self.load())
    }

    pub fn set_analysis_mode(&self, mode: ReviewMode) {
        self.update(|doc| {
            doc.insert(ANALYSIS_MODE.into(), mode.key().into());
        });
    }
}

pub(crate) fn code_input_of(doc: &Document) -> String {
    doc.get(CODE_INPUT)
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn input_mode_of(doc: &Document) -> InputMode {
    doc.get(REVIEW_MODE)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default()
}

pub(crate) fn analysis_mode_of(doc: &Document) -> ReviewMode {
    doc.get(ANALYSIS_MODE)
        .and_then(serde_json::Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, UPDATED_AT};

    #[test]
    fn defaults_when_empty() {
        let store = MemoryStore::new();
        let settings = Settings::new(&store);
        assert_eq!(settings.code_input(), "");
        assert_eq!(settings.input_mode(), InputMode::File);
        assert_eq!(settings.analysis_mode(), ReviewMode::FullReview);
    }

    #[test]
    fn setters_persist_and_stamp() {
        let store = MemoryStore::new();
        let settings = Settings::new(&store);

        settings.set_code_input("fn main() {}");
        settings.set_input_mode(InputMode::Project);
        settings.set_analysis_mode(ReviewMode::SecurityReview);

        let doc = store.load(Domain::Settings);
        assert_eq!(doc[CODE_INPUT], "fn main() {}");
        assert_eq!(doc[REVIEW_MODE], "project");
        assert_eq!(doc[ANALYSIS_MODE], "SECURITY_REVIEW");
        assert!(doc.contains_key(UPDATED_AT));
        assert_eq!(settings.analysis_mode(), ReviewMode::SecurityReview);
    }

    #[test]
    fn update_preserves_unknown_keys() {
        let store = MemoryStore::new();
        let mut seeded = Document::new();
        seeded.insert("theme".into(), "dark".into());
        store.save(Domain::Settings, &seeded);

        Settings::new(&store).set_code_input("x");

        assert_eq!(store.load(Domain::Settings)["theme"], "dark");
    }

    #[test]
    fn garbage_selection_falls_back_to_default() {
        let store = MemoryStore::new();
        let mut seeded = Document::new();
        seeded.insert(ANALYSIS_MODE.into(), "NOT_A_MODE".into());
        seeded.insert(REVIEW_MODE.into(), 42.into());
        store.save(Domain::Settings, &seeded);

        let settings = Settings::new(&store);
        assert_eq!(settings.analysis_mode(), ReviewMode::FullReview);
        assert_eq!(settings.input_mode(), InputMode::File);
    }
}
