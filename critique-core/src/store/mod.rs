//! Key-value persistence for session data.
//!
//! Each [`Domain`] is an independent JSON document that is always loaded and
//! saved whole. The store favors availability: an absent or corrupt document
//! loads as empty, and a failed write is logged and dropped so the in-memory
//! session stays authoritative.

pub mod json;
pub mod memory;

use serde::{Deserialize, Serialize};

pub use json::JsonFileStore;
pub use memory::MemoryStore;

/// A persisted document: a JSON object keyed by field name.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Key holding the last-write timestamp in every document.
pub const UPDATED_AT: &str = "updated_at";

/// The independently persisted units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    History,
    Results,
    Settings,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::History, Domain::Results, Domain::Settings];

    pub fn name(self) -> &'static str {
        match self {
            Self::History => "history",
            Self::Results => "results",
            Self::Settings => "settings",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::History => "history.json",
            Self::Results => "results.json",
            Self::Settings => "settings.json",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Whole-document load/save over named domains.
///
/// Implementations must never fail loudly: `load` returns an empty document
/// for anything it cannot read, and `save` swallows write failures after
/// logging them.
pub trait Store: Send + Sync + std::fmt::Debug {
    /// Load the full document for `domain`, or an empty one.
    fn load(&self, domain: Domain) -> Document;

    /// Replace the full document for `domain`.
    fn save(&self, domain: Domain, document: &Document);
}

/// Stamp `updated_at` with the current local time.
pub fn touch(document: &mut Document) {
    document.insert(
        UPDATED_AT.to_string(),
        serde_json::Value::String(chrono::Local::now().to_rfc3339()),
    );
}
