// In-process store for tests and ephemeral sessions. Nothing survives the process.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::{Document, Domain, Store};

#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<Domain, Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of domains that have been written at least once.
    pub fn written_domains(&self) -> usize {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Store for MemoryStore {
    fn load(&self, domain: Domain) -> Document {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&domain)
            .cloned()
            .unwrap_or_default()
    }

    fn save(&self, domain: Domain, document: &Document) {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(domain, document.clone());
    }
}
