//! Cumulative token and cost accounting, persisted in the settings document.
//!
//! Totals only grow, except through an explicit [`UsageLedger::reset`].

use serde::{Deserialize, Serialize};

use crate::llm::TokenUsage;
use crate::settings::{Settings, TOKENS, TOTAL_COST};
use crate::store::{Document, Store};

/// A snapshot of the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerTotals {
    pub tokens: TokenUsage,
    pub cost: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct UsageLedger<'a> {
    settings: Settings<'a>,
}

impl<'a> UsageLedger<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self {
            settings: Settings::new(store),
        }
    }

    pub fn get_tokens(&self) -> TokenUsage {
        tokens_of(&self.settings.load())
    }

    pub fn get_cost(&self) -> f64 {
        cost_of(&self.settings.load())
    }

    pub fn totals(&self) -> LedgerTotals {
        totals_of(&self.settings.load())
    }

    pub fn add_tokens(&self, input: u64, output: u64) -> TokenUsage {
        let doc = self.settings.update(|doc| {
            let next = tokens_of(doc).plus(TokenUsage::new(input, output));
            doc.insert(TOKENS.into(), serde_json::json!(next));
        });
        tokens_of(&doc)
    }

    pub fn add_cost(&self, delta: f64) -> f64 {
        let doc = self.settings.update(|doc| {
            let next = cost_of(doc) + delta;
            doc.insert(TOTAL_COST.into(), serde_json::json!(next));
        });
        cost_of(&doc)
    }

    /// Zero both counters and the cost.
    pub fn reset(&self) {
        self.settings.update(|doc| {
            doc.insert(TOKENS.into(), serde_json::json!(TokenUsage::default()));
            doc.insert(TOTAL_COST.into(), serde_json::json!(0.0));
        });
    }
}

pub(crate) fn tokens_of(doc: &Document) -> TokenUsage {
    doc.get(TOKENS)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default()
}

pub(crate) fn cost_of(doc: &Document) -> f64 {
    doc.get(TOTAL_COST)
        .and_then(serde_json::Value::as_f64)
        .unwrap_or(0.0)
}

pub(crate) fn totals_of(doc: &Document) -> LedgerTotals {
    LedgerTotals {
        tokens: tokens_of(doc),
        cost: cost_of(doc),
    }
}
