//! Session context: in-memory mirrors of the persisted state.
//!
//! A [`Session`] is hydrated once from its [`Store`] and then written through
//! on every mutation. For the rest of the process the mirrors are
//! authoritative, even if a write to the store fails.

use std::collections::BTreeMap;

use tracing::info;

use crate::history::{self, HistoryEntry, HistoryLog, MAX_HISTORY_ITEMS};
use crate::ledger::{self, LedgerTotals, UsageLedger};
use crate::llm::{Analysis, AnalysisRequest, TokenUsage};
use crate::mode::ReviewMode;
use crate::models;
use crate::results::{self, ResultCache};
use crate::settings::{self, InputMode, Settings};
use crate::store::{Domain, Store};

#[derive(Debug)]
pub struct Session {
    store: Box<dyn Store>,
    history: Vec<HistoryEntry>,
    results: BTreeMap<String, String>,
    totals: LedgerTotals,
    code_input: String,
    input_mode: InputMode,
    analysis_mode: ReviewMode,
}

impl Session {
    /// Hydrate a session from every persisted domain.
    pub fn open(store: Box<dyn Store>) -> Self {
        let settings_doc = store.load(Domain::Settings);
        let session = Self {
            history: history::entries_of(&store.load(Domain::History)),
            results: results::results_of(&store.load(Domain::Results)),
            totals: ledger::totals_of(&settings_doc),
            code_input: settings::code_input_of(&settings_doc),
            input_mode: settings::input_mode_of(&settings_doc),
            analysis_mode: settings::analysis_mode_of(&settings_doc),
            store,
        };
        info!(
            history = session.history.len(),
            results = session.results.len(),
            "Session hydrated"
        );
        session
    }

    // ── History ────────────────────────────────────────────────────

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn add_history(&mut self, entry: HistoryEntry) {
        self.history.insert(0, entry);
        self.history.truncate(MAX_HISTORY_ITEMS);
        HistoryLog::new(self.store.as_ref()).replace(&self.history);
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        HistoryLog::new(self.store.as_ref()).clear();
    }

    // ── Ledger ─────────────────────────────────────────────────────

    pub fn totals(&self) -> LedgerTotals {
        self.totals
    }

    pub fn tokens(&self) -> TokenUsage {
        self.totals.tokens
    }

    pub fn cost(&self) -> f64 {
        self.totals.cost
    }

    pub fn add_tokens(&mut self, input: u64, output: u64) {
        self.totals.tokens = self.totals.tokens.plus(TokenUsage::new(input, output));
        UsageLedger::new(self.store.as_ref()).add_tokens(input, output);
    }

    pub fn add_cost(&mut self, delta: f64) {
        self.totals.cost += delta;
        UsageLedger::new(self.store.as_ref()).add_cost(delta);
    }

    pub fn reset_usage(&mut self) {
        self.totals = LedgerTotals::default();
        UsageLedger::new(self.store.as_ref()).reset();
    }

    // ── Results ────────────────────────────────────────────────────

    pub fn results(&self) -> &BTreeMap<String, String> {
        &self.results
    }

    pub fn result(&self, mode: ReviewMode) -> Option<&str> {
        self.results.get(mode.key()).map(String::as_str)
    }

    pub fn set_result(&mut self, mode: ReviewMode, text: &str) {
        self.results.insert(mode.key().to_string(), text.to_string());
        ResultCache::new(self.store.as_ref()).set(mode, text);
    }

    pub fn clear_result(&mut self, mode: ReviewMode) -> bool {
        let had = self.results.remove(mode.key()).is_some();
        ResultCache::new(self.store.as_ref()).clear(mode);
        had
    }

    pub fn clear_all_results(&mut self) {
        self.results.clear();
        ResultCache::new(self.store.as_ref()).clear_all();
    }

    // ── Selections ─────────────────────────────────────────────────

    pub fn code_input(&self) -> &str {
        &self.code_input
    }

    pub fn set_code_input(&mut self, code: &str) {
        if self.code_input != code {
            self.code_input = code.to_string();
            Settings::new(self.store.as_ref()).set_code_input(code);
        }
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn set_input_mode(&mut self, mode: InputMode) {
        self.input_mode = mode;
        Settings::new(self.store.as_ref()).set_input_mode(mode);
    }

    pub fn analysis_mode(&self) -> ReviewMode {
        self.analysis_mode
    }

    pub fn set_analysis_mode(&mut self, mode: ReviewMode) {
        self.analysis_mode = mode;
        Settings::new(self.store.as_ref()).set_analysis_mode(mode);
    }

    // ── Post-analysis bookkeeping ──────────────────────────────────

    /// Record a successful analysis: cache the result, account usage and
    /// cost from the reported tokens, and append a history entry.
    pub fn record_analysis(
        &mut self,
        request: &AnalysisRequest,
        analysis: &Analysis,
    ) -> HistoryEntry {
        self.set_result(request.mode, &analysis.text);

        let usage = analysis.usage;
        let cost = models::calculate_cost(usage.input, usage.output, &request.model);
        self.add_tokens(usage.input, usage.output);
        self.add_cost(cost);

        let entry = HistoryEntry::new(
            &request.code,
            &request.language,
            request.mode,
            &analysis.text,
            usage,
            cost,
            &request.model,
        );
        self.add_history(entry.clone());

        info!(
            mode = request.mode.key(),
            input = usage.input,
            output = usage.output,
            cost,
            "Analysis recorded"
        );
        entry
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::{Document, MemoryStore};

    /// Lets a test keep a handle on the store after the session takes ownership.
    #[derive(Debug, Clone, Default)]
    struct Shared(Arc<MemoryStore>);

    impl Store for Shared {
        fn load(&self, domain: Domain) -> Document {
            self.0.load(domain)
        }
        fn save(&self, domain: Domain, document: &Document) {
            self.0.save(domain, document);
        }
    }

    fn analysis(text: &str, input: u64, output: u64) -> Analysis {
        Analysis {
            text: text.into(),
            usage: TokenUsage::new(input, output),
        }
    }

    #[test]
    fn record_analysis_updates_every_component() {
        let shared = Shared::default();
        let mut session = Session::open(Box::new(shared.clone()));
        let req = AnalysisRequest::new("def f(): pass", "python", ReviewMode::TestGeneration);

        let entry = session.record_analysis(&req, &analysis("## 🧪 Generated Tests", 1_000_000, 0));

        // 1M input tokens on gpt-4o-mini = $0.15
        assert!((entry.cost - 0.15).abs() < 1e-9);
        assert_eq!(session.result(ReviewMode::TestGeneration), Some("## 🧪 Generated Tests"));
        assert_eq!(session.tokens(), TokenUsage::new(1_000_000, 0));
        assert_eq!(session.history().len(), 1);

        let reopened = Session::open(Box::new(shared));
        assert_eq!(reopened.history(), session.history());
        assert_eq!(reopened.results(), session.results());
        assert_eq!(reopened.totals(), session.totals());
    }

    #[test]
    fn rerun_overwrites_result_but_history_keeps_both() {
        let mut session = Session::open(Box::new(MemoryStore::new()));
        let req = AnalysisRequest::new("x = 1", "python", ReviewMode::FullReview);

        session.record_analysis(&req, &analysis("first", 10, 10));
        session.record_analysis(&req, &analysis("second", 10, 10));

        assert_eq!(session.result(ReviewMode::FullReview), Some("second"));
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.history()[0].result, "second");
        assert_eq!(session.history()[1].result, "first");
        assert_eq!(session.tokens(), TokenUsage::new(20, 20));
    }

    #[test]
    fn reset_and_clears_write_through() {
        let shared = Shared::default();
        let mut session = Session::open(Box::new(shared.clone()));
        let req = AnalysisRequest::new("x = 1", "python", ReviewMode::Refactoring);
        session.record_analysis(&req, &analysis("r", 5, 5));

        session.reset_usage();
        session.clear_history();
        assert!(session.clear_result(ReviewMode::Refactoring));
        assert!(!session.clear_result(ReviewMode::Refactoring));

        let reopened = Session::open(Box::new(shared));
        assert_eq!(reopened.totals(), LedgerTotals::default());
        assert!(reopened.history().is_empty());
        assert!(reopened.results().is_empty());
    }

    #[test]
    fn selections_round_trip() {
        let shared = Shared::default();
        let mut session = Session::open(Box::new(shared.clone()));
        session.set_code_input("fn main() {}");
        session.set_input_mode(InputMode::Project);
        session.set_analysis_mode(ReviewMode::DesignFlaws);

        let reopened = Session::open(Box::new(shared));
        assert_eq!(reopened.code_input(), "fn main() {}");
        assert_eq!(reopened.input_mode(), InputMode::Project);
        assert_eq!(reopened.analysis_mode(), ReviewMode::DesignFlaws);
    }
}
