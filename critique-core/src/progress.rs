//! Busy indication while an analysis is in flight.
//!
//! The CLI uses [`SpinnerReporter`]; library callers and tests use
//! [`NoopReporter`] or their own implementation.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub trait ProgressReporter: Send + Sync {
    /// Show that `task` has started.
    fn start(&self, task: &str);

    /// Print a line without disturbing the indicator.
    fn message(&self, msg: &str);

    /// Remove the indicator.
    fn finish(&self);
}

#[derive(Debug, Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn start(&self, _task: &str) {}
    fn message(&self, _msg: &str) {}
    fn finish(&self) {}
}

/// Spinner on stderr, ticking until [`ProgressReporter::finish`].
#[derive(Debug)]
pub struct SpinnerReporter {
    bar: ProgressBar,
}

impl Default for SpinnerReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SpinnerReporter {
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::new_spinner(),
        }
    }

    /// A reporter that draws nothing, for non-interactive output.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl ProgressReporter for SpinnerReporter {
    fn start(&self, task: &str) {
        let style = ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        self.bar.set_style(style);
        self.bar.set_message(task.to_string());
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn message(&self, msg: &str) {
        self.bar.println(msg);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
