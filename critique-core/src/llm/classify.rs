//! Classification of raw upstream failure text.
//!
//! Rules are evaluated top to bottom against the lowercased text and the
//! first rule with any matching substring wins. Order is part of the
//! contract: "invalid rate limit key" is an authentication failure, not a
//! rate limit. Anything unmatched falls through to [`FailureKind::Api`].

use crate::error::LlmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Authentication,
    RateLimit,
    QuotaExceeded,
    Timeout,
    Api,
}

#[derive(Debug)]
pub struct Rule {
    pub needles: &'static [&'static str],
    pub kind: FailureKind,
}

pub const RULES: [Rule; 4] = [
    Rule {
        needles: &["authentication", "invalid", "api key"],
        kind: FailureKind::Authentication,
    },
    Rule {
        needles: &["rate limit"],
        kind: FailureKind::RateLimit,
    },
    Rule {
        needles: &["quota", "billing", "credit"],
        kind: FailureKind::QuotaExceeded,
    },
    Rule {
        needles: &["timeout"],
        kind: FailureKind::Timeout,
    },
];

pub fn classify_kind(raw: &str) -> FailureKind {
    let lower = raw.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.needles.iter().any(|n| lower.contains(n)))
        .map_or(FailureKind::Api, |rule| rule.kind)
}

/// Turn raw failure text into the user-facing error.
pub fn classify(raw: impl Into<String>) -> LlmError {
    let detail = raw.into();
    match classify_kind(&detail) {
        FailureKind::Authentication => LlmError::Authentication { detail },
        FailureKind::RateLimit => LlmError::RateLimit { detail },
        FailureKind::QuotaExceeded => LlmError::QuotaExceeded { detail },
        FailureKind::Timeout => LlmError::Timeout { detail },
        FailureKind::Api => LlmError::Api { detail },
    }
}
