use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The fixed set of analyses that can be requested upstream.
///
/// Each variant selects its own system instruction. The [`key`](Self::key)
/// is the stable identifier used in persisted documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewMode {
    DesignFlaws,
    TestGeneration,
    Refactoring,
    SecurityReview,
    #[default]
    FullReview,
    /// Whole-project variant of the full review; expects a bundled document.
    ProjectReview,
}

impl ReviewMode {
    pub const ALL: [ReviewMode; 6] = [
        ReviewMode::DesignFlaws,
        ReviewMode::TestGeneration,
        ReviewMode::Refactoring,
        ReviewMode::SecurityReview,
        ReviewMode::FullReview,
        ReviewMode::ProjectReview,
    ];

    /// Modes that operate on a single snippet.
    pub fn single_file() -> &'static [ReviewMode] {
        &Self::ALL[..5]
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::DesignFlaws => "DESIGN_FLAWS",
            Self::TestGeneration => "TEST_GENERATION",
            Self::Refactoring => "REFACTORING",
            Self::SecurityReview => "SECURITY_REVIEW",
            Self::FullReview => "FULL_REVIEW",
            Self::ProjectReview => "PROJECT_REVIEW",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::DesignFlaws => "Design Flaw Detection",
            Self::TestGeneration => "Test Generation",
            Self::Refactoring => "Refactoring Suggestions",
            Self::SecurityReview => "Security Audit",
            Self::FullReview => "Full Pair Review",
            Self::ProjectReview => "Project Review",
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Self::DesignFlaws => "Design Flaws",
            Self::TestGeneration => "Generate Tests",
            Self::Refactoring => "Refactoring",
            Self::SecurityReview => "Security Audit",
            Self::FullReview => "Full Review",
            Self::ProjectReview => "Project Review",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::DesignFlaws => "Detect SOLID violations, code smells, and architectural issues",
            Self::TestGeneration => "Generate unit tests, edge cases, and mocking strategies",
            Self::Refactoring => "Get clean code suggestions and refactored examples",
            Self::SecurityReview => "Comprehensive security audit: vulnerabilities, OWASP Top 10",
            Self::FullReview => "Comprehensive review covering all aspects",
            Self::ProjectReview => {
                "Analyze entire project: structure, architecture, cross-file dependencies"
            }
        }
    }

    /// File name used when a result is saved as a report.
    pub fn report_file_name(self) -> String {
        format!("{}_report.md", self.key().to_lowercase())
    }

    /// The fixed system instruction sent with every request in this mode.
    pub fn system_prompt(self) -> &'static str {
        match self {
            Self::DesignFlaws => DESIGN_FLAWS_PROMPT,
            Self::TestGeneration => TEST_GENERATION_PROMPT,
            Self::Refactoring => REFACTORING_PROMPT,
            Self::SecurityReview => SECURITY_REVIEW_PROMPT,
            Self::FullReview => FULL_REVIEW_PROMPT,
            Self::ProjectReview => PROJECT_REVIEW_PROMPT,
        }
    }
}

impl std::fmt::Display for ReviewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReviewMode {
    type Err = ValidationError;

    /// Accepts the key (`SECURITY_REVIEW`), kebab-case or snake-case, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_").to_uppercase();
        Self::ALL
            .into_iter()
            .find(|m| m.key() == normalized)
            .ok_or_else(|| ValidationError::UnknownMode(s.to_string()))
    }
}

const DESIGN_FLAWS_PROMPT: &str = "You are an expert software architect. Analyze the code for design flaws.
Focus on: SOLID violations, code smells, coupling/cohesion issues, missing abstractions, error handling gaps, security vulnerabilities, performance anti-patterns.
Format: ## 🔍 Design Flaws Detected
### Critical Issues / ### Warnings / ### Suggestions / ## 💡 Recommended Actions";

const TEST_GENERATION_PROMPT: &str = "You are an expert test engineer. Generate comprehensive tests.
Include: Unit tests, edge cases, error scenarios, integration test suggestions, mocking strategies.
Format: ## 🧪 Generated Tests with runnable code, edge cases, mocking strategy, coverage notes.";

const REFACTORING_PROMPT: &str = "You are an expert in clean code. Provide refactoring suggestions.
Consider: Readability, DRY, function extraction, naming, simplification, modern features, design patterns.
Format: ## ♻️ Refactoring Recommendations with before/after, quick wins, larger refactors, complete refactored code.";

const SECURITY_REVIEW_PROMPT: &str = "You are a cybersecurity expert. Conduct a thorough security audit.
Focus on: Injection vulnerabilities, auth issues, data exposure, crypto failures, input validation, misconfigurations, vulnerable dependencies, business logic flaws.
Format: ## 🔒 Security Audit Report with Critical/High/Medium/Low issues, compliance notes, remediation priority, security strengths.";

const FULL_REVIEW_PROMPT: &str = "You are an AI Pair Engineer. Provide comprehensive code review.
Include: First impression, design analysis, bug detection, security scan, performance review, test suggestions, refactoring ideas, positive notes.
Format: ## 🤖 AI Pair Engineer Review with Overall Score, What's Working Well, Potential Bugs, Design Concerns, Security Notes, Performance Tips, Suggested Tests, Refactoring Opportunities, Priority Actions.";

const PROJECT_REVIEW_PROMPT: &str = "You are an AI Pair Engineer analyzing an entire project.
Analyze holistically: Project structure, architecture, code quality, security, performance, testing, best practices, documentation.
Format: ## 🤖 AI Pair Engineer Review
### 📊 Overall Score: [X/10]
### 📁 Project Structure Analysis
### ✅ What's Working Well
### 🐛 Potential Bugs (with file references)
### 🏗️ Design Concerns
### 🔒 Security Notes
### ⚡ Performance Tips
### 🧪 Suggested Tests
### ♻️ Refactoring Opportunities (with file references)
### 🎯 Priority Actions (top 3-5, ordered by impact)";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_key_and_kebab_case() {
        assert_eq!(
            "SECURITY_REVIEW".parse::<ReviewMode>(),
            Ok(ReviewMode::SecurityReview)
        );
        assert_eq!(
            "security-review".parse::<ReviewMode>(),
            Ok(ReviewMode::SecurityReview)
        );
        assert_eq!(
            " design_flaws ".parse::<ReviewMode>(),
            Ok(ReviewMode::DesignFlaws)
        );
        assert_eq!(
            "poetry".parse::<ReviewMode>(),
            Err(ValidationError::UnknownMode("poetry".into()))
        );
    }

    #[test]
    fn every_mode_has_distinct_prompt() {
        let prompts: std::collections::HashSet<_> =
            ReviewMode::ALL.iter().map(|m| m.system_prompt()).collect();
        assert_eq!(prompts.len(), ReviewMode::ALL.len());
    }

    #[test]
    fn single_file_modes_exclude_project_review() {
        assert_eq!(ReviewMode::single_file().len(), 5);
        assert!(!ReviewMode::single_file().contains(&ReviewMode::ProjectReview));
    }

    #[test]
    fn serde_uses_key() {
        let json = serde_json::to_string(&ReviewMode::TestGeneration).unwrap();
        assert_eq!(json, "\"TEST_GENERATION\"");
        assert_eq!(ReviewMode::default(), ReviewMode::FullReview);
        assert_eq!(
            ReviewMode::SecurityReview.report_file_name(),
            "security_review_report.md"
        );
    }
}
