// Prompt construction: the mode's system instruction plus a user message wrapping the code.

use crate::mode::ReviewMode;

use super::{ChatMessage, ChatRequest, Role};

/// Language used when `auto-detect` is requested and nothing was detected.
pub const FALLBACK_LANGUAGE: &str = "python";

pub const AUTO_DETECT: &str = "auto-detect";

/// Resolve the requested language against one detected from a file name.
pub fn resolve_language(requested: &str, detected: Option<&str>) -> String {
    if requested.eq_ignore_ascii_case(AUTO_DETECT) {
        detected.unwrap_or(FALLBACK_LANGUAGE).to_string()
    } else {
        requested.to_string()
    }
}

pub fn user_message(code: &str, language: &str, context: Option<&str>) -> String {
    let mut msg = format!("Please analyze this {language} code:\n\n```{language}\n{code}\n```");
    if let Some(ctx) = context.filter(|c| !c.trim().is_empty()) {
        msg.push_str("\nAdditional context: ");
        msg.push_str(ctx);
    }
    msg
}

pub fn build_request(
    mode: ReviewMode,
    code: &str,
    language: &str,
    context: Option<&str>,
    model: &str,
    max_tokens: u32,
    temperature: f64,
) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage {
                role: Role::System,
                content: mode.system_prompt().to_string(),
            },
            ChatMessage {
                role: Role::User,
                content: user_message(code, language, context),
            },
        ],
        temperature,
        max_tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_without_context() {
        let msg = user_message("print(1)", "python", None);
        assert_eq!(msg, "Please analyze this python code:\n\n```python\nprint(1)\n```");
    }

    #[test]
    fn user_message_appends_context() {
        let msg = user_message("x", "go", Some("payment service"));
        assert!(msg.ends_with("```\nAdditional context: payment service"));

        let blank = user_message("x", "go", Some("   "));
        assert!(!blank.contains("Additional context"));
    }

    #[test]
    fn request_carries_mode_prompt() {
        let req = build_request(
            ReviewMode::SecurityReview,
            "fn main() {}",
            "rust",
            None,
            "openai/gpt-4o",
            2000,
            0.5,
        );
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, Role::System);
        assert_eq!(req.messages[0].content, ReviewMode::SecurityReview.system_prompt());
        assert!(req.messages[1].content.contains("```rust\nfn main() {}\n```"));
        assert_eq!(req.max_tokens, 2000);
    }

    #[test]
    fn language_resolution() {
        assert_eq!(resolve_language("auto-detect", Some("rust")), "rust");
        assert_eq!(resolve_language("auto-detect", None), "python");
        assert_eq!(resolve_language("go", Some("rust")), "go");
    }
}
