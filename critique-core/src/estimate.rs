//! Pre-call cost estimation.
//!
//! The estimate is advisory: it is shown before the user confirms a request.
//! Post-call accounting always uses the usage reported by the upstream
//! response, via [`crate::models::calculate_cost`].

use serde::{Deserialize, Serialize};

use crate::models;

/// Tokens assumed for the fixed system instruction and message framing.
pub const PROMPT_OVERHEAD_TOKENS: u64 = 500;

/// Characters per token for the input heuristic.
pub const CHARS_PER_TOKEN: u64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost: f64,
}

/// Predict token usage and price for `code_length` characters of input.
///
/// Input is `code_length / 4 + 500`; output is half the input, capped at
/// `max_output_tokens`.
pub fn estimate(code_length: usize, model: &str, max_output_tokens: u32) -> CostEstimate {
    let input_tokens = code_length as u64 / CHARS_PER_TOKEN + PROMPT_OVERHEAD_TOKENS;
    let output_tokens = u64::from(max_output_tokens).min(input_tokens / 2);
    CostEstimate {
        input_tokens,
        output_tokens,
        cost: models::calculate_cost(input_tokens, output_tokens, model),
    }
}
