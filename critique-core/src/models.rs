// Static catalog of supported upstream models and their per-million-token prices.
#![allow(clippy::cast_precision_loss)]

/// Model used when none is configured, and whose prices back unknown models.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Price {
    pub input: f64,
    pub output: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct ModelInfo {
    pub id: &'static str,
    pub display_name: &'static str,
    pub group: &'static str,
    pub price: Price,
}

const fn model(
    id: &'static str,
    display_name: &'static str,
    group: &'static str,
    input: f64,
    output: f64,
) -> ModelInfo {
    ModelInfo {
        id,
        display_name,
        group,
        price: Price { input, output },
    }
}

pub const MODELS: [ModelInfo; 8] = [
    model("openai/gpt-4o-mini", "GPT-4o-mini", "OpenAI", 0.15, 0.60),
    model("openai/gpt-4o", "GPT-4o", "OpenAI", 2.50, 10.00),
    model("anthropic/claude-sonnet-4", "Claude Sonnet 4", "Anthropic", 3.00, 15.00),
    model("anthropic/claude-3-5-haiku", "Claude 3.5 Haiku", "Anthropic", 0.80, 4.00),
    model("google/gemini-2.0-flash-001", "Gemini 2.0 Flash", "Google", 0.10, 0.40),
    model("meta-llama/llama-3.3-70b-instruct", "Llama 3.3 70B", "Meta", 0.40, 0.40),
    model("deepseek/deepseek-chat", "DeepSeek Chat", "DeepSeek", 0.14, 0.28),
    model("qwen/qwen-2.5-72b-instruct", "Qwen 2.5 72B", "Qwen", 0.35, 0.40),
];

pub fn lookup(id: &str) -> Option<&'static ModelInfo> {
    MODELS.iter().find(|m| m.id == id)
}

/// Prices for `id`, falling back to [`DEFAULT_MODEL`] for unlisted models.
pub fn price_for(id: &str) -> Price {
    lookup(id)
        .or_else(|| lookup(DEFAULT_MODEL))
        .map_or(Price { input: 0.15, output: 0.60 }, |m| m.price)
}

/// Cost in USD of a call with the given token counts.
pub fn calculate_cost(input_tokens: u64, output_tokens: u64, model: &str) -> f64 {
    let price = price_for(model);
    (input_tokens as f64 / 1_000_000.0) * price.input
        + (output_tokens as f64 / 1_000_000.0) * price.output
}

/// Short human-readable price hint, based on a nominal 1000-in/500-out call.
pub fn cost_info(id: &str) -> String {
    let Some(info) = lookup(id) else {
        return "Cost: Unknown".to_string();
    };
    let nominal = (1000.0 / 1_000_000.0) * info.price.input + (500.0 / 1_000_000.0) * info.price.output;
    if nominal >= 0.001 {
        format!("~${nominal:.4}/1K tokens")
    } else {
        format!("~${:.2}/1K tokens", nominal * 1000.0)
    }
}

/// Provider groups in catalog order, each with its model ids.
pub fn groups() -> Vec<(&'static str, Vec<&'static str>)> {
    let mut out: Vec<(&'static str, Vec<&'static str>)> = Vec::new();
    for m in &MODELS {
        match out.iter_mut().find(|(g, _)| *g == m.group) {
            Some((_, ids)) => ids.push(m.id),
            None => out.push((m.group, vec![m.id])),
        }
    }
    out
}

/// Display name, or the last path segment of the id for unlisted models.
pub fn display_name(id: &str) -> &str {
    lookup(id).map_or_else(
        || id.rsplit('/').next().unwrap_or(id),
        |m| m.display_name,
    )
}
