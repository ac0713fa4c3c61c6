use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use critique_core::config::CritiqueConfig;
use critique_core::estimate::{CostEstimate, estimate};
use critique_core::llm::prompt::{AUTO_DETECT, resolve_language};
use critique_core::llm::{AnalysisRequest, InferenceClient};
use critique_core::mode::ReviewMode;
use critique_core::models;
use critique_core::progress::{NoopReporter, ProgressReporter, SpinnerReporter};
use critique_core::project::detect_language;
use critique_core::settings::InputMode;
use critique_core::validate::validate_code;

use super::{CodeSource, Globals, Workspace, confirm, parse_mode, resolve_api_key};

/// Model and credential options shared by `analyze` and `project`.
#[derive(Args, Debug, Clone)]
pub struct LlmArgs {
    /// Extra context appended to the request
    #[arg(long)]
    pub context: Option<String>,

    /// Model id (see `critique models`); default from config
    #[arg(long)]
    pub model: Option<String>,

    /// Upper bound on output tokens (1000-8000)
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0-1.0)
    #[arg(long)]
    pub temperature: Option<f64>,

    /// OpenRouter API key
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Skip the cost confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl LlmArgs {
    /// Apply flag overrides to the configured LLM settings and re-validate.
    pub fn effective_config(&self, config: &CritiqueConfig) -> anyhow::Result<CritiqueConfig> {
        let mut effective = config.clone();
        if let Some(model) = &self.model {
            effective.llm.model.clone_from(model);
        }
        if let Some(max_tokens) = self.max_tokens {
            effective.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            effective.llm.temperature = temperature;
        }
        effective.validate()?;
        Ok(effective)
    }
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// File to review; `-` reads stdin; omitted reuses the last saved snippet
    pub file: Option<PathBuf>,

    /// Review mode (see `critique modes`); default: last used
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Source language, or auto-detect from the file extension
    #[arg(short, long, default_value = AUTO_DETECT)]
    pub language: String,

    #[command(flatten)]
    pub llm: LlmArgs,
}

pub async fn run(args: AnalyzeArgs, globals: &Globals) -> anyhow::Result<()> {
    let mut ws = Workspace::open(globals)?;

    let source = CodeSource::from_arg(args.file.as_deref());
    let code = source.read(ws.session.code_input())?;
    let mode = match &args.mode {
        Some(value) => parse_mode(value)?,
        None => ws.session.analysis_mode(),
    };
    if mode == ReviewMode::ProjectReview {
        anyhow::bail!("{} runs on a directory: use `critique project <DIR>`", mode.label());
    }
    validate_code(&code, &ws.config.limits)?;
    let config = args.llm.effective_config(&ws.config)?;

    ws.session.set_code_input(&code);
    ws.session.set_input_mode(InputMode::File);
    ws.session.set_analysis_mode(mode);

    let detected = source.file_name().as_deref().and_then(detect_language);
    let language = resolve_language(&args.language, detected);
    debug!(%language, ?detected, "Resolved language");

    let mut request = AnalysisRequest::new(code, language, mode).with_model(&config.llm.model);
    request.max_tokens = config.llm.max_tokens;
    request.temperature = config.llm.temperature;
    if let Some(ctx) = &args.llm.context {
        request = request.with_context(ctx);
    }

    execute(&mut ws, request, &args.llm, source == CodeSource::Stdin, globals).await
}

/// Shared tail of `analyze` and `project`: estimate, confirm, send, record, print.
pub async fn execute(
    ws: &mut Workspace,
    request: AnalysisRequest,
    llm: &LlmArgs,
    stdin_taken: bool,
    globals: &Globals,
) -> anyhow::Result<()> {
    let key = resolve_api_key(llm.api_key.clone(), stdin_taken)?;
    let client = InferenceClient::openrouter(&key, &ws.config.llm.base_url)?;

    let est = estimate(request.code.chars().count(), &request.model, request.max_tokens);
    if !globals.quiet {
        eprintln!("{}", describe_estimate(&est, &request.model));
    }
    if !llm.yes {
        if stdin_taken {
            anyhow::bail!("Code was read from stdin, so confirmation cannot be asked; pass --yes");
        }
        if !confirm("Send this request?")? {
            eprintln!("Aborted.");
            return Ok(());
        }
    }

    let reporter: Box<dyn ProgressReporter> = if globals.quiet {
        Box::new(NoopReporter)
    } else {
        Box::new(SpinnerReporter::new())
    };
    reporter.start(&format!("Running {}...", request.mode.label()));
    let outcome = client.analyze(&request).await;
    reporter.finish();
    let analysis = outcome?;

    let entry = ws.session.record_analysis(&request, &analysis);
    println!("{}", analysis.text);
    if !globals.quiet {
        eprintln!(
            "\n{} tokens in, {} out | ${:.4} | {}",
            entry.tokens.input,
            entry.tokens.output,
            entry.cost,
            models::display_name(&entry.model)
        );
    }
    Ok(())
}

pub fn describe_estimate(est: &CostEstimate, model: &str) -> String {
    format!(
        "Estimated: ~{} input + up to {} output tokens, ~${:.4} on {}",
        est.input_tokens,
        est.output_tokens,
        est.cost,
        models::display_name(model)
    )
}

