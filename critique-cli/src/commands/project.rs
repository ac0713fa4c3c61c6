use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use critique_core::llm::AnalysisRequest;
use critique_core::mode::ReviewMode;
use critique_core::project;
use critique_core::settings::InputMode;

use super::analyze::{LlmArgs, execute};
use super::{Globals, Workspace};

/// Language label sent with a project bundle.
const PROJECT_LANGUAGE: &str = "multi-language";

#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Project root to review
    pub dir: PathBuf,

    #[command(flatten)]
    pub llm: LlmArgs,
}

pub async fn run(args: ProjectArgs, globals: &Globals) -> anyhow::Result<()> {
    let mut ws = Workspace::open(globals)?;

    let bundle = project::collect(&args.dir, &ws.config.limits)
        .with_context(|| format!("Cannot collect project {}", args.dir.display()))?;
    for error in &bundle.errors {
        eprintln!("warning: {error}");
    }
    if bundle.is_empty() {
        anyhow::bail!("No reviewable files found in {}", args.dir.display());
    }
    let config = args.llm.effective_config(&ws.config)?;

    if !globals.quiet {
        let stats = bundle.stats();
        let languages: Vec<_> = stats
            .languages
            .iter()
            .map(|(lang, n)| format!("{lang} ({n})"))
            .collect();
        eprintln!(
            "Collected {} files, {} lines: {}",
            stats.total_files,
            stats.total_lines,
            languages.join(", ")
        );
    }

    ws.session.set_input_mode(InputMode::Project);

    let mut request = AnalysisRequest::new(
        bundle.format_for_review(),
        PROJECT_LANGUAGE,
        ReviewMode::ProjectReview,
    )
    .with_model(&config.llm.model);
    request.max_tokens = config.llm.max_tokens;
    request.temperature = config.llm.temperature;
    if let Some(ctx) = &args.llm.context {
        request = request.with_context(ctx);
    }

    execute(&mut ws, request, &args.llm, false, globals).await
}
