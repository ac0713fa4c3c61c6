use std::path::PathBuf;

use clap::Args;

use critique_core::estimate::estimate;
use critique_core::models;

use super::analyze::describe_estimate;
use super::{CodeSource, Globals, Workspace};

#[derive(Args, Debug)]
pub struct EstimateArgs {
    /// File to estimate; `-` reads stdin; omitted uses the last saved snippet
    pub file: Option<PathBuf>,

    /// Model id; default from config
    #[arg(long)]
    pub model: Option<String>,

    /// Upper bound on output tokens; default from config
    #[arg(long)]
    pub max_tokens: Option<u32>,
}

pub fn run(args: &EstimateArgs, globals: &Globals) -> anyhow::Result<()> {
    let ws = Workspace::open(globals)?;
    let code = CodeSource::from_arg(args.file.as_deref()).read(ws.session.code_input())?;

    let model = args.model.as_deref().unwrap_or(&ws.config.llm.model);
    let max_tokens = args.max_tokens.unwrap_or(ws.config.llm.max_tokens);
    let est = estimate(code.chars().count(), model, max_tokens);

    println!("{}", describe_estimate(&est, model));
    println!("Pricing: {}", models::cost_info(model));
    Ok(())
}
