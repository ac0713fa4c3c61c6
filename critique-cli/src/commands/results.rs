use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use critique_core::mode::ReviewMode;

use super::{Globals, Workspace, parse_mode};

#[derive(Args, Debug)]
pub struct ResultsArgs {
    /// Review mode whose latest result to show, save or clear
    pub mode: Option<String>,

    /// Remove the cached result for MODE
    #[arg(long, requires = "mode")]
    pub clear: bool,

    /// Remove every cached result
    #[arg(long, conflicts_with_all = ["mode", "clear", "save"])]
    pub clear_all: bool,

    /// Write the result for MODE to `<mode>_report.md` in this directory
    #[arg(long, requires = "mode", value_name = "DIR", num_args = 0..=1, default_missing_value = ".")]
    pub save: Option<PathBuf>,
}

pub fn run(args: &ResultsArgs, globals: &Globals) -> anyhow::Result<()> {
    let mut ws = Workspace::open(globals)?;

    if args.clear_all {
        ws.session.clear_all_results();
        println!("All results cleared.");
        return Ok(());
    }

    let Some(value) = &args.mode else {
        list(&ws);
        return Ok(());
    };
    let mode = parse_mode(value)?;

    if args.clear {
        if ws.session.clear_result(mode) {
            println!("Cleared {} result.", mode.label());
        } else {
            println!("No {} result to clear.", mode.label());
        }
        return Ok(());
    }

    let Some(text) = ws.session.result(mode) else {
        anyhow::bail!("No {} result yet", mode.label());
    };
    match &args.save {
        Some(dir) => {
            let path = dir.join(mode.report_file_name());
            std::fs::write(&path, text)
                .with_context(|| format!("Cannot write {}", path.display()))?;
            println!("Saved {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn list(ws: &Workspace) {
    let cached: Vec<_> = ReviewMode::ALL
        .iter()
        .filter_map(|mode| ws.session.result(*mode).map(|text| (*mode, text)))
        .collect();
    if cached.is_empty() {
        println!("No cached results.");
        return;
    }
    for (mode, text) in cached {
        println!(
            "{:<16} {:<26} {} chars",
            mode.key(),
            mode.label(),
            text.chars().count()
        );
    }
}
