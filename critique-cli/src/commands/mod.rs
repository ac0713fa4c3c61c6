pub mod analyze;
pub mod estimate;
pub mod history;
pub mod models;
pub mod modes;
pub mod project;
pub mod results;
pub mod usage;

use std::io::{BufRead, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;

use critique_core::config::CritiqueConfig;
use critique_core::mode::ReviewMode;
use critique_core::session::Session;
use critique_core::store::JsonFileStore;
use critique_core::store::json::DEFAULT_DATA_DIR;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Review a single file, stdin, or the last saved snippet
    Analyze(analyze::AnalyzeArgs),
    /// Review a whole project directory
    Project(project::ProjectArgs),
    /// Estimate tokens and cost without sending anything
    Estimate(estimate::EstimateArgs),
    /// List or clear past analyses
    History(history::HistoryArgs),
    /// Show, save or clear the latest result per review mode
    Results(results::ResultsArgs),
    /// Show or reset cumulative token usage and cost
    Usage(usage::UsageArgs),
    /// List supported models and their prices
    Models(models::ModelsArgs),
    /// List review modes and what each one looks for
    Modes(modes::ModesArgs),
}

/// Options shared by every subcommand.
#[derive(Debug)]
pub struct Globals {
    pub data_dir: Option<PathBuf>,
    pub quiet: bool,
}

pub async fn run(cmd: Command, globals: &Globals) -> anyhow::Result<()> {
    match cmd {
        Command::Analyze(args) => analyze::run(args, globals).await,
        Command::Project(args) => project::run(args, globals).await,
        Command::Estimate(args) => estimate::run(&args, globals),
        Command::History(args) => history::run(&args, globals),
        Command::Results(args) => results::run(&args, globals),
        Command::Usage(args) => usage::run(&args, globals),
        Command::Models(args) => {
            models::run(&args);
            Ok(())
        }
        Command::Modes(args) => {
            modes::run(&args);
            Ok(())
        }
    }
}

/// Loaded configuration plus the hydrated session.
#[derive(Debug)]
pub struct Workspace {
    pub config: CritiqueConfig,
    pub session: Session,
}

impl Workspace {
    /// Load `config.toml` from the data directory and open the session store.
    ///
    /// An explicit `--data-dir` is also the store location; otherwise the
    /// store lives wherever `[storage] dir` points.
    pub fn open(globals: &Globals) -> anyhow::Result<Self> {
        let config_dir = globals
            .data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let config = CritiqueConfig::load_from_dir(&config_dir)
            .with_context(|| format!("Cannot load config from {}", config_dir.display()))?;

        let store_dir = globals
            .data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.storage.dir));
        let session = Session::open(Box::new(JsonFileStore::new(store_dir)));
        Ok(Self { config, session })
    }
}

/// Parse a `--mode` value. Unknown names are validation errors.
pub fn parse_mode(value: &str) -> anyhow::Result<ReviewMode> {
    Ok(value.parse::<ReviewMode>()?)
}

/// Where the code under review comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeSource {
    File(PathBuf),
    Stdin,
    Saved,
}

impl CodeSource {
    pub fn from_arg(arg: Option<&Path>) -> Self {
        match arg {
            Some(p) if p.as_os_str() == "-" => Self::Stdin,
            Some(p) => Self::File(p.to_path_buf()),
            None => Self::Saved,
        }
    }

    /// File name used for language detection, if any.
    pub fn file_name(&self) -> Option<String> {
        match self {
            Self::File(p) => p.file_name().map(|n| n.to_string_lossy().into_owned()),
            Self::Stdin | Self::Saved => None,
        }
    }

    pub fn read(&self, saved: &str) -> anyhow::Result<String> {
        match self {
            Self::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read {}", path.display())),
            Self::Stdin => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Cannot read code from stdin")?;
                Ok(buf)
            }
            Self::Saved => Ok(saved.to_string()),
        }
    }
}

/// Ask a question on stderr and read one line from stdin.
///
/// Returns `None` at end of input.
pub fn prompt_line(question: &str) -> anyhow::Result<Option<String>> {
    eprint!("{question}");
    std::io::stderr().flush().ok();
    let mut line = String::new();
    let read = std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Cannot read from stdin")?;
    Ok((read > 0).then(|| line.trim().to_string()))
}

/// y/N confirmation. Anything but "y" or "yes" declines.
pub fn confirm(question: &str) -> anyhow::Result<bool> {
    if !std::io::stdin().is_terminal() {
        anyhow::bail!("Confirmation required but stdin is not a terminal; pass --yes to proceed");
    }
    let answer = prompt_line(&format!("{question} [y/N] "))?.unwrap_or_default();
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

/// Key from `--api-key` / `OPENROUTER_API_KEY`, else an interactive prompt.
pub fn resolve_api_key(flag: Option<String>, stdin_taken: bool) -> anyhow::Result<String> {
    if let Some(key) = flag {
        return Ok(key);
    }
    if stdin_taken || !std::io::stdin().is_terminal() {
        anyhow::bail!("No API key: pass --api-key or set OPENROUTER_API_KEY");
    }
    Ok(prompt_line("OpenRouter API key: ")?.unwrap_or_default())
}
