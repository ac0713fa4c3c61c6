use std::path::PathBuf;

use clap::Parser;

use critique_core::error::{CritiqueError, LlmError};

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "critique",
    version,
    about = "LLM-backed code review from the terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Directory holding config.toml and the session data (default: .data)
    #[arg(long, global = true, env = "CRITIQUE_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

/// Map an error to the process exit code.
///
///   0  success
///   1  general error
///   2  configuration error
///   3  validation error (input rejected before any request)
///   4  authentication failed
///   5  rate limit or quota exceeded
///   6  other upstream API error, including timeouts
fn classify_exit_code(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<CritiqueError>() {
            return match e {
                CritiqueError::Llm(llm) => llm_exit_code(llm),
                CritiqueError::Validation(_) => 3,
                CritiqueError::Config(_) => 2,
                CritiqueError::Project(_) => 1,
            };
        }
        if let Some(llm) = cause.downcast_ref::<LlmError>() {
            return llm_exit_code(llm);
        }
        if cause.is::<critique_core::error::ValidationError>() {
            return 3;
        }
        if cause.is::<critique_core::error::ConfigError>() {
            return 2;
        }
    }
    1
}

fn llm_exit_code(err: &LlmError) -> i32 {
    match err {
        LlmError::Authentication { .. } => 4,
        LlmError::RateLimit { .. } | LlmError::QuotaExceeded { .. } => 5,
        LlmError::Timeout { .. } | LlmError::Api { .. } => 6,
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let filter = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (_, 0) => "warn",
        (_, 1) => "info",
        (_, 2) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    critique_core::llm::openrouter::install_crypto_provider();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: Failed to create runtime: {e}");
            std::process::exit(1);
        }
    };

    let globals = commands::Globals {
        data_dir: cli.data_dir,
        quiet: cli.quiet,
    };
    match runtime.block_on(commands::run(cli.command, &globals)) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(classify_exit_code(&e));
        }
    }
}
