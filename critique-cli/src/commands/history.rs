use clap::Args;

use critique_core::history::MAX_HISTORY_ITEMS;

use super::{Globals, Workspace};

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Delete every history entry
    #[arg(long, conflicts_with = "show")]
    pub clear: bool,

    /// Print the full result of entry N (1 = newest)
    #[arg(long, value_name = "N")]
    pub show: Option<usize>,
}

pub fn run(args: &HistoryArgs, globals: &Globals) -> anyhow::Result<()> {
    let mut ws = Workspace::open(globals)?;

    if args.clear {
        ws.session.clear_history();
        println!("History cleared.");
        return Ok(());
    }

    let entries = ws.session.history();
    if let Some(n) = args.show {
        let Some(entry) = n.checked_sub(1).and_then(|i| entries.get(i)) else {
            anyhow::bail!("No history entry #{n} ({} recorded)", entries.len());
        };
        println!("{}", entry.headline());
        println!("Model: {}", entry.model);
        println!(
            "Tokens: {} in, {} out",
            entry.tokens.input, entry.tokens.output
        );
        println!();
        println!("{}", entry.result);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No analysis history yet.");
        return Ok(());
    }
    println!("{} of {MAX_HISTORY_ITEMS} entries, newest first:", entries.len());
    for (i, entry) in entries.iter().enumerate() {
        println!("{:>3}. {}", i + 1, entry.headline());
        let preview = entry.code_preview.replace('\n', " ");
        println!("     {preview}");
    }
    Ok(())
}
