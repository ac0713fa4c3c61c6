use clap::Args;

use super::{Globals, Workspace};

#[derive(Args, Debug)]
pub struct UsageArgs {
    /// Zero the token counters and total cost
    #[arg(long)]
    pub reset: bool,
}

pub fn run(args: &UsageArgs, globals: &Globals) -> anyhow::Result<()> {
    let mut ws = Workspace::open(globals)?;

    if args.reset {
        ws.session.reset_usage();
        println!("Usage counters reset.");
        return Ok(());
    }

    let totals = ws.session.totals();
    println!("Input tokens:  {:>10}", totals.tokens.input);
    println!("Output tokens: {:>10}", totals.tokens.output);
    println!("Total cost:    ${:.4}", totals.cost);
    Ok(())
}
