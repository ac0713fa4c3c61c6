use clap::Args;

use critique_core::mode::ReviewMode;

#[derive(Args, Debug)]
pub struct ModesArgs {}

pub fn run(_args: &ModesArgs) {
    for mode in ReviewMode::ALL {
        println!(
            "  {:<16} {:<15} {}",
            mode.key().to_lowercase().replace('_', "-"),
            mode.short_name(),
            mode.description()
        );
    }
}
