use clap::Args;

use critique_core::models::{self, DEFAULT_MODEL};

#[derive(Args, Debug)]
pub struct ModelsArgs {}

pub fn run(_args: &ModelsArgs) {
    for (group, ids) in models::groups() {
        println!("{group}");
        for id in ids {
            let marker = if id == DEFAULT_MODEL { " (default)" } else { "" };
            println!(
                "  {:<36} {:<18} {}{marker}",
                id,
                models::display_name(id),
                models::cost_info(id)
            );
        }
    }
}
