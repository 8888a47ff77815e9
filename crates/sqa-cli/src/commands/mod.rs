use sqa_config::ScreenQaConfig;

use crate::cli::{Commands, GlobalFlags};

pub mod schema;
pub mod score;
pub mod split_check;
pub mod validate;

/// Dispatch a parsed command to its handler.
pub fn dispatch(
    command: &Commands,
    config: &ScreenQaConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Validate(args) => validate::handle(args, config, flags),
        Commands::SplitCheck(args) => split_check::handle(args, config, flags),
        Commands::Score(args) => score::handle(args, config, flags),
        Commands::Schema(args) => schema::handle(args, flags),
    }
}
