//! The `deploy` subcommand: copy store → home.

use anyhow::Result;

use crate::cli::{GlobalOpts, SyncOpts};
use crate::prompt::TerminalPrompt;
use crate::sync::{self, Direction, Selection};

/// Run the deploy command.
///
/// # Errors
///
/// Returns an error if configuration loading fails, a category store
/// directory is missing, or a copy fails.
pub fn run(global: &GlobalOpts, opts: &SyncOpts) -> Result<()> {
    let config = super::load_config(global)?;
    let report = sync::run(
        &config,
        Direction::Deploy,
        &Selection::from_files(&opts.file),
        &config.ignore_set(&opts.ignore),
        &TerminalPrompt,
    )?;
    report.print();
    Ok(())
}
