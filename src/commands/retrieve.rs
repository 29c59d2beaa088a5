//! The `retrieve` subcommand: copy home → store.

use anyhow::Result;

use crate::cli::{GlobalOpts, SyncOpts};
use crate::prompt::TerminalPrompt;
use crate::sync::{self, Direction, Selection};

/// Run the retrieve command.
///
/// Category directories are created under the store as needed; the store is
/// treated as authoritative once retrieved, so no overwrite confirmation
/// applies in this direction.
///
/// # Errors
///
/// Returns an error if configuration loading or a copy fails.
pub fn run(global: &GlobalOpts, opts: &SyncOpts) -> Result<()> {
    let config = super::load_config(global)?;
    let report = sync::run(
        &config,
        Direction::Retrieve,
        &Selection::from_files(&opts.file),
        &config.ignore_set(&opts.ignore),
        &TerminalPrompt,
    )?;
    report.print();
    Ok(())
}
