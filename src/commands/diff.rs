//! The `diff` subcommand: unified diffs between store and deployed copies.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use crate::cli::{GlobalOpts, SyncOpts};
use crate::config::Config;
use crate::exec::{self, CommandRunner, SystemRunner};
use crate::paths;
use crate::sync::Selection;

/// Per-entry result of a diff pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffState {
    /// The sides differ; holds the diff tool's output.
    Differs(String),
    /// Both sides exist and match.
    Clean,
    /// The store side is absent.
    MissingStore(PathBuf),
    /// The home side is absent.
    MissingTarget(PathBuf),
    /// The entry is in the ignore set.
    Ignored,
    /// The diff tool itself failed; holds its stderr.
    Failed(String),
}

/// Collected outcomes of one diff pass, in entry order.
#[derive(Debug, Default)]
pub struct DiffSummary {
    /// `(entry name, state)` pairs in the order they were visited.
    pub entries: Vec<(String, DiffState)>,
}

impl DiffSummary {
    /// True when no visited entry reported a difference.
    #[must_use]
    pub fn all_clean(&self) -> bool {
        !self
            .entries
            .iter()
            .any(|(_, state)| matches!(state, DiffState::Differs(_)))
    }

    /// The state recorded for `name`, if the entry was visited.
    #[must_use]
    pub fn state(&self, name: &str) -> Option<&DiffState> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, state)| state)
    }

    /// Print skip notices and diff bodies, then the all-clear line when
    /// nothing differed.
    pub fn print(&self) {
        for (name, state) in &self.entries {
            match state {
                DiffState::Differs(body) => println!("{body}"),
                DiffState::Clean => {}
                DiffState::MissingStore(path) | DiffState::MissingTarget(path) => {
                    println!(
                        "Cannot diff {} because it does not exist",
                        paths::collapse_home(path)
                    );
                }
                DiffState::Ignored => println!("Skipping {name}"),
                DiffState::Failed(stderr) => eprintln!("{}", stderr.trim()),
            }
        }
        if self.all_clean() {
            println!("All dotfiles are up to date");
        }
    }
}

/// Run the diff command.
///
/// # Errors
///
/// Returns an error if configuration loading fails, the external diff tool
/// is absent, or a subprocess cannot be spawned.
pub fn run(global: &GlobalOpts, opts: &SyncOpts) -> Result<()> {
    let config = super::load_config(global)?;
    exec::require_tool("diff")?;
    let summary = diff_entries(
        &config,
        &Selection::from_files(&opts.file),
        &config.ignore_set(&opts.ignore),
        &SystemRunner,
    )?;
    summary.print();
    Ok(())
}

/// Diff every selected, non-ignored entry present on both sides through the
/// external unified-diff tool.
///
/// Exit code 1 from the tool means "the sides differ" and is captured as
/// [`DiffState::Differs`]; any higher exit code is surfaced as
/// [`DiffState::Failed`].
///
/// # Errors
///
/// Returns an error only if the diff tool cannot be spawned.
pub fn diff_entries(
    config: &Config,
    selection: &Selection,
    ignored: &BTreeSet<String>,
    runner: &dyn CommandRunner,
) -> Result<DiffSummary> {
    let mut summary = DiffSummary::default();

    for category in &config.categories {
        let cat_dir = category.store_dir(&config.store_dir);
        for entry in &category.entries {
            if !selection.contains(&entry.name) {
                continue;
            }
            if ignored.contains(&entry.name) {
                summary.entries.push((entry.name.clone(), DiffState::Ignored));
                continue;
            }

            let store_path = cat_dir.join(&entry.name);
            if !store_path.exists() {
                summary
                    .entries
                    .push((entry.name.clone(), DiffState::MissingStore(store_path)));
                continue;
            }
            if !entry.target.exists() {
                summary.entries.push((
                    entry.name.clone(),
                    DiffState::MissingTarget(entry.target.clone()),
                ));
                continue;
            }

            debug!("diffing {}", entry.name);
            let result = runner.run(
                None,
                "diff",
                &[
                    "-u",
                    &store_path.to_string_lossy(),
                    &entry.target.to_string_lossy(),
                ],
            )?;
            let state = match result.code {
                Some(0) => DiffState::Clean,
                Some(1) => DiffState::Differs(result.stdout),
                _ => DiffState::Failed(result.stderr),
            };
            summary.entries.push((entry.name.clone(), state));
        }
    }

    Ok(summary)
}
