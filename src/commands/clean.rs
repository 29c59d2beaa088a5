//! The `clean` subcommand: remove untracked files from the store.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use crate::cli::{CleanOpts, GlobalOpts};
use crate::config::Config;
use crate::paths;
use crate::prompt::{Prompt, TerminalPrompt};
use crate::sync::fs;

/// What a clean pass found and what it actually removed.
#[derive(Debug, Default)]
pub struct CleanReport {
    /// Untracked paths discovered, sorted.
    pub untracked: Vec<PathBuf>,
    /// The subset that was removed after confirmation.
    pub removed: Vec<PathBuf>,
}

/// Run the clean command.
///
/// # Errors
///
/// Returns an error if configuration loading, store traversal, or a removal
/// fails.
pub fn run(global: &GlobalOpts, opts: &CleanOpts, verbose: bool) -> Result<()> {
    let config = super::load_config(global)?;
    clean_store(&config, &opts.ignore, opts.all, verbose, &TerminalPrompt)?;
    Ok(())
}

/// Remove store files that correspond to no configured category or entry.
///
/// A `.git` directory and every name in the effective ignore set are always
/// spared. With `one_shot`, the whole candidate list is shown and a single
/// bulk confirmation removes everything; otherwise each path is confirmed
/// individually. A missing category directory is skipped silently.
///
/// # Errors
///
/// Returns an error if the store root cannot be read or a removal fails.
pub fn clean_store(
    config: &Config,
    extra_ignore: &[String],
    one_shot: bool,
    verbose: bool,
    prompt: &dyn Prompt,
) -> Result<CleanReport> {
    let mut ignored = config.ignore_set(extra_ignore);
    ignored.insert(".git".to_string());

    if verbose {
        println!("Ignored files:");
        for name in &ignored {
            println!("{name}");
        }
    }

    let untracked = untracked_paths(config, &ignored)?;
    if untracked.is_empty() {
        println!("No untracked files to clean");
        return Ok(CleanReport::default());
    }

    let mut removed = Vec::new();
    if one_shot {
        println!("Removing untracked files:");
        for path in &untracked {
            println!("{}", paths::collapse_home(path));
        }
        if prompt.confirm("Are you sure?")? {
            for path in &untracked {
                fs::remove_path(path)?;
                removed.push(path.clone());
            }
            println!("Removed {} untracked files", removed.len());
        }
    } else {
        for path in &untracked {
            let message = format!("Remove untracked file {}?", paths::collapse_home(path));
            if prompt.confirm(&message)? {
                println!("Removing {}", paths::collapse_home(path));
                fs::remove_path(path)?;
                removed.push(path.clone());
            }
        }
        println!("Removed {} untracked files", removed.len());
    }

    Ok(CleanReport { untracked, removed })
}

/// Collect paths in the store that no configured category or entry accounts
/// for: unknown names in each category directory, and unknown top-level
/// names in the store root.
///
/// # Errors
///
/// Returns an error if the store root cannot be read. Missing category
/// directories are skipped.
pub fn untracked_paths(config: &Config, ignored: &BTreeSet<String>) -> Result<Vec<PathBuf>> {
    let mut untracked = Vec::new();

    for category in &config.categories {
        let cat_dir = category.store_dir(&config.store_dir);
        let Ok(entries) = std::fs::read_dir(&cat_dir) else {
            debug!("skipping absent category directory {}", cat_dir.display());
            continue;
        };
        let tracked: BTreeSet<&str> = category.entries.iter().map(|e| e.name.as_str()).collect();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !tracked.contains(name.as_str()) && !ignored.contains(&name) {
                untracked.push(entry.path());
            }
        }
    }

    let categories: BTreeSet<&str> = config.categories.iter().map(|c| c.name.as_str()).collect();
    for entry in std::fs::read_dir(&config.store_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !categories.contains(name.as_str()) && !ignored.contains(&name) {
            untracked.push(entry.path());
        }
    }

    untracked.sort();
    Ok(untracked)
}
