//! Top-level subcommand orchestration.

pub mod clean;
pub mod completions;
pub mod deploy;
pub mod diff;
pub mod git;
pub mod list;
pub mod retrieve;

use anyhow::Result;
use tracing::debug;

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::paths;

/// Load the configuration for a command invocation.
///
/// Uses the `--config` override when given, otherwise the default location
/// under the platform config directory.
///
/// # Errors
///
/// Returns an error if the config path cannot be determined or the file
/// fails to load.
pub fn load_config(global: &GlobalOpts) -> Result<Config> {
    let path = match &global.config {
        Some(path) => path.clone(),
        None => paths::default_config_path()?,
    };
    let config = Config::load(&path)?;
    debug!(
        "loaded {} categories, {} entries from {}",
        config.categories.len(),
        config.flat_dotfiles().len(),
        path.display()
    );
    Ok(config)
}
