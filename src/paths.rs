//! Path resolution utilities.
//!
//! Home-directory discovery, placeholder expansion for configured paths, and
//! the `~`-collapsed display form used in all user-facing output.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Determine the absolute path to the user's home directory.
///
/// Does not check that the path actually exists.
///
/// # Errors
///
/// Returns [`ConfigError::NoHome`] if the home directory cannot be
/// determined.
pub fn home_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::NoHome)
}

/// Default location of the config file: `<config dir>/dotman/config.json`.
///
/// # Errors
///
/// Returns [`ConfigError::NoHome`] if the platform config directory cannot
/// be determined.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("dotman").join("config.json"))
        .ok_or(ConfigError::NoHome)
}

/// Expand `~` and `$VAR` placeholders in a configured path value.
///
/// # Errors
///
/// Returns [`ConfigError::Expand`] if a referenced environment variable is
/// unset or the home directory cannot be determined.
pub fn expand(value: &str) -> Result<PathBuf, ConfigError> {
    shellexpand::full(value)
        .map(|expanded| PathBuf::from(expanded.into_owned()))
        .map_err(|source| ConfigError::Expand {
            value: value.to_string(),
            source,
        })
}

/// Collapse the home-directory prefix of `path` to `~` for display.
///
/// Paths outside the home directory are returned unchanged.
#[must_use]
pub fn collapse_home(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(rest) = path.strip_prefix(&home)
    {
        if rest.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~/{}", rest.display());
    }
    path.display().to_string()
}

/// Normalize a path to its canonical form when it exists.
///
/// Falls back to the input unchanged when canonicalization fails (e.g. the
/// path does not exist yet).
#[must_use]
pub fn normalize(path: PathBuf) -> PathBuf {
    dunce::canonicalize(&path).unwrap_or(path)
}
