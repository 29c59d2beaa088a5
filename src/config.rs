//! Declarative dotfile configuration.
//!
//! One JSON document maps category names to named entries, each with a
//! target path on the home side. The raw document is deserialized once and
//! converted into an immutable, typed [`Config`] that every operation takes
//! by reference; nothing is written back.
//!
//! ```json
//! {
//!   "store_dir": "~/dotfiles",
//!   "dotfiles": {
//!     "shell": {
//!       "bashrc": "~/.bashrc",
//!       "nvim": { "path": "~/.config/nvim", "is_dir": true }
//!     }
//!   },
//!   "ignored_files": ["README.md"],
//!   "git": { "ssh_key_path": "~/.ssh/id_ed25519" }
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::paths;

/// All loaded configuration, resolved and immutable.
#[derive(Debug, Clone)]
pub struct Config {
    /// The store directory, placeholder-expanded and normalized.
    pub store_dir: PathBuf,
    /// Categories sorted by name, each holding its entries sorted by name.
    pub categories: Vec<Category>,
    /// Entry names globally excluded from operations.
    pub ignored: Vec<String>,
    /// Settings for the git passthrough.
    pub git: GitSettings,
}

/// A named group of dotfile entries, mapped to a store subdirectory.
#[derive(Debug, Clone)]
pub struct Category {
    /// Category name; also the store subdirectory name.
    pub name: String,
    /// The entries of this category. Names are unique within a category by
    /// construction (JSON object keys).
    pub entries: Vec<Dotfile>,
}

impl Category {
    /// The store subdirectory backing this category.
    #[must_use]
    pub fn store_dir(&self, store: &Path) -> PathBuf {
        store.join(&self.name)
    }
}

/// A single tracked dotfile or directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dotfile {
    /// Entry name; also the filename under the category's store directory.
    pub name: String,
    /// Target path on the home side, placeholder-expanded.
    pub target: PathBuf,
    /// Whether the entry is declared to be a directory.
    pub is_dir: bool,
    /// Whether deploy may push this entry out (retrieve and diff always may).
    pub deploy: bool,
}

/// Settings for the git passthrough.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitSettings {
    /// SSH key registered via `ssh-add` when a push hits a publickey error.
    #[serde(default)]
    pub ssh_key_path: Option<String>,
}

/// Raw document shape, prior to placeholder expansion.
#[derive(Debug, Deserialize)]
struct RawConfig {
    store_dir: String,
    #[serde(default)]
    dotfiles: BTreeMap<String, BTreeMap<String, RawEntry>>,
    #[serde(default)]
    ignored_files: Vec<String>,
    #[serde(default)]
    git: Option<GitSettings>,
}

/// A single entry value: either a plain target path or a structured object
/// carrying the optional flags.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEntry {
    /// Plain string: `"~/.bashrc"`.
    Path(String),
    /// Structured: `{ "path": "~/.config/nvim", "is_dir": true }`.
    Detailed {
        path: String,
        #[serde(default)]
        is_dir: bool,
        #[serde(default = "default_deploy")]
        deploy: bool,
    },
}

const fn default_deploy() -> bool {
    true
}

impl Config {
    /// Load and resolve the configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing or unreadable, the
    /// JSON is malformed, or a placeholder fails to expand.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: RawConfig = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::resolve(raw)
    }

    fn resolve(raw: RawConfig) -> Result<Self, ConfigError> {
        let store_dir = paths::normalize(paths::expand(&raw.store_dir)?);

        let categories = raw
            .dotfiles
            .into_iter()
            .map(|(name, entries)| {
                let entries = entries
                    .into_iter()
                    .map(|(entry_name, raw_entry)| {
                        let (path, is_dir, deploy) = match raw_entry {
                            RawEntry::Path(path) => (path, false, true),
                            RawEntry::Detailed {
                                path,
                                is_dir,
                                deploy,
                            } => (path, is_dir, deploy),
                        };
                        Ok(Dotfile {
                            name: entry_name,
                            target: paths::expand(&path)?,
                            is_dir,
                            deploy,
                        })
                    })
                    .collect::<Result<Vec<_>, ConfigError>>()?;
                Ok(Category { name, entries })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self {
            store_dir,
            categories,
            ignored: raw.ignored_files,
            git: raw.git.unwrap_or_default(),
        })
    }

    /// Look up an entry by dotted path, e.g. `shell.bashrc`.
    #[must_use]
    pub fn lookup(&self, dotted: &str) -> Option<&Dotfile> {
        let (category, name) = dotted.split_once('.')?;
        self.categories
            .iter()
            .find(|c| c.name == category)?
            .entries
            .iter()
            .find(|e| e.name == name)
    }

    /// Flattened view of all entries irrespective of category, for display.
    ///
    /// Categories are visited in sorted name order; when two categories
    /// define the same entry name, the later one silently wins. This is a
    /// documented limitation of the flat view, not of the per-category data.
    #[must_use]
    pub fn flat_dotfiles(&self) -> BTreeMap<&str, &Dotfile> {
        let mut flat = BTreeMap::new();
        for category in &self.categories {
            for entry in &category.entries {
                flat.insert(entry.name.as_str(), entry);
            }
        }
        flat
    }

    /// The effective ignore set: globally ignored names plus `extra` from
    /// the current invocation.
    #[must_use]
    pub fn ignore_set(&self, extra: &[String]) -> BTreeSet<String> {
        self.ignored
            .iter()
            .chain(extra.iter())
            .cloned()
            .collect()
    }
}
