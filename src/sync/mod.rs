//! Bidirectional copy engine.
//!
//! A sync pass walks every configured category and entry once, computes the
//! (source, destination) pair for the requested direction, applies the
//! staleness check for outgoing copies, and records a per-entry [`Outcome`].
//! There are no retries and no rollback: a mid-batch failure leaves already
//! copied entries in place.

pub mod compare;
pub mod fs;

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use tracing::debug;

use crate::config::Config;
use crate::error::SyncError;
use crate::paths;
use crate::prompt::Prompt;

/// Direction of a sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Store → home.
    Deploy,
    /// Home → store.
    Retrieve,
}

/// Which configured entries an invocation operates on.
#[derive(Debug, Clone, Default)]
pub enum Selection {
    /// Every configured entry (the default).
    #[default]
    All,
    /// Only the named entries, wherever their category.
    Only(BTreeSet<String>),
}

impl Selection {
    /// Build a selection from a `--file` list; empty means all.
    #[must_use]
    pub fn from_files(files: &[String]) -> Self {
        if files.is_empty() {
            Self::All
        } else {
            Self::Only(files.iter().cloned().collect())
        }
    }

    /// Whether `name` is part of this selection.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => names.contains(name),
        }
    }
}

/// Per-entry result of a sync pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The entry was copied.
    Copied {
        /// Source of the copy.
        src: PathBuf,
        /// Destination of the copy.
        dest: PathBuf,
    },
    /// The entry is in the ignore set.
    Ignored,
    /// The source side does not exist.
    MissingSource(PathBuf),
    /// The user declined the overwrite confirmation.
    Declined,
    /// The entry's `deploy` flag is false and the pass was outgoing.
    NotDeployed,
}

/// Collected outcomes of one sync pass, in entry order.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// `(entry name, outcome)` pairs in the order they were visited.
    pub entries: Vec<(String, Outcome)>,
}

impl SyncReport {
    fn push(&mut self, name: &str, outcome: Outcome) {
        self.entries.push((name.to_string(), outcome));
    }

    /// Number of entries actually copied.
    #[must_use]
    pub fn copied(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, outcome)| matches!(outcome, Outcome::Copied { .. }))
            .count()
    }

    /// The outcome recorded for `name`, if the entry was visited.
    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, outcome)| outcome)
    }

    /// Print the per-entry report: aligned `source -> destination` lines for
    /// copies, skip notices for everything else.
    pub fn print(&self) {
        let pad = self
            .entries
            .iter()
            .filter_map(|(_, outcome)| match outcome {
                Outcome::Copied { src, .. } => Some(paths::collapse_home(src).chars().count()),
                _ => None,
            })
            .max()
            .unwrap_or(0);

        for (name, outcome) in &self.entries {
            match outcome {
                Outcome::Copied { src, dest } => {
                    let src_disp = paths::collapse_home(src);
                    let dest_disp = paths::collapse_home(dest);
                    println!("{src_disp:<pad$} -> {dest_disp}");
                }
                Outcome::Ignored | Outcome::Declined => println!("Skipping {name}"),
                Outcome::MissingSource(src) => {
                    println!(
                        "Cannot copy because {} does not exist",
                        paths::collapse_home(src)
                    );
                }
                Outcome::NotDeployed => {}
            }
        }

        let copied = self.copied();
        let skipped = self.entries.len() - copied;
        debug!("{copied} copied, {skipped} skipped");
    }
}

/// Run one sync pass over the configuration.
///
/// For [`Direction::Deploy`], a missing category store directory aborts the
/// whole pass; for [`Direction::Retrieve`] it is created. Within a category
/// the pass is linear per entry: ignored and deselected entries are skipped,
/// a missing source is a recorded skip, and an outgoing copy over newer,
/// differing local edits asks `prompt` before overwriting.
///
/// # Errors
///
/// Returns [`SyncError::MissingCategoryDir`] for a deploy into an absent
/// category directory, or any I/O error from copying and comparison.
pub fn run(
    config: &Config,
    direction: Direction,
    selection: &Selection,
    ignored: &BTreeSet<String>,
    prompt: &dyn Prompt,
) -> Result<SyncReport> {
    let mut report = SyncReport::default();

    for category in &config.categories {
        let cat_dir = category.store_dir(&config.store_dir);
        if !cat_dir.is_dir() {
            match direction {
                Direction::Deploy => {
                    return Err(SyncError::MissingCategoryDir(cat_dir).into());
                }
                Direction::Retrieve => {
                    std::fs::create_dir_all(&cat_dir).map_err(|source| SyncError::CreateDir {
                        path: cat_dir.clone(),
                        source,
                    })?;
                }
            }
        }

        for entry in &category.entries {
            if !selection.contains(&entry.name) {
                continue;
            }
            if ignored.contains(&entry.name) {
                report.push(&entry.name, Outcome::Ignored);
                continue;
            }

            let store_path = cat_dir.join(&entry.name);
            let (src, dest) = match direction {
                Direction::Deploy => (store_path, entry.target.clone()),
                Direction::Retrieve => (entry.target.clone(), store_path),
            };

            if direction == Direction::Deploy && !entry.deploy {
                debug!("holding back {}: deploy disabled", entry.name);
                report.push(&entry.name, Outcome::NotDeployed);
                continue;
            }

            if !src.exists() {
                report.push(&entry.name, Outcome::MissingSource(src));
                continue;
            }

            if direction == Direction::Deploy
                && compare::is_stale(&dest, &src)
                    .with_context(|| format!("checking staleness of {}", entry.name))?
            {
                let message = format!(
                    "{} has been modified since {} was stored. Overwrite?",
                    paths::collapse_home(&dest),
                    paths::collapse_home(&src)
                );
                if !prompt.confirm(&message)? {
                    report.push(&entry.name, Outcome::Declined);
                    continue;
                }
            }

            fs::copy_path(&src, &dest)?;
            debug!("copied {} -> {}", src.display(), dest.display());
            report.push(&entry.name, Outcome::Copied { src, dest });
        }
    }

    Ok(report)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::{Category, Config, Dotfile, GitSettings};
    use crate::prompt::ScriptedPrompt;
    use std::path::Path;
    use std::time::{Duration, SystemTime};

    struct Fixture {
        _dir: tempfile::TempDir,
        config: Config,
        home: PathBuf,
    }

    /// Store and home directories backed by one temp dir, with a config
    /// declaring a `shell` category containing the given entry names.
    fn fixture(entries: &[&str]) -> Fixture {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = dir.path().join("store");
        let home = dir.path().join("home");
        std::fs::create_dir_all(store.join("shell")).unwrap();
        std::fs::create_dir_all(&home).unwrap();

        let config = Config {
            store_dir: store,
            categories: vec![Category {
                name: "shell".to_string(),
                entries: entries
                    .iter()
                    .map(|name| Dotfile {
                        name: (*name).to_string(),
                        target: home.join(name),
                        is_dir: false,
                        deploy: true,
                    })
                    .collect(),
            }],
            ignored: Vec::new(),
            git: GitSettings::default(),
        };
        Fixture {
            _dir: dir,
            config,
            home,
        }
    }

    fn set_mtime(path: &Path, time: SystemTime) {
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(time).unwrap();
    }

    #[test]
    fn deploy_copies_store_to_home() {
        let fx = fixture(&["bashrc"]);
        std::fs::write(fx.config.store_dir.join("shell/bashrc"), "export A=1\n").unwrap();

        let report = run(
            &fx.config,
            Direction::Deploy,
            &Selection::All,
            &BTreeSet::new(),
            &ScriptedPrompt::new(),
        )
        .unwrap();

        assert_eq!(report.copied(), 1);
        assert_eq!(
            std::fs::read_to_string(fx.home.join("bashrc")).unwrap(),
            "export A=1\n"
        );
    }

    #[test]
    fn ignored_entry_is_skipped_by_both_directions() {
        let fx = fixture(&["bashrc"]);
        std::fs::write(fx.config.store_dir.join("shell/bashrc"), "stored\n").unwrap();
        let ignored: BTreeSet<String> = ["bashrc".to_string()].into();

        for direction in [Direction::Deploy, Direction::Retrieve] {
            let report = run(
                &fx.config,
                direction,
                &Selection::All,
                &ignored,
                &ScriptedPrompt::new(),
            )
            .unwrap();
            assert_eq!(report.outcome("bashrc"), Some(&Outcome::Ignored));
        }
        assert!(!fx.home.join("bashrc").exists());
    }

    #[test]
    fn deselected_entry_is_not_visited() {
        let fx = fixture(&["bashrc", "zshrc"]);
        std::fs::write(fx.config.store_dir.join("shell/bashrc"), "b\n").unwrap();
        std::fs::write(fx.config.store_dir.join("shell/zshrc"), "z\n").unwrap();

        let selection = Selection::from_files(&["zshrc".to_string()]);
        let report = run(
            &fx.config,
            Direction::Deploy,
            &selection,
            &BTreeSet::new(),
            &ScriptedPrompt::new(),
        )
        .unwrap();

        assert!(report.outcome("bashrc").is_none());
        assert_eq!(report.copied(), 1);
        assert!(!fx.home.join("bashrc").exists());
        assert!(fx.home.join("zshrc").exists());
    }

    #[test]
    fn deploy_missing_category_dir_is_fatal() {
        let fx = fixture(&["bashrc"]);
        std::fs::remove_dir(fx.config.store_dir.join("shell")).unwrap();

        let err = run(
            &fx.config,
            Direction::Deploy,
            &Selection::All,
            &BTreeSet::new(),
            &ScriptedPrompt::new(),
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<SyncError>(),
            Some(SyncError::MissingCategoryDir(_))
        ));
    }

    #[test]
    fn retrieve_creates_category_dir() {
        let fx = fixture(&["bashrc"]);
        std::fs::remove_dir(fx.config.store_dir.join("shell")).unwrap();
        std::fs::write(fx.home.join("bashrc"), "local\n").unwrap();

        let report = run(
            &fx.config,
            Direction::Retrieve,
            &Selection::All,
            &BTreeSet::new(),
            &ScriptedPrompt::new(),
        )
        .unwrap();

        assert_eq!(report.copied(), 1);
        assert_eq!(
            std::fs::read_to_string(fx.config.store_dir.join("shell/bashrc")).unwrap(),
            "local\n"
        );
    }

    #[test]
    fn missing_source_is_a_recorded_skip() {
        let fx = fixture(&["bashrc", "zshrc"]);
        std::fs::write(fx.config.store_dir.join("shell/zshrc"), "z\n").unwrap();

        let report = run(
            &fx.config,
            Direction::Deploy,
            &Selection::All,
            &BTreeSet::new(),
            &ScriptedPrompt::new(),
        )
        .unwrap();

        assert!(matches!(
            report.outcome("bashrc"),
            Some(Outcome::MissingSource(_))
        ));
        assert_eq!(report.copied(), 1, "the batch should continue past a skip");
    }

    #[test]
    fn identical_content_never_prompts() {
        let fx = fixture(&["bashrc"]);
        let store_file = fx.config.store_dir.join("shell/bashrc");
        let home_file = fx.home.join("bashrc");
        std::fs::write(&store_file, "same\n").unwrap();
        std::fs::write(&home_file, "same\n").unwrap();
        set_mtime(&home_file, SystemTime::now() + Duration::from_secs(300));

        let prompt = ScriptedPrompt::new();
        let report = run(
            &fx.config,
            Direction::Deploy,
            &Selection::All,
            &BTreeSet::new(),
            &prompt,
        )
        .unwrap();

        assert_eq!(prompt.asked(), 0, "identical content must not prompt");
        assert_eq!(report.copied(), 1);
    }

    #[test]
    fn declined_conflict_leaves_destination_unchanged() {
        let fx = fixture(&["bashrc"]);
        let store_file = fx.config.store_dir.join("shell/bashrc");
        let home_file = fx.home.join("bashrc");
        std::fs::write(&store_file, "stored\n").unwrap();
        std::fs::write(&home_file, "edited locally\n").unwrap();
        set_mtime(&store_file, SystemTime::now() - Duration::from_secs(300));
        set_mtime(&home_file, SystemTime::now());

        let prompt = ScriptedPrompt::confirming([false]);
        let report = run(
            &fx.config,
            Direction::Deploy,
            &Selection::All,
            &BTreeSet::new(),
            &prompt,
        )
        .unwrap();

        assert_eq!(prompt.asked(), 1);
        assert_eq!(report.outcome("bashrc"), Some(&Outcome::Declined));
        assert_eq!(
            std::fs::read_to_string(&home_file).unwrap(),
            "edited locally\n"
        );
    }

    #[test]
    fn accepted_conflict_overwrites() {
        let fx = fixture(&["bashrc"]);
        let store_file = fx.config.store_dir.join("shell/bashrc");
        let home_file = fx.home.join("bashrc");
        std::fs::write(&store_file, "stored\n").unwrap();
        std::fs::write(&home_file, "edited locally\n").unwrap();
        set_mtime(&store_file, SystemTime::now() - Duration::from_secs(300));
        set_mtime(&home_file, SystemTime::now());

        let prompt = ScriptedPrompt::confirming([true]);
        run(
            &fx.config,
            Direction::Deploy,
            &Selection::All,
            &BTreeSet::new(),
            &prompt,
        )
        .unwrap();

        assert_eq!(std::fs::read_to_string(&home_file).unwrap(), "stored\n");
    }

    #[test]
    fn older_destination_overwrites_without_prompt() {
        let fx = fixture(&["bashrc"]);
        let store_file = fx.config.store_dir.join("shell/bashrc");
        let home_file = fx.home.join("bashrc");
        std::fs::write(&store_file, "stored\n").unwrap();
        std::fs::write(&home_file, "old local\n").unwrap();
        set_mtime(&home_file, SystemTime::now() - Duration::from_secs(300));
        set_mtime(&store_file, SystemTime::now());

        let prompt = ScriptedPrompt::new();
        run(
            &fx.config,
            Direction::Deploy,
            &Selection::All,
            &BTreeSet::new(),
            &prompt,
        )
        .unwrap();

        assert_eq!(prompt.asked(), 0);
        assert_eq!(std::fs::read_to_string(&home_file).unwrap(), "stored\n");
    }

    #[test]
    fn retrieve_never_prompts() {
        let fx = fixture(&["bashrc"]);
        let store_file = fx.config.store_dir.join("shell/bashrc");
        let home_file = fx.home.join("bashrc");
        std::fs::write(&store_file, "stored, newer\n").unwrap();
        std::fs::write(&home_file, "local\n").unwrap();
        set_mtime(&home_file, SystemTime::now() - Duration::from_secs(300));
        set_mtime(&store_file, SystemTime::now());

        let prompt = ScriptedPrompt::new();
        run(
            &fx.config,
            Direction::Retrieve,
            &Selection::All,
            &BTreeSet::new(),
            &prompt,
        )
        .unwrap();

        assert_eq!(prompt.asked(), 0);
        assert_eq!(
            std::fs::read_to_string(&store_file).unwrap(),
            "local\n",
            "retrieve treats the home side as authoritative"
        );
    }

    #[test]
    fn deploy_flag_false_holds_entry_back() {
        let mut fx = fixture(&["secret"]);
        fx.config.categories[0].entries[0].deploy = false;
        std::fs::write(fx.config.store_dir.join("shell/secret"), "stored\n").unwrap();
        std::fs::write(fx.home.join("secret"), "local\n").unwrap();

        let report = run(
            &fx.config,
            Direction::Deploy,
            &Selection::All,
            &BTreeSet::new(),
            &ScriptedPrompt::new(),
        )
        .unwrap();
        assert_eq!(report.outcome("secret"), Some(&Outcome::NotDeployed));
        assert_eq!(std::fs::read_to_string(fx.home.join("secret")).unwrap(), "local\n");

        // retrieve still picks it up
        let report = run(
            &fx.config,
            Direction::Retrieve,
            &Selection::All,
            &BTreeSet::new(),
            &ScriptedPrompt::new(),
        )
        .unwrap();
        assert_eq!(report.copied(), 1);
    }

    #[test]
    fn directory_entries_copy_recursively() {
        let fx = fixture(&["nvim"]);
        let store_tree = fx.config.store_dir.join("shell/nvim");
        std::fs::create_dir_all(store_tree.join("lua")).unwrap();
        std::fs::write(store_tree.join("init.lua"), "-- init\n").unwrap();
        std::fs::write(store_tree.join("lua/opts.lua"), "-- opts\n").unwrap();

        run(
            &fx.config,
            Direction::Deploy,
            &Selection::All,
            &BTreeSet::new(),
            &ScriptedPrompt::new(),
        )
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(fx.home.join("nvim/lua/opts.lua")).unwrap(),
            "-- opts\n"
        );
    }
}
