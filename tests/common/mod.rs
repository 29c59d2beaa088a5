// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed store + home pair and a fluent
// builder so each integration test can set up an isolated environment,
// including a real JSON config file, without repeating filesystem
// boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use dotman::config::Config;

/// An isolated store/home pair backed by a [`tempfile::TempDir`].
///
/// The directory is deleted automatically when dropped.
pub struct TestEnv {
    dir: tempfile::TempDir,
    config_path: PathBuf,
}

impl TestEnv {
    /// Path to the store directory.
    pub fn store(&self) -> PathBuf {
        self.dir.path().join("store")
    }

    /// Path to the simulated home directory.
    pub fn home(&self) -> PathBuf {
        self.dir.path().join("home")
    }

    /// Path to the generated config file.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load the generated config through the real loader.
    pub fn load_config(&self) -> Config {
        Config::load(&self.config_path).expect("load config")
    }

    /// Write a file under `store/<category>/<name>`, creating directories.
    pub fn write_store(&self, category: &str, name: &str, content: &str) -> PathBuf {
        let path = self.store().join(category).join(name);
        std::fs::create_dir_all(path.parent().expect("store path has a parent"))
            .expect("create category dir");
        std::fs::write(&path, content).expect("write store file");
        path
    }

    /// Write a file under the simulated home directory.
    pub fn write_home(&self, name: &str, content: &str) -> PathBuf {
        let path = self.home().join(name);
        std::fs::create_dir_all(path.parent().expect("home path has a parent"))
            .expect("create home dir");
        std::fs::write(&path, content).expect("write home file");
        path
    }

    /// Read a file to a string.
    pub fn read(path: &Path) -> String {
        std::fs::read_to_string(path).expect("read file")
    }
}

/// Fluent builder for [`TestEnv`].
///
/// Entries map `store/<category>/<name>` to `home/<name>`; the generated
/// config uses absolute paths so no placeholder expansion is involved.
pub struct TestEnvBuilder {
    entries: Vec<EntrySpec>,
    ignored: Vec<String>,
}

struct EntrySpec {
    category: String,
    name: String,
    is_dir: bool,
    deploy: bool,
}

impl TestEnvBuilder {
    /// Begin building an environment with no entries.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            ignored: Vec::new(),
        }
    }

    /// Declare a plain file entry.
    pub fn entry(mut self, category: &str, name: &str) -> Self {
        self.entries.push(EntrySpec {
            category: category.to_string(),
            name: name.to_string(),
            is_dir: false,
            deploy: true,
        });
        self
    }

    /// Declare a directory entry.
    pub fn dir_entry(mut self, category: &str, name: &str) -> Self {
        self.entries.push(EntrySpec {
            category: category.to_string(),
            name: name.to_string(),
            is_dir: true,
            deploy: true,
        });
        self
    }

    /// Declare an entry that deploy must hold back.
    pub fn no_deploy_entry(mut self, category: &str, name: &str) -> Self {
        self.entries.push(EntrySpec {
            category: category.to_string(),
            name: name.to_string(),
            is_dir: false,
            deploy: false,
        });
        self
    }

    /// Add a globally ignored name.
    pub fn ignored(mut self, name: &str) -> Self {
        self.ignored.push(name.to_string());
        self
    }

    /// Create the directories and the JSON config file.
    pub fn build(self) -> TestEnv {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = dir.path().join("store");
        let home = dir.path().join("home");
        std::fs::create_dir_all(&store).expect("create store dir");
        std::fs::create_dir_all(&home).expect("create home dir");

        let mut dotfiles = serde_json::Map::new();
        for spec in &self.entries {
            let target = home.join(&spec.name).display().to_string();
            let value = serde_json::json!({
                "path": target,
                "is_dir": spec.is_dir,
                "deploy": spec.deploy,
            });
            dotfiles
                .entry(spec.category.clone())
                .or_insert_with(|| serde_json::json!({}))
                .as_object_mut()
                .expect("category is an object")
                .insert(spec.name.clone(), value);
        }

        let document = serde_json::json!({
            "store_dir": store.display().to_string(),
            "dotfiles": dotfiles,
            "ignored_files": self.ignored,
        });

        let config_path = dir.path().join("config.json");
        std::fs::write(
            &config_path,
            serde_json::to_string_pretty(&document).expect("serialize config"),
        )
        .expect("write config");

        TestEnv { dir, config_path }
    }
}
