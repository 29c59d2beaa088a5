use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Version baked in by CI via `DOTMAN_VERSION`, falling back to the crate
/// version for local builds.
pub const VERSION: &str = match option_env!("DOTMAN_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

/// Top-level CLI entry point for the dotman synchronizer.
#[derive(Parser, Debug)]
#[command(
    name = "dotman",
    about = "Synchronize dotfiles between the home directory and a version-controlled store",
    version = VERSION
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Override the configuration file path
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Copy tracked dotfiles from the store into the home directory
    Deploy(SyncOpts),
    /// Copy dotfiles from the home directory into the store
    Retrieve(SyncOpts),
    /// Show unified diffs between store and deployed copies
    Diff(SyncOpts),
    /// List managed dotfiles and their tracked state
    List,
    /// Remove untracked files from the store directory
    Clean(CleanOpts),
    /// Run git in the store directory
    Git(GitOpts),
    /// Generate shell completions
    Completions(CompletionsOpts),
}

/// Options shared by the `deploy`, `retrieve`, and `diff` subcommands.
#[derive(Parser, Debug, Clone)]
pub struct SyncOpts {
    /// Operate on every configured dotfile (the default)
    #[arg(short, long, conflicts_with = "file")]
    pub all: bool,

    /// Operate only on specific entries
    #[arg(short, long, value_name = "NAMES", value_delimiter = ',')]
    pub file: Vec<String>,

    /// Exclude specific entries from this invocation
    #[arg(short, long, value_name = "NAMES", value_delimiter = ',')]
    pub ignore: Vec<String>,
}

/// Options for the `clean` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CleanOpts {
    /// Remove everything after a single bulk confirmation
    #[arg(short, long)]
    pub all: bool,

    /// Exclude specific names from this invocation
    #[arg(short, long, value_name = "NAMES", value_delimiter = ',')]
    pub ignore: Vec<String>,
}

/// Options for the `git` subcommand.
///
/// `--add`, `--commit`, and `--push` may be combined and run in that order;
/// every other action stands alone.
#[derive(Parser, Debug, Clone)]
#[command(group = clap::ArgGroup::new("action").required(true).multiple(true))]
pub struct GitOpts {
    /// Stage files in the store repository
    #[arg(short, long, value_name = "PATHSPEC", group = "action")]
    pub add: Option<String>,

    /// Commit staged files with the given message
    #[arg(short, long, value_name = "MESSAGE", group = "action")]
    pub commit: Option<String>,

    /// Push the store repository to its remote
    #[arg(short, long, group = "action")]
    pub push: bool,

    /// Show the git status of the store repository
    #[arg(
        short,
        long,
        group = "action",
        conflicts_with_all = ["add", "commit", "push"]
    )]
    pub status: bool,

    /// Show the git diff of the store repository
    #[arg(
        short,
        long,
        group = "action",
        conflicts_with_all = ["add", "commit", "push", "status"]
    )]
    pub diff: bool,

    /// Unstage files in the store repository
    #[arg(
        short,
        long,
        value_name = "PATHSPEC",
        group = "action",
        conflicts_with_all = ["add", "commit", "push", "status", "diff"]
    )]
    pub restore: Option<String>,

    /// Run an arbitrary git command in the store repository
    #[arg(
        short = 'C',
        long,
        value_name = "ARGS",
        group = "action",
        conflicts_with_all = ["add", "commit", "push", "status", "diff", "restore"]
    )]
    pub command: Option<String>,
}

/// Options for the `completions` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompletionsOpts {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
