//! Dotfiles synchronization engine.
//!
//! Copies configuration files between a user's home directory and a
//! version-controlled store directory, in either direction, driven by a
//! declarative JSON config of categories and named entries. Also diffs the
//! two sides, lists tracked state, cleans untracked store files, and wraps
//! git for the store repository.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]** — parse the JSON config into an immutable, typed value
//! - **[`sync`]** — pair planning, staleness detection, and the copy engine
//! - **[`commands`]** — top-level subcommand orchestration
//! - **[`exec`] / [`prompt`]** — injectable subprocess and confirmation seams
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod paths;
pub mod prompt;
pub mod sync;
