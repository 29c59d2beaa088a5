//! The `git` subcommand: thin passthrough to git in the store directory.
//!
//! `--add`, `--commit`, and `--push` combine and run in that order; every
//! other action stands alone. A push that fails with a publickey error
//! triggers one `ssh-add` registration (configured key, or an interactive
//! path prompt) followed by a single retry.

use anyhow::Result;
use tracing::debug;

use crate::cli::{GitOpts, GlobalOpts};
use crate::config::Config;
use crate::exec::{self, CommandRunner, ExecResult, SystemRunner};
use crate::paths;
use crate::prompt::{Prompt, TerminalPrompt};

/// The stderr pattern that identifies an SSH authentication failure.
const PUBLICKEY_DENIED: &str = "Permission denied (publickey)";

/// Run the git command.
///
/// # Errors
///
/// Returns an error if configuration loading fails, git is absent, or a
/// subprocess cannot be spawned.
pub fn run(global: &GlobalOpts, opts: &GitOpts) -> Result<()> {
    let config = super::load_config(global)?;
    exec::require_tool("git")?;
    dispatch(&config, opts, &SystemRunner, &TerminalPrompt)
}

/// Route the parsed flags to git invocations.
///
/// # Errors
///
/// Returns an error if a subprocess cannot be spawned or a key path fails
/// to expand.
pub fn dispatch(
    config: &Config,
    opts: &GitOpts,
    runner: &dyn CommandRunner,
    prompt: &dyn Prompt,
) -> Result<()> {
    if opts.add.is_some() || opts.commit.is_some() || opts.push {
        if let Some(spec) = &opts.add {
            let mut args = vec!["add"];
            args.extend(spec.split_whitespace());
            surface_stderr(&git_command(config, runner, &args)?);
        }
        if let Some(message) = &opts.commit {
            surface_stderr(&git_command(config, runner, &["commit", "-m", message])?);
        }
        if opts.push {
            push_with_auth(config, runner, prompt)?;
        }
    } else if opts.status {
        surface_stderr(&git_command(config, runner, &["status"])?);
    } else if opts.diff {
        surface_stderr(&git_command(config, runner, &["diff"])?);
    } else if let Some(spec) = &opts.restore {
        let mut args = vec!["restore", "--staged"];
        args.extend(spec.split_whitespace());
        surface_stderr(&git_command(config, runner, &args)?);
    } else if let Some(command) = &opts.command {
        let args: Vec<&str> = command.split_whitespace().collect();
        surface_stderr(&git_command(config, runner, &args)?);
    }
    Ok(())
}

/// Run one git command in the store directory, printing its stdout.
fn git_command(config: &Config, runner: &dyn CommandRunner, args: &[&str]) -> Result<ExecResult> {
    debug!("git {}", args.join(" "));
    let result = runner.run(Some(&config.store_dir), "git", args)?;
    if !result.stdout.trim().is_empty() {
        println!("{}", result.stdout.trim());
    }
    Ok(result)
}

fn surface_stderr(result: &ExecResult) {
    if !result.stderr.trim().is_empty() {
        eprintln!("{}", result.stderr.trim());
    }
}

/// Push, registering an SSH key and retrying once on a publickey failure.
fn push_with_auth(
    config: &Config,
    runner: &dyn CommandRunner,
    prompt: &dyn Prompt,
) -> Result<()> {
    let result = git_command(config, runner, &["push", "origin", "main"])?;
    if !result.stderr.contains(PUBLICKEY_DENIED) {
        surface_stderr(&result);
        return Ok(());
    }

    let key_path = match &config.git.ssh_key_path {
        Some(path) => path.clone(),
        None => prompt.input("SSH key not found, please enter path to ssh key")?,
    };
    if key_path.trim().is_empty() {
        println!("No SSH key provided");
        return Ok(());
    }

    let key = paths::expand(key_path.trim())?;
    let key_str = key.to_string_lossy();
    // inherited stdio: ssh-add may prompt for a passphrase itself
    runner.run_interactive(None, "ssh-add", &[key_str.as_ref()])?;

    let retry = git_command(config, runner, &["push", "origin", "main"])?;
    surface_stderr(&retry);
    Ok(())
}
