//! External process execution behind a narrow, fake-able interface.
//!
//! The sync and git logic only ever needs two shapes of subprocess call:
//! captured output (diff tool, git plumbing) and inherited stdio (`ssh-add`,
//! which may prompt for a passphrase). Both live behind [`CommandRunner`] so
//! command logic can be tested with a deterministic fake.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::{Context as _, Result};

/// Result of a captured command execution.
#[derive(Debug, Clone, Default)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the command exited successfully.
    pub success: bool,
    /// Raw exit code, when the process was not killed by a signal.
    pub code: Option<i32>,
}

impl ExecResult {
    /// A successful result with the given stdout (test and fake scaffolding).
    #[must_use]
    pub fn ok(stdout: &str) -> Self {
        Self {
            stdout: stdout.to_string(),
            stderr: String::new(),
            success: true,
            code: Some(0),
        }
    }

    /// A failed result with the given exit code and stderr.
    #[must_use]
    pub fn failed(code: i32, stderr: &str) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.to_string(),
            success: false,
            code: Some(code),
        }
    }
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Abstraction over subprocess invocation.
///
/// The production implementation is [`SystemRunner`]; tests use a scripted
/// fake so no real processes are spawned. A non-zero exit is reported in the
/// returned [`ExecResult`], not as an `Err`; failing to *spawn* is the only
/// error condition.
pub trait CommandRunner: Send + Sync {
    /// Run a command with captured stdout/stderr.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned.
    fn run(&self, dir: Option<&Path>, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command with inherited stdio, for tools that interact with the
    /// terminal themselves. Returns the exit code, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned.
    fn run_interactive(&self, dir: Option<&Path>, program: &str, args: &[&str])
    -> Result<Option<i32>>;
}

/// Production [`CommandRunner`] backed by [`std::process::Command`].
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, dir: Option<&Path>, program: &str, args: &[&str]) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }
        let output = cmd
            .output()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(ExecResult::from(output))
    }

    fn run_interactive(
        &self,
        dir: Option<&Path>,
        program: &str,
        args: &[&str],
    ) -> Result<Option<i32>> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }
        let status = cmd
            .status()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(status.code())
    }
}

/// Locate a required external tool on `PATH`.
///
/// # Errors
///
/// Returns an error naming the tool when it cannot be found.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).with_context(|| format!("required external tool '{name}' not found on PATH"))
}

/// Scripted [`CommandRunner`] for unit tests.
///
/// Queued results are returned in order; once the queue is empty, a
/// successful empty result is returned. Every invocation is recorded as a
/// single `program arg1 arg2 …` line for assertions.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FakeRunner {
    results: std::sync::Mutex<std::collections::VecDeque<ExecResult>>,
    codes: std::sync::Mutex<std::collections::VecDeque<Option<i32>>>,
    calls: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl FakeRunner {
    /// Create a fake with nothing queued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result for the next captured `run` call.
    #[must_use]
    pub fn with_result(self, result: ExecResult) -> Self {
        self.results
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push_back(result);
        self
    }

    /// Queue an exit code for the next `run_interactive` call.
    #[must_use]
    pub fn with_interactive_code(self, code: Option<i32>) -> Self {
        self.codes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push_back(code);
        self
    }

    /// All invocations so far, as `program arg1 arg2 …` lines.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn record(&self, program: &str, args: &[&str]) {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(line);
    }
}

#[cfg(test)]
impl CommandRunner for FakeRunner {
    fn run(&self, _dir: Option<&Path>, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.record(program, args);
        Ok(self
            .results
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| ExecResult::ok("")))
    }

    fn run_interactive(
        &self,
        _dir: Option<&Path>,
        program: &str,
        args: &[&str],
    ) -> Result<Option<i32>> {
        self.record(program, args);
        Ok(self
            .codes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front()
            .unwrap_or(Some(0)))
    }
}
