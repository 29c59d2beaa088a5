//! Interactive prompts behind a capability trait.
//!
//! Commands never read standard input directly; they consult a [`Prompt`]
//! implementation. Production code uses [`TerminalPrompt`], tests inject
//! [`ScriptedPrompt`] for deterministic answers.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;

/// Abstraction over user confirmation and line input.
pub trait Prompt: Send + Sync {
    /// Ask a yes/no question; plain enter answers "no".
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying terminal interaction fails.
    fn confirm(&self, message: &str) -> Result<bool>;

    /// Ask for a free-form line of input; an empty answer is allowed.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying terminal interaction fails.
    fn input(&self, message: &str) -> Result<String>;
}

/// Terminal-backed [`Prompt`] using `dialoguer`.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> Result<bool> {
        Ok(dialoguer::Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()?)
    }

    fn input(&self, message: &str) -> Result<String> {
        Ok(dialoguer::Input::<String>::new()
            .with_prompt(message)
            .allow_empty(true)
            .interact_text()?)
    }
}

/// Deterministic [`Prompt`] that replays queued answers.
///
/// Once a queue runs dry, `confirm` answers `false` and `input` answers the
/// empty string. The number of confirmations asked is recorded so tests can
/// assert that no prompt appeared at all.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    confirms: Mutex<VecDeque<bool>>,
    inputs: Mutex<VecDeque<String>>,
    asked: AtomicUsize,
}

impl ScriptedPrompt {
    /// A prompt with no queued answers (every confirmation is declined).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue confirmation answers, consumed in order.
    #[must_use]
    pub fn confirming(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            confirms: Mutex::new(answers.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Queue a line-input answer.
    #[must_use]
    pub fn with_input(self, answer: &str) -> Self {
        self.inputs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push_back(answer.to_string());
        self
    }

    /// Number of confirmation prompts shown so far.
    #[must_use]
    pub fn asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&self, _message: &str) -> Result<bool> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .confirms
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front()
            .unwrap_or(false))
    }

    fn input(&self, _message: &str) -> Result<String> {
        Ok(self
            .inputs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front()
            .unwrap_or_default())
    }
}
