//! Injected overwrite confirmation.
//!
//! The writer never talks to a terminal itself; callers hand it a
//! [`ConfirmPrompt`] implementation. The CLI wires up an interactive stdin
//! prompt, tests use scripted stubs, and `--yes` maps to [`AlwaysConfirm`].

/// Yes/no question capability consumed by the reconciliation writer.
pub trait ConfirmPrompt {
    /// Ask the user `question`; `true` means "go ahead and overwrite".
    fn confirm(&mut self, question: &str) -> bool;
}

/// Answers every question with yes. Used for `--yes` and scripted runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl ConfirmPrompt for AlwaysConfirm {
    fn confirm(&mut self, _question: &str) -> bool {
        true
    }
}

/// Declines every question. Used where prompting must never overwrite.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

impl ConfirmPrompt for NeverConfirm {
    fn confirm(&mut self, _question: &str) -> bool {
        false
    }
}
