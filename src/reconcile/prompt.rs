// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Interactive confirmation through the terminal.

use crate::reconcile::{Confirm, ReconcileError};

use inquire::{error::InquireError, Confirm as ConfirmPrompt};
use tracing::instrument;

/// Ask the user through the terminal.
///
/// Defaults to "no". Dismissing the prompt with escape also counts as "no".
#[derive(Debug, Default, Clone)]
pub struct InquireConfirm;

impl InquireConfirm {
    /// Construct new terminal confirmation.
    pub fn new() -> Self {
        Self
    }
}

impl Confirm for InquireConfirm {
    #[instrument(skip(self), level = "debug")]
    fn confirm(&mut self, message: &str) -> Result<bool, ReconcileError> {
        match ConfirmPrompt::new(message).with_default(false).prompt() {
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationCanceled) => Ok(false),
            Err(error) => Err(ReconcileError::Prompt(error)),
        }
    }
}
