//! Per-screen form state.
//!
//! DESIGN
//! ======
//! One struct per use case owns its form fields, a `loading` flag, and the
//! `Notice` currently on screen. Actions take the `ApiClient` by reference,
//! validate first, and only then issue a single request. A failed check or a
//! failed request leaves the screen interactive with a notice explaining why.
//!
//! SYSTEM CONTEXT
//! ==============
//! The CLI drives these structs one subcommand at a time; the kiosk loop keeps
//! a clock-in screen alive across triggers.

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

pub mod accounts;
pub mod employees;
pub mod punch;
pub mod records;

use std::time::Duration;

use crate::capture::flow::{CaptureOutcome, Presented};
use crate::error::ApiError;

/// How a notice should be presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Error,
}

/// The transient message a screen shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
    /// `None` keeps the notice up until the next action.
    pub dismiss_after: Option<Duration>,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self { severity: Severity::Success, message: message.into(), dismiss_after: None }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self { severity: Severity::Info, message: message.into(), dismiss_after: None }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self { severity: Severity::Error, message: message.into(), dismiss_after: None }
    }

    /// Notice for a failed request, using `fallback` when the server gave no text.
    #[must_use]
    pub fn from_api(error: &ApiError, fallback: &str) -> Self {
        Self::error(error.user_message(fallback))
    }

    /// Notice for a presented capture outcome, held for its dismissal window.
    #[must_use]
    pub fn from_presented(presented: &Presented) -> Self {
        let severity = match presented.outcome {
            CaptureOutcome::Accepted(_) => Severity::Success,
            CaptureOutcome::Rejected(_) | CaptureOutcome::Failed(_) => Severity::Error,
        };
        Self {
            severity,
            message: presented.outcome.message().to_owned(),
            dismiss_after: Some(presented.dismiss_after),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Blank input means "no filter".
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
