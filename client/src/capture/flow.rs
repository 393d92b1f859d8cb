//! Capture-and-submit with at-most-once semantics.
//!
//! DESIGN
//! ======
//! A trigger acquires the `SubmitGate`, captures one still, submits it once,
//! and hands back a `Presented` outcome that keeps holding the gate. The gate
//! opens again only when the outcome is dismissed (after the dismissal window)
//! or dropped, so repeated taps while a request is in flight or while the
//! result is on screen are refused with `FlowError::Busy` and never reach the
//! camera or the network.
//!
//! No retries: a failed submission is presented like any other outcome and the
//! user triggers again.

#[cfg(test)]
#[path = "flow_test.rs"]
mod tests;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{Camera, CapturedImage};
use crate::error::ApiError;
use crate::validate::ValidationError;

// =============================================================================
// GATE
// =============================================================================

/// Single-slot trigger lock shared by every clone of a flow.
#[derive(Clone, Debug, Default)]
pub struct SubmitGate {
    busy: Arc<AtomicBool>,
}

impl SubmitGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the slot if it is free.
    #[must_use]
    pub fn try_acquire(&self) -> Option<SubmitPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitPermit { busy: Arc::clone(&self.busy) })
    }

    /// Whether the trigger is currently disabled.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Holding this keeps the trigger disabled; dropping it re-enables it.
#[derive(Debug)]
pub struct SubmitPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for SubmitPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

// =============================================================================
// ENDPOINT SEAM
// =============================================================================

/// Where a captured image is sent. Implementations hold their own form
/// fields and return the confirmation text on success.
#[async_trait]
pub trait CaptureEndpoint: Send + Sync {
    /// Check form fields before anything is captured.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Text shown when the failure carries no server message.
    fn failure_fallback(&self) -> &'static str;

    /// Send the image in a single request.
    async fn submit(&self, image: CapturedImage) -> Result<String, ApiError>;
}

// =============================================================================
// OUTCOMES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("a capture is already being processed")]
    Busy,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Exactly one of these is presented per accepted trigger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The server acknowledged the submission.
    Accepted(String),
    /// The server answered with a domain failure (e.g. face not recognized).
    Rejected(String),
    /// Nothing usable came back: camera, transport, or timeout failure.
    Failed(String),
}

impl CaptureOutcome {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Accepted(text) | Self::Rejected(text) | Self::Failed(text) => text,
        }
    }

    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    fn from_submission(result: Result<String, ApiError>, fallback: &str) -> Self {
        match result {
            Ok(text) => Self::Accepted(text),
            Err(error) if error.is_domain_failure() => Self::Rejected(error.user_message(fallback)),
            Err(error) => Self::Failed(error.user_message(fallback)),
        }
    }
}

/// An outcome on screen. The trigger stays disabled while this is alive.
#[derive(Debug)]
pub struct Presented {
    pub outcome: CaptureOutcome,
    pub dismiss_after: Duration,
    permit: SubmitPermit,
}

impl Presented {
    /// Wait out the dismissal window, then re-enable the trigger.
    pub async fn dismiss(self) -> CaptureOutcome {
        tokio::time::sleep(self.dismiss_after).await;
        drop(self.permit);
        self.outcome
    }
}

// =============================================================================
// FLOW
// =============================================================================

pub struct CaptureFlow<C, E> {
    camera: C,
    endpoint: E,
    gate: SubmitGate,
    dismiss_after: Duration,
}

impl<C: Camera, E: CaptureEndpoint> CaptureFlow<C, E> {
    #[must_use]
    pub fn new(camera: C, endpoint: E, dismiss_after: Duration) -> Self {
        Self { camera, endpoint, gate: SubmitGate::new(), dismiss_after }
    }

    /// Share an existing gate, e.g. one trigger button driving several flows.
    #[must_use]
    pub fn with_gate(mut self, gate: SubmitGate) -> Self {
        self.gate = gate;
        self
    }

    #[must_use]
    pub fn gate(&self) -> &SubmitGate {
        &self.gate
    }

    #[must_use]
    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    /// Capture one image and submit it once.
    ///
    /// # Errors
    ///
    /// `Invalid` when the form fails validation and `Busy` when a previous
    /// trigger is still in flight or on screen. Neither touches the camera or
    /// the network. Submission failures are not errors here; they come back
    /// as a presented `CaptureOutcome`.
    pub async fn trigger(&self) -> Result<Presented, FlowError> {
        self.endpoint.validate()?;
        let permit = self.gate.try_acquire().ok_or(FlowError::Busy)?;

        let fallback = self.endpoint.failure_fallback();
        let outcome = match self.camera.capture().await {
            Ok(image) => {
                tracing::debug!(bytes = image.bytes.len(), content_type = image.content_type, "submitting capture");
                CaptureOutcome::from_submission(self.endpoint.submit(image).await, fallback)
            }
            Err(error) => {
                tracing::warn!(%error, "camera capture failed");
                CaptureOutcome::Failed(error.to_string())
            }
        };

        match &outcome {
            CaptureOutcome::Accepted(_) => tracing::info!("capture accepted"),
            CaptureOutcome::Rejected(message) | CaptureOutcome::Failed(message) => {
                tracing::warn!(%message, "capture not accepted");
            }
        }

        Ok(Presented { outcome, dismiss_after: self.dismiss_after, permit })
    }
}
