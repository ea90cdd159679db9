//! Error types for the analysis workflow
//!
//! Validation and transport errors are recoverable: the reducer reverts the
//! session to its last stable step and surfaces them as notifications.
//! `IllegalTransition` is a caller bug and is never turned into a notification.

use crate::workflow::Step;

/// Fallback message used when a failed response carries no usable `detail`
pub const GENERIC_NETWORK_FAILURE: &str = "Network request failed. Please try again.";

/// Input rejected before any network call is made
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a repository name")]
    EmptyRepository,
    #[error("Please enter a branch name")]
    EmptyBranch,
    #[error("No files selected. Select at least one file to analyze")]
    EmptySelection,
}

/// Failure talking to the analysis backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request never produced an HTTP response (connect, timeout, I/O)
    #[error("Backend unreachable: {message}")]
    Unreachable { message: String },
    /// The backend answered with a non-success status
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },
    /// The backend answered 2xx but the body did not match the expected schema
    #[error("Malformed response from backend: {message}")]
    MalformedPayload { message: String },
}

impl TransportError {
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }

    /// Build a status error, preferring the server-provided detail
    pub fn status(status: u16, detail: Option<String>) -> Self {
        let message = detail
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| GENERIC_NETWORK_FAILURE.to_string());
        Self::Status { status, message }
    }

    /// Whether a caller-level retry policy may try again
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unreachable { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            Self::MalformedPayload { .. } => false,
        }
    }
}

/// An event was dispatched in a step that does not accept it
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Illegal transition: `{event}` is not accepted in step {step}")]
pub struct IllegalTransition {
    pub step: Step,
    pub event: &'static str,
}

/// Umbrella error returned by the reducer and the workflow driver
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    IllegalTransition(#[from] IllegalTransition),
}

impl WorkflowError {
    /// Recoverable errors revert the session; illegal transitions do not
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::IllegalTransition(_))
    }
}
