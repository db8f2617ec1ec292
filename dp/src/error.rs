//! Core error taxonomy
//!
//! Every failure of the planning flow reaches the caller as one of these
//! variants. Nothing is retried here and no partial plan or store list is
//! ever returned alongside an error.

use thiserror::Error;

use crate::llm::LlmError;
use crate::request::RequestKind;

/// Message shown to users when the model's output could not be used
pub const MALFORMED_USER_MESSAGE: &str =
    "The planner returned a response in an unexpected format. Please try again.";

/// Errors produced by the diet planner core
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(#[from] LlmError),

    #[error("Malformed {kind} response: {reason}")]
    MalformedResponse {
        kind: RequestKind,
        reason: String,
        /// Untouched model output, kept for diagnostics
        raw: String,
    },

    #[error("Prompt template error: {0}")]
    Prompt(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("No signed-in user")]
    NoActiveUser,
}

impl CoreError {
    /// Text suitable for showing to an end user
    ///
    /// Provider failures are surfaced verbatim; malformed responses get a
    /// generic message while the raw payload stays available via [`CoreError::raw_response`].
    pub fn user_message(&self) -> String {
        match self {
            CoreError::MalformedResponse { .. } => MALFORMED_USER_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// The raw model output for a malformed response
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            CoreError::MalformedResponse { raw, .. } => Some(raw),
            _ => None,
        }
    }

    pub(crate) fn malformed(kind: RequestKind, reason: impl Into<String>, raw: &str) -> Self {
        CoreError::MalformedResponse {
            kind,
            reason: reason.into(),
            raw: raw.to_string(),
        }
    }
}
