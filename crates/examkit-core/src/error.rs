//! Error taxonomy for content stores and test sessions.
//!
//! Defined in `examkit-core` so the session controller can classify
//! failures for recovery decisions without string matching.

use thiserror::Error;

use crate::session::SessionStatus;

/// Errors raised by the external content/result service.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested test does not exist.
    #[error("test not found: {0}")]
    NotFound(String),

    /// A transport-level failure occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The service returned an error response.
    #[error("content service error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
}

impl StoreError {
    /// Returns `true` for a missing-content failure, as opposed to a
    /// transport problem that might succeed on retry.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Errors surfaced by the session controller.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Test content could not be loaded. Fatal to the session, surfaced as
    /// a full-screen retry state.
    #[error("test content unavailable: {0}")]
    ContentLoad(#[source] StoreError),

    /// Result persistence failed. Recovered locally: the learner still sees
    /// the computed score; the failure is reported as a notice.
    #[error("result save failed: {0}")]
    Persistence(#[source] StoreError),

    /// The requested action is not valid in the current lifecycle state.
    #[error("cannot {action} while {status}")]
    InvalidTransition {
        status: SessionStatus,
        action: &'static str,
    },

    /// No part with the given id exists in the loaded definition.
    #[error("unknown part: {0}")]
    UnknownPart(String),

    /// A display tried to write an entry outside its own part.
    #[error("question {question_id} is outside part {part_id}")]
    OutOfScope {
        part_id: String,
        question_id: String,
    },
}
