//! Error types for the resolution core.
//!
//! Recoverable swap refusals are not errors; they are reported as
//! [`SwapRejection`](crate::types::SwapRejection) values inside a
//! [`SwapOutcome`](crate::cascade::SwapOutcome). Everything here either points
//! at a caller bug or aborts the session.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Coordinates outside the board
    #[error("coordinate ({x}, {y}) is outside the board")]
    InvalidCoordinate { x: i16, y: i16 },

    #[error("invalid session config: {0}")]
    InvalidConfig(&'static str),

    /// A textual or hand-built layout could not be used as a board
    #[error("invalid board layout: {0}")]
    InvalidLayout(String),

    /// Internal consistency check failed; the session has been aborted
    #[error("session aborted: {0}")]
    Invariant(&'static str),
}

impl EngineError {
    /// Stable short code for protocol payloads
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InvalidCoordinate { .. } => "invalid_coordinate",
            EngineError::InvalidConfig(_) => "invalid_config",
            EngineError::InvalidLayout(_) => "invalid_layout",
            EngineError::Invariant(_) => "session_aborted",
        }
    }

    /// Whether the session can no longer be played
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::Invariant(_))
    }
}
