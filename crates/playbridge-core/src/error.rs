//! Error types for Playbridge Core

use thiserror::Error;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Bridge error types
///
/// Errors originating inside the engine never cross the bridge boundary as
/// `Err` values; they are translated into `error`, `recording_state`, or
/// `snapshot` events. This enum covers the host-local seams: source
/// validation and engine-binding internals.
#[derive(Error, Debug)]
pub enum Error {
    // Source errors
    #[error("invalid source uri: {0}")]
    InvalidUri(#[from] url::ParseError),

    #[error("source is not playable: {0}")]
    UnplayableSource(String),

    // Engine errors
    #[error("failed to open media: {0}")]
    OpenFailed(String),

    #[error("engine already has an active session")]
    SessionActive,

    #[error("no active playback session")]
    NoSession,

    #[error("invalid engine state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    // Internal errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the error code used in structured logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidUri(_) => "INVALID_URI",
            Error::UnplayableSource(_) => "UNPLAYABLE_SOURCE",
            Error::OpenFailed(_) => "OPEN_FAILED",
            Error::SessionActive => "SESSION_ACTIVE",
            Error::NoSession => "NO_SESSION",
            Error::InvalidStateTransition { .. } => "INVALID_STATE",
            Error::Io(_) => "IO",
        }
    }
}
