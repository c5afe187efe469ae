//! Error types for player supervision

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Player supervision errors.
///
/// Only launching and log-streaming misuse surface errors; pause, resume
/// and teardown are best-effort and never fail the caller.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// The working directory has no entry script to launch
    #[error("player entry script not found: {0}")]
    ScriptMissing(PathBuf),

    /// The OS refused to spawn the player process
    #[error("failed to spawn player process: {0}")]
    Spawn(#[from] io::Error),

    /// `stream_logs` was called a second time
    #[error("log streaming was already started for this player")]
    AlreadyStreaming,

    /// `stream_logs` was called before `start`
    #[error("player process has not been started")]
    NotStarted,
}

/// Result type for player supervision
pub type Result<T> = std::result::Result<T, PlayerError>;
