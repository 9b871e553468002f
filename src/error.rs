//! Error types shared by the generator and the clipboard writer.

use thiserror::Error;

/// Failures surfaced to callers of the generator.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid length {input:?}: {reason}")]
    InvalidLength { input: String, reason: &'static str },
}

/// Failures inside the clipboard pathways.
///
/// These never leave the `clipboard` module as errors: the writer turns them
/// into a `WriteOutcome`.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("clipboard backend error: {0}")]
    Backend(#[from] arboard::Error),

    #[error("copy command failed: {0}")]
    Command(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
