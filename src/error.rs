use std::io;
use thiserror::Error;

/// Result type for overlay operations
pub type Result<T> = std::result::Result<T, ArcfsError>;

/// Unified error type for all overlay operations
#[derive(Debug, Error)]
pub enum ArcfsError {
    // Resolution errors
    #[error("Path not found: {0}")]
    NotFound(String),

    #[error(
        "Archive {archive} holds more than one entry; specify an explicit inner path:\n{}",
        .candidates.join("\n")
    )]
    AmbiguousEntry {
        archive: String,
        candidates: Vec<String>,
    },

    // Mutation attempts on the read-only overlay
    #[error("Operation not supported on read-only overlay: {0}")]
    Unsupported(&'static str),

    // Reader errors
    #[error("Archive reader failure: {0}")]
    Reader(String),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
