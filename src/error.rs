// src/error.rs
// =============================================================================
// Errors that can stop a whole verification run.
//
// Individual URLs never fail the run: a dead host becomes an ERROR result
// (see verify::probe::Failure). The variants here are the few conditions
// where the engine refuses to start at all.
// =============================================================================

use thiserror::Error;

/// Run-level errors returned by the verification engine.
#[derive(Error, Debug)]
pub enum CheckError {
    /// The caller handed us an empty URL set.
    ///
    /// Kept distinct from an empty report so that an extraction bug upstream
    /// does not look like a clean run.
    #[error("no URLs to check (input produced an empty URL set)")]
    NoUrls,

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
