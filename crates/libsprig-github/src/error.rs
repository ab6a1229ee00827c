use thiserror::Error;

/// Errors from the hosting service API
///
/// HTTP outcomes are classified into the failure modes the publisher
/// distinguishes: rejected credentials, missing objects, non-fast-forward
/// reference updates, and transport failures. None of these are retried.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("authentication rejected by hosting service")]
    Auth,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("ref update conflict: {0}")]
    Conflict(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected API response ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid file contents payload: {0}")]
    Decode(String),
}
