use thiserror::Error;

/// Errors from the content API
#[derive(Debug, Error)]
pub enum PokeError {
    #[error("no resource with id {0}")]
    NotFound(u32),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected API response ({status}): {message}")]
    Api { status: u16, message: String },
}
