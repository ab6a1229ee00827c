use thiserror::Error;

use libsprig_core::ConfigError;
use libsprig_github::HostError;
use libsprig_poke::PokeError;

/// Daemon-level error type
///
/// Any variant aborts the iteration it occurred in and the remaining
/// iterations of the same tick; the daemon itself keeps running and waits for
/// the next fire time.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("hosting service error: {0}")]
    Host(#[from] HostError),

    #[error("content API error: {0}")]
    Content(#[from] PokeError),
}
