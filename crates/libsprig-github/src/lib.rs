//! GitHub git-data integration for sprig
//!
//! This crate wraps the six REST endpoints the publisher needs:
//! - Branch reference and commit lookups (repository state)
//! - Tree and commit creation (object building)
//! - Fast-forward reference updates (branch advancement)
//! - Tracked-file reads through the contents endpoint

mod client;
mod error;
pub mod models;

pub use client::GitHubClient;
pub use error::HostError;
