//! Core types for sprig
//!
//! This crate holds the pieces shared by the API clients and the daemon:
//! - Immutable daemon configuration, loaded from `SPRIG_*` environment
//!   variables with an optional TOML file layer underneath
//! - Composition rules turning a fetched resource into the new tracked-file
//!   body and the commit message

pub mod config;
pub mod content;
mod error;

pub use config::Config;
pub use content::FetchedContent;
pub use error::ConfigError;
