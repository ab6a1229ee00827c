//! Daemon configuration
//!
//! Configuration is assembled from two layers: an optional TOML file named by
//! `SPRIG_CONFIG`, and `SPRIG_*` environment variables which override the
//! file. The result is an immutable [`Config`] built once at startup and
//! passed explicitly to every component.

use std::path::Path;
use std::str::FromStr;

use cron::Schedule;
use serde::Deserialize;

use crate::error::ConfigError;

/// Branch updated by the publisher when none is configured
pub const DEFAULT_BRANCH: &str = "main";
/// Default hosting service API root
pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";
/// Default content API root (PokeAPI v2)
pub const DEFAULT_CONTENT_API: &str = "https://pokeapi.co/api/v2";
/// Default per-request timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Immutable daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// OAuth token for the hosting service
    pub token: String,
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Branch the publisher advances
    pub branch: String,
    /// Path of the tracked file rewritten by every commit
    pub file: String,
    /// Parsed cron schedule controlling tick frequency (UTC)
    pub schedule: Schedule,
    /// Hosting service API root
    pub github_api: String,
    /// Content API root
    pub content_api: String,
    /// Per-request timeout applied to both HTTP clients
    pub http_timeout_secs: u64,
}

/// One configuration layer prior to validation; every key optional
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PartialConfig {
    pub token: Option<String>,
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub file: Option<String>,
    pub schedule: Option<String>,
    pub github_api: Option<String>,
    pub content_api: Option<String>,
    pub http_timeout_secs: Option<u64>,
}

impl PartialConfig {
    /// Parse a TOML layer
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML layer from disk
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Overlay `SPRIG_*` variables on top of this layer. `lookup` abstracts
    /// `std::env::var` so tests can run without touching process state.
    pub fn overlay_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(v) = lookup("SPRIG_TOKEN") {
            self.token = Some(v);
        }
        if let Some(v) = lookup("SPRIG_OWNER") {
            self.owner = Some(v);
        }
        if let Some(v) = lookup("SPRIG_REPO") {
            self.repo = Some(v);
        }
        if let Some(v) = lookup("SPRIG_BRANCH") {
            self.branch = Some(v);
        }
        if let Some(v) = lookup("SPRIG_FILE") {
            self.file = Some(v);
        }
        if let Some(v) = lookup("SPRIG_SCHEDULE") {
            self.schedule = Some(v);
        }
        if let Some(v) = lookup("SPRIG_GITHUB_API") {
            self.github_api = Some(v);
        }
        if let Some(v) = lookup("SPRIG_CONTENT_API") {
            self.content_api = Some(v);
        }
        if let Some(v) = lookup("SPRIG_HTTP_TIMEOUT") {
            let secs = v.parse().map_err(|_| ConfigError::Invalid {
                key: "SPRIG_HTTP_TIMEOUT",
                reason: format!("not a number of seconds: {v:?}"),
            })?;
            self.http_timeout_secs = Some(secs);
        }
        Ok(self)
    }

    /// Validate the assembled layers into a [`Config`]
    pub fn finish(self) -> Result<Config, ConfigError> {
        let schedule_expr = self.schedule.ok_or(ConfigError::Missing("schedule"))?;
        Ok(Config {
            token: self.token.ok_or(ConfigError::Missing("token"))?,
            owner: self.owner.ok_or(ConfigError::Missing("owner"))?,
            repo: self.repo.ok_or(ConfigError::Missing("repo"))?,
            branch: self.branch.unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            file: self.file.ok_or(ConfigError::Missing("file"))?,
            schedule: parse_schedule(&schedule_expr)?,
            github_api: self
                .github_api
                .unwrap_or_else(|| DEFAULT_GITHUB_API.to_string()),
            content_api: self
                .content_api
                .unwrap_or_else(|| DEFAULT_CONTENT_API.to_string()),
            http_timeout_secs: self.http_timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
        })
    }
}

/// Load configuration from the optional TOML file named by `SPRIG_CONFIG`,
/// overridden by `SPRIG_*` environment variables
pub fn load() -> Result<Config, ConfigError> {
    let env = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());
    let base = match env("SPRIG_CONFIG") {
        Some(path) => PartialConfig::from_file(Path::new(&path))?,
        None => PartialConfig::default(),
    };
    base.overlay_env(env)?.finish()
}

/// Parse a cron expression, accepting both the standard five-field form and
/// the six-field seconds-prefixed form. Five-field input gets a literal `0`
/// seconds column so ticks fire at the top of the matching minute.
pub fn parse_schedule(expr: &str) -> Result<Schedule, ConfigError> {
    let trimmed = expr.trim();
    let normalized = if trimmed.split_whitespace().count() == 5 {
        format!("0 {trimmed}")
    } else {
        trimmed.to_string()
    };
    Schedule::from_str(&normalized).map_err(|e| ConfigError::Schedule {
        expr: expr.to_string(),
        reason: e.to_string(),
    })
}
