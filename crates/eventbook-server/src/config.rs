// ABOUTME: Configuration loading and validation for the eventbook server.
// ABOUTME: Reads environment variables, applies command-line overrides, and checks the bind address.

use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_DB: &str = "event.db";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("bind address {0:?} is not of the form host:port")]
    InvalidBind(String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct EventbookConfig {
    /// `host:port` to listen on. The host may be a name; it is resolved at bind time.
    pub bind: String,
    pub db_path: PathBuf,
}

impl EventbookConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// Environment variables:
    /// - EVENTBOOK_BIND: host:port to bind (default: 127.0.0.1:5000)
    /// - EVENTBOOK_DB: SQLite database path (default: event.db)
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind = std::env::var("EVENTBOOK_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
        let db_path = std::env::var("EVENTBOOK_DB")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB));

        Ok(Self {
            bind: validate_bind(&bind)?,
            db_path,
        })
    }

    /// Apply command-line overrides on top of the loaded values.
    pub fn with_overrides(
        mut self,
        bind: Option<String>,
        db_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        if let Some(bind) = bind {
            self.bind = validate_bind(&bind)?;
        }
        if let Some(db_path) = db_path {
            self.db_path = db_path;
        }
        Ok(self)
    }
}

/// Accept `host:port` where the port is a u16 and the host is non-empty.
/// Bracketed IPv6 hosts such as `[::1]:8080` are accepted.
pub fn validate_bind(raw: &str) -> Result<String, ConfigError> {
    let invalid = || ConfigError::InvalidBind(raw.to_string());
    let (host, port) = raw.rsplit_once(':').ok_or_else(invalid)?;
    if host.is_empty() || port.parse::<u16>().is_err() {
        return Err(invalid());
    }
    Ok(raw.to_string())
}
