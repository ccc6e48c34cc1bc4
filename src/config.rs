//! Startup configuration.
//!
//! Resolved once before the bridge loop starts and immutable afterwards. The
//! endpoint comes from the first positional argument, falling back to
//! `MCP_RELAY_ENDPOINT`; the timeout comes from `MCP_RELAY_TIMEOUT_SECS`
//! (whole seconds, default 30).

use std::time::Duration;

/// Environment fallback for the endpoint URL.
pub const ENDPOINT_ENV: &str = "MCP_RELAY_ENDPOINT";

/// Environment variable for the request timeout in whole seconds.
pub const TIMEOUT_ENV: &str = "MCP_RELAY_TIMEOUT_SECS";

/// Timeout applied when `MCP_RELAY_TIMEOUT_SECS` is not set.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors that refuse startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No endpoint URL was supplied via argument or environment.
    #[error("endpoint URL required: pass it as the first argument or set MCP_RELAY_ENDPOINT")]
    MissingEndpoint,

    /// The timeout variable was set but is not a positive integer.
    #[error("MCP_RELAY_TIMEOUT_SECS must be a positive integer, got: '{value}'")]
    InvalidTimeout {
        /// The raw value found in the environment.
        value: String,
    },
}

/// Immutable relay configuration, injected into the transport client.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Remote endpoint URL requests are POSTed to.
    pub endpoint: String,
    /// Bound on the whole round trip of one call, connection included.
    pub timeout: Duration,
}

impl RelayConfig {
    /// Resolve configuration from the optional positional argument and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEndpoint`] if neither the argument nor
    /// `MCP_RELAY_ENDPOINT` provides a non-empty URL, and
    /// [`ConfigError::InvalidTimeout`] if `MCP_RELAY_TIMEOUT_SECS` is set but
    /// not a positive integer.
    pub fn resolve(endpoint_arg: Option<String>) -> Result<Self, ConfigError> {
        let endpoint = endpoint_arg
            .filter(|url| !url.is_empty())
            .or_else(|| std::env::var(ENDPOINT_ENV).ok().filter(|url| !url.is_empty()))
            .ok_or(ConfigError::MissingEndpoint)?;

        let timeout_secs = match std::env::var(TIMEOUT_ENV) {
            Ok(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::InvalidTimeout { value }),
            },
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            endpoint,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
