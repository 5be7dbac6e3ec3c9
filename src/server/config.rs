//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TIMOLOGIO_SECURITY_TOKEN` - Shared token lookup requests must present
//!
//! ## Required when `TIMOLOGIO_SOURCE=aade`
//! - `TIMOLOGIO_AADE_USER` - AADE registry username
//! - `TIMOLOGIO_AADE_PASS` - AADE registry password
//!
//! ## Optional
//! - `TIMOLOGIO_HOST` - Bind address (default: 127.0.0.1)
//! - `TIMOLOGIO_PORT` - Listen port (default: 8080)
//! - `TIMOLOGIO_SOURCE` - Lookup service: `vies`, `aade`, or `none` (default: vies)
//! - `TIMOLOGIO_ENABLE_FEATURE` - `yes`/`no` master switch (default: yes)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which service answers VAT lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LookupSource {
    /// EU VIES `checkVat` — any member state, no credentials needed.
    #[default]
    Vies,
    /// Greek AADE registry — richer record, needs credentials.
    Aade,
    /// Lookups disabled; the endpoint answers every request with a failure.
    None,
}

impl FromStr for LookupSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vies" => Ok(Self::Vies),
            "aade" => Ok(Self::Aade),
            "none" => Ok(Self::None),
            other => Err(format!("expected vies, aade, or none, got '{other}'")),
        }
    }
}

/// Lookup server configuration.
///
/// Secrets are held as [`SecretString`] and stay redacted in `Debug` output.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Token every lookup request must carry in its `security` field.
    pub security_token: SecretString,
    /// Which lookup service answers queries.
    pub source: LookupSource,
    /// Master switch; when off, the endpoint refuses lookups.
    pub enabled: bool,
    /// AADE registry username (empty unless the AADE source is used).
    pub aade_username: String,
    /// AADE registry password.
    pub aade_password: SecretString,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file first if one is present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when required variables are missing or
    /// unparseable, including AADE credentials when the AADE source is
    /// selected.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("TIMOLOGIO_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("TIMOLOGIO_HOST".into(), e.to_string()))?;
        let port = get_env_or_default("TIMOLOGIO_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("TIMOLOGIO_PORT".into(), e.to_string()))?;

        let security_token = SecretString::from(get_required_env("TIMOLOGIO_SECURITY_TOKEN")?);

        let source = get_env_or_default("TIMOLOGIO_SOURCE", "vies")
            .parse::<LookupSource>()
            .map_err(|e| ConfigError::InvalidEnvVar("TIMOLOGIO_SOURCE".into(), e))?;

        let enabled = matches!(
            get_env_or_default("TIMOLOGIO_ENABLE_FEATURE", "yes").as_str(),
            "yes" | "true" | "1"
        );

        let aade_username = get_env_or_default("TIMOLOGIO_AADE_USER", "");
        let aade_password = SecretString::from(get_env_or_default("TIMOLOGIO_AADE_PASS", ""));
        if source == LookupSource::Aade
            && (aade_username.is_empty() || aade_password.expose_secret().is_empty())
        {
            return Err(ConfigError::MissingEnvVar(
                "TIMOLOGIO_AADE_USER / TIMOLOGIO_AADE_PASS".into(),
            ));
        }

        Ok(Self {
            host,
            port,
            security_token,
            source,
            enabled,
            aade_username,
            aade_password,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
