//! Environment-driven application configuration.
//!
//! # Environment variables
//!
//! - `HOST` / `PORT`: bind address (defaults `0.0.0.0:3000`)
//! - `DATABASE_URL`: `PostgreSQL` URL; absent selects the in-memory store
//! - `DD_DOGSTATSD_ENABLED`: send metrics at all (default `true`)
//! - `DD_DOGSTATSD_HOST` / `DD_DOGSTATSD_PORT`: agent address
//!   (defaults `localhost:8125`)
//! - `DD_SERVICE` / `DD_ENV` / `DD_VERSION`: global tags attached to every
//!   emission (defaults `taskboard` / `local` / `1.0.0`)
//! - `DD_TRACE_ENABLED`: HTTP trace layer toggle (default `true`)
//! - `DD_LOGS_INJECTION`: inject service fields into the root span
//!   (default `true`)
//! - `TASKBOARD_SEED`: insert demo tasks at startup (default `false`)
//! - `RUST_LOG`: log filter (e.g. `taskboard=debug,tower_http=info`)

use std::env;
use std::net::{IpAddr, SocketAddr};
use thiserror::Error;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable that must parse as a number did not.
    #[error("invalid value '{value}' for {variable}: expected a number")]
    InvalidNumber {
        /// Variable name.
        variable: &'static str,
        /// Rejected value.
        value: String,
    },

    /// A variable that must parse as a boolean did not.
    #[error("invalid value '{value}' for {variable}: expected true or false")]
    InvalidBool {
        /// Variable name.
        variable: &'static str,
        /// Rejected value.
        value: String,
    },

    /// The bind host did not parse as an IP address.
    #[error("invalid value '{value}' for HOST: expected an IP address")]
    InvalidHost {
        /// Rejected value.
        value: String,
    },
}

/// Metrics agent connection settings and global tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsConfig {
    /// Whether metrics are sent at all.
    pub enabled: bool,
    /// Agent host.
    pub host: String,
    /// Agent UDP port.
    pub port: u16,
    /// Global `service` tag.
    pub service: String,
    /// Global `env` tag.
    pub env: String,
    /// Global `version` tag.
    pub version: String,
}

/// Full application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Optional `PostgreSQL` URL; absent selects the in-memory store.
    pub database_url: Option<String>,
    /// Whether to seed demo tasks at startup.
    pub seed_demo_data: bool,
    /// HTTP trace layer toggle.
    pub trace_enabled: bool,
    /// Whether service/env/version fields are injected into the root span.
    pub logs_injection: bool,
    /// Metrics sink settings.
    pub metrics: MetricsConfig,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a set variable fails to parse; unset
    /// variables fall back to their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host: IpAddr = match env::var("HOST") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidHost { value })?,
            Err(_) => IpAddr::from([0, 0, 0, 0]),
        };
        let port = env_u16("PORT", 3000)?;

        Ok(Self {
            bind_addr: SocketAddr::new(host, port),
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            seed_demo_data: env_bool("TASKBOARD_SEED", false)?,
            trace_enabled: env_bool("DD_TRACE_ENABLED", true)?,
            logs_injection: env_bool("DD_LOGS_INJECTION", true)?,
            metrics: MetricsConfig {
                enabled: env_bool("DD_DOGSTATSD_ENABLED", true)?,
                host: env_or("DD_DOGSTATSD_HOST", "localhost"),
                port: env_u16("DD_DOGSTATSD_PORT", 8125)?,
                service: env_or("DD_SERVICE", "taskboard"),
                env: env_or("DD_ENV", "local"),
                version: env_or("DD_VERSION", "1.0.0"),
            },
        })
    }
}

fn env_or(variable: &'static str, default: &str) -> String {
    env::var(variable)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
}

fn env_u16(variable: &'static str, default: u16) -> Result<u16, ConfigError> {
    match env::var(variable) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { variable, value }),
        Err(_) => Ok(default),
    }
}

fn env_bool(variable: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(variable) {
        Ok(value) => parse_bool(&value).ok_or(ConfigError::InvalidBool { variable, value }),
        Err(_) => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment-variable reads are process-global, so tests exercise the
    // pure parsing helpers rather than mutating the environment.

    #[test]
    fn bool_parsing_accepts_common_spellings() {
        for value in ["true", "1", "yes", "TRUE"] {
            assert_eq!(parse_bool(value), Some(true), "{value}");
        }
        for value in ["false", "0", "no", "FALSE"] {
            assert_eq!(parse_bool(value), Some(false), "{value}");
        }
        assert_eq!(parse_bool("maybe"), None);
    }
}
