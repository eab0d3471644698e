//! Configuration loading and representation.
//!
//! Sources, highest precedence first:
//! - the first CLI argument (listen port)
//! - `REWARDS_*` environment variables
//! - built-in defaults
//!
//! Unusable values are replaced by the default rather than aborting startup.
//! They are returned alongside the config so the caller can report them once
//! logging is up (the log format itself is configured here).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use rewards_core::AccountId;
use rewards_observability::LogFormat;

pub const DEFAULT_PORT: u16 = 8090;
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";
pub const DEFAULT_ACCOUNT: &str = "default";

pub const ENV_PORT: &str = "REWARDS_PORT";
pub const ENV_BIND_HOST: &str = "REWARDS_BIND_HOST";
pub const ENV_DEFAULT_ACCOUNT: &str = "REWARDS_DEFAULT_ACCOUNT";
pub const ENV_LOG_FORMAT: &str = "REWARDS_LOG_FORMAT";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid port '{0}'")]
    InvalidPort(String),

    #[error("invalid default account: {0}")]
    InvalidAccount(String),

    #[error("{0}")]
    InvalidLogFormat(String),
}

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Interface to bind the HTTP listener on.
    pub bind_host: String,

    /// HTTP listen port.
    pub port: u16,

    /// Account used when a request carries no `X-Account-Id` header.
    pub default_account: AccountId,

    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_host: DEFAULT_BIND_HOST.to_string(),
            port: DEFAULT_PORT,
            default_account: default_account(),
            log_format: LogFormat::default(),
        }
    }
}

fn default_account() -> AccountId {
    AccountId::new(DEFAULT_ACCOUNT).expect("default account id is not blank")
}

impl Config {
    /// Load from the process arguments and environment.
    pub fn from_env() -> (Self, Vec<ConfigError>) {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_lookup(&args, |key| std::env::var(key).ok())
    }

    /// Load from explicit arguments (program name excluded) and a variable lookup.
    ///
    /// Returns the config plus every rejected value.
    pub fn from_lookup<F>(args: &[String], lookup: F) -> (Self, Vec<ConfigError>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let mut rejected = Vec::new();

        let port = args.first().cloned().or_else(|| lookup(ENV_PORT));
        if let Some(raw) = port {
            match parse_port(&raw) {
                Ok(p) => config.port = p,
                Err(e) => rejected.push(e),
            }
        }

        if let Some(host) = lookup(ENV_BIND_HOST).filter(|h| !h.trim().is_empty()) {
            config.bind_host = host.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_DEFAULT_ACCOUNT) {
            match AccountId::new(&raw) {
                Ok(account) => config.default_account = account,
                Err(e) => rejected.push(ConfigError::InvalidAccount(e.to_string())),
            }
        }

        if let Some(raw) = lookup(ENV_LOG_FORMAT) {
            match raw.parse::<LogFormat>() {
                Ok(format) => config.log_format = format,
                Err(e) => rejected.push(ConfigError::InvalidLogFormat(e.to_string())),
            }
        }

        (config, rejected)
    }

    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.trim()
        .parse::<u16>()
        .map_err(|_| ConfigError::InvalidPort(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(args: &[&str], vars: &[(&str, &str)]) -> (Config, Vec<ConfigError>) {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(&args, |key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_input() {
        let (config, rejected) = load(&[], &[]);
        assert!(rejected.is_empty());
        assert_eq!(config, Config::default());
        assert_eq!(config.listen_addr(), "0.0.0.0:8090");
        assert_eq!(config.default_account.as_str(), "default");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn cli_port_wins_over_environment() {
        let (config, _) = load(&["9000"], &[(ENV_PORT, "9100")]);
        assert_eq!(config.port, 9000);

        let (config, _) = load(&[], &[(ENV_PORT, "9100")]);
        assert_eq!(config.port, 9100);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let (config, rejected) = load(
            &["not-a-port"],
            &[
                (ENV_DEFAULT_ACCOUNT, "   "),
                (ENV_LOG_FORMAT, "xml"),
            ],
        );
        assert_eq!(config, Config::default());
        assert_eq!(rejected.len(), 3);
        assert_eq!(rejected[0], ConfigError::InvalidPort("not-a-port".to_string()));
    }

    #[test]
    fn environment_overrides_are_applied() {
        let (config, rejected) = load(
            &[],
            &[
                (ENV_BIND_HOST, "127.0.0.1"),
                (ENV_DEFAULT_ACCOUNT, "alice"),
                (ENV_LOG_FORMAT, "pretty"),
            ],
        );
        assert_eq!(config.listen_addr(), "127.0.0.1:8090");
        assert_eq!(config.default_account.as_str(), "alice");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(rejected.is_empty());
    }

    #[test]
    fn config_serializes_to_json() {
        let json = serde_json::to_value(Config::default()).unwrap();
        assert_eq!(json["default_account"], "default");
        assert_eq!(json["log_format"], "json");
    }
}
