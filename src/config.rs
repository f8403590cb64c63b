//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env::VarError;

use crate::error::ErrorCode;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

pub const API_URL_VAR: &str = "TASKBOARD_API_URL";
pub const AUTH_TOKEN_VAR: &str = "TASKBOARD_AUTH_TOKEN";
pub const REQUEST_TIMEOUT_VAR: &str = "TASKBOARD_REQUEST_TIMEOUT_SECS";
pub const CONNECT_TIMEOUT_VAR: &str = "TASKBOARD_CONNECT_TIMEOUT_SECS";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric variable did not parse.
    #[error("invalid {var}: {value:?} is not a whole number of seconds")]
    InvalidNumber { var: &'static str, value: String },

    /// A variable held bytes that are not valid UTF-8.
    #[error("{var} is not valid unicode")]
    NotUnicode { var: &'static str },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidNumber { .. } => "E_CONFIG_PARSE",
            Self::NotUnicode { .. } => "E_CONFIG_ENCODING",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// API base URL without a trailing slash.
    pub api_url: String,
    /// Sent as `Authorization: Bearer <token>` when present.
    pub auth_token: Option<String>,
    pub timeouts: Timeouts,
}

impl BoardConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `TASKBOARD_API_URL`: default `http://localhost:5000`
    /// - `TASKBOARD_AUTH_TOKEN`: no auth header when absent
    /// - `TASKBOARD_REQUEST_TIMEOUT_SECS`: default 10
    /// - `TASKBOARD_CONNECT_TIMEOUT_SECS`: default 5
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a timeout is not a whole number or a
    /// variable is not valid unicode.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// Build typed config from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`BoardConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Result<Option<String>, ConfigError>,
    {
        let api_url = lookup(API_URL_VAR)?
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let auth_token = lookup(AUTH_TOKEN_VAR)?.filter(|v| !v.is_empty());
        let timeouts = Timeouts {
            request_secs: parse_secs(REQUEST_TIMEOUT_VAR, lookup(REQUEST_TIMEOUT_VAR)?, DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_secs(CONNECT_TIMEOUT_VAR, lookup(CONNECT_TIMEOUT_VAR)?, DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        Ok(Self { api_url, auth_token, timeouts })
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_token: None,
            timeouts: Timeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
        }
    }
}

fn env_lookup(var: &'static str) -> Result<Option<String>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { var }),
    }
}

fn parse_secs(var: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}
