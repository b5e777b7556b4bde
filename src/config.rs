//! Environment-based client configuration

use std::path::PathBuf;
use thiserror::Error;

pub const ENDPOINT_VAR: &str = "DOCCHAT_API_ENDPOINT";
pub const TOKEN_VAR: &str = "DOCCHAT_ID_TOKEN";
pub const LOG_FILE_VAR: &str = "DOCCHAT_LOG_FILE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{ENDPOINT_VAR} is not set (the document-chat API base URL)")]
    MissingEndpoint,
    #[error("{TOKEN_VAR} is not set (the identity provider's bearer token)")]
    MissingToken,
}

/// Client configuration resolved at startup.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the remote API, without a trailing slash.
    pub api_endpoint: String,
    /// Pre-issued bearer token from the identity provider.
    pub id_token: String,
    /// Where tracing output goes; stdout belongs to the terminal UI.
    pub log_file: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_endpoint = std::env::var(ENDPOINT_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingEndpoint)?;
        let id_token = std::env::var(TOKEN_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;
        let log_file = std::env::var(LOG_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_log_file());

        Ok(Self {
            api_endpoint: normalize_endpoint(&api_endpoint),
            id_token,
            log_file,
        })
    }
}

fn default_log_file() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".docchat").join("docchat.log")
}

fn normalize_endpoint(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
