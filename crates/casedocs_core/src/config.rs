//! Configuration loading from environment variables.

use crate::constants::{DEFAULT_MAX_UPLOAD_SIZE, DEFAULT_PORT};
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

/// Runtime configuration for the casedocs server.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    pub max_upload_size: usize,
    /// Service names allowed to call the folder API.
    pub authorized_services: Vec<String>,
    /// Service token to service name.
    pub service_tokens: HashMap<String, String>,
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    // Windows USERPROFILE
    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    std::env::current_dir().ok()
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

/// Split a comma-separated list, dropping blank entries.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `token=service` pairs separated by commas.
///
/// Entries without `=` or with an empty side are skipped with a warning.
pub fn parse_service_tokens(value: &str) -> HashMap<String, String> {
    let mut tokens = HashMap::new();
    for entry in parse_list(value) {
        match entry.split_once('=') {
            Some((token, service)) if !token.trim().is_empty() && !service.trim().is_empty() => {
                tokens.insert(token.trim().to_string(), service.trim().to_string());
            }
            _ => {
                tracing::warn!("Ignoring malformed SERVICE_TOKENS entry");
            }
        }
    }
    tokens
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        Self {
            db_path: env::var("DB_PATH").map(expand_tilde).unwrap_or_else(|_| {
                let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
                let cache_dir = home.join(".cache").join("casedocs");
                cache_dir.join("db").to_string_lossy().to_string()
            }),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_SIZE),
            authorized_services: env::var("AUTHORIZED_SERVICES")
                .map(|value| parse_list(&value))
                .unwrap_or_default(),
            service_tokens: env::var("SERVICE_TOKENS")
                .map(|value| parse_service_tokens(&value))
                .unwrap_or_default(),
        }
    }
}
