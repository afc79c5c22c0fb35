//! Configuration for ledgerpost.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (LEDGERPOST_BIND, LEDGERPOST_REPORTS_DIR)
//! 2. Config file (.ledgerpost/config.yaml)
//! 3. Defaults (~/.ledgerpost)
//!
//! Config file discovery:
//! - Searches current directory and parents for .ledgerpost/config.yaml
//! - Paths in the config file are relative to the file's project root
//!
//! The mail API key (SENDGRID_API_KEY) is environment-only and is never
//! read from the config file.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::RetryPolicy;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

pub const DEFAULT_BIND: &str = "0.0.0.0:5000";
pub const DEFAULT_SENDER: &str = "reports@ledgerpost.dev";
pub const DEFAULT_SERVICE_URL: &str = "https://blockchain.info";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub reports: ReportsConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub external: ExternalConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP server
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportsConfig {
    /// Reports directory (relative to the config file's project root)
    pub dir: Option<String>,
    /// Remove artifacts once the provider accepts the message
    pub remove_after_dispatch: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MailConfig {
    /// Fixed sender identity
    pub sender: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalConfig {
    pub ledger_url: Option<String>,
    pub ticker_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub retry_max_attempts: Option<u32>,
}

/// Resolved configuration with absolute paths and defaults applied
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// HTTP bind address
    pub bind: String,
    /// Absolute path to the reports directory
    pub reports_dir: PathBuf,
    /// Remove artifacts after successful dispatch
    pub remove_after_dispatch: bool,
    /// Fixed sender identity for outbound mail
    pub sender: String,
    /// Ledger source base URL
    pub ledger_url: String,
    /// Market-data source base URL
    pub ticker_url: String,
    /// Request timeout for every external call
    pub timeout_seconds: u64,
    /// Retry policy for external calls
    pub retry: RetryPolicy,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".ledgerpost").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".ledgerpost");

    let config_file = find_config_file();
    let file = match &config_file {
        Some(path) => Some(load_config_file(path)?),
        None => None,
    };

    // Project root is the parent of the .ledgerpost/ directory.
    let base_dir = config_file
        .as_deref()
        .and_then(Path::parent)
        .and_then(Path::parent)
        .map(Path::to_path_buf);

    let reports_dir = if let Ok(env_dir) = std::env::var("LEDGERPOST_REPORTS_DIR") {
        PathBuf::from(env_dir)
    } else if let (Some(dir), Some(base)) = (
        file.as_ref().and_then(|f| f.reports.dir.clone()),
        base_dir.as_deref(),
    ) {
        resolve_path(base, &dir)
    } else {
        default_home.join("reports")
    };

    let bind = std::env::var("LEDGERPOST_BIND")
        .ok()
        .or_else(|| file.as_ref().and_then(|f| f.server.bind.clone()))
        .unwrap_or_else(|| DEFAULT_BIND.to_string());

    let sender = file
        .as_ref()
        .and_then(|f| f.mail.sender.clone())
        .unwrap_or_else(|| DEFAULT_SENDER.to_string());

    let external = file.as_ref().map(|f| f.external.clone()).unwrap_or_default();

    let retry = RetryPolicy {
        max_attempts: external
            .retry_max_attempts
            .unwrap_or_else(|| RetryPolicy::default().max_attempts),
        ..RetryPolicy::default()
    };

    Ok(ResolvedConfig {
        bind,
        reports_dir,
        remove_after_dispatch: file
            .as_ref()
            .and_then(|f| f.reports.remove_after_dispatch)
            .unwrap_or(false),
        sender,
        ledger_url: external
            .ledger_url
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string()),
        ticker_url: external
            .ticker_url
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string()),
        timeout_seconds: external.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        retry,
        config_file,
    })
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

/// Mail service credential, environment-only, read at startup
pub fn mail_api_key() -> Result<String> {
    std::env::var("SENDGRID_API_KEY").context("SENDGRID_API_KEY is not set")
}
