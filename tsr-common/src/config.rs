//! Configuration loading and root folder resolution
//!
//! **[TSR-INIT-010]** Root folder resolution priority order:
//! 1. Environment variable (highest priority)
//! 2. TOML config file
//! 3. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable naming the TSR root folder
pub const ROOT_FOLDER_ENV: &str = "TSR_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "tsr.db";

/// TOML configuration file contents
///
/// All fields are optional; absent fields fall back to compiled defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TomlConfig {
    /// Root folder holding the shared tsr.db
    pub root_folder: Option<PathBuf>,

    /// HTTP bind address (host:port)
    pub bind_address: Option<String>,

    /// Upper bound on outbound webhook calls, in seconds
    pub webhook_timeout_seconds: Option<u64>,

    /// Candidate-search trigger endpoint, registered into the webhook
    /// directory at startup
    pub search_webhook: Option<WebhookConfig>,

    /// Profile enrichment base URLs keyed by source identifier
    #[serde(default)]
    pub profiles: HashMap<String, String>,
}

/// Webhook endpoint as configured in TOML
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebhookConfig {
    pub url: String,

    /// "GET" or "POST"; absent means POST
    pub method: Option<String>,
}

/// Resolve the root folder following the **[TSR-INIT-010]** priority order
pub fn resolve_root_folder(config: Option<&TomlConfig>) -> PathBuf {
    // Priority 1: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 2: TOML config file
    if let Some(root) = config.and_then(|c| c.root_folder.clone()) {
        return root;
    }

    // Priority 3: OS-dependent compiled default
    default_root_folder()
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/tsr (or /var/lib/tsr for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("tsr"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/tsr"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/tsr
        dirs::data_dir()
            .map(|d| d.join("tsr"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/tsr"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\tsr
        dirs::data_local_dir()
            .map(|d| d.join("tsr"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\tsr"))
    } else {
        PathBuf::from("./tsr_data")
    }
}

/// Get default configuration file path for the platform
pub fn default_config_path() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/tsr/config.toml first, then /etc/tsr/config.toml
        if let Some(path) = dirs::config_dir().map(|d| d.join("tsr").join("config.toml")) {
            if path.exists() {
                return Ok(path);
            }
        }
        let system_config = PathBuf::from("/etc/tsr/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
        Err(Error::Config("No config file found".to_string()))
    } else {
        dirs::config_dir()
            .map(|d| d.join("tsr").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }
}

/// Load TOML configuration from the default location, if present
pub fn load_toml_config() -> Option<TomlConfig> {
    let path = default_config_path().ok()?;
    match load_toml_config_from(&path) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable config file");
            None
        }
    }
}

/// Load TOML configuration from an explicit path
pub fn load_toml_config_from(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write TOML configuration to an explicit path
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// Ensure the root folder directory exists, creating it if missing
pub fn ensure_root_folder(root: &Path) -> Result<()> {
    std::fs::create_dir_all(root)?;
    Ok(())
}

/// Path of the shared database inside the root folder
pub fn database_path(root: &Path) -> PathBuf {
    root.join(DATABASE_FILE)
}
