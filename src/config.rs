//! Settings for the persona bootloader
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (BOOTLOADER_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values
//!
//! These are the tool's own settings. The human-edited personalization
//! document lives in [`crate::personalize`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Main bootloader configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BootloaderConfig {
    /// Filesystem locations
    pub paths: PathSettings,

    /// Remote persona service
    pub remote: RemoteSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Filesystem locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Directory holding templates/ and the install proposal
    pub repo_root: String,

    /// Directory the workspace scanner walks
    pub workspace_root: String,

    /// Template directory (relative paths resolve against repo_root)
    pub templates_dir: String,

    /// Personalization document (relative paths resolve against repo_root)
    pub personalize_file: String,

    /// Install proposal document (relative paths resolve against repo_root)
    pub proposal_file: String,
}

/// How the install step talks to the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallMode {
    /// One create call per persona and per rule
    Direct,
    /// One natural-language instruction to the assistant endpoint
    Delegated,
}

impl InstallMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallMode::Direct => "direct",
            InstallMode::Delegated => "delegated",
        }
    }
}

impl fmt::Display for InstallMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstallMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(InstallMode::Direct),
            "delegated" | "ask" => Ok(InstallMode::Delegated),
            _ => Err(format!(
                "Unknown install mode '{}'. Valid: direct, delegated",
                s
            )),
        }
    }
}

/// Remote persona service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    /// Install strategy
    pub mode: InstallMode,

    /// API base URL
    pub base_url: String,

    /// Environment variable holding the bearer credential
    pub token_env: String,

    /// Endpoint path used in delegated mode
    pub delegated_endpoint: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

// Default implementations

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            repo_root: ".".to_string(),
            workspace_root: "/home/workspace".to_string(),
            templates_dir: "templates".to_string(),
            personalize_file: "templates/personalize.md".to_string(),
            proposal_file: "INSTALL_PROPOSAL.md".to_string(),
        }
    }
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            mode: InstallMode::Direct,
            base_url: "https://api.zo.computer".to_string(),
            token_env: "ZO_CLIENT_IDENTITY_TOKEN".to_string(),
            delegated_endpoint: "zo/ask".to_string(),
            timeout_secs: 120,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            max_files: 5,
            json_format: false,
        }
    }
}

impl BootloaderConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        // 1. Load from config file if it exists
        if let Some(path) = Self::find_config_file(config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            let content = fs::read_to_string(&path).map_err(|e| Error::io_read(&path, e))?;
            config = toml::from_str(&content).map_err(|e| Error::ConfigParse {
                message: format!("{}: {}", path.display(), e.message()),
                source: Some(e),
            })?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        // 2. Apply environment variable overrides
        config.apply_env_overrides();

        // 3. Expand paths
        config.expand_paths();

        // 4. Validate
        config.validate()?;

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        // An explicit path must exist
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::ConfigNotFound { path });
        }

        let search_paths = [
            PathBuf::from("bootloader.toml"),
            dirs::config_dir()
                .map(|p| p.join("persona-bootloader").join("config.toml"))
                .unwrap_or_default(),
            dirs::home_dir()
                .map(|p| p.join(".persona-bootloader").join("config.toml"))
                .unwrap_or_default(),
        ];

        for path in &search_paths {
            if !path.as_os_str().is_empty() && path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // Path settings
        if let Ok(val) = std::env::var("BOOTLOADER_REPO_ROOT") {
            self.paths.repo_root = val;
        }
        if let Ok(val) = std::env::var("BOOTLOADER_WORKSPACE_ROOT") {
            self.paths.workspace_root = val;
        }
        if let Ok(val) = std::env::var("BOOTLOADER_TEMPLATES_DIR") {
            self.paths.templates_dir = val;
        }

        // Remote settings
        if let Ok(val) = std::env::var("BOOTLOADER_MODE") {
            if let Ok(mode) = val.parse() {
                self.remote.mode = mode;
            }
        }
        if let Ok(val) = std::env::var("BOOTLOADER_BASE_URL") {
            self.remote.base_url = val;
        }
        if let Ok(val) = std::env::var("BOOTLOADER_TOKEN_ENV") {
            self.remote.token_env = val;
        }
        if let Ok(val) = std::env::var("BOOTLOADER_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.remote.timeout_secs = n;
            }
        }

        // Logging settings
        if let Ok(val) = std::env::var("BOOTLOADER_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("BOOTLOADER_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("BOOTLOADER_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        self.paths.repo_root = expand_path(&self.paths.repo_root);
        self.paths.workspace_root = expand_path(&self.paths.workspace_root);
        self.paths.templates_dir = expand_path(&self.paths.templates_dir);
        self.paths.personalize_file = expand_path(&self.paths.personalize_file);
        self.paths.proposal_file = expand_path(&self.paths.proposal_file);

        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.remote.base_url).map_err(|e| {
            Error::config_field_invalid(
                "remote.base_url",
                format!("'{}' is not a valid URL: {}", self.remote.base_url, e),
            )
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(Error::config_field_invalid(
                "remote.base_url",
                "Base URL must start with http:// or https://",
            ));
        }

        if self.remote.token_env.trim().is_empty() {
            return Err(Error::config_field_invalid(
                "remote.token_env",
                "Credential variable name cannot be empty",
            ));
        }

        if self.remote.timeout_secs == 0 {
            return Err(Error::config_field_invalid(
                "remote.timeout_secs",
                "Timeout must be at least 1 second",
            ));
        }

        if self.paths.workspace_root.is_empty() {
            return Err(Error::config_validation("Workspace root cannot be empty"));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        Ok(())
    }

    /// Repository root as a PathBuf
    pub fn repo_root(&self) -> PathBuf {
        PathBuf::from(&self.paths.repo_root)
    }

    /// Workspace root as a PathBuf
    pub fn workspace_root(&self) -> PathBuf {
        PathBuf::from(&self.paths.workspace_root)
    }

    /// Template directory, resolved against the repository root
    pub fn templates_dir(&self) -> PathBuf {
        self.resolve(&self.paths.templates_dir)
    }

    /// Personalization document, resolved against the repository root
    pub fn personalize_path(&self) -> PathBuf {
        self.resolve(&self.paths.personalize_file)
    }

    /// Install proposal document, resolved against the repository root
    pub fn proposal_path(&self) -> PathBuf {
        self.resolve(&self.paths.proposal_file)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.repo_root().join(path)
        }
    }
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}
