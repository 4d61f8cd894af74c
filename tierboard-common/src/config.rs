//! Configuration loading and data directory resolution
//!
//! Bootstrap settings come from an optional TOML file. A missing file is not
//! an error: the server starts on built-in defaults and logs a warning. A file
//! that exists but does not parse is an error.
//!
//! Data directory priority:
//! 1. Command-line argument (highest priority)
//! 2. `TIERBOARD_DATA_DIR` environment variable
//! 3. `data_dir` in the TOML config file
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "TIERBOARD_DATA_DIR";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Interface to bind
    pub host: String,

    /// HTTP server port
    pub port: u16,

    /// Directory holding `images/` and `data/state.json`
    pub data_dir: Option<PathBuf>,

    /// Most files accepted by one upload request
    pub max_upload_files: usize,

    /// Largest accepted upload request body, in bytes
    pub max_upload_bytes: usize,

    /// Adopt orphaned images and drop dangling entries at startup
    pub reconcile_on_startup: bool,

    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            data_dir: None,
            max_upload_files: 12,
            max_upload_bytes: 32 * 1024 * 1024,
            reconcile_on_startup: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl TomlConfig {
    /// Parse and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse and validate TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: TomlConfig =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` (or the platform default location), falling back to defaults
    /// when the file does not exist
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let candidate = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path(),
        };

        match candidate {
            Some(p) if p.exists() => {
                info!("Loading configuration from {}", p.display());
                Self::load(&p)
            }
            Some(p) => {
                warn!("Config file {} not found, using built-in defaults", p.display());
                Ok(Self::default())
            }
            None => {
                warn!("No config directory on this platform, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config("host must not be empty".to_string()));
        }
        if self.max_upload_files == 0 {
            return Err(Error::Config("max_upload_files must be at least 1".to_string()));
        }
        if self.max_upload_bytes == 0 {
            return Err(Error::Config("max_upload_bytes must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Platform config file location (`<config_dir>/tierboard/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tierboard").join("config.toml"))
}

/// OS-dependent default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("tierboard"))
        .unwrap_or_else(|| PathBuf::from("./tierboard_data"))
}

/// Resolve the data directory following the priority order above
pub fn resolve_data_dir(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.data_dir {
        return path.clone();
    }

    default_data_dir()
}

/// Files and directories under the data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    pub root: PathBuf,
    /// Uploaded images, one file per identifier
    pub images_dir: PathBuf,
    /// The persisted snapshot
    pub state_file: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            images_dir: root.join("images"),
            state_file: root.join("data").join("state.json"),
            root,
        }
    }

    /// Create the images and state directories if missing
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.images_dir)?;
        if let Some(parent) = self.state_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}
