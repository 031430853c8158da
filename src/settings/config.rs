//! Configuration loading

use crate::error::{AppError, Result};
use crate::readers::registry::CURRENT_CONTROL_SET;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current configuration version
pub const CONFIG_VERSION: u32 = 1;

/// Configuration filename
const CONFIG_FILENAME: &str = "btdualboot.toml";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration version
    #[serde(default = "default_version")]
    pub config_version: u32,

    /// Windows registry settings
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Linux BlueZ settings
    #[serde(default)]
    pub linux: LinuxConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Path to the Windows SYSTEM hive, e.g. `/mnt/windows/Windows/System32/config/SYSTEM`
    #[serde(default)]
    pub hive_file: Option<PathBuf>,

    /// `"current"` follows `Select\Current`; anything else names a control set
    #[serde(default = "default_control_set")]
    pub control_set: String,

    /// Location of the pairing keys below the control set
    #[serde(default = "default_keys_path")]
    pub keys_path: String,
}

fn default_control_set() -> String {
    CURRENT_CONTROL_SET.to_string()
}

fn default_keys_path() -> String {
    "Services\\BTHPort\\Parameters\\Keys".to_string()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            hive_file: None,
            control_set: default_control_set(),
            keys_path: default_keys_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinuxConfig {
    /// BlueZ storage directory
    #[serde(default = "default_bluetooth_dir")]
    pub bluetooth_dir: PathBuf,
}

fn default_bluetooth_dir() -> PathBuf {
    PathBuf::from("/var/lib/bluetooth")
}

impl Default for LinuxConfig {
    fn default() -> Self {
        Self {
            bluetooth_dir: default_bluetooth_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error, off)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Optional log file in addition to stderr
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Maximum log file size in bytes
    #[serde(default = "default_max_log_size")]
    pub max_file_size: u64,

    /// Number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: u32,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_max_log_size() -> u64 {
    1024 * 1024 // 1MB
}

fn default_max_log_files() -> u32 {
    3
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            max_file_size: default_max_log_size(),
            max_files: default_max_log_files(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: CONFIG_VERSION,
            registry: RegistryConfig::default(),
            linux: LinuxConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Hive-relative path of the pairing keys for a resolved control set
    pub fn pairing_keys_path(&self, control_set: &str) -> String {
        format!("{}\\{}", control_set, self.registry.keys_path)
    }

    /// The hive file, which has no sensible default
    pub fn hive_file(&self) -> Result<&Path> {
        self.registry.hive_file.as_deref().ok_or_else(|| {
            AppError::ConfigError(
                "No registry hive configured; set registry.hive_file or pass --hive".to_string(),
            )
        })
    }
}

/// Locates and loads the configuration file
pub struct ConfigManager {
    config_path: Option<PathBuf>,
    explicit: bool,
}

impl ConfigManager {
    /// Use `explicit` if given, otherwise `$XDG_CONFIG_HOME/btdualboot.toml`
    pub fn new(explicit: Option<PathBuf>) -> Self {
        match explicit {
            Some(path) => Self {
                config_path: Some(path),
                explicit: true,
            },
            None => Self {
                config_path: dirs::config_dir().map(|dir| dir.join(CONFIG_FILENAME)),
                explicit: false,
            },
        }
    }

    /// Get the config file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Load configuration from file.
    ///
    /// A missing default file means defaults; a missing explicit file is an error.
    pub fn load(&self) -> Result<AppConfig> {
        let Some(path) = &self.config_path else {
            debug!("No config directory, using defaults");
            return Ok(AppConfig::default());
        };

        if !path.exists() {
            if self.explicit {
                return Err(AppError::ConfigError(format!(
                    "Config file {} not found",
                    path.display()
                )));
            }
            debug!("Config file {:?} not found, using defaults", path);
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| AppError::ConfigError(format!("Could not read config: {}", e)))?;

        let config: AppConfig = toml::from_str(&content)?;

        info!("Loaded config from {:?}", path);
        Ok(config)
    }
}
