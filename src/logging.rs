//! Logging setup with rotation support

use crate::error::{AppError, Result};
use crate::settings::config::LoggingConfig as FileLoggingConfig;
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Logging configuration
pub struct LoggingConfig {
    pub level: LevelFilter,
    /// Also log to this file when set
    pub log_file: Option<PathBuf>,
    pub max_file_size: u64,
    pub max_files: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Warn,
            log_file: None,
            max_file_size: 1024 * 1024, // 1MB
            max_files: 3,
        }
    }
}

impl TryFrom<&FileLoggingConfig> for LoggingConfig {
    type Error = AppError;

    fn try_from(config: &FileLoggingConfig) -> Result<Self> {
        Ok(Self {
            level: parse_log_level(&config.level)?,
            log_file: config.file.clone(),
            max_file_size: config.max_file_size,
            max_files: config.max_files,
        })
    }
}

/// Initialize the logging system
///
/// Terminal output goes to stderr only; stdout carries the report.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .set_location_level(LevelFilter::Debug)
        .set_thread_level(LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    loggers.push(TermLogger::new(
        config.level,
        log_config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ));

    if let Some(log_path) = &config.log_file {
        if let Some(dir) = log_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        rotate_logs(log_path, config.max_file_size, config.max_files)?;

        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .map_err(AppError::IoError)?;

        loggers.push(WriteLogger::new(config.level, log_config, log_file));
    }

    CombinedLogger::init(loggers)
        .map_err(|e| AppError::ConfigError(format!("Logger init failed: {}", e)))?;

    log::debug!("Logging initialized at level {:?}", config.level);
    if let Some(log_path) = &config.log_file {
        log::debug!("Log file: {:?}", log_path);
    }

    Ok(())
}

/// `<log_path>.<n>`, keeping whatever extension the log file has
fn numbered(log_path: &Path, n: u32) -> PathBuf {
    let mut name = log_path.as_os_str().to_owned();
    name.push(format!(".{}", n));
    PathBuf::from(name)
}

/// Shift `<log>.1 .. <log>.<max_files - 1>` up by one and move the current
/// log to `<log>.1` once it reaches `max_size` bytes. The oldest file drops off.
fn rotate_logs(log_path: &Path, max_size: u64, max_files: u32) -> Result<()> {
    match fs::metadata(log_path) {
        Ok(metadata) if metadata.len() >= max_size => {}
        Ok(_) => return Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    }

    if max_files == 0 {
        fs::remove_file(log_path)?;
        return Ok(());
    }

    let oldest = numbered(log_path, max_files);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }
    for n in (1..max_files).rev() {
        let from = numbered(log_path, n);
        if from.exists() {
            fs::rename(&from, numbered(log_path, n + 1))?;
        }
    }
    fs::rename(log_path, numbered(log_path, 1))?;

    Ok(())
}

/// Parse a level name as accepted by `--log-level` and the config file.
///
/// Names are case-insensitive; anything outside trace, debug, info, warn,
/// error and off is a config error.
pub fn parse_log_level(level_str: &str) -> Result<LevelFilter> {
    level_str.trim().parse().map_err(|_| {
        AppError::ConfigError(format!(
            "unknown log level {:?} (expected trace, debug, info, warn, error or off)",
            level_str
        ))
    })
}

/// Raise `base` by `verbosity` steps (`-v`, `-vv`, ...)
pub fn bump_level(base: LevelFilter, verbosity: u8) -> LevelFilter {
    let mut level = base;
    for _ in 0..verbosity {
        level = match level {
            LevelFilter::Off => LevelFilter::Error,
            LevelFilter::Error => LevelFilter::Warn,
            LevelFilter::Warn => LevelFilter::Info,
            LevelFilter::Info => LevelFilter::Debug,
            LevelFilter::Debug | LevelFilter::Trace => LevelFilter::Trace,
        };
    }
    level
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("info").unwrap(), LevelFilter::Info);
        assert_eq!(parse_log_level("DEBUG").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_log_level("warn").unwrap(), LevelFilter::Warn);
        assert_eq!(parse_log_level("off").unwrap(), LevelFilter::Off);
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        for bad in ["invalid", "warning", ""] {
            assert!(
                matches!(parse_log_level(bad), Err(AppError::ConfigError(_))),
                "{:?} accepted",
                bad
            );
        }
    }

    #[test]
    fn test_bump_level() {
        assert_eq!(bump_level(LevelFilter::Warn, 0), LevelFilter::Warn);
        assert_eq!(bump_level(LevelFilter::Warn, 1), LevelFilter::Info);
        assert_eq!(bump_level(LevelFilter::Warn, 5), LevelFilter::Trace);
    }

    #[test]
    fn test_from_file_config() {
        let file_config = FileLoggingConfig {
            level: "debug".to_string(),
            file: Some(PathBuf::from("/tmp/btdualboot.log")),
            max_file_size: 10,
            max_files: 2,
        };
        let config = LoggingConfig::try_from(&file_config).unwrap();
        assert_eq!(config.level, LevelFilter::Debug);
        assert_eq!(config.max_files, 2);
        assert!(config.log_file.is_some());

        let file_config = FileLoggingConfig {
            level: "loud".to_string(),
            ..file_config
        };
        assert!(LoggingConfig::try_from(&file_config).is_err());
    }

    #[test]
    fn test_rotate_logs() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("btdualboot.log");
        fs::write(&log_path, "0123456789").unwrap();
        fs::write(dir.path().join("btdualboot.log.1"), "older").unwrap();
        fs::write(dir.path().join("btdualboot.log.2"), "oldest").unwrap();

        rotate_logs(&log_path, 5, 2).unwrap();

        assert!(!log_path.exists());
        assert_eq!(fs::read_to_string(dir.path().join("btdualboot.log.1")).unwrap(), "0123456789");
        assert_eq!(fs::read_to_string(dir.path().join("btdualboot.log.2")).unwrap(), "older");
        assert!(!dir.path().join("btdualboot.log.3").exists());
    }

    #[test]
    fn test_rotate_keeps_small_and_missing_logs() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("run.txt");
        rotate_logs(&log_path, 5, 3).unwrap();

        fs::write(&log_path, "0123").unwrap();
        rotate_logs(&log_path, 5, 3).unwrap();
        assert!(log_path.exists());

        fs::write(&log_path, "0123456789").unwrap();
        rotate_logs(&log_path, 5, 3).unwrap();
        assert!(dir.path().join("run.txt.1").exists());
    }
}
