use std::fmt;

#[derive(Debug)]
pub enum AppError {
    ConfigError(String),
    IoError(std::io::Error),
    HiveError(String),
    InvalidAddress(String),
    InvalidLinkKey(String),
    ProvisionError(String),
    EditorError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::IoError(e) => write!(f, "IO error: {}", e),
            AppError::HiveError(msg) => write!(f, "Registry hive error: {}", msg),
            AppError::InvalidAddress(msg) => write!(f, "Invalid device address: {}", msg),
            AppError::InvalidLinkKey(msg) => write!(f, "Invalid link key: {}", msg),
            AppError::ProvisionError(msg) => write!(f, "Storage provisioning failed: {}", msg),
            AppError::EditorError(msg) => write!(f, "Registry editor error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err)
    }
}

impl From<nt_hive::NtHiveError> for AppError {
    fn from(err: nt_hive::NtHiveError) -> Self {
        AppError::HiveError(err.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Nothing meaningful can be shown; abort the run
    Fatal,
    /// Affects a single record; the caller may skip it and continue
    Recoverable,
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::InvalidAddress(_) | AppError::InvalidLinkKey(_) => {
                ErrorSeverity::Recoverable
            }
            _ => ErrorSeverity::Fatal,
        }
    }
}
