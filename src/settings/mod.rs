//! Settings and configuration module

pub mod config;

pub use config::{AppConfig, ConfigManager};
