//! Bluetooth dual-boot pairing key reconciliation
//!
//! Reads paired devices from an offline Windows SYSTEM hive and from the
//! BlueZ storage directory, lists both, and reports devices whose link keys
//! differ together with the registry edits that would bring Windows in line.

pub mod bluetooth;
pub mod codec;
pub mod collaborators;
pub mod error;
pub mod instructions;
pub mod logging;
pub mod readers;
pub mod reconcile;
pub mod report;
pub mod settings;

pub use error::{AppError, ErrorSeverity, Result};
