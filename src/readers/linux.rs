//! Linux side: BlueZ storage directory
//!
//! ```text
//! /var/lib/bluetooth/
//!   AA:BB:CC:DD:EE:FF/          host controller
//!     settings                  (not a device, skipped)
//!     cache/                    (not a device, skipped)
//!     11:22:33:44:55:66/        paired peer
//!       info                    [General] Name=..., [LinkKey] Key=<32 hex>
//! ```
//!
//! The tree is normally readable by root only. Lack of privilege is not an
//! error for the run: the listing comes back empty and marked unavailable.

use crate::bluetooth::{DeviceInfo, LinkKey, MacAddress, Pairing};
use crate::error::{AppError, ErrorSeverity, Result};
use log::{debug, info, warn};
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Reported when the tree exists but cannot be read
pub const UNAVAILABLE_WITHOUT_ROOT: &str = "unavailable when not running as root";

/// Name of the per-device file inside a peer directory
const INFO_FILE: &str = "info";

/// A device whose stored data failed validation and was left out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRecord {
    pub controller: MacAddress,
    pub mac: MacAddress,
    pub reason: String,
}

/// Everything read from the BlueZ tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinuxListing {
    /// Every host controller directory, including ones with no peers
    pub controllers: Vec<MacAddress>,
    pub pairings: Vec<Pairing>,
    pub rejected: Vec<RejectedRecord>,
    /// Set when the tree could not be read; `pairings` is then empty
    pub unavailable: Option<String>,
}

impl LinuxListing {
    fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            unavailable: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn is_available(&self) -> bool {
        self.unavailable.is_none()
    }
}

/// Read all pairings below `root`.
///
/// Only I/O failures other than a missing tree or missing privilege are
/// returned as errors.
pub fn read_linux_pairings(root: &Path) -> Result<LinuxListing> {
    if !root.is_dir() {
        warn!("Linux Bluetooth directory {:?} does not exist", root);
        return Ok(LinuxListing::unavailable(format!(
            "{} does not exist",
            root.display()
        )));
    }

    let listing = unavailable_on_permission_denied(walk(root))?;
    if listing.is_available() {
        info!(
            "Read {} Linux pairings ({} rejected)",
            listing.pairings.len(),
            listing.rejected.len()
        );
    }
    Ok(listing)
}

/// Turn a permission failure from the walk into an unavailable listing.
/// Any other error is passed through.
pub fn unavailable_on_permission_denied(result: Result<LinuxListing>) -> Result<LinuxListing> {
    match result {
        Err(AppError::IoError(e)) if e.kind() == ErrorKind::PermissionDenied => {
            warn!("Linux data unavailable: {}", e);
            Ok(LinuxListing::unavailable(UNAVAILABLE_WITHOUT_ROOT))
        }
        other => other,
    }
}

fn walk(root: &Path) -> Result<LinuxListing> {
    let mut listing = LinuxListing::default();

    for (controller, controller_dir) in address_entries(root)? {
        listing.controllers.push(controller);
        for (mac, device_dir) in address_entries(&controller_dir)? {
            match read_device_info(&device_dir, mac) {
                Ok(device) => listing.pairings.push(Pairing::new(controller, device)),
                Err(e) if e.severity() == ErrorSeverity::Recoverable => {
                    warn!("Skipping {} under {}: {}", mac, controller, e);
                    listing.rejected.push(RejectedRecord {
                        controller,
                        mac,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }

    Ok(listing)
}

/// Subdirectories named as colon-separated addresses, sorted by address
fn address_entries(dir: &Path) -> Result<Vec<(MacAddress, PathBuf)>> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        match name.parse::<MacAddress>() {
            Ok(mac) if name.contains(':') => entries.push((mac, entry.path())),
            _ => debug!("Ignoring {:?} in {:?}", name, dir),
        }
    }

    entries.sort();
    Ok(entries)
}

/// Read one peer directory. A missing `info` file yields a record with
/// neither name nor key.
fn read_device_info(device_dir: &Path, mac: MacAddress) -> Result<DeviceInfo> {
    let path = device_dir.join(INFO_FILE);
    match fs::read_to_string(&path) {
        Ok(text) => parse_info(mac, &text),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No info file for {}", mac);
            Ok(DeviceInfo::new(mac, None, None))
        }
        Err(e) => Err(e.into()),
    }
}

/// Extract `[General] Name` and `[LinkKey] Key` from a BlueZ info file.
///
/// Section names are case-sensitive, key names are not. A `Key` that is not
/// 32 hex digits is an `InvalidLinkKey` error.
pub fn parse_info(mac: MacAddress, text: &str) -> Result<DeviceInfo> {
    let mut section = "";
    let mut name = None;
    let mut link_key: Option<LinkKey> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = header.trim();
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        if section == "General" && key.eq_ignore_ascii_case("Name") {
            name = Some(value.to_string());
        } else if section == "LinkKey" && key.eq_ignore_ascii_case("Key") {
            link_key = Some(value.parse()?);
        }
    }

    Ok(DeviceInfo::new(mac, name, link_key))
}
