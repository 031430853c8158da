//! Paired-device records

use super::address::{LinkKey, MacAddress};
use serde::Serialize;

/// One paired device as recorded by one operating system
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub mac: MacAddress,
    /// Friendly name; the registry never stores one
    pub name: Option<String>,
    /// `None` when the device is known but no key was recorded
    pub link_key: Option<LinkKey>,
}

impl DeviceInfo {
    pub fn new(mac: MacAddress, name: Option<String>, link_key: Option<LinkKey>) -> Self {
        Self { mac, name, link_key }
    }
}

/// A peer device as seen under one host controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pairing {
    /// Address of the local adapter the pairing belongs to
    pub controller: MacAddress,
    pub device: DeviceInfo,
}

impl Pairing {
    pub fn new(controller: MacAddress, device: DeviceInfo) -> Self {
        Self { controller, device }
    }
}
