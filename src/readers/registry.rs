//! Windows side: pairing keys from an offline SYSTEM registry hive
//!
//! Layout under the chosen control set:
//! ```text
//! Services\BTHPort\Parameters\Keys
//!   <controller, 12 hex chars>        key
//!     <peer, 12 hex chars>  REG_BINARY  16-byte link key
//!     CentralIRK            REG_BINARY  (not a peer, skipped)
//! ```

use super::traits::{PairingHierarchy, RawController, RawPeer};
use crate::bluetooth::{DeviceInfo, LinkKey, MacAddress, Pairing};
use crate::error::{AppError, Result};
use log::{debug, info, warn};
use nt_hive::Hive;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Control set selector meaning "whatever `Select\Current` points at"
pub const CURRENT_CONTROL_SET: &str = "current";

/// An offline SYSTEM hive loaded into memory
pub struct RegistryHive {
    data: Vec<u8>,
    control_set: String,
    keys_path: String,
}

impl RegistryHive {
    /// Load the hive file. Parsing happens lazily on traversal.
    pub fn open(path: &Path, control_set: &str, keys_path: &str) -> Result<Self> {
        let data = fs::read(path).map_err(|e| {
            AppError::HiveError(format!("Could not read {}: {}", path.display(), e))
        })?;
        info!("Loaded registry hive {:?} ({} bytes)", path, data.len());

        Ok(Self::from_bytes(data, control_set, keys_path))
    }

    pub fn from_bytes(data: Vec<u8>, control_set: &str, keys_path: &str) -> Self {
        Self {
            data,
            control_set: control_set.to_string(),
            keys_path: keys_path.to_string(),
        }
    }

    /// Resolve the configured control set against the hive contents
    pub fn control_set_name(&self) -> Result<String> {
        let hive = Hive::new(&self.data[..])?;
        let root = hive.root_key_node()?;

        if !self.control_set.eq_ignore_ascii_case(CURRENT_CONTROL_SET) {
            return Ok(self.control_set.clone());
        }

        let select = root
            .subkey("Select")
            .ok_or_else(|| AppError::HiveError("Select key not found".to_string()))??;
        let current = select
            .value("Current")
            .ok_or_else(|| AppError::HiveError("Select\\Current value not found".to_string()))??;
        let data = current.data()?.into_vec()?;
        let number = control_set_number(&data)?;

        let name = format!("ControlSet{:03}", number);
        debug!("Select\\Current = {} -> {}", number, name);
        Ok(name)
    }
}

/// Decode the REG_DWORD stored in `Select\Current`
fn control_set_number(data: &[u8]) -> Result<u32> {
    let dword: [u8; 4] = data.try_into().map_err(|_| {
        AppError::HiveError(format!(
            "Select\\Current is {} bytes, expected a DWORD",
            data.len()
        ))
    })?;
    Ok(u32::from_le_bytes(dword))
}

impl PairingHierarchy for RegistryHive {
    fn controllers(&self) -> Result<Vec<RawController>> {
        let control_set = self.control_set_name()?;
        let keys_path = format!("{}\\{}", control_set, self.keys_path);

        let hive = Hive::new(&self.data[..])?;
        let root = hive.root_key_node()?;

        let keys = match root.subpath(&keys_path) {
            Some(keys) => keys?,
            None => {
                warn!("{} not present in hive, no Windows pairings", keys_path);
                return Ok(Vec::new());
            }
        };

        let mut controllers = Vec::new();
        if let Some(subkeys) = keys.subkeys() {
            for subkey in subkeys? {
                let subkey = subkey?;
                let name = subkey.name()?.to_string_lossy();

                let mut peers = Vec::new();
                if let Some(values) = subkey.values() {
                    for value in values? {
                        let value = value?;
                        peers.push(RawPeer {
                            name: value.name()?.to_string_lossy(),
                            value: value.data()?.into_vec()?,
                        });
                    }
                }

                debug!("Controller {} has {} values", name, peers.len());
                controllers.push(RawController { name, peers });
            }
        }

        Ok(controllers)
    }
}

/// Everything read from the registry hive
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WindowsListing {
    /// Every host controller key, including ones with no peers
    pub controllers: Vec<MacAddress>,
    pub pairings: Vec<Pairing>,
}

/// Read every peer under every host controller.
///
/// Value names that are not addresses (e.g. `CentralIRK`) are skipped; an
/// address-named value whose data is not a 16-byte key fails the read.
pub fn read_windows_pairings(hierarchy: &dyn PairingHierarchy) -> Result<WindowsListing> {
    let mut listing = WindowsListing::default();

    for controller in hierarchy.controllers()? {
        let controller_mac: MacAddress = controller.name.parse()?;
        listing.controllers.push(controller_mac);

        for peer in controller.peers {
            let mac: MacAddress = match peer.name.parse() {
                Ok(mac) => mac,
                Err(_) => {
                    debug!("Skipping non-device value {:?} under {}", peer.name, controller_mac);
                    continue;
                }
            };
            let key = LinkKey::try_from(peer.value.as_slice()).map_err(|e| {
                AppError::InvalidLinkKey(format!("{} under {}: {}", mac, controller_mac, e))
            })?;

            listing.pairings.push(Pairing::new(
                controller_mac,
                DeviceInfo::new(mac, None, Some(key)),
            ));
        }
    }

    info!(
        "Read {} Windows pairings under {} controller(s)",
        listing.pairings.len(),
        listing.controllers.len()
    );
    Ok(listing)
}
