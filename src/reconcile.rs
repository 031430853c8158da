//! Matching pairings across both operating systems
//!
//! Devices are matched by address bytes and compared by key bytes, so
//! case and separator differences between the two sources never show up
//! as mismatches.

use crate::bluetooth::{LinkKey, MacAddress, Pairing};
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A device known to both sides whose stored keys differ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub mac: MacAddress,
    /// Windows host controller the stale key is stored under
    pub controller: MacAddress,
    pub linux_key: LinkKey,
    pub windows_key: LinkKey,
}

/// Windows keys by device address. Later records overwrite earlier ones
/// for the same address (last wins).
fn windows_keys(windows: &[Pairing]) -> HashMap<MacAddress, (MacAddress, LinkKey)> {
    let mut keys = HashMap::new();
    for pairing in windows {
        if let Some(key) = pairing.device.link_key {
            keys.insert(pairing.device.mac, (pairing.controller, key));
        }
    }
    keys
}

/// Find devices whose Linux key differs from the Windows one.
///
/// Devices present on only one side, and Linux records without a key, are
/// never reported. The result holds at most one entry per address (last
/// Linux record wins) and is ordered by address.
pub fn reconcile(windows: &[Pairing], linux: &[Pairing]) -> Vec<Mismatch> {
    let windows = windows_keys(windows);
    let mut mismatches = BTreeMap::new();

    for pairing in linux {
        let Some(linux_key) = pairing.device.link_key else {
            continue;
        };
        let Some(&(controller, windows_key)) = windows.get(&pairing.device.mac) else {
            continue;
        };

        if linux_key != windows_key {
            debug!("Key mismatch for {}", pairing.device.mac);
            mismatches.insert(
                pairing.device.mac,
                Mismatch {
                    mac: pairing.device.mac,
                    controller,
                    linux_key,
                    windows_key,
                },
            );
        } else {
            mismatches.remove(&pairing.device.mac);
        }
    }

    mismatches.into_values().collect()
}

/// Addresses paired on both sides, regardless of key state
pub fn shared_devices(windows: &[Pairing], linux: &[Pairing]) -> Vec<MacAddress> {
    let windows: BTreeSet<MacAddress> = windows.iter().map(|p| p.device.mac).collect();
    let linux: BTreeSet<MacAddress> = linux.iter().map(|p| p.device.mac).collect();
    windows.intersection(&linux).copied().collect()
}
