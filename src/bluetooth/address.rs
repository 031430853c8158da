//! Device addresses and link keys

use crate::codec::{bytes_from_hex, hex_from_bytes, octets};
use crate::error::{AppError, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length of a BD_ADDR in bytes
pub const MAC_LEN: usize = 6;

/// Length of a BR/EDR link key in bytes
pub const LINK_KEY_LEN: usize = 16;

/// A 6-byte Bluetooth device address.
///
/// Parsed from either the compact form (`aabbccddeeff`) used for registry
/// names or the colon-separated form (`AA:BB:CC:DD:EE:FF`) used by BlueZ.
/// Formatting carries no meaning: two addresses are equal iff their bytes are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MacAddress([u8; MAC_LEN]);

impl MacAddress {
    pub const fn new(bytes: [u8; MAC_LEN]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> &[u8; MAC_LEN] {
        &self.0
    }

    /// Lowercase hex without separators, the registry key/value naming form
    pub fn compact_lower(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for MacAddress {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let well_formed = match s.len() {
            12 => s.bytes().all(|b| b.is_ascii_hexdigit()),
            17 => s.bytes().enumerate().all(|(i, b)| {
                if i % 3 == 2 {
                    b == b':'
                } else {
                    b.is_ascii_hexdigit()
                }
            }),
            _ => false,
        };
        if !well_formed {
            return Err(AppError::InvalidAddress(format!("{:?}", s)));
        }

        let bytes = bytes_from_hex(s).map_err(|e| AppError::InvalidAddress(format!("{:?}: {}", s, e)))?;
        let mut mac = [0u8; MAC_LEN];
        mac.copy_from_slice(&bytes);
        Ok(Self(mac))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex_from_bytes(&self.0))
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A 16-byte link key.
///
/// Construction enforces the length; a short or long value is reported as
/// `InvalidLinkKey` instead of being padded or truncated.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkKey([u8; LINK_KEY_LEN]);

impl LinkKey {
    pub const fn new(bytes: [u8; LINK_KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> &[u8; LINK_KEY_LEN] {
        &self.0
    }

    /// Space-separated octets, e.g. `01 02 ... 10`
    pub fn octets(&self) -> String {
        octets(&self.0)
    }
}

impl TryFrom<&[u8]> for LinkKey {
    type Error = AppError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let key: [u8; LINK_KEY_LEN] = bytes.try_into().map_err(|_| {
            AppError::InvalidLinkKey(format!(
                "expected {} bytes, got {}",
                LINK_KEY_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(key))
    }
}

impl FromStr for LinkKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = bytes_from_hex(s.trim())
            .map_err(|e| AppError::InvalidLinkKey(format!("{:?}: {}", s, e)))?;
        LinkKey::try_from(bytes.as_slice())
    }
}

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex_from_bytes(&self.0))
    }
}

impl fmt::Debug for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LinkKey({})", self)
    }
}

impl Serialize for LinkKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
