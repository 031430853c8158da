//! Bluetooth pairing data model
//!
//! Addresses and link keys in canonical byte form, plus the per-device
//! record both operating systems are read into.

pub mod address;
pub mod device;

pub use address::{LinkKey, MacAddress};
pub use device::{DeviceInfo, Pairing};
