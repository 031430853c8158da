//! Record readers for both operating systems
//!
//! Each reader turns its source into `Pairing` records; neither knows about
//! the other.

pub mod linux;
pub mod registry;
pub mod traits;

pub use linux::{
    read_linux_pairings, unavailable_on_permission_denied, LinuxListing, RejectedRecord,
};
pub use registry::{read_windows_pairings, RegistryHive, WindowsListing};
pub use traits::{PairingHierarchy, RawController, RawPeer};
