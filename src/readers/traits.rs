//! Trait abstraction over the Windows pairing-key hierarchy for testability
//! These traits allow feeding the readers without a real hive file

use crate::error::Result;

/// A value under a host controller key: peer address name plus raw key bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPeer {
    pub name: String,
    pub value: Vec<u8>,
}

/// A host controller key and the peers stored beneath it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawController {
    pub name: String,
    pub peers: Vec<RawPeer>,
}

/// Source of host-controller entries, each listing its peer entries
pub trait PairingHierarchy {
    fn controllers(&self) -> Result<Vec<RawController>>;
}

/// Mock implementations for testing
/// Available in tests and with the "test-mocks" feature
#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks {
    use super::*;
    use crate::error::AppError;

    #[derive(Default)]
    pub struct MockHierarchy {
        pub controllers: Vec<RawController>,
        /// When set, traversal fails with this hive error
        pub failure: Option<String>,
    }

    impl MockHierarchy {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_controller(mut self, name: &str, peers: &[(&str, &[u8])]) -> Self {
            self.controllers.push(RawController {
                name: name.to_string(),
                peers: peers
                    .iter()
                    .map(|(name, value)| RawPeer {
                        name: name.to_string(),
                        value: value.to_vec(),
                    })
                    .collect(),
            });
            self
        }

        pub fn failing(message: &str) -> Self {
            Self {
                controllers: Vec::new(),
                failure: Some(message.to_string()),
            }
        }
    }

    impl PairingHierarchy for MockHierarchy {
        fn controllers(&self) -> Result<Vec<RawController>> {
            match &self.failure {
                Some(msg) => Err(AppError::HiveError(msg.clone())),
                None => Ok(self.controllers.clone()),
            }
        }
    }
}
