//! Injected capabilities for the parts that touch the outside world
//!
//! Getting at the Windows partition and running the registry editor are
//! left to these traits so the reconciliation core never spawns processes
//! and can be exercised without real devices.

use crate::error::{AppError, Result};
use crate::instructions::{combined_script, InstructionSet};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Makes the Windows SYSTEM hive available as a local file
pub trait StorageProvisioner {
    fn provision(&mut self) -> Result<PathBuf>;
    fn release(&mut self) -> Result<()>;
}

/// Applies (or hands over) editor instructions for a hive
pub trait EditorLauncher {
    fn launch(&mut self, hive: &Path, instructions: &[InstructionSet]) -> Result<()>;
}

/// A hive file that is already reachable, e.g. on a mounted partition
pub struct ExistingHive {
    path: PathBuf,
}

impl ExistingHive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StorageProvisioner for ExistingHive {
    fn provision(&mut self) -> Result<PathBuf> {
        if !self.path.is_file() {
            return Err(AppError::ProvisionError(format!(
                "{} is not a file; is the Windows partition mounted?",
                self.path.display()
            )));
        }
        Ok(self.path.clone())
    }

    fn release(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Writes the editor commands to a script file for the user to run with
/// `chntpw -e <hive> < script`
pub struct ScriptFile {
    path: PathBuf,
}

impl ScriptFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EditorLauncher for ScriptFile {
    fn launch(&mut self, hive: &Path, instructions: &[InstructionSet]) -> Result<()> {
        if instructions.iter().any(|set| set.example) {
            return Err(AppError::EditorError(
                "refusing to write a script from example instructions".to_string(),
            ));
        }

        let script = combined_script(instructions);
        fs::write(&self.path, script).map_err(|e| {
            AppError::EditorError(format!("Could not write {}: {}", self.path.display(), e))
        })?;

        info!(
            "Wrote {} edit(s) to {:?}; run: chntpw -e {} < {}",
            instructions.len(),
            self.path,
            hive.display(),
            self.path.display()
        );
        Ok(())
    }
}

/// Mock implementations for testing
/// Available in tests and with the "test-mocks" feature
#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks {
    use super::*;

    #[derive(Default)]
    pub struct MockProvisioner {
        pub path: PathBuf,
        pub provisioned: u32,
        pub released: u32,
    }

    impl MockProvisioner {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self {
                path: path.into(),
                ..Self::default()
            }
        }
    }

    impl StorageProvisioner for MockProvisioner {
        fn provision(&mut self) -> Result<PathBuf> {
            self.provisioned += 1;
            Ok(self.path.clone())
        }

        fn release(&mut self) -> Result<()> {
            self.released += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct MockLauncher {
        pub launches: Vec<(PathBuf, Vec<InstructionSet>)>,
    }

    impl EditorLauncher for MockLauncher {
        fn launch(&mut self, hive: &Path, instructions: &[InstructionSet]) -> Result<()> {
            self.launches.push((hive.to_path_buf(), instructions.to_vec()));
            Ok(())
        }
    }
}
