//! Registry editor instructions for copying a Linux key into the hive
//!
//! The commands target `chntpw -e SYSTEM`: change into the controller key,
//! open the peer value in the hex editor, overwrite the 16 bytes in place,
//! save, quit, and confirm writing the hive.
//!
//! Navigation is absolute (leading `\`) so several edits can share one
//! editor session; only the session as a whole ends with quit and confirm.

use crate::bluetooth::{LinkKey, MacAddress};
use crate::error::Result;
use serde::Serialize;
use std::fmt;

/// Placeholder host controller used by the example instructions
pub const EXAMPLE_CONTROLLER: MacAddress = MacAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);

/// Placeholder peer device used by the example instructions
pub const EXAMPLE_DEVICE: MacAddress = MacAddress::new([0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);

/// Placeholder key used by the example instructions
pub const EXAMPLE_KEY: LinkKey = LinkKey::new([0xFF; 16]);

/// One editor command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", content = "argument", rename_all = "snake_case")]
pub enum Instruction {
    /// Change into the controller's key
    Navigate(String),
    /// Open a value in the hex editor
    Edit(String),
    /// Overwrite bytes starting at offset 0
    Data(String),
    /// Save the value and leave the hex editor
    Save,
    /// Leave the registry editor
    Quit,
    /// Answer yes to writing the hive back
    ConfirmWrite,
}

impl Instruction {
    /// Whether this step closes the editor session
    pub fn ends_session(&self) -> bool {
        matches!(self, Instruction::Quit | Instruction::ConfirmWrite)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Navigate(path) => write!(f, "cd {}", path),
            Instruction::Edit(value) => write!(f, "ed {}", value),
            Instruction::Data(octets) => write!(f, ":0 {}", octets),
            Instruction::Save => write!(f, "s"),
            Instruction::Quit => write!(f, "q"),
            Instruction::ConfirmWrite => write!(f, "y"),
        }
    }
}

/// Instructions for patching one device's key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructionSet {
    pub controller: MacAddress,
    pub device: MacAddress,
    pub steps: Vec<Instruction>,
    /// Placeholder values, not derived from a detected mismatch
    pub example: bool,
}

impl InstructionSet {
    /// Commands one per line, suitable for feeding to the editor
    pub fn script(&self) -> String {
        combined_script(std::slice::from_ref(self))
    }
}

/// One editor session applying every set in order.
///
/// The edit steps of each set are kept; quit and confirm are written once,
/// at the end. An empty slice gives an empty script.
pub fn combined_script(sets: &[InstructionSet]) -> String {
    let mut script = String::new();
    if sets.is_empty() {
        return script;
    }

    let edits = sets
        .iter()
        .flat_map(|set| &set.steps)
        .filter(|step| !step.ends_session());
    for step in edits.chain(&[Instruction::Quit, Instruction::ConfirmWrite]) {
        script.push_str(&step.to_string());
        script.push('\n');
    }
    script
}

pub struct InstructionGenerator {
    keys_path: String,
}

impl InstructionGenerator {
    /// `keys_path` is the path of the pairing keys from the hive root, e.g.
    /// `ControlSet001\Services\BTHPort\Parameters\Keys`. A leading `\` is
    /// optional.
    pub fn new(keys_path: impl Into<String>) -> Self {
        let keys_path: String = keys_path.into();
        Self {
            keys_path: keys_path.trim_start_matches('\\').to_string(),
        }
    }

    pub fn keys_path(&self) -> &str {
        &self.keys_path
    }

    /// Build the commands that replace `device`'s key under `controller`.
    ///
    /// `key` must be exactly 16 bytes; anything else is rejected rather than
    /// producing an edit that changes the value length.
    pub fn generate(
        &self,
        controller: &MacAddress,
        device: &MacAddress,
        key: &[u8],
    ) -> Result<InstructionSet> {
        let key = LinkKey::try_from(key)?;
        Ok(InstructionSet {
            controller: *controller,
            device: *device,
            steps: self.steps(controller, device, &key),
            example: false,
        })
    }

    /// Placeholder instructions showing the command shape when there is
    /// nothing to fix
    pub fn example(&self) -> InstructionSet {
        InstructionSet {
            controller: EXAMPLE_CONTROLLER,
            device: EXAMPLE_DEVICE,
            steps: self.steps(&EXAMPLE_CONTROLLER, &EXAMPLE_DEVICE, &EXAMPLE_KEY),
            example: true,
        }
    }

    fn steps(&self, controller: &MacAddress, device: &MacAddress, key: &LinkKey) -> Vec<Instruction> {
        vec![
            Instruction::Navigate(format!("\\{}\\{}", self.keys_path, controller.compact_lower())),
            Instruction::Edit(device.compact_lower()),
            Instruction::Data(key.octets()),
            Instruction::Save,
            Instruction::Quit,
            Instruction::ConfirmWrite,
        ]
    }
}
