//! One run of the tool: read both sides, compare, and present the result

use crate::bluetooth::{DeviceInfo, MacAddress, Pairing};
use crate::error::Result;
use crate::instructions::{InstructionGenerator, InstructionSet};
use crate::readers::{
    read_linux_pairings, read_windows_pairings, LinuxListing, PairingHierarchy, WindowsListing,
};
use crate::reconcile::{reconcile, shared_devices, Mismatch};
use log::info;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub windows: WindowsListing,
    pub linux: LinuxListing,
    /// Devices paired on both sides
    pub shared: Vec<MacAddress>,
    pub mismatches: Vec<Mismatch>,
    /// One set per mismatch, or a single example set when there are none
    pub instructions: Vec<InstructionSet>,
}

impl Report {
    /// Instruction sets that fix real mismatches
    pub fn fixes(&self) -> Vec<InstructionSet> {
        self.instructions
            .iter()
            .filter(|set| !set.example)
            .cloned()
            .collect()
    }
}

/// Read both sides and reconcile them.
///
/// A Windows failure aborts; an unreadable Linux tree only empties the Linux
/// listing.
pub fn collect(
    hierarchy: &dyn PairingHierarchy,
    linux_root: &Path,
    generator: &InstructionGenerator,
) -> Result<Report> {
    let windows = read_windows_pairings(hierarchy)?;
    let linux = read_linux_pairings(linux_root)?;
    assemble(windows, linux, generator)
}

/// Reconcile two listings that have already been read
pub fn assemble(
    windows: WindowsListing,
    linux: LinuxListing,
    generator: &InstructionGenerator,
) -> Result<Report> {
    let shared = shared_devices(&windows.pairings, &linux.pairings);
    let mismatches = reconcile(&windows.pairings, &linux.pairings);
    info!(
        "{} device(s) paired on both sides, {} with mismatched keys",
        shared.len(),
        mismatches.len()
    );

    let instructions = if mismatches.is_empty() {
        vec![generator.example()]
    } else {
        mismatches
            .iter()
            .map(|m| generator.generate(&m.controller, &m.mac, m.linux_key.bytes()))
            .collect::<Result<Vec<_>>>()?
    };

    Ok(Report {
        windows,
        linux,
        shared,
        mismatches,
        instructions,
    })
}

/// Pairings grouped by controller, in first-seen order. Every entry of
/// `controllers` gets a group even when it has no pairings.
fn by_controller<'a>(
    controllers: &[MacAddress],
    pairings: &'a [Pairing],
) -> Vec<(MacAddress, Vec<&'a DeviceInfo>)> {
    let mut groups: Vec<(MacAddress, Vec<&DeviceInfo>)> = Vec::new();
    for controller in controllers {
        if !groups.iter().any(|(c, _)| c == controller) {
            groups.push((*controller, Vec::new()));
        }
    }
    for pairing in pairings {
        match groups.iter_mut().find(|(c, _)| *c == pairing.controller) {
            Some((_, devices)) => devices.push(&pairing.device),
            None => groups.push((pairing.controller, vec![&pairing.device])),
        }
    }
    groups
}

fn write_pairings(
    out: &mut dyn Write,
    controllers: &[MacAddress],
    pairings: &[Pairing],
) -> io::Result<()> {
    for (controller, devices) in by_controller(controllers, pairings) {
        writeln!(out, "  Host controller {}", controller)?;
        for device in devices {
            match &device.name {
                Some(name) => writeln!(out, "    paired with {} ({})", device.mac, name)?,
                None => writeln!(out, "    paired with {}", device.mac)?,
            }
            match &device.link_key {
                Some(key) => writeln!(out, "      link key {}", key)?,
                None => writeln!(out, "      no link key")?,
            }
        }
    }
    Ok(())
}

/// Line-oriented rendering of a report
pub fn render_text(report: &Report, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "Windows registry information:")?;
    write_pairings(out, &report.windows.controllers, &report.windows.pairings)?;

    writeln!(out, "Linux information:")?;
    if let Some(reason) = &report.linux.unavailable {
        writeln!(out, "  {}", reason)?;
    }
    write_pairings(out, &report.linux.controllers, &report.linux.pairings)?;
    for rejected in &report.linux.rejected {
        writeln!(
            out,
            "  skipped {} under {}: {}",
            rejected.mac, rejected.controller, rejected.reason
        )?;
    }

    writeln!(out, "Mismatched link keys:")?;
    if report.mismatches.is_empty() {
        writeln!(out, "  none ({} device(s) paired on both sides)", report.shared.len())?;
    }
    for mismatch in &report.mismatches {
        writeln!(out, "  {} (host controller {})", mismatch.mac, mismatch.controller)?;
        writeln!(out, "    Linux   {}", mismatch.linux_key)?;
        writeln!(out, "    Windows {}", mismatch.windows_key)?;
    }

    for set in &report.instructions {
        if set.example {
            writeln!(out, "Registry editor instructions (example only):")?;
        } else {
            writeln!(out, "Registry editor instructions for {}:", set.device)?;
        }
        for step in &set.steps {
            writeln!(out, "  {}", step)?;
        }
    }

    Ok(())
}
