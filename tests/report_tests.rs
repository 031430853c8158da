//! End-to-end tests of a run with a mocked registry and a temporary BlueZ tree

use btdualboot::collaborators::mocks::{MockLauncher, MockProvisioner};
use btdualboot::collaborators::{EditorLauncher, StorageProvisioner};
use btdualboot::instructions::InstructionGenerator;
use btdualboot::readers::traits::mocks::MockHierarchy;
use btdualboot::readers::linux::UNAVAILABLE_WITHOUT_ROOT;
use btdualboot::readers::{read_windows_pairings, unavailable_on_permission_denied};
use btdualboot::report::{assemble, collect, render_text};
use btdualboot::AppError;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

const KEYS: &str = "ControlSet001\\Services\\BTHPort\\Parameters\\Keys";

const WINDOWS_KEY: [u8; 16] = [
    0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99,
];

fn windows() -> MockHierarchy {
    MockHierarchy::new().with_controller(
        "aabbccddeeff",
        &[("112233445566", &WINDOWS_KEY), ("0a0b0c0d0e0f", &[0x42; 16])],
    )
}

fn linux_tree(root: &Path, key: &str) {
    let dir = root.join("AA:BB:CC:DD:EE:FF").join("11:22:33:44:55:66");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("info"),
        format!("[General]\nName=Headphones\n\n[LinkKey]\nKey={}\n", key),
    )
    .unwrap();
}

fn render(report: &btdualboot::report::Report) -> String {
    let mut out = Vec::new();
    render_text(report, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_mismatch_produces_instructions() {
    let root = tempfile::tempdir().unwrap();
    linux_tree(root.path(), "aabbccddeeff00112233445566778898");

    let report = collect(&windows(), root.path(), &InstructionGenerator::new(KEYS)).unwrap();

    assert_eq!(report.windows.pairings.len(), 2);
    assert_eq!(report.linux.pairings.len(), 1);
    assert_eq!(report.shared.len(), 1);
    assert_eq!(report.mismatches.len(), 1);
    assert_eq!(report.fixes().len(), 1);

    let fix = &report.instructions[0];
    assert!(!fix.example);
    assert_eq!(fix.steps[2].to_string(), ":0 AA BB CC DD EE FF 00 11 22 33 44 55 66 77 88 98");

    let text = render(&report);
    assert!(text.contains("Host controller AA:BB:CC:DD:EE:FF"));
    assert!(text.contains("paired with 11:22:33:44:55:66 (Headphones)"));
    assert!(text.contains("Registry editor instructions for 11:22:33:44:55:66:"));
    assert!(text.contains("aabbccddeeff"));
    assert!(!text.contains("example only"));
}

#[test]
fn test_matching_keys_show_example_only() {
    let root = tempfile::tempdir().unwrap();
    linux_tree(root.path(), "AABBCCDDEEFF00112233445566778899");

    let report = collect(&windows(), root.path(), &InstructionGenerator::new(KEYS)).unwrap();

    assert!(report.mismatches.is_empty());
    assert!(report.fixes().is_empty());
    assert_eq!(report.instructions.len(), 1);
    assert!(report.instructions[0].example);
    assert!(render(&report).contains("Registry editor instructions (example only):"));
}

#[test]
fn test_unavailable_linux_still_lists_windows() {
    let root = tempfile::tempdir().unwrap();
    let missing = root.path().join("bluetooth");

    let report = collect(&windows(), &missing, &InstructionGenerator::new(KEYS)).unwrap();

    assert_eq!(report.windows.pairings.len(), 2);
    assert!(report.linux.pairings.is_empty());
    assert!(report.linux.unavailable.is_some());
    assert!(report.mismatches.is_empty());

    let text = render(&report);
    assert!(text.contains("paired with 11:22:33:44:55:66"));
    assert!(text.contains("paired with 0A:0B:0C:0D:0E:0F"));
    assert!(text.contains("does not exist"));
}

#[test]
fn test_permission_denied_linux_still_lists_windows() {
    let windows = read_windows_pairings(&windows()).unwrap();
    let denied = io::Error::from(ErrorKind::PermissionDenied);
    let linux = unavailable_on_permission_denied(Err(denied.into())).unwrap();

    let report = assemble(windows, linux, &InstructionGenerator::new(KEYS)).unwrap();

    assert_eq!(report.windows.pairings.len(), 2);
    assert!(report.linux.pairings.is_empty());
    assert!(report.linux.rejected.is_empty());
    assert!(report.shared.is_empty());
    assert!(report.mismatches.is_empty());
    assert!(report.instructions[0].example);

    let text = render(&report);
    assert!(text.contains("paired with 11:22:33:44:55:66"));
    assert!(text.contains("paired with 0A:0B:0C:0D:0E:0F"));
    assert!(text.contains(UNAVAILABLE_WITHOUT_ROOT));
}

#[test]
fn test_controllers_without_peers_are_shown() {
    let root = tempfile::tempdir().unwrap();
    linux_tree(root.path(), "AABBCCDDEEFF00112233445566778899");
    fs::create_dir(root.path().join("00:11:22:33:44:55")).unwrap();

    let hierarchy = windows().with_controller("665544332211", &[]);
    let report = collect(&hierarchy, root.path(), &InstructionGenerator::new(KEYS)).unwrap();

    assert_eq!(report.windows.controllers.len(), 2);
    assert_eq!(report.linux.controllers.len(), 2);

    let text = render(&report);
    assert!(text.contains("Host controller 66:55:44:33:22:11"));
    assert!(text.contains("Host controller 00:11:22:33:44:55"));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["windows"]["controllers"][1], "66:55:44:33:22:11");
    assert_eq!(json["linux"]["controllers"][0], "00:11:22:33:44:55");
}

#[test]
fn test_windows_failure_aborts() {
    let root = tempfile::tempdir().unwrap();
    let result = collect(
        &MockHierarchy::failing("bad regf signature"),
        root.path(),
        &InstructionGenerator::new(KEYS),
    );
    assert!(matches!(result, Err(AppError::HiveError(_))));
}

#[test]
fn test_report_serializes_to_json() {
    let root = tempfile::tempdir().unwrap();
    linux_tree(root.path(), "aabbccddeeff00112233445566778898");

    let report = collect(&windows(), root.path(), &InstructionGenerator::new(KEYS)).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["mismatches"][0]["mac"], "11:22:33:44:55:66");
    assert_eq!(json["linux"]["pairings"][0]["device"]["name"], "Headphones");
    assert_eq!(json["instructions"][0]["steps"][3]["step"], "save");
}

#[test]
fn test_collaborators_receive_fixes() {
    let root = tempfile::tempdir().unwrap();
    linux_tree(root.path(), "aabbccddeeff00112233445566778898");

    let mut provisioner = MockProvisioner::new("/mnt/windows/Windows/System32/config/SYSTEM");
    let mut launcher = MockLauncher::default();

    let hive = provisioner.provision().unwrap();
    let report = collect(&windows(), root.path(), &InstructionGenerator::new(KEYS)).unwrap();
    launcher.launch(&hive, &report.fixes()).unwrap();
    provisioner.release().unwrap();

    assert_eq!(provisioner.provisioned, 1);
    assert_eq!(provisioner.released, 1);
    assert_eq!(launcher.launches.len(), 1);
    assert_eq!(launcher.launches[0].0, hive);
    assert_eq!(launcher.launches[0].1.len(), 1);
}
