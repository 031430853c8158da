//! Tests for matching Windows and Linux pairings

use btdualboot::bluetooth::{DeviceInfo, Pairing};
use btdualboot::reconcile::reconcile;

const HOST: &str = "AA:BB:CC:DD:EE:FF";

fn pairing(mac: &str, name: Option<&str>, key: Option<&str>) -> Pairing {
    Pairing::new(
        HOST.parse().unwrap(),
        DeviceInfo::new(
            mac.parse().unwrap(),
            name.map(str::to_string),
            key.map(|k| k.parse().unwrap()),
        ),
    )
}

#[test]
fn test_single_differing_byte() {
    let windows = vec![pairing("112233445566", None, Some("AABBCCDDEEFF00112233445566778899"))];
    let linux = vec![pairing(
        "11:22:33:44:55:66",
        Some("Headphones"),
        Some("aabbccddeeff00112233445566778898"),
    )];

    let mismatches = reconcile(&windows, &linux);
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].mac.to_string(), "11:22:33:44:55:66");
    assert_eq!(
        mismatches[0].linux_key.to_string(),
        "AA:BB:CC:DD:EE:FF:00:11:22:33:44:55:66:77:88:98"
    );
    assert_eq!(
        mismatches[0].windows_key.to_string(),
        "AA:BB:CC:DD:EE:FF:00:11:22:33:44:55:66:77:88:99"
    );
}

#[test]
fn test_identical_keys_in_different_formats() {
    let windows = vec![
        pairing("112233445566", None, Some("AABBCCDDEEFF00112233445566778899")),
        pairing("0A0B0C0D0E0F", None, Some("00000000000000000000000000000001")),
    ];
    let linux = vec![
        pairing("11:22:33:44:55:66", None, Some("aabbccddeeff00112233445566778899")),
        pairing(
            "0a:0b:0c:0d:0e:0f",
            None,
            Some("00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:01"),
        ),
    ];

    assert!(reconcile(&windows, &linux).is_empty());
}

#[test]
fn test_linux_only_device_is_not_a_mismatch() {
    let windows = vec![pairing("112233445566", None, Some("AABBCCDDEEFF00112233445566778899"))];
    let linux = vec![pairing("66:55:44:33:22:11", None, Some("FFEEDDCCBBAA99887766554433221100"))];

    assert!(reconcile(&windows, &linux).is_empty());
}

#[test]
fn test_windows_only_device_is_not_a_mismatch() {
    let windows = vec![pairing("112233445566", None, Some("AABBCCDDEEFF00112233445566778899"))];
    assert!(reconcile(&windows, &[]).is_empty());
}

#[test]
fn test_linux_device_without_key_is_not_a_mismatch() {
    let windows = vec![pairing("112233445566", None, Some("AABBCCDDEEFF00112233445566778899"))];
    let linux = vec![pairing("11:22:33:44:55:66", Some("Mouse"), None)];

    assert!(reconcile(&windows, &linux).is_empty());
}

#[test]
fn test_only_differing_devices_reported() {
    let windows = vec![
        pairing("111111111111", None, Some("11111111111111111111111111111111")),
        pairing("222222222222", None, Some("22222222222222222222222222222222")),
        pairing("333333333333", None, Some("33333333333333333333333333333333")),
    ];
    let linux = vec![
        pairing("11:11:11:11:11:11", None, Some("11111111111111111111111111111111")),
        pairing("22:22:22:22:22:22", None, Some("2222222222222222222222222222222F")),
        pairing("33:33:33:33:33:33", None, None),
    ];

    let mismatches = reconcile(&windows, &linux);
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].mac.to_string(), "22:22:22:22:22:22");
}
