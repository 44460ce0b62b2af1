use std::fs;
use std::path::Path;
use tempfile::tempdir;
use wavegate_license::{get_mac_address_in, normalize_mac, LicenseError};

fn write_iface(root: &Path, name: &str, address: &str) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("address"), address).unwrap();
}

// ── probe order ─────────────────────────────────────────────────

#[test]
fn prefers_eth0() {
    let root = tempdir().unwrap();
    write_iface(root.path(), "eth0", "aa:bb:cc:dd:ee:ff\n");
    write_iface(root.path(), "wlan0", "11:22:33:44:55:66\n");
    assert_eq!(
        get_mac_address_in(root.path()).unwrap(),
        "AA:BB:CC:DD:EE:FF"
    );
}

#[test]
fn falls_back_to_wlan0() {
    let root = tempdir().unwrap();
    write_iface(root.path(), "wlan0", "11:22:33:44:55:66\n");
    assert_eq!(
        get_mac_address_in(root.path()).unwrap(),
        "11:22:33:44:55:66"
    );
}

#[test]
fn unreadable_eth0_falls_through() {
    let root = tempdir().unwrap();
    // eth0 exists but has no address file.
    fs::create_dir_all(root.path().join("eth0")).unwrap();
    write_iface(root.path(), "wlan0", "11:22:33:44:55:66\n");
    assert_eq!(
        get_mac_address_in(root.path()).unwrap(),
        "11:22:33:44:55:66"
    );
}

#[test]
fn enumeration_skips_loopback() {
    let root = tempdir().unwrap();
    write_iface(root.path(), "lo", "00:00:00:00:00:00\n");
    write_iface(root.path(), "enp3s0", "de:ad:be:ef:00:01\n");
    assert_eq!(
        get_mac_address_in(root.path()).unwrap(),
        "DE:AD:BE:EF:00:01"
    );
}

#[test]
fn all_zero_address_is_skipped() {
    let root = tempdir().unwrap();
    write_iface(root.path(), "dummy0", "00:00:00:00:00:00\n");
    write_iface(root.path(), "enp3s0", "de:ad:be:ef:00:01\n");
    assert_eq!(
        get_mac_address_in(root.path()).unwrap(),
        "DE:AD:BE:EF:00:01"
    );
}

#[test]
fn no_usable_interface_is_identity_error() {
    let root = tempdir().unwrap();
    write_iface(root.path(), "lo", "00:00:00:00:00:00\n");
    let err = get_mac_address_in(root.path()).unwrap_err();
    assert!(matches!(err, LicenseError::Identity(_)));
}

#[test]
fn missing_interface_directory_is_identity_error() {
    let root = tempdir().unwrap();
    let err = get_mac_address_in(&root.path().join("does-not-exist")).unwrap_err();
    assert!(matches!(err, LicenseError::Identity(_)));
}

// ── normalization ───────────────────────────────────────────────

#[test]
fn normalizes_case_and_separators() {
    let root = tempdir().unwrap();
    write_iface(root.path(), "eth0", "aa-bb-cc-dd-ee-ff\n");
    assert_eq!(
        get_mac_address_in(root.path()).unwrap(),
        "AA:BB:CC:DD:EE:FF"
    );
}

#[test]
fn normalize_mac_accepts_canonical_input() {
    assert_eq!(
        normalize_mac("AA:BB:CC:DD:EE:FF").as_deref(),
        Some("AA:BB:CC:DD:EE:FF")
    );
}

#[test]
fn normalize_mac_trims_whitespace() {
    assert_eq!(
        normalize_mac("  aa:bb:cc:dd:ee:ff\n").as_deref(),
        Some("AA:BB:CC:DD:EE:FF")
    );
}

#[test]
fn normalize_mac_rejects_malformed() {
    assert!(normalize_mac("").is_none());
    assert!(normalize_mac("aa:bb:cc:dd:ee").is_none());
    assert!(normalize_mac("aa:bb:cc:dd:ee:ff:00").is_none());
    assert!(normalize_mac("gg:bb:cc:dd:ee:ff").is_none());
    assert!(normalize_mac("aaa:bb:cc:dd:ee:f").is_none());
}

#[test]
fn normalize_mac_rejects_all_zero() {
    assert!(normalize_mac("00:00:00:00:00:00").is_none());
}
