//! Hardware identity resolution for license binding.
//!
//! A license is bound to the MAC address of the primary network interface.
//! Resolution probes the wired interface first, then wireless, then the
//! first remaining non-loopback interface reported by the kernel. Each probe
//! is independent: a failure falls through to the next rather than aborting.

use crate::error::{LicenseError, LicenseResult};
use std::fs;
use std::path::Path;

/// Kernel directory listing network interfaces.
const SYS_CLASS_NET: &str = "/sys/class/net";

/// Interfaces probed before falling back to enumeration, in order.
const PREFERRED_INTERFACES: [&str; 2] = ["eth0", "wlan0"];

/// Resolves the MAC address used as the license binding key.
///
/// The result is normalized to uppercase hex pairs separated by colons,
/// matching the format embedded in the persisted license record.
///
/// # Errors
///
/// Returns [`LicenseError::Identity`] if no interface with a usable MAC
/// address is discoverable.
pub fn get_mac_address() -> LicenseResult<String> {
    get_mac_address_in(Path::new(SYS_CLASS_NET))
}

/// Resolves a MAC address from the given interface directory.
/// Used for testing with a fabricated interface tree.
pub fn get_mac_address_in(sys_net: &Path) -> LicenseResult<String> {
    for iface in PREFERRED_INTERFACES {
        if let Some(mac) = read_interface_mac(&sys_net.join(iface)) {
            return Ok(mac);
        }
    }

    // Fall back to the first non-loopback interface the kernel reports.
    // Sorted for a deterministic pick when several are present.
    let mut names: Vec<String> = fs::read_dir(sys_net)
        .map_err(|e| LicenseError::Identity(format!("cannot list network interfaces: {e}")))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name != "lo")
        .collect();
    names.sort();

    for name in names {
        if let Some(mac) = read_interface_mac(&sys_net.join(name)) {
            return Ok(mac);
        }
    }

    Err(LicenseError::Identity(
        "could not find a network interface MAC address".to_string(),
    ))
}

/// Reads and normalizes the MAC address of a single interface directory.
/// Returns `None` for unreadable, malformed, or all-zero addresses.
fn read_interface_mac(iface_dir: &Path) -> Option<String> {
    let raw = fs::read_to_string(iface_dir.join("address")).ok()?;
    normalize_mac(&raw)
}

/// Normalizes a raw MAC string to `AA:BB:CC:DD:EE:FF`.
///
/// Accepts colon or hyphen separators and either case. Rejects anything that
/// is not six hex pairs, and the all-zero address reported by loopback and
/// some virtual interfaces.
#[must_use]
pub fn normalize_mac(raw: &str) -> Option<String> {
    let parts: Vec<&str> = raw.trim().split([':', '-']).collect();
    if parts.len() != 6 {
        return None;
    }
    let mut pairs = Vec::with_capacity(6);
    for part in parts {
        if part.len() != 2 || !part.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        pairs.push(part.to_ascii_uppercase());
    }
    let mac = pairs.join(":");
    if mac == "00:00:00:00:00:00" {
        return None;
    }
    Some(mac)
}
