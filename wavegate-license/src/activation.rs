//! One-shot activation orchestration.
//!
//! Resolves the hardware identity, exchanges the key with the reflector and,
//! only on success, persists the activation record. Repeated failed attempts
//! leave no trace.

use crate::identity;
use crate::reflector::{ActivationResult, ReflectorClient};
use crate::store::LicenseStore;
use tracing::info;

/// Activates a license key and persists the record on success.
///
/// Every failure kind is converted into [`ActivationResult::Rejected`] with
/// a user-facing message; no partial state is ever written.
pub async fn activate_license(
    store: &LicenseStore,
    client: &ReflectorClient,
    license_key: &str,
) -> ActivationResult {
    let mac_address = match identity::get_mac_address() {
        Ok(mac) => mac,
        Err(e) => return ActivationResult::Rejected(e.to_string()),
    };
    activate_with_mac(store, client, license_key, &mac_address).await
}

/// Activates a license key for an already-resolved MAC address.
/// Used by callers that resolved or display the identity beforehand.
pub async fn activate_with_mac(
    store: &LicenseStore,
    client: &ReflectorClient,
    license_key: &str,
    mac_address: &str,
) -> ActivationResult {
    match client.activate(license_key, mac_address).await {
        ActivationResult::Activated(message) => {
            if let Err(e) = store.save(license_key, mac_address) {
                return ActivationResult::Rejected(format!("Failed to persist license: {e}"));
            }
            info!(mac = %mac_address, "license activated");
            ActivationResult::Activated(message)
        }
        rejected => rejected,
    }
}
