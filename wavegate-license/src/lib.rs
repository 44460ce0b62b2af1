//! Licensing for the Wavegate hotspot.
//!
//! This crate handles:
//! - Durable storage of the activation record
//! - Hardware identity (MAC address) resolution for license binding
//! - The activation/validation exchange with the reflector authority
//! - Reflector address resolution from the hotspot configuration
//!
//! # Design Principles
//!
//! - **File is the source of truth**: every read re-reads the on-disk
//!   record, so separate processes (activation, validation) stay consistent
//!   without shared state.
//! - **Failures are values**: rejections, revocations and network failures
//!   are returned as result enums, never raised past an operation boundary.
//! - **Revocation is structural**: an authoritative revocation is a distinct
//!   variant, not a message to be string-matched.

mod activation;
mod config;
mod error;
mod identity;
mod reflector;
mod store;

pub use activation::{activate_license, activate_with_mac};
pub use config::{
    reflector_base_url, HotspotConfig, ReflectorConfig, DEFAULT_CONFIG_PATH,
    FALLBACK_REFLECTOR_URL,
};
pub use error::{LicenseError, LicenseResult};
pub use identity::{get_mac_address, get_mac_address_in, normalize_mac};
pub use reflector::{ActivationResult, ReflectorClient, ValidationResult, REQUEST_TIMEOUT};
pub use store::{canonicalize_key, LicenseRecord, LicenseStore, DEFAULT_LICENSE_PATH};
