//! Reflector address resolution from the hotspot configuration.
//!
//! The hotspot's configuration file is owned by the hotspot process itself;
//! this module only reads the `reflector` section to derive the base URL of
//! the licensing API. The contract is "always returns some usable base URL,
//! never fails": an absent or unreadable config falls back to the well-known
//! authority address.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Default location of the hotspot configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/wavegate/config.json";

/// Well-known fallback authority when no reflector is configured.
pub const FALLBACK_REFLECTOR_URL: &str = "https://reflector.wavegate.io";

/// Web-interface port used when the reflector is configured by bare address.
const REFLECTOR_WEB_PORT: u16 = 5000;

/// The subset of the hotspot configuration read by the licensing layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HotspotConfig {
    /// Reflector connection settings.
    #[serde(default)]
    pub reflector: ReflectorConfig,
}

/// Reflector connection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReflectorConfig {
    /// Explicit web URL for TLS-terminated domains. Takes precedence.
    #[serde(default)]
    pub web_url: Option<String>,
    /// Bare reflector address; the licensing API is reached on the fixed
    /// web-interface port, not the relay port below.
    #[serde(default)]
    pub address: Option<String>,
    /// Relay signalling port of the reflector, unused by the licensing API.
    #[serde(default)]
    pub port: Option<u16>,
}

impl HotspotConfig {
    /// Loads the configuration, failing soft to `None`.
    #[must_use]
    pub fn load(path: &Path) -> Option<Self> {
        let raw = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(config) => Some(config),
            Err(e) => {
                debug!(path = %path.display(), "malformed hotspot config: {e}");
                None
            }
        }
    }
}

/// Derives the reflector base URL from the hotspot configuration.
///
/// Resolution order: configured `web_url`, then `http://<address>:5000` for a
/// bare address, then [`FALLBACK_REFLECTOR_URL`]. Never fails.
#[must_use]
pub fn reflector_base_url(config_path: &Path) -> String {
    let Some(config) = HotspotConfig::load(config_path) else {
        return FALLBACK_REFLECTOR_URL.to_string();
    };
    if let Some(url) = config.reflector.web_url {
        return url.trim_end_matches('/').to_string();
    }
    if let Some(address) = config.reflector.address {
        return format!("http://{address}:{REFLECTOR_WEB_PORT}");
    }
    FALLBACK_REFLECTOR_URL.to_string()
}
