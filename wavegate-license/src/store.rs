//! Durable storage for the activation record.
//!
//! The store exclusively owns the on-disk record. There is no in-memory
//! cache: every read re-reads the file, so the validator daemon observes
//! activations and revocations performed by other processes on its next
//! cycle. Writes replace the file atomically, so a concurrent reader sees
//! either the old record or the new one, never a torn file.

use crate::error::LicenseResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default location of the persisted license record.
pub const DEFAULT_LICENSE_PATH: &str = "/etc/wavegate/license.json";

/// Canonicalizes a license key: trimmed, uppercased.
#[must_use]
pub fn canonicalize_key(key: &str) -> String {
    key.trim().to_ascii_uppercase()
}

/// The persisted activation record, one per installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// Must be true for the record to count as a valid activation.
    pub activated: bool,
    /// Canonicalized opaque token issued by the reflector.
    pub license_key: String,
    /// Colon-separated uppercase hex MAC, the hardware binding key.
    pub mac_address: String,
    /// Set once at activation, never mutated.
    pub activated_at: DateTime<Utc>,
}

/// File-backed license store.
#[derive(Debug, Clone)]
pub struct LicenseStore {
    path: PathBuf,
}

impl LicenseStore {
    /// Creates a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the activation record.
    ///
    /// Fails soft: a missing file, unreadable file, parse error, or a record
    /// with `activated == false` all yield `None`.
    #[must_use]
    pub fn load(&self) -> Option<LicenseRecord> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!(path = %self.path.display(), "no readable license record: {e}");
                return None;
            }
        };
        let record: LicenseRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                debug!(path = %self.path.display(), "malformed license record: {e}");
                return None;
            }
        };
        record.activated.then_some(record)
    }

    /// Writes a fresh activation record, replacing any prior record.
    ///
    /// The record is serialized to a sibling temporary file which is
    /// restricted to mode 0600 before being renamed over the destination, so
    /// the record is never observable torn or world-readable.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written; unlike reads, a
    /// write failure is total.
    pub fn save(&self, license_key: &str, mac_address: &str) -> LicenseResult<LicenseRecord> {
        let record = LicenseRecord {
            activated: true,
            license_key: canonicalize_key(license_key),
            mac_address: mac_address.to_string(),
            activated_at: Utc::now(),
        };
        let json = serde_json::to_vec_pretty(&record)?;

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
        }
        fs::rename(&tmp, &self.path)?;

        Ok(record)
    }

    /// Returns true iff an activated record is present.
    ///
    /// This predicate is the sole licensing gate used outside the validator.
    #[must_use]
    pub fn is_licensed(&self) -> bool {
        self.load().is_some()
    }
}
