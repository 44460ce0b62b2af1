//! Request/response exchange with the reflector licensing API.
//!
//! Both operations are stateless JSON POSTs with a fixed 10-second timeout
//! enforced by the client. Network failures and authority rejections never
//! surface as errors: they are converted into result values here, at the
//! operation boundary, so callers only ever branch on outcomes.
//!
//! Activation and validation treat an unreachable reflector differently:
//! a client that cannot reach the authority cannot activate, but an already
//! licensed install reports [`ValidationResult::Unreachable`] so transient
//! partitions do not read as authoritative invalidity.

use crate::store::canonicalize_key;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Timeout applied to every reflector request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of an activation exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationResult {
    /// The reflector accepted the key/MAC pair.
    Activated(String),
    /// The reflector rejected the request, or it never reached the
    /// reflector. Activation has no grace period.
    Rejected(String),
}

impl ActivationResult {
    /// Returns true for a successful activation.
    #[must_use]
    pub fn is_activated(&self) -> bool {
        matches!(self, Self::Activated(_))
    }

    /// Returns the human-readable outcome message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Activated(message) | Self::Rejected(message) => message,
        }
    }
}

/// Outcome of a validation exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// The reflector confirmed the license.
    Valid(String),
    /// The reflector answered, and the license did not pass.
    Invalid(String),
    /// Authoritative revocation. Callers must treat this as distinct from
    /// ordinary invalidity: it acts immediately, without accumulating
    /// toward any failure threshold.
    Revoked(String),
    /// The reflector could not be reached. A grace condition: it carries no
    /// judgment about the license itself.
    Unreachable(String),
    /// Unexpected status or body; an ordinary failure.
    Error(String),
}

#[derive(Debug, Serialize)]
struct LicenseRequest<'a> {
    license_key: &'a str,
    mac_address: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ActivateResponse {
    #[serde(default)]
    success: bool,
    error: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ValidateResponse {
    #[serde(default)]
    valid: bool,
    error: Option<String>,
    revoked_reason: Option<String>,
}

/// Stateless client for the reflector licensing API.
#[derive(Debug, Clone)]
pub struct ReflectorClient {
    http: reqwest::Client,
    base_url: String,
}

impl ReflectorClient {
    /// Creates a client for the given base URL with the fixed timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to create HTTP client");
        Self::with_http(http, base_url)
    }

    /// Creates a client sharing a caller-owned `reqwest::Client`.
    ///
    /// The daemon re-resolves the base URL every cycle; sharing the client
    /// keeps its connection pool across resolutions. The caller is
    /// responsible for configuring the timeout on the shared client.
    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Returns the reflector base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Activates a license key for the given MAC address.
    ///
    /// The key is canonicalized before it is sent.
    pub async fn activate(&self, license_key: &str, mac_address: &str) -> ActivationResult {
        let license_key = canonicalize_key(license_key);
        let url = format!("{}/api/license/activate", self.base_url);
        let request = LicenseRequest {
            license_key: &license_key,
            mac_address,
        };

        let response = match self.http.post(&url).json(&request).send().await {
            Ok(response) => response,
            Err(e) => return ActivationResult::Rejected(describe_send_error(&e)),
        };

        let status = response.status();
        debug!(%status, "reflector activate response");
        match status {
            StatusCode::OK => match response.json::<ActivateResponse>().await {
                Ok(body) if body.success => ActivationResult::Activated(
                    body.message
                        .unwrap_or_else(|| "License activated successfully".to_string()),
                ),
                Ok(body) => ActivationResult::Rejected(
                    body.error.unwrap_or_else(|| "Activation failed".to_string()),
                ),
                Err(_) => ActivationResult::Rejected(
                    "Activation failed (malformed reflector response)".to_string(),
                ),
            },
            StatusCode::UNAUTHORIZED => {
                ActivationResult::Rejected("Invalid license key or MAC address mismatch".to_string())
            }
            StatusCode::FORBIDDEN => {
                ActivationResult::Rejected("License has been revoked".to_string())
            }
            other => {
                let error = response
                    .json::<ActivateResponse>()
                    .await
                    .ok()
                    .and_then(|body| body.error);
                ActivationResult::Rejected(
                    error.unwrap_or_else(|| format!("Activation failed (HTTP {})", other.as_u16())),
                )
            }
        }
    }

    /// Validates a stored key/MAC pair with the reflector.
    pub async fn validate(&self, license_key: &str, mac_address: &str) -> ValidationResult {
        let url = format!("{}/api/license/validate", self.base_url);
        let request = LicenseRequest {
            license_key,
            mac_address,
        };

        let response = match self.http.post(&url).json(&request).send().await {
            Ok(response) => response,
            Err(e) => return ValidationResult::Unreachable(describe_send_error(&e)),
        };

        let status = response.status();
        debug!(%status, "reflector validate response");
        match status {
            StatusCode::OK => match response.json::<ValidateResponse>().await {
                Ok(body) if body.valid => {
                    ValidationResult::Valid("License is valid".to_string())
                }
                Ok(body) => ValidationResult::Invalid(
                    body.error.unwrap_or_else(|| "License invalid".to_string()),
                ),
                Err(_) => ValidationResult::Error(
                    "Validation failed (malformed reflector response)".to_string(),
                ),
            },
            StatusCode::FORBIDDEN => {
                let reason = response
                    .json::<ValidateResponse>()
                    .await
                    .ok()
                    .and_then(|body| body.revoked_reason);
                ValidationResult::Revoked(
                    reason.unwrap_or_else(|| "License has been revoked".to_string()),
                )
            }
            other => {
                let error = response
                    .json::<ValidateResponse>()
                    .await
                    .ok()
                    .and_then(|body| body.error);
                ValidationResult::Error(
                    error.unwrap_or_else(|| format!("Validation failed (HTTP {})", other.as_u16())),
                )
            }
        }
    }
}

fn describe_send_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Connection to reflector server timed out".to_string()
    } else {
        "Cannot connect to reflector server".to_string()
    }
}
