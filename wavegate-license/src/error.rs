//! Error types for the licensing module.

use thiserror::Error;

/// Licensing-specific errors.
///
/// Reflector rejections and network failures are not represented here: the
/// client converts them into [`crate::ActivationResult`] /
/// [`crate::ValidationResult`] values at the operation boundary, so they can
/// never escape to crash a caller.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// No resolvable hardware identity for license binding.
    #[error("failed to get MAC address: {0}")]
    Identity(String),

    /// License record file I/O failure.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
