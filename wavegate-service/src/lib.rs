//! Control of the license-gated hotspot service.
//!
//! The hotspot itself is an opaque process managed by systemd. This crate
//! exposes the start/stop/restart/status contract as a trait so the
//! validator daemon can be exercised against a recording double in tests.
//! Every operation is a best-effort external invocation: it reports success
//! or failure but never propagates an error past its boundary.

use std::process::Command;
use tracing::{error, warn};

/// Systemd unit gated by the license.
pub const DEFAULT_SERVICE_UNIT: &str = "wavegate-hotspot";

/// Snapshot of the gated service's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStatus {
    /// Whether the unit is currently active.
    pub active: bool,
    /// The raw state text reported by the service manager.
    pub text: String,
}

/// Start/stop/restart/status contract for the gated service.
pub trait ServiceControl: Send + Sync {
    /// Starts the service. Returns false if the invocation failed.
    fn start(&self) -> bool;

    /// Stops the service. Returns false if the invocation failed.
    fn stop(&self) -> bool;

    /// Restarts the service. Returns false if the invocation failed.
    fn restart(&self) -> bool;

    /// Reports whether the service is active.
    fn status(&self) -> ServiceStatus;
}

/// systemd-backed implementation of [`ServiceControl`].
#[derive(Debug, Clone)]
pub struct SystemdService {
    unit: String,
}

impl SystemdService {
    /// Creates a controller for the given systemd unit.
    pub fn new(unit: impl Into<String>) -> Self {
        Self { unit: unit.into() }
    }

    /// Returns the controlled unit name.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    fn run_verb(&self, verb: &str) -> bool {
        match Command::new("systemctl").arg(verb).arg(&self.unit).status() {
            Ok(status) if status.success() => true,
            Ok(status) => {
                warn!(unit = %self.unit, verb, %status, "systemctl exited unsuccessfully");
                false
            }
            Err(e) => {
                error!(unit = %self.unit, verb, "failed to run systemctl: {e}");
                false
            }
        }
    }
}

impl ServiceControl for SystemdService {
    fn start(&self) -> bool {
        self.run_verb("start")
    }

    fn stop(&self) -> bool {
        self.run_verb("stop")
    }

    fn restart(&self) -> bool {
        self.run_verb("restart")
    }

    fn status(&self) -> ServiceStatus {
        match Command::new("systemctl")
            .args(["is-active", &self.unit])
            .output()
        {
            Ok(output) => {
                let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
                ServiceStatus {
                    active: text == "active",
                    text: if text.is_empty() {
                        "unknown".to_string()
                    } else {
                        text
                    },
                }
            }
            Err(e) => {
                error!(unit = %self.unit, "failed to query service status: {e}");
                ServiceStatus {
                    active: false,
                    text: "unknown".to_string(),
                }
            }
        }
    }
}
