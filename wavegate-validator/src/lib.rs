//! The license revalidation state machine.
//!
//! A single long-lived loop revalidates the stored license with the
//! reflector once per minute. Failures of any kind accumulate in a
//! consecutive-failure counter; three in a row stop the gated service. An
//! authoritative revocation bypasses the counter and stops the service
//! within the same cycle. An unreachable reflector counts like any other
//! failure: the grace for transient partitions comes entirely from the
//! threshold headroom (roughly three minutes), not from an exemption.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};
use wavegate_license::{LicenseStore, ReflectorClient, ValidationResult};
use wavegate_service::ServiceControl;

/// Fixed cycle interval.
pub const VALIDATION_INTERVAL: Duration = Duration::from_secs(60);

/// Consecutive qualifying failures that stop the gated service.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 3;

/// Validation seam between the loop and the reflector.
///
/// Implemented by [`ReflectorClient`] (and by the daemon's config-resolving
/// adapter); tests script it with canned result sequences.
#[async_trait]
pub trait LicenseAuthority: Send + Sync {
    /// Validates a stored key/MAC pair. Never fails; every outcome is a
    /// [`ValidationResult`] value.
    async fn validate(&self, license_key: &str, mac_address: &str) -> ValidationResult;
}

#[async_trait]
impl LicenseAuthority for ReflectorClient {
    async fn validate(&self, license_key: &str, mac_address: &str) -> ValidationResult {
        ReflectorClient::validate(self, license_key, mac_address).await
    }
}

/// Observable state of the validation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Initial state, before the first cycle has resolved.
    Checking,
    /// No activated record on disk.
    Unlicensed,
    /// Last validation succeeded.
    Valid,
    /// Reflector unreachable; running on threshold headroom.
    Grace,
    /// Terminal: authoritative revocation received.
    Revoked,
    /// Terminal: consecutive failures reached the threshold.
    ThresholdExceeded,
}

/// Terminal outcome of the loop. The daemon exits non-zero on either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shutdown {
    /// The reflector revoked the license.
    Revoked(String),
    /// The failure threshold was reached.
    ThresholdExceeded(u32),
}

/// The revalidation loop and its in-memory state.
///
/// The consecutive-failure counter lives only here; it is never persisted.
pub struct Validator<A, S> {
    store: LicenseStore,
    authority: A,
    service: S,
    state: LoopState,
    consecutive_failures: u32,
}

impl<A: LicenseAuthority, S: ServiceControl> Validator<A, S> {
    /// Creates a validator in the initial `Checking` state.
    pub fn new(store: LicenseStore, authority: A, service: S) -> Self {
        Self {
            store,
            authority,
            service,
            state: LoopState::Checking,
            consecutive_failures: 0,
        }
    }

    /// Returns the current loop state.
    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Returns the current consecutive-failure count.
    #[must_use]
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Runs one validation cycle. Returns the terminal outcome if this
    /// cycle stopped the gated service.
    pub async fn cycle(&mut self) -> Option<Shutdown> {
        // Re-read the record every cycle: activation and revocation happen
        // out-of-band in other processes.
        let Some(record) = self.store.load() else {
            self.state = LoopState::Unlicensed;
            warn!("no license activated; hotspot should not be running");
            return self.record_failure();
        };

        match self
            .authority
            .validate(&record.license_key, &record.mac_address)
            .await
        {
            ValidationResult::Valid(message) => {
                info!(%message, "license valid");
                self.consecutive_failures = 0;
                self.state = LoopState::Valid;
                None
            }
            ValidationResult::Revoked(reason) => {
                // A single authoritative revocation is sufficient: stop the
                // service within this cycle, without consulting the counter.
                self.state = LoopState::Revoked;
                error!(%reason, "license revoked; stopping hotspot service");
                self.stop_gated_service();
                Some(Shutdown::Revoked(reason))
            }
            ValidationResult::Unreachable(reason) => {
                self.state = LoopState::Grace;
                warn!(%reason, "reflector unreachable; counting toward failure threshold");
                self.record_failure()
            }
            ValidationResult::Invalid(reason) | ValidationResult::Error(reason) => {
                warn!(%reason, "license validation failed");
                self.record_failure()
            }
        }
    }

    /// Runs cycles on the fixed interval until a terminal outcome.
    ///
    /// The first cycle runs immediately. Interrupt handling belongs to the
    /// caller: racing this future against a shutdown signal ends the loop
    /// cleanly with no service-stop action.
    pub async fn run(&mut self) -> Shutdown {
        let mut interval = tokio::time::interval(VALIDATION_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if let Some(shutdown) = self.cycle().await {
                return shutdown;
            }
        }
    }

    fn record_failure(&mut self) -> Option<Shutdown> {
        self.consecutive_failures += 1;
        if self.consecutive_failures < MAX_CONSECUTIVE_FAILURES {
            return None;
        }
        self.state = LoopState::ThresholdExceeded;
        error!(
            failures = self.consecutive_failures,
            "maximum consecutive validation failures reached; stopping hotspot service"
        );
        self.stop_gated_service();
        Some(Shutdown::ThresholdExceeded(self.consecutive_failures))
    }

    fn stop_gated_service(&self) {
        if !self.service.stop() {
            error!("failed to stop hotspot service");
        }
    }
}
