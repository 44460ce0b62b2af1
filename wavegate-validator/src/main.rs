//! Wavegate License Validator Daemon
//!
//! Runs continuously to revalidate the license every 60 seconds and stops
//! the hotspot service when the license is revoked or validation keeps
//! failing.
//!
//! Usage:
//!   wavegate-validator [--config <path>] [--license-file <path>] [--service <unit>]
//!
//! Exit status: 0 on an operator-initiated shutdown signal, 1 when the loop
//! terminated after a revocation or after the failure threshold.

use async_trait::async_trait;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use wavegate_license::{
    reflector_base_url, LicenseStore, ReflectorClient, ValidationResult, DEFAULT_CONFIG_PATH,
    DEFAULT_LICENSE_PATH, REQUEST_TIMEOUT,
};
use wavegate_service::{SystemdService, DEFAULT_SERVICE_UNIT};
use wavegate_validator::{
    LicenseAuthority, Shutdown, Validator, MAX_CONSECUTIVE_FAILURES, VALIDATION_INTERVAL,
};

#[derive(Parser, Debug)]
#[command(name = "wavegate-validator")]
#[command(about = "Wavegate hotspot license validator daemon")]
struct Args {
    /// Path to the hotspot configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Path to the persisted license record
    #[arg(long, default_value = DEFAULT_LICENSE_PATH)]
    license_file: PathBuf,

    /// Systemd unit gated by the license
    #[arg(long, default_value = DEFAULT_SERVICE_UNIT)]
    service: String,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Reflector adapter that re-resolves the base URL from the hotspot
/// configuration on every cycle, so an address change takes effect without
/// restarting the daemon. The HTTP client (and its 10-second timeout) is
/// shared across resolutions.
struct ConfiguredReflector {
    http: reqwest::Client,
    config_path: PathBuf,
}

#[async_trait]
impl LicenseAuthority for ConfiguredReflector {
    async fn validate(&self, license_key: &str, mac_address: &str) -> ValidationResult {
        let base_url = reflector_base_url(&self.config_path);
        ReflectorClient::with_http(self.http.clone(), base_url)
            .validate(license_key, mac_address)
            .await
    }
}

/// Completes on SIGINT or, on unix, SIGTERM. Operator-initiated shutdown is
/// not a license failure.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = term.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("Wavegate license validator starting");
    info!(
        interval_secs = VALIDATION_INTERVAL.as_secs(),
        max_failures = MAX_CONSECUTIVE_FAILURES,
        service = %args.service,
        license_file = %args.license_file.display(),
        "validation loop configured"
    );

    let http = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("failed to create HTTP client");
    let authority = ConfiguredReflector {
        http,
        config_path: args.config,
    };
    let store = LicenseStore::new(args.license_file);
    let service = SystemdService::new(args.service);
    let mut validator = Validator::new(store, authority, service);

    tokio::select! {
        _ = shutdown_signal() => {
            info!("received shutdown signal; exiting");
            ExitCode::SUCCESS
        }
        shutdown = validator.run() => {
            match shutdown {
                Shutdown::Revoked(reason) => {
                    info!(%reason, "validator exiting after revocation");
                }
                Shutdown::ThresholdExceeded(failures) => {
                    info!(failures, "validator exiting after repeated validation failures");
                }
            }
            ExitCode::from(1)
        }
    }
}
