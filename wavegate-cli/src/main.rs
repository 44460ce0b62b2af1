//! Wavegate Hotspot License Manager
//!
//! Command-line entry points over the licensing crate:
//!   wavegate status           Show the current activation status
//!   wavegate activate <key>   Activate a license key with the reflector
//!   wavegate validate         Validate the stored license
//!   wavegate mac              Show the MAC address used for license binding

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use wavegate_license::{
    activate_license, get_mac_address, reflector_base_url, ActivationResult, LicenseStore,
    ReflectorClient, ValidationResult, DEFAULT_CONFIG_PATH, DEFAULT_LICENSE_PATH,
};

#[derive(Parser, Debug)]
#[command(name = "wavegate")]
#[command(about = "Wavegate hotspot license manager")]
struct Cli {
    /// Path to the persisted license record
    #[arg(long, default_value = DEFAULT_LICENSE_PATH)]
    license_file: PathBuf,

    /// Path to the hotspot configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the current activation status
    Status,
    /// Activate a license key with the reflector
    Activate {
        /// The license key to activate
        license_key: String,
    },
    /// Validate the stored license against the reflector
    Validate,
    /// Show the MAC address used as the license binding key
    Mac,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let store = LicenseStore::new(&cli.license_file);

    match cli.command {
        Command::Status => {
            match store.load() {
                Some(record) => {
                    println!("Licensed");
                    println!("  MAC:       {}", record.mac_address);
                    println!("  Activated: {}", record.activated_at);
                }
                None => println!("Not licensed"),
            }
            ExitCode::SUCCESS
        }

        Command::Activate { license_key } => {
            let client = ReflectorClient::new(reflector_base_url(&cli.config));
            match activate_license(&store, &client, &license_key).await {
                ActivationResult::Activated(message) => {
                    println!("{message}");
                    ExitCode::SUCCESS
                }
                ActivationResult::Rejected(message) => {
                    eprintln!("{message}");
                    ExitCode::from(1)
                }
            }
        }

        Command::Validate => {
            let Some(record) = store.load() else {
                eprintln!("No license activated");
                return ExitCode::from(1);
            };
            let client = ReflectorClient::new(reflector_base_url(&cli.config));
            match client
                .validate(&record.license_key, &record.mac_address)
                .await
            {
                ValidationResult::Valid(message) => {
                    println!("{message}");
                    ExitCode::SUCCESS
                }
                // An unreachable reflector is a grace condition, not a
                // judgment on the license.
                ValidationResult::Unreachable(reason) => {
                    println!("{reason} (grace period)");
                    ExitCode::SUCCESS
                }
                ValidationResult::Invalid(reason)
                | ValidationResult::Revoked(reason)
                | ValidationResult::Error(reason) => {
                    eprintln!("{reason}");
                    ExitCode::from(1)
                }
            }
        }

        Command::Mac => match get_mac_address() {
            Ok(mac) => {
                println!("{mac}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{e}");
                ExitCode::from(1)
            }
        },
    }
}
