//! `asset-encryptor` binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from `ASSET_ENC_*` environment variables.
//! 2. Initialise logging.
//! 3. Encrypt the configured asset and map the outcome to an exit code.

use std::process::ExitCode;

use asset_encryptor::config::Config;
use asset_encryptor::{encryptor, telemetry};
use common::{EncryptorError, ExitPolicy};
use tracing::{error, info};

fn main() -> ExitCode {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            // Logging is not yet up; write to stderr directly.
            eprintln!("ERROR: configuration invalid: {e:#}");
            let err = EncryptorError::Config(format!("{e:#}"));
            return ExitCode::from(err.exit_code(ExitPolicy::default()));
        }
    };
    let policy = cfg.exit_policy();

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    if let Err(e) = telemetry::init(&cfg.log_level, cfg.log_json) {
        eprintln!("WARN: {e:#}");
    }
    info!(version = env!("CARGO_PKG_VERSION"), "asset-encryptor starting");

    // -----------------------------------------------------------------------
    // 3. Encrypt
    // -----------------------------------------------------------------------
    match encryptor::run(&cfg) {
        Ok(report) => {
            info!(output = %report.output.display(), "encryption completed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            let code = e.exit_code(policy);
            error!(error = %e, exit_code = code, "encryption failed");
            ExitCode::from(code)
        }
    }
}
