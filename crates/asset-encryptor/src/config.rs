//! Configuration loading and validation for the asset encryptor.
//!
//! Every value has a built-in default, so a bare invocation encrypts the
//! bundled template with the placeholder signature. Environment variables
//! prefixed with `ASSET_ENC_` override individual values.

use std::path::PathBuf;

use anyhow::{Context, Result};
use common::ExitPolicy;
use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;

use crate::crypto::{DEFAULT_DEVICE_ID, SIGNATURE_PLACEHOLDER};

/// Environment variable prefix, e.g. `ASSET_ENC_PROJECT_ROOT`.
pub const ENV_PREFIX: &str = "ASSET_ENC";

/// Validated encryptor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory the asset paths are resolved against.
    #[serde(default = "default_project_root")]
    pub project_root: PathBuf,

    /// Asset directory, relative to `project_root`.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// File name of the plaintext asset inside `assets_dir`.
    #[serde(default = "default_asset_name")]
    pub asset_name: String,

    /// File name of the encrypted output. Defaults to `<asset_name>.enc`.
    #[serde(default)]
    pub output_name: Option<String>,

    /// Signature fed into key derivation.
    #[serde(default = "default_signature")]
    pub signature: String,

    /// Device id fed into key derivation.
    #[serde(default = "default_device_id")]
    pub device_id: String,

    /// Decrypt the written output and compare it with the input before reporting success.
    #[serde(default)]
    pub verify_output: bool,

    /// Exit non-zero on every failure instead of only on a missing input.
    #[serde(default)]
    pub strict_exit: bool,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones.
    #[serde(default)]
    pub log_json: bool,
}

fn default_project_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_assets_dir() -> PathBuf {
    ["app", "src", "main", "assets"].iter().collect()
}
fn default_asset_name() -> String {
    "nequi_a_bancol.png".into()
}
fn default_signature() -> String {
    SIGNATURE_PLACEHOLDER.into()
}
fn default_device_id() -> String {
    DEFAULT_DEVICE_ID.into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_root: default_project_root(),
            assets_dir: default_assets_dir(),
            asset_name: default_asset_name(),
            output_name: None,
            signature: default_signature(),
            device_id: default_device_id(),
            verify_output: false,
            strict_exit: false,
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Config {
    /// Load and validate configuration from `ASSET_ENC_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or a value fails validation.
    pub fn from_env() -> Result<Self> {
        Self::load(
            config::Config::builder().add_source(config::Environment::with_prefix(ENV_PREFIX)),
        )
    }

    /// Build, deserialise and validate from an arbitrary set of sources.
    pub fn load(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let cfg = builder
            .build()
            .context("failed to build asset-encryptor configuration")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise asset-encryptor configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Full path of the plaintext asset.
    pub fn input_path(&self) -> PathBuf {
        self.project_root.join(&self.assets_dir).join(&self.asset_name)
    }

    /// Full path of the encrypted output.
    pub fn output_path(&self) -> PathBuf {
        let name = self
            .output_name
            .clone()
            .unwrap_or_else(|| format!("{}.enc", self.asset_name));
        self.project_root.join(&self.assets_dir).join(name)
    }

    pub fn exit_policy(&self) -> ExitPolicy {
        if self.strict_exit {
            ExitPolicy::Strict
        } else {
            ExitPolicy::FailOpen
        }
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_file_name(&self.asset_name, "ASSET_ENC_ASSET_NAME")?;
        if let Some(output_name) = &self.output_name {
            ensure_file_name(output_name, "ASSET_ENC_OUTPUT_NAME")?;
            if output_name == &self.asset_name {
                anyhow::bail!("ASSET_ENC_OUTPUT_NAME must differ from ASSET_ENC_ASSET_NAME");
            }
        }
        ensure_non_empty(&self.signature, "ASSET_ENC_SIGNATURE")?;
        ensure_non_empty(&self.device_id, "ASSET_ENC_DEVICE_ID")?;
        ensure_non_empty(&self.log_level, "ASSET_ENC_LOG_LEVEL")?;
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}

fn ensure_file_name(value: &str, name: &str) -> Result<()> {
    ensure_non_empty(value, name)?;
    if value.contains(|c| c == '/' || c == '\\') || value == "." || value == ".." {
        anyhow::bail!("{name} must be a plain file name, got {value:?}");
    }
    Ok(())
}
