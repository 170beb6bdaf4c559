//! School configuration loading from config.toml
//!
//! The file names the school (used for registration-number prefixes and
//! receipt headers), the registration retry budget, the policy for periods
//! with no fee configured, and the classes and fee schedule to seed on start.

use crate::core::status::UnscheduledFeePolicy;
use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Identity of the school
    pub school: SchoolConfig,
    /// Registration number allocation settings
    #[serde(default)]
    pub registration: RegistrationConfig,
    /// Fee status policy settings
    #[serde(default)]
    pub fees: FeePolicyConfig,
    /// Class names to seed when missing
    #[serde(default)]
    pub classes: Vec<String>,
    /// Fee schedule entries to seed when their key is missing
    #[serde(default)]
    pub fee_schedule: Vec<FeeEntryConfig>,
}

/// School identity shown on documents and used for registration numbers
#[derive(Debug, Deserialize, Clone)]
pub struct SchoolConfig {
    /// Full name, e.g. "ALFURQAN ACADEMY"
    pub name: String,
    /// Registration number prefix, e.g. "AAM"
    pub short_name: String,
    /// Postal address for receipt headers
    #[serde(default)]
    pub address: String,
}

/// Registration number allocation settings
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct RegistrationConfig {
    /// How many times to retry allocation after a number collision
    pub max_attempts: u32,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Fee status policy settings
#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct FeePolicyConfig {
    /// What status a period with no fee schedule entry gets
    #[serde(default)]
    pub unscheduled_policy: UnscheduledFeePolicy,
}

/// A fee schedule seed entry
#[derive(Debug, Deserialize, Clone)]
pub struct FeeEntryConfig {
    /// Class the fee applies to
    pub class: String,
    /// Term name, e.g. "First Term"
    pub term: String,
    /// Academic year, e.g. "2024/2025"
    pub academic_year: String,
    /// Expected amount in naira
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Loads school configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
/// - The school short name is empty
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;
    parse_config(&contents)
}

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<Config> {
    let config: Config = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if config.school.short_name.trim().is_empty() {
        return Err(Error::Config {
            message: "school.short_name cannot be empty".to_string(),
        });
    }
    Ok(config)
}
