use crate::models::{PairingConfig, PairingConfigError, ScoreWeights};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub pairing: PairingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairingSettings {
    #[serde(default = "default_avoidance_window_weeks")]
    pub avoidance_window_weeks: u32,
    #[serde(default = "default_load_window_weeks")]
    pub load_window_weeks: u32,
    #[serde(default = "default_max_assignments_per_week")]
    pub max_assignments_per_week: u32,
}

impl Default for PairingSettings {
    fn default() -> Self {
        Self {
            avoidance_window_weeks: default_avoidance_window_weeks(),
            load_window_weeks: default_load_window_weeks(),
            max_assignments_per_week: default_max_assignments_per_week(),
        }
    }
}

fn default_avoidance_window_weeks() -> u32 { 4 }
fn default_load_window_weeks() -> u32 { 4 }
fn default_max_assignments_per_week() -> u32 { 2 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_skill_match_weight")]
    pub skill_match: f64,
    #[serde(default = "default_load_balance_weight")]
    pub load_balance: f64,
    #[serde(default = "default_diversity_weight")]
    pub diversity: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            skill_match: default_skill_match_weight(),
            load_balance: default_load_balance_weight(),
            diversity: default_diversity_weight(),
        }
    }
}

fn default_skill_match_weight() -> f64 { 0.30 }
fn default_load_balance_weight() -> f64 { 0.20 }
fn default_diversity_weight() -> f64 { 0.20 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PEERPAIR_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PEERPAIR_PAIRING__AVOIDANCE_WINDOW_WEEKS -> pairing.avoidance_window_weeks
            .add_source(
                Environment::with_prefix("PEERPAIR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("PEERPAIR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate and map settings into the explicit domain configuration
    ///
    /// The avoidance weight is materialized here as the remainder of the
    /// three configured weights; a negative remainder or a zero weekly cap
    /// is rejected rather than allowed to skew scoring silently.
    pub fn pairing_config(&self) -> Result<PairingConfig, PairingConfigError> {
        if self.pairing.max_assignments_per_week == 0 {
            return Err(PairingConfigError::ZeroMaxAssignments);
        }

        let weights = ScoreWeights::resolve(
            self.scoring.weights.skill_match,
            self.scoring.weights.load_balance,
            self.scoring.weights.diversity,
        )?;

        Ok(PairingConfig {
            avoidance_window_weeks: self.pairing.avoidance_window_weeks,
            load_window_weeks: self.pairing.load_window_weeks,
            max_assignments_per_week: self.pairing.max_assignments_per_week,
            weights,
        })
    }
}
