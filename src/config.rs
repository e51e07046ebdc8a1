//! TOML-based planner configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use serde::Deserialize;
use thiserror::Error;

use crate::model::kpi::{
    DEFAULT_COMFORT_RANGE_C, DEFAULT_EV_RATIO_PCT, DEFAULT_PARTICIPATION_PCT, StrategyInputs,
};
use crate::model::profile::{CommunityProfile, Tariff};
use crate::wizard::binder::TIME_FORMAT;
use crate::wizard::timers::Millis;

/// Vote link handed out when none is configured.
pub const DEFAULT_VOTE_LINK: &str = "https://colab.example.com/vote/abc123";

/// Top-level planner configuration parsed from TOML.
///
/// Every section has defaults matching the stock wizard. Load from TOML
/// with [`PlannerConfig::from_toml_file`] or pick a built-in preset with
/// [`PlannerConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerConfig {
    /// Initial community profile shown on the first step.
    #[serde(default)]
    pub community: CommunityProfile,
    /// Initial strategy slider and schedule values.
    #[serde(default)]
    pub strategy: StrategyConfig,
    /// Simulated delays.
    #[serde(default)]
    pub timing: TimingConfig,
    /// Comparison chart options.
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub vote: VoteConfig,
    /// Local draft storage.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Initial values of the strategy inputs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrategyConfig {
    /// Demand-response participation (percent, 0–100).
    pub participation_pct: i64,
    /// Flexible EV charging share (percent, 0–100).
    pub ev_ratio_pct: i64,
    /// Thermostat comfort range (±°C, 1–5).
    pub comfort_range_c: i64,
    /// Start of the EV charging window, `HH:MM`.
    pub ev_start: String,
    /// End of the EV charging window, `HH:MM`.
    pub ev_end: String,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            participation_pct: DEFAULT_PARTICIPATION_PCT,
            ev_ratio_pct: DEFAULT_EV_RATIO_PCT,
            comfort_range_c: DEFAULT_COMFORT_RANGE_C,
            ev_start: "22:00".to_string(),
            ev_end: "06:00".to_string(),
        }
    }
}

impl StrategyConfig {
    /// Converts to projection inputs. Times that do not parse keep the
    /// stock window; [`PlannerConfig::validate`] reports them.
    pub fn to_inputs(&self) -> StrategyInputs {
        let defaults = StrategyInputs::default();
        let time = |raw: &str, fallback| NaiveTime::parse_from_str(raw, TIME_FORMAT).unwrap_or(fallback);
        StrategyInputs {
            participation_pct: self.participation_pct,
            ev_ratio_pct: self.ev_ratio_pct,
            comfort_range_c: self.comfort_range_c,
            ev_start: time(&self.ev_start, defaults.ev_start),
            ev_end: time(&self.ev_end, defaults.ev_end),
        }
    }
}

/// Simulated delays, in milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    /// Delay between entering the chart step and reconciling the chart.
    pub chart_settle_ms: Millis,
    /// Simulated round trip of vote launch and DR event creation.
    pub submit_latency_ms: Millis,
    /// Time a toast stays before it starts leaving.
    pub toast_ms: Millis,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            chart_settle_ms: 300,
            submit_latency_ms: 2000,
            toast_ms: 3000,
        }
    }
}

/// Comparison chart options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    /// Seed for the load curve jitter; unset draws from the OS.
    pub seed: Option<u64>,
    /// Create the chart at start-up rather than on first visit.
    pub eager_init: bool,
    /// Whether a chart container exists at all.
    pub container: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            seed: None,
            eager_init: true,
            container: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VoteConfig {
    /// Link copied by the "copy vote link" action.
    pub link: String,
}

impl Default for VoteConfig {
    fn default() -> Self {
        Self {
            link: DEFAULT_VOTE_LINK.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// JSON file backing the local key-value store.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("colab-planner-store.json"),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"strategy.participation_pct"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl PlannerConfig {
    /// Stock wizard values.
    pub fn standard() -> Self {
        Self::default()
    }

    /// EV-heavy community: many EVs and a large flexible charging share.
    pub fn ev_heavy() -> Self {
        Self {
            community: CommunityProfile {
                households: 150,
                ev_share_pct: 60,
                ..CommunityProfile::default()
            },
            strategy: StrategyConfig {
                participation_pct: 45,
                ev_ratio_pct: 70,
                ev_start: "23:00".to_string(),
                ev_end: "07:00".to_string(),
                ..StrategyConfig::default()
            },
            ..Self::default()
        }
    }

    /// Solar-rich community: big PV and storage on a dynamic tariff.
    pub fn solar_rich() -> Self {
        Self {
            community: CommunityProfile {
                pv_capacity_kw: 650,
                battery_capacity_kwh: 1200,
                tariff: Tariff::Dynamic,
                ..CommunityProfile::default()
            },
            strategy: StrategyConfig {
                participation_pct: 40,
                comfort_range_c: 3,
                ..StrategyConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["default", "ev_heavy", "solar_rich"];

    /// Loads a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::standard()),
            "ev_heavy" => Ok(Self::ev_heavy()),
            "solar_rich" => Ok(Self::solar_rich()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns every violation.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let c = &self.community;
        if c.households <= 0 {
            errors.push(ConfigError::new("community.households", "must be > 0"));
        }
        if !(0..=100).contains(&c.ev_share_pct) {
            errors.push(ConfigError::new("community.ev_share_pct", "must be in [0, 100]"));
        }
        if c.pv_capacity_kw < 0 {
            errors.push(ConfigError::new("community.pv_capacity_kw", "must be >= 0"));
        }
        if c.battery_capacity_kwh < 0 {
            errors.push(ConfigError::new("community.battery_capacity_kwh", "must be >= 0"));
        }

        let s = &self.strategy;
        if !(0..=100).contains(&s.participation_pct) {
            errors.push(ConfigError::new("strategy.participation_pct", "must be in [0, 100]"));
        }
        if !(0..=100).contains(&s.ev_ratio_pct) {
            errors.push(ConfigError::new("strategy.ev_ratio_pct", "must be in [0, 100]"));
        }
        if !(1..=5).contains(&s.comfort_range_c) {
            errors.push(ConfigError::new("strategy.comfort_range_c", "must be in [1, 5]"));
        }
        for (field, raw) in [("strategy.ev_start", &s.ev_start), ("strategy.ev_end", &s.ev_end)] {
            if NaiveTime::parse_from_str(raw, TIME_FORMAT).is_err() {
                errors.push(ConfigError::new(field, format!("must be HH:MM, got \"{raw}\"")));
            }
        }

        let t = &self.timing;
        for (field, value) in [
            ("timing.chart_settle_ms", t.chart_settle_ms),
            ("timing.submit_latency_ms", t.submit_latency_ms),
            ("timing.toast_ms", t.toast_ms),
        ] {
            if value == 0 {
                errors.push(ConfigError::new(field, "must be > 0"));
            }
        }

        if self.vote.link.trim().is_empty() {
            errors.push(ConfigError::new("vote.link", "must not be empty"));
        }
        if self.storage.path.as_os_str().is_empty() {
            errors.push(ConfigError::new("storage.path", "must not be empty"));
        }

        errors
    }
}
