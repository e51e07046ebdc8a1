//! Community profile collected on the first wizard step.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Electricity tariff the community is billed under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tariff {
    /// Time-of-use bands.
    #[default]
    #[serde(rename = "tou")]
    TimeOfUse,
    /// Single flat rate.
    Flat,
    /// Hourly dynamic pricing.
    Dynamic,
}

impl Tariff {
    pub const ALL: [Self; 3] = [Self::TimeOfUse, Self::Flat, Self::Dynamic];

    /// Wire name used in config files and form values.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TimeOfUse => "tou",
            Self::Flat => "flat",
            Self::Dynamic => "dynamic",
        }
    }

    /// Next tariff in [`Tariff::ALL`], wrapping around.
    pub fn cycle(self, forward: bool) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        let n = Self::ALL.len();
        let next = if forward { (idx + 1) % n } else { (idx + n - 1) % n };
        Self::ALL[next]
    }
}

impl fmt::Display for Tariff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tariff {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "tou" => Ok(Self::TimeOfUse),
            "flat" => Ok(Self::Flat),
            "dynamic" => Ok(Self::Dynamic),
            other => Err(format!(
                "unknown tariff \"{other}\", expected tou, flat or dynamic"
            )),
        }
    }
}

/// Household, EV and asset figures describing the community.
///
/// Collected and displayed by the wizard. The KPI projection does not read
/// any of these figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommunityProfile {
    /// Number of participating households.
    pub households: i64,
    /// Share of households owning an EV (percent).
    pub ev_share_pct: i64,
    /// Installed photovoltaic capacity (kW).
    pub pv_capacity_kw: i64,
    /// Installed battery capacity (kWh).
    pub battery_capacity_kwh: i64,
    /// Billing tariff.
    pub tariff: Tariff,
}

impl Default for CommunityProfile {
    fn default() -> Self {
        Self {
            households: 120,
            ev_share_pct: 25,
            pv_capacity_kw: 200,
            battery_capacity_kwh: 500,
            tariff: Tariff::TimeOfUse,
        }
    }
}
