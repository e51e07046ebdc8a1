use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::Serialize;

/// Kind of demand-response event offered to the community.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DrEventType {
    /// Shave the evening peak.
    #[default]
    PeakReduction,
    /// Move flexible load to off-peak hours.
    LoadShifting,
    /// Grid emergency curtailment.
    Emergency,
}

impl DrEventType {
    pub const ALL: [Self; 3] = [Self::PeakReduction, Self::LoadShifting, Self::Emergency];

    /// Form value for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PeakReduction => "peak-reduction",
            Self::LoadShifting => "load-shifting",
            Self::Emergency => "emergency",
        }
    }

    /// Next type in [`DrEventType::ALL`], wrapping around.
    pub fn cycle(self, forward: bool) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        let n = Self::ALL.len();
        let next = if forward { (idx + 1) % n } else { (idx + n - 1) % n };
        Self::ALL[next]
    }
}

impl fmt::Display for DrEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| format!("unknown DR event type \"{s}\""))
    }
}

/// A demand-response event requesting a temporary load reduction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrEvent {
    /// Sequential identifier (`DR-001`, `DR-002`, ...).
    pub id: String,
    pub name: String,
    pub event_type: DrEventType,
    /// Local start time of the event window.
    pub start: NaiveDateTime,
    /// Length of the event window (hours).
    pub duration_hours: f64,
    /// Requested reduction while the event is active (kW).
    pub target_reduction_kw: f64,
    /// Reward paid per kWh of reduction.
    pub reward_price: f64,
    pub description: String,
}

impl DrEvent {
    /// Formats the identifier for the `seq`-th created event (1-based).
    pub fn id_for(seq: usize) -> String {
        format!("DR-{seq:03}")
    }

    /// Identifier of the settlement record for this event (`ST-001` for `DR-001`).
    pub fn settlement_id(&self) -> String {
        match self.id.strip_prefix("DR-") {
            Some(seq) => format!("ST-{seq}"),
            None => format!("ST-{}", self.id),
        }
    }

    /// Payout if the full target reduction is delivered for the whole window.
    pub fn expected_revenue(&self) -> f64 {
        expected_revenue(self.target_reduction_kw, self.duration_hours, self.reward_price)
    }
}

/// Target reduction × duration × reward price.
pub fn expected_revenue(target_reduction_kw: f64, duration_hours: f64, reward_price: f64) -> f64 {
    target_reduction_kw * duration_hours * reward_price
}
