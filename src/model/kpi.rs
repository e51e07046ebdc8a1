//! Scenario KPI projection from the participation percentage.

use std::fmt;

use chrono::NaiveTime;
use serde::Serialize;

/// Baseline cost index.
pub const BASELINE_COST: f64 = 100.0;
/// Baseline peak load index.
pub const BASELINE_PEAK: f64 = 300.0;
/// Baseline emissions index.
pub const BASELINE_EMISSIONS: f64 = 100.0;

/// Participation assumed when the input is absent or unparseable.
pub const DEFAULT_PARTICIPATION_PCT: i64 = 30;
/// EV ratio assumed when the input is absent or unparseable.
pub const DEFAULT_EV_RATIO_PCT: i64 = 25;
/// Comfort range assumed when the input is absent or unparseable.
pub const DEFAULT_COMFORT_RANGE_C: i64 = 2;

/// One of the three compared load-shaping scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Scenario {
    /// No load shaping.
    Baseline,
    /// Default demand-response playbook.
    StrategyA,
    /// Customized, more aggressive playbook.
    StrategyB,
}

/// Per-participation-point reduction rates applied to the baseline figures.
#[derive(Debug, Clone, Copy)]
struct ReductionRates {
    cost: f64,
    peak: f64,
    emissions: f64,
}

impl Scenario {
    pub const ALL: [Self; 3] = [Self::Baseline, Self::StrategyA, Self::StrategyB];

    /// Human-readable name used in tables and chart legends.
    pub fn label(self) -> &'static str {
        match self {
            Self::Baseline => "Baseline",
            Self::StrategyA => "Strategy A",
            Self::StrategyB => "Strategy B",
        }
    }

    /// Fixed comfort score, independent of every input.
    pub fn comfort(self) -> f64 {
        match self {
            Self::Baseline => 1.00,
            Self::StrategyA => 0.95,
            Self::StrategyB => 0.82,
        }
    }

    fn rates(self) -> ReductionRates {
        match self {
            Self::Baseline => ReductionRates {
                cost: 0.0,
                peak: 0.0,
                emissions: 0.0,
            },
            Self::StrategyA => ReductionRates {
                cost: 0.003,
                peak: 0.005,
                emissions: 0.004,
            },
            Self::StrategyB => ReductionRates {
                cost: 0.004,
                peak: 0.007,
                emissions: 0.006,
            },
        }
    }
}

/// Inputs collected on the strategy steps of the wizard.
///
/// Only `participation_pct` drives the projection. The EV and comfort
/// figures are carried so the form can display and export them.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyInputs {
    /// Share of members enrolled in demand response (percent, unclamped).
    pub participation_pct: i64,
    /// Share of EV charging that may be shifted (percent).
    pub ev_ratio_pct: i64,
    /// Allowed thermostat deviation (±°C).
    pub comfort_range_c: i64,
    /// Start of the preferred EV charging window.
    pub ev_start: NaiveTime,
    /// End of the preferred EV charging window.
    pub ev_end: NaiveTime,
}

impl Default for StrategyInputs {
    fn default() -> Self {
        Self {
            participation_pct: DEFAULT_PARTICIPATION_PCT,
            ev_ratio_pct: DEFAULT_EV_RATIO_PCT,
            comfort_range_c: DEFAULT_COMFORT_RANGE_C,
            ev_start: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default(),
            ev_end: NaiveTime::from_hms_opt(6, 0, 0).unwrap_or_default(),
        }
    }
}

/// Projected figures for a single scenario (unitless indices).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioKpi {
    pub cost: f64,
    pub peak: f64,
    pub emissions: f64,
    pub comfort: f64,
}

/// Projection of all three scenarios for one participation value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub participation_pct: i64,
    pub baseline: ScenarioKpi,
    pub strategy_a: ScenarioKpi,
    pub strategy_b: ScenarioKpi,
}

impl Projection {
    /// Returns the figures for `scenario`.
    pub fn get(&self, scenario: Scenario) -> &ScenarioKpi {
        match scenario {
            Scenario::Baseline => &self.baseline,
            Scenario::StrategyA => &self.strategy_a,
            Scenario::StrategyB => &self.strategy_b,
        }
    }

    /// Iterates scenarios in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Scenario, &ScenarioKpi)> {
        Scenario::ALL.into_iter().map(|s| (s, self.get(s)))
    }
}

/// Projects the three scenarios from the wizard inputs.
///
/// Pure and deterministic. Participation outside `0..=100` is not clamped,
/// so values above 100 yield negative figures.
pub fn project(inputs: &StrategyInputs) -> Projection {
    project_participation(inputs.participation_pct)
}

/// Projects the three scenarios from a bare participation percentage.
pub fn project_participation(participation_pct: i64) -> Projection {
    let scenario = |s: Scenario| {
        let r = s.rates();
        let p = participation_pct as f64;
        ScenarioKpi {
            cost: BASELINE_COST * (1.0 - p * r.cost),
            peak: BASELINE_PEAK * (1.0 - p * r.peak),
            emissions: BASELINE_EMISSIONS * (1.0 - p * r.emissions),
            comfort: s.comfort(),
        }
    };

    Projection {
        participation_pct,
        baseline: scenario(Scenario::Baseline),
        strategy_a: scenario(Scenario::StrategyA),
        strategy_b: scenario(Scenario::StrategyB),
    }
}

/// Formats with zero decimals, rounding half away from zero.
pub fn format_whole(value: f64) -> String {
    format!("{:.0}", value.round())
}

/// Formats with two decimals, rounding half away from zero.
pub fn format_hundredths(value: f64) -> String {
    format!("{:.2}", (value * 100.0).round() / 100.0)
}

/// Display text for one scenario row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KpiDisplay {
    pub cost: String,
    pub peak: String,
    pub emissions: String,
    pub comfort: String,
}

impl From<&ScenarioKpi> for KpiDisplay {
    fn from(k: &ScenarioKpi) -> Self {
        Self {
            cost: format_whole(k.cost),
            peak: format_whole(k.peak),
            emissions: format_whole(k.emissions),
            comfort: format_hundredths(k.comfort),
        }
    }
}

/// Displayed KPI values, one row per scenario.
///
/// Written only by [`KpiPanel::update`]; rendering reads it verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiPanel {
    pub baseline: KpiDisplay,
    pub strategy_a: KpiDisplay,
    pub strategy_b: KpiDisplay,
}

impl KpiPanel {
    /// Overwrites every displayed value from `projection`.
    pub fn update(&mut self, projection: &Projection) {
        self.baseline = KpiDisplay::from(&projection.baseline);
        self.strategy_a = KpiDisplay::from(&projection.strategy_a);
        self.strategy_b = KpiDisplay::from(&projection.strategy_b);
    }

    /// Returns the display row for `scenario`.
    pub fn row(&self, scenario: Scenario) -> &KpiDisplay {
        match scenario {
            Scenario::Baseline => &self.baseline,
            Scenario::StrategyA => &self.strategy_a,
            Scenario::StrategyB => &self.strategy_b,
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "--- Strategy Projection (participation {}%) ---",
            self.participation_pct
        )?;
        writeln!(
            f,
            "{:<12} {:>6} {:>6} {:>10} {:>8}",
            "Scenario", "Cost", "Peak", "Emissions", "Comfort"
        )?;
        let mut rows = self.iter().peekable();
        while let Some((scenario, kpi)) = rows.next() {
            let d = KpiDisplay::from(kpi);
            write!(
                f,
                "{:<12} {:>6} {:>6} {:>10} {:>8}",
                scenario.label(),
                d.cost,
                d.peak,
                d.emissions,
                d.comfort
            )?;
            if rows.peek().is_some() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
