//! Chart adapter: owns the single comparison chart instance.
//!
//! The chart can only be sized correctly once its container is visible,
//! so creation is deferred until the chart step is entered and the layout
//! has settled. The adapter is idempotent: asking it to create a chart
//! that already exists turns into a redraw.

use serde::Serialize;
use tracing::{debug, info};

use crate::model::curve::LoadCurves;
use crate::model::kpi::Scenario;

/// Title shown above the comparison chart.
pub const CHART_TITLE: &str = "24-hour Load Curve Comparison";
/// X axis title.
pub const X_AXIS_TITLE: &str = "Time (Hours)";
/// Y axis title.
pub const Y_AXIS_TITLE: &str = "Load (kW)";

/// RGB colour of a chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#rrggbb` form.
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// `rgba(r, g, b, a)` form.
    pub fn rgba(self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {alpha})", self.0, self.1, self.2)
    }
}

/// Line colour for a scenario.
pub fn scenario_color(scenario: Scenario) -> Rgb {
    match scenario {
        Scenario::Baseline => Rgb(0xe7, 0x4c, 0x3c),
        Scenario::StrategyA => Rgb(0x34, 0x98, 0xdb),
        Scenario::StrategyB => Rgb(0x2e, 0xcc, 0x71),
    }
}

/// One labelled line series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSpec {
    pub label: &'static str,
    pub data: Vec<f64>,
    pub border_color: String,
    pub background_color: String,
    pub tension: f64,
    pub border_width: u8,
    #[serde(skip)]
    pub rgb: Rgb,
}

/// Axis title and scaling options.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisSpec {
    pub title: &'static str,
    pub begin_at_zero: bool,
}

/// Library-neutral description of the comparison line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub kind: &'static str,
    pub title: &'static str,
    pub labels: Vec<String>,
    pub series: Vec<SeriesSpec>,
    pub legend_position: &'static str,
    pub tooltip_mode: &'static str,
    pub tooltip_intersect: bool,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub point_radius: u8,
    pub point_hover_radius: u8,
}

impl ChartSpec {
    /// Builds the three-series comparison chart from generated curves.
    pub fn load_comparison(curves: &LoadCurves) -> Self {
        let series = |scenario: Scenario, data: &[f64]| {
            let rgb = scenario_color(scenario);
            SeriesSpec {
                label: scenario.label(),
                data: data.to_vec(),
                border_color: rgb.hex(),
                background_color: rgb.rgba(0.1),
                tension: 0.4,
                border_width: 3,
                rgb,
            }
        };

        Self {
            kind: "line",
            title: CHART_TITLE,
            labels: curves.labels.clone(),
            series: vec![
                series(Scenario::Baseline, &curves.baseline),
                series(Scenario::StrategyA, &curves.strategy_a),
                series(Scenario::StrategyB, &curves.strategy_b),
            ],
            legend_position: "top",
            tooltip_mode: "index",
            tooltip_intersect: false,
            x_axis: AxisSpec {
                title: X_AXIS_TITLE,
                begin_at_zero: true,
            },
            y_axis: AxisSpec {
                title: Y_AXIS_TITLE,
                begin_at_zero: false,
            },
            point_radius: 4,
            point_hover_radius: 6,
        }
    }

    /// Y bounds across all series with 10% padding.
    pub fn y_bounds(&self) -> [f64; 2] {
        let all = self.series.iter().flat_map(|s| s.data.iter().copied());
        let min = all.clone().fold(f64::INFINITY, f64::min);
        let max = all.fold(f64::NEG_INFINITY, f64::max);
        if !min.is_finite() || !max.is_finite() {
            return [0.0, 1.0];
        }
        let pad = (max - min).max(0.1) * 0.1;
        [min - pad, max + pad]
    }
}

/// A live chart: its spec plus a redraw counter.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartInstance {
    pub spec: ChartSpec,
    revision: u64,
}

impl ChartInstance {
    fn new(spec: ChartSpec) -> Self {
        Self { spec, revision: 0 }
    }

    /// Requests a redraw.
    pub fn update(&mut self) {
        self.revision += 1;
    }

    /// Number of redraws requested since creation.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Result of [`ChartAdapter::ensure_display`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartDisplay {
    /// No container to draw into.
    NoContainer,
    /// No instance yet; the caller should schedule creation.
    CreatePending,
    /// The existing instance was redrawn.
    Redrawn,
}

/// Result of [`ChartAdapter::initialize_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartInit {
    NoContainer,
    Created,
    /// An instance already existed and was redrawn instead.
    Redrawn,
}

/// Owner of the optional chart instance and its container state.
#[derive(Debug, Clone)]
pub struct ChartAdapter {
    instance: Option<ChartInstance>,
    container_present: bool,
    loaded: bool,
    created_count: usize,
}

impl ChartAdapter {
    pub fn new(container_present: bool) -> Self {
        Self {
            instance: None,
            container_present,
            loaded: false,
            created_count: 0,
        }
    }

    pub fn instance(&self) -> Option<&ChartInstance> {
        self.instance.as_ref()
    }

    pub fn has_instance(&self) -> bool {
        self.instance.is_some()
    }

    /// Whether the container has been marked loaded (loading message hidden).
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn container_present(&self) -> bool {
        self.container_present
    }

    /// How many chart instances have been created over the adapter's life.
    pub fn created_count(&self) -> usize {
        self.created_count
    }

    /// Reconciles the displayed chart on entry to the chart step.
    pub fn ensure_display(&mut self) -> ChartDisplay {
        if let Some(instance) = self.instance.as_mut() {
            instance.update();
            self.loaded = self.container_present;
            debug!(revision = instance.revision(), "chart redrawn");
            return ChartDisplay::Redrawn;
        }
        if self.container_present {
            ChartDisplay::CreatePending
        } else {
            ChartDisplay::NoContainer
        }
    }

    /// Creates the chart from freshly generated curves.
    ///
    /// `curves` is only called when a new instance is actually built.
    pub fn initialize_with(&mut self, curves: impl FnOnce() -> LoadCurves) -> ChartInit {
        if !self.container_present {
            return ChartInit::NoContainer;
        }
        if let Some(instance) = self.instance.as_mut() {
            instance.update();
            return ChartInit::Redrawn;
        }
        let spec = ChartSpec::load_comparison(&curves());
        self.instance = Some(ChartInstance::new(spec));
        self.created_count += 1;
        info!(created = self.created_count, "comparison chart created");
        ChartInit::Created
    }

    /// Hides the loading message.
    pub fn mark_loaded(&mut self) {
        if self.container_present {
            self.loaded = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::curve::LoadCurveGenerator;

    fn curves() -> LoadCurves {
        LoadCurveGenerator::seeded(3).generate()
    }

    #[test]
    fn spec_carries_series_styling() {
        let spec = ChartSpec::load_comparison(&curves());
        assert_eq!(spec.series.len(), 3);
        assert_eq!(spec.series[0].label, "Baseline");
        assert_eq!(spec.series[0].border_color, "#e74c3c");
        assert_eq!(spec.series[1].background_color, "rgba(52, 152, 219, 0.1)");
        assert_eq!(spec.series[2].border_color, "#2ecc71");
        assert!(spec.series.iter().all(|s| s.tension == 0.4 && s.border_width == 3));
        assert!(!spec.y_axis.begin_at_zero);
        assert_eq!(spec.labels.len(), 24);
    }

    #[test]
    fn ensure_display_requests_creation_without_instance() {
        let mut adapter = ChartAdapter::new(true);
        assert_eq!(adapter.ensure_display(), ChartDisplay::CreatePending);
        assert!(!adapter.is_loaded());
    }

    #[test]
    fn ensure_display_redraws_existing_instance() {
        let mut adapter = ChartAdapter::new(true);
        adapter.initialize_with(curves);
        assert!(!adapter.is_loaded());

        assert_eq!(adapter.ensure_display(), ChartDisplay::Redrawn);
        assert!(adapter.is_loaded());
        assert_eq!(adapter.instance().map(ChartInstance::revision), Some(1));
    }

    #[test]
    fn initialize_twice_creates_once() {
        let mut adapter = ChartAdapter::new(true);
        assert_eq!(adapter.initialize_with(curves), ChartInit::Created);
        assert_eq!(
            adapter.initialize_with(|| panic!("curves must not be regenerated")),
            ChartInit::Redrawn
        );
        assert_eq!(adapter.created_count(), 1);
    }

    #[test]
    fn missing_container_never_creates() {
        let mut adapter = ChartAdapter::new(false);
        assert_eq!(adapter.ensure_display(), ChartDisplay::NoContainer);
        assert_eq!(adapter.initialize_with(curves), ChartInit::NoContainer);
        adapter.mark_loaded();
        assert!(!adapter.is_loaded());
        assert!(!adapter.has_instance());
    }

    #[test]
    fn y_bounds_pad_the_data_range() {
        let spec = ChartSpec::load_comparison(&curves());
        let [lo, hi] = spec.y_bounds();
        for s in &spec.series {
            assert!(s.data.iter().all(|v| *v > lo && *v < hi));
        }
    }
}
