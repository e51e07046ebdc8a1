use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;

/// Number of hourly samples per curve.
pub const HOURS_PER_DAY: usize = 24;

/// Mean of the baseline load shape (kW).
const BASE_KW: f64 = 200.0;
/// Amplitude of the baseline sinusoid (kW).
const AMP_KW: f64 = 100.0;
/// Upper bound of the uniform jitter added to baseline samples (kW).
const BASELINE_JITTER_KW: f64 = 20.0;
/// Upper bound of the uniform jitter added to strategy samples (kW).
const STRATEGY_JITTER_KW: f64 = 15.0;
/// Scale applied to the baseline to obtain strategy A.
const STRATEGY_A_FACTOR: f64 = 0.8;
/// Scale applied to the baseline to obtain strategy B.
const STRATEGY_B_FACTOR: f64 = 0.75;

/// Synthetic 24-hour load curves for the three compared scenarios.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadCurves {
    /// Hour labels `"0:00"` through `"23:00"`.
    pub labels: Vec<String>,
    /// Baseline load per hour (kW).
    pub baseline: Vec<f64>,
    /// Strategy A load per hour (kW).
    pub strategy_a: Vec<f64>,
    /// Strategy B load per hour (kW).
    pub strategy_b: Vec<f64>,
}

impl LoadCurves {
    /// Returns `(hour, baseline, strategy_a, strategy_b)` rows in hour order.
    pub fn rows(&self) -> impl Iterator<Item = (usize, f64, f64, f64)> + '_ {
        self.baseline
            .iter()
            .zip(&self.strategy_a)
            .zip(&self.strategy_b)
            .enumerate()
            .map(|(h, ((b, a), s))| (h, *b, *a, *s))
    }
}

/// Generator of synthetic daily load curves.
///
/// The baseline follows a sinusoid with one full period per day plus
/// uniform jitter; each strategy is a scaled baseline with independent
/// jitter. Every call to [`LoadCurveGenerator::generate`] draws fresh
/// jitter, so two curves from the same generator differ.
///
/// # Examples
///
/// ```
/// use colab_planner::model::curve::LoadCurveGenerator;
///
/// let mut a = LoadCurveGenerator::seeded(7);
/// let mut b = LoadCurveGenerator::seeded(7);
/// assert_eq!(a.generate(), b.generate());
/// assert_eq!(a.generate().labels[23], "23:00");
/// ```
#[derive(Debug, Clone)]
pub struct LoadCurveGenerator {
    rng: StdRng,
}

impl LoadCurveGenerator {
    /// Creates a reproducible generator from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a generator seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a seeded generator when `seed` is given, otherwise an OS-seeded one.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_os_rng, Self::seeded)
    }

    /// Draws a new set of curves.
    pub fn generate(&mut self) -> LoadCurves {
        generate_with(&mut self.rng)
    }
}

/// Draws curves from any random source.
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> LoadCurves {
    let mut baseline = Vec::with_capacity(HOURS_PER_DAY);
    let mut strategy_a = Vec::with_capacity(HOURS_PER_DAY);
    let mut strategy_b = Vec::with_capacity(HOURS_PER_DAY);

    // All baseline samples first, then the strategies, one draw per sample.
    for h in 0..HOURS_PER_DAY {
        let angle = h as f64 * std::f64::consts::PI / 12.0;
        baseline.push(BASE_KW + angle.sin() * AMP_KW + uniform(rng, BASELINE_JITTER_KW));
    }
    for &b in &baseline {
        strategy_a.push(b * STRATEGY_A_FACTOR + uniform(rng, STRATEGY_JITTER_KW));
    }
    for &b in &baseline {
        strategy_b.push(b * STRATEGY_B_FACTOR + uniform(rng, STRATEGY_JITTER_KW));
    }

    LoadCurves {
        labels: hour_labels(),
        baseline,
        strategy_a,
        strategy_b,
    }
}

/// Hour labels `"0:00"` through `"23:00"`.
pub fn hour_labels() -> Vec<String> {
    (0..HOURS_PER_DAY).map(|h| format!("{h}:00")).collect()
}

/// Uniform draw in `[0, max)`.
fn uniform<R: Rng + ?Sized>(rng: &mut R, max: f64) -> f64 {
    rng.random::<f64>() * max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curves_have_one_sample_per_hour() {
        let curves = LoadCurveGenerator::seeded(1).generate();
        assert_eq!(curves.baseline.len(), HOURS_PER_DAY);
        assert_eq!(curves.strategy_a.len(), HOURS_PER_DAY);
        assert_eq!(curves.strategy_b.len(), HOURS_PER_DAY);
        assert_eq!(curves.labels.len(), HOURS_PER_DAY);
    }

    #[test]
    fn labels_run_in_hour_order() {
        let labels = hour_labels();
        assert_eq!(labels.first().map(String::as_str), Some("0:00"));
        assert_eq!(labels.last().map(String::as_str), Some("23:00"));
        for (h, label) in labels.iter().enumerate() {
            assert_eq!(label, &format!("{h}:00"));
        }
    }

    #[test]
    fn samples_stay_within_jitter_envelope() {
        let mut generator = LoadCurveGenerator::seeded(99);
        for _ in 0..20 {
            let curves = generator.generate();
            for (h, b, a, s) in curves.rows() {
                let shape = BASE_KW + (h as f64 * std::f64::consts::PI / 12.0).sin() * AMP_KW;
                assert!(b >= shape && b < shape + BASELINE_JITTER_KW, "hour {h}");
                assert!(a >= b * STRATEGY_A_FACTOR && a < b * STRATEGY_A_FACTOR + 15.0);
                assert!(s >= b * STRATEGY_B_FACTOR && s < b * STRATEGY_B_FACTOR + 15.0);
            }
        }
    }

    #[test]
    fn seeded_generators_are_reproducible() {
        let a = LoadCurveGenerator::seeded(42).generate();
        let b = LoadCurveGenerator::seeded(42).generate();
        assert_eq!(a, b);
    }

    #[test]
    fn regeneration_draws_fresh_jitter() {
        let mut generator = LoadCurveGenerator::seeded(42);
        let first = generator.generate();
        let second = generator.generate();
        assert_ne!(first.baseline, second.baseline);
        assert_eq!(first.labels, second.labels);
    }
}
