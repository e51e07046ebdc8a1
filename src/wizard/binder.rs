//! Typed form state and the field binder that mirrors labels and reports
//! which derived values an edit invalidates.

use std::fmt;

use chrono::NaiveTime;
use tracing::warn;

use crate::flows::dr::{DrField, DrForm};
use crate::flows::vote::VoteSettings;
use crate::model::dr_event::DrEventType;
use crate::model::kpi::{
    DEFAULT_COMFORT_RANGE_C, DEFAULT_EV_RATIO_PCT, DEFAULT_PARTICIPATION_PCT, StrategyInputs,
};
use crate::model::profile::{CommunityProfile, Tariff};
use crate::wizard::step::Step;

/// Format of the EV schedule time inputs.
pub const TIME_FORMAT: &str = "%H:%M";

/// Every bound input control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Households,
    EvShare,
    PvCapacity,
    BatteryCapacity,
    Tariff,
    EvRatio,
    EvStart,
    EvEnd,
    ComfortRange,
    Participation,
    VoteDeadline,
    VoteSubject,
    VoteThreshold,
    VoteMinParticipation,
    Dr(DrField),
}

/// Input widget behind a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Range input; values are clamped into `min..=max`.
    Slider { min: i64, max: i64 },
    Number,
    /// One of a fixed set of options.
    Choice,
    Time,
    DateTime,
    Text,
}

/// Derived state that must be refreshed after an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    RecomputeKpi,
    RefreshEmailPreview,
    None,
}

/// Result of applying an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// New text of the field's adjacent value label, for sliders.
    pub label: Option<String>,
    pub effect: Effect,
}

impl Field {
    /// Step whose panel hosts the field.
    pub fn step(self) -> Step {
        match self {
            Self::Households | Self::EvShare | Self::PvCapacity | Self::BatteryCapacity | Self::Tariff => {
                Step::CommunityProfile
            }
            Self::EvRatio | Self::EvStart | Self::EvEnd => Step::EvCharging,
            Self::ComfortRange | Self::Participation => Step::ComfortParticipation,
            Self::VoteDeadline | Self::VoteSubject | Self::VoteThreshold | Self::VoteMinParticipation => {
                Step::CommunityVote
            }
            Self::Dr(_) => Step::DemandResponse,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Households => "Households",
            Self::EvShare => "EV share (%)",
            Self::PvCapacity => "PV capacity (kW)",
            Self::BatteryCapacity => "Battery capacity (kWh)",
            Self::Tariff => "Tariff",
            Self::EvRatio => "Flexible EV charging",
            Self::EvStart => "Charging window start",
            Self::EvEnd => "Charging window end",
            Self::ComfortRange => "Comfort range",
            Self::Participation => "DR participation",
            Self::VoteDeadline => "Vote deadline",
            Self::VoteSubject => "Email subject",
            Self::VoteThreshold => "Approval threshold",
            Self::VoteMinParticipation => "Minimum participation",
            Self::Dr(f) => f.label(),
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Self::EvRatio | Self::Participation => FieldKind::Slider { min: 0, max: 100 },
            Self::ComfortRange => FieldKind::Slider { min: 1, max: 5 },
            Self::Households | Self::EvShare | Self::PvCapacity | Self::BatteryCapacity => FieldKind::Number,
            Self::Tariff | Self::Dr(DrField::EventType) => FieldKind::Choice,
            Self::EvStart | Self::EvEnd => FieldKind::Time,
            Self::VoteDeadline | Self::Dr(DrField::StartTime) => FieldKind::DateTime,
            Self::Dr(DrField::Duration | DrField::TargetReduction | DrField::RewardPrice) => FieldKind::Number,
            Self::VoteSubject
            | Self::VoteThreshold
            | Self::VoteMinParticipation
            | Self::Dr(DrField::Name | DrField::Description) => FieldKind::Text,
        }
    }

    /// Fields on `step`, in display order.
    pub fn for_step(step: Step) -> Vec<Self> {
        match step {
            Step::CommunityProfile => vec![
                Self::Households,
                Self::EvShare,
                Self::PvCapacity,
                Self::BatteryCapacity,
                Self::Tariff,
            ],
            Step::EvCharging => vec![Self::EvRatio, Self::EvStart, Self::EvEnd],
            Step::ComfortParticipation => vec![Self::ComfortRange, Self::Participation],
            Step::StrategyComparison => Vec::new(),
            Step::CommunityVote => vec![
                Self::VoteDeadline,
                Self::VoteSubject,
                Self::VoteThreshold,
                Self::VoteMinParticipation,
            ],
            Step::DemandResponse => DrField::ALL.into_iter().map(Self::Dr).collect(),
        }
    }

    fn effect(self) -> Effect {
        match self.step() {
            Step::CommunityProfile | Step::EvCharging | Step::ComfortParticipation => Effect::RecomputeKpi,
            Step::CommunityVote => Effect::RefreshEmailPreview,
            Step::StrategyComparison | Step::DemandResponse => Effect::None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses the leading integer of `raw`, ignoring leading whitespace and any
/// trailing garbage (`"42abc"` is 42, `"4.7"` is 4).
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

fn int_or(raw: &str, fallback: i64) -> i64 {
    parse_int_prefix(raw).unwrap_or(fallback)
}

fn slider_label(field: Field, value: i64) -> Option<String> {
    match field {
        Field::EvRatio | Field::Participation => Some(format!("{value}%")),
        Field::ComfortRange => Some(format!("±{value}°C")),
        _ => None,
    }
}

/// All values entered in the wizard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub community: CommunityProfile,
    pub strategy: StrategyInputs,
    pub vote: VoteSettings,
    pub dr: DrForm,
}

impl FormState {
    /// Writes `raw` into `field` and reports the label text and effect.
    ///
    /// Unparseable integers fall back to the field default. An unparseable
    /// time or an unknown choice keeps the previous value.
    pub fn apply(&mut self, field: Field, raw: &str) -> Binding {
        let defaults = CommunityProfile::default();
        match field {
            Field::Households => self.community.households = int_or(raw, defaults.households),
            Field::EvShare => self.community.ev_share_pct = int_or(raw, defaults.ev_share_pct),
            Field::PvCapacity => self.community.pv_capacity_kw = int_or(raw, defaults.pv_capacity_kw),
            Field::BatteryCapacity => {
                self.community.battery_capacity_kwh = int_or(raw, defaults.battery_capacity_kwh)
            }
            Field::Tariff => match raw.parse::<Tariff>() {
                Ok(tariff) => self.community.tariff = tariff,
                Err(e) => warn!(field = %field, error = %e, "ignoring tariff"),
            },
            Field::EvRatio => self.strategy.ev_ratio_pct = clamp_slider(field, int_or(raw, DEFAULT_EV_RATIO_PCT)),
            Field::Participation => {
                self.strategy.participation_pct = clamp_slider(field, int_or(raw, DEFAULT_PARTICIPATION_PCT))
            }
            Field::ComfortRange => {
                self.strategy.comfort_range_c = clamp_slider(field, int_or(raw, DEFAULT_COMFORT_RANGE_C))
            }
            Field::EvStart => set_time(&mut self.strategy.ev_start, field, raw),
            Field::EvEnd => set_time(&mut self.strategy.ev_end, field, raw),
            Field::VoteDeadline => self.vote.deadline = raw.to_string(),
            Field::VoteSubject => self.vote.subject = raw.to_string(),
            Field::VoteThreshold => self.vote.threshold = raw.to_string(),
            Field::VoteMinParticipation => self.vote.min_participation = raw.to_string(),
            Field::Dr(f) => self.dr.set(f, raw),
        }
        Binding {
            label: self.label_text(field),
            effect: field.effect(),
        }
    }

    /// Current value of `field` as input text.
    pub fn raw_value(&self, field: Field) -> String {
        match field {
            Field::Households => self.community.households.to_string(),
            Field::EvShare => self.community.ev_share_pct.to_string(),
            Field::PvCapacity => self.community.pv_capacity_kw.to_string(),
            Field::BatteryCapacity => self.community.battery_capacity_kwh.to_string(),
            Field::Tariff => self.community.tariff.as_str().to_string(),
            Field::EvRatio => self.strategy.ev_ratio_pct.to_string(),
            Field::Participation => self.strategy.participation_pct.to_string(),
            Field::ComfortRange => self.strategy.comfort_range_c.to_string(),
            Field::EvStart => self.strategy.ev_start.format(TIME_FORMAT).to_string(),
            Field::EvEnd => self.strategy.ev_end.format(TIME_FORMAT).to_string(),
            Field::VoteDeadline => self.vote.deadline.clone(),
            Field::VoteSubject => self.vote.subject.clone(),
            Field::VoteThreshold => self.vote.threshold.clone(),
            Field::VoteMinParticipation => self.vote.min_participation.clone(),
            Field::Dr(f) => self.dr.value(f),
        }
    }

    /// Text of the value label beside a slider.
    pub fn label_text(&self, field: Field) -> Option<String> {
        let value = match field {
            Field::EvRatio => self.strategy.ev_ratio_pct,
            Field::Participation => self.strategy.participation_pct,
            Field::ComfortRange => self.strategy.comfort_range_c,
            _ => return None,
        };
        slider_label(field, value)
    }

    /// Steps a slider or number by `delta`, or cycles a choice by its sign.
    ///
    /// Returns `None` for free-text, time and date fields.
    pub fn nudge(&mut self, field: Field, delta: i64) -> Option<Binding> {
        let raw = match field.kind() {
            FieldKind::Slider { .. } | FieldKind::Number => match field {
                Field::Dr(_) => {
                    let current = self.raw_value(field).trim().parse::<f64>().unwrap_or(0.0);
                    (current + delta as f64).max(0.0).to_string()
                }
                _ => {
                    let current = parse_int_prefix(&self.raw_value(field)).unwrap_or(0);
                    current.saturating_add(delta).max(0).to_string()
                }
            },
            FieldKind::Choice => match field {
                Field::Tariff => self.community.tariff.cycle(delta >= 0).as_str().to_string(),
                Field::Dr(_) => self.dr.event_type.cycle(delta >= 0).as_str().to_string(),
                _ => return None,
            },
            FieldKind::Time | FieldKind::DateTime | FieldKind::Text => return None,
        };
        Some(self.apply(field, &raw))
    }

    /// Event type currently selected in the DR form.
    pub fn dr_event_type(&self) -> DrEventType {
        self.dr.event_type
    }
}

fn clamp_slider(field: Field, value: i64) -> i64 {
    match field.kind() {
        FieldKind::Slider { min, max } => value.clamp(min, max),
        _ => value,
    }
}

fn set_time(slot: &mut NaiveTime, field: Field, raw: &str) {
    match NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT) {
        Ok(time) => *slot = time,
        Err(e) => warn!(field = %field, raw, error = %e, "keeping previous time"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_prefix_matches_lenient_parsing() {
        assert_eq!(parse_int_prefix("42"), Some(42));
        assert_eq!(parse_int_prefix("  42abc"), Some(42));
        assert_eq!(parse_int_prefix("4.7"), Some(4));
        assert_eq!(parse_int_prefix("-15"), Some(-15));
        assert_eq!(parse_int_prefix("+7"), Some(7));
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix("-"), None);
    }

    #[test]
    fn sliders_mirror_labels() {
        let mut form = FormState::default();
        let binding = form.apply(Field::Participation, "45");
        assert_eq!(binding.label.as_deref(), Some("45%"));
        assert_eq!(binding.effect, Effect::RecomputeKpi);
        assert_eq!(form.strategy.participation_pct, 45);

        let binding = form.apply(Field::ComfortRange, "3");
        assert_eq!(binding.label.as_deref(), Some("±3°C"));
    }

    #[test]
    fn unparseable_sliders_fall_back_to_defaults() {
        let mut form = FormState::default();
        form.apply(Field::Participation, "");
        form.apply(Field::EvRatio, "lots");
        form.apply(Field::ComfortRange, "x");
        assert_eq!(form.strategy.participation_pct, 30);
        assert_eq!(form.strategy.ev_ratio_pct, 25);
        assert_eq!(form.strategy.comfort_range_c, 2);
    }

    #[test]
    fn sliders_clamp_to_range() {
        let mut form = FormState::default();
        assert_eq!(form.apply(Field::Participation, "140").label.as_deref(), Some("100%"));
        assert_eq!(form.apply(Field::ComfortRange, "0").label.as_deref(), Some("±1°C"));
    }

    #[test]
    fn bad_time_keeps_previous_value() {
        let mut form = FormState::default();
        form.apply(Field::EvStart, "23:30");
        assert_eq!(form.raw_value(Field::EvStart), "23:30");
        form.apply(Field::EvStart, "late");
        assert_eq!(form.raw_value(Field::EvStart), "23:30");
    }

    #[test]
    fn vote_edits_refresh_preview_and_dr_edits_do_nothing() {
        let mut form = FormState::default();
        assert_eq!(
            form.apply(Field::VoteSubject, "Hello").effect,
            Effect::RefreshEmailPreview
        );
        assert_eq!(form.vote.subject, "Hello");
        let binding = form.apply(Field::Dr(DrField::Name), "Peak");
        assert_eq!(binding, Binding { label: None, effect: Effect::None });
        assert_eq!(form.dr.name, "Peak");
    }

    #[test]
    fn nudge_steps_numbers_and_cycles_choices() {
        let mut form = FormState::default();
        form.nudge(Field::Participation, 5);
        assert_eq!(form.strategy.participation_pct, 35);
        form.nudge(Field::Tariff, 1);
        assert_eq!(form.community.tariff, Tariff::Flat);
        form.nudge(Field::Dr(DrField::EventType), -1);
        assert_eq!(form.dr_event_type(), DrEventType::Emergency);
        assert!(form.nudge(Field::VoteSubject, 1).is_none());
    }

    #[test]
    fn nudge_saturates_huge_numbers() {
        let mut form = FormState::default();
        form.apply(Field::Households, "9223372036854775807");
        form.nudge(Field::Households, 10);
        assert_eq!(form.community.households, i64::MAX);
        form.nudge(Field::Households, -10);
        assert_eq!(form.community.households, i64::MAX - 10);
    }

    #[test]
    fn every_field_belongs_to_its_step() {
        for step in Step::ALL {
            for field in Field::for_step(step) {
                assert_eq!(field.step(), step);
            }
        }
        assert!(Field::for_step(Step::StrategyComparison).is_empty());
    }
}
