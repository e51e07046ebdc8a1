//! Demand-response event form, preview and the simulated create flow.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDateTime, Timelike, Utc};
use serde::Serialize;

use crate::error::FlowError;
use crate::model::dr_event::{DrEvent, DrEventType, expected_revenue};

pub const MSG_PREVIEWED: &str = "DR Event preview generated successfully";
pub const MSG_CREATING: &str = "Creating DR Event...";
pub const MSG_CREATED: &str = "DR Event created successfully!";

/// Format of the start-time field (`datetime-local`).
pub const START_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Duration preselected in a fresh form (hours).
const DEFAULT_DURATION_HOURS: &str = "2";

/// Fields of the DR event form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DrField {
    Name,
    EventType,
    StartTime,
    Duration,
    TargetReduction,
    RewardPrice,
    Description,
}

impl DrField {
    pub const ALL: [Self; 7] = [
        Self::Name,
        Self::EventType,
        Self::StartTime,
        Self::Duration,
        Self::TargetReduction,
        Self::RewardPrice,
        Self::Description,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Event name",
            Self::EventType => "Event type",
            Self::StartTime => "Start time",
            Self::Duration => "Duration (h)",
            Self::TargetReduction => "Target reduction (kW)",
            Self::RewardPrice => "Reward price ($/kWh)",
            Self::Description => "Description",
        }
    }

    pub fn required(self) -> bool {
        matches!(
            self,
            Self::Name | Self::StartTime | Self::TargetReduction | Self::RewardPrice
        )
    }
}

/// Validation state of a single field, as shown when it loses focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    Ok,
    MissingRequired,
}

/// Raw DR event form values.
#[derive(Debug, Clone, PartialEq)]
pub struct DrForm {
    pub name: String,
    pub event_type: DrEventType,
    pub start_time: String,
    pub duration: String,
    pub target_reduction: String,
    pub reward_price: String,
    pub description: String,
}

impl Default for DrForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            event_type: DrEventType::default(),
            start_time: String::new(),
            duration: DEFAULT_DURATION_HOURS.to_string(),
            target_reduction: String::new(),
            reward_price: String::new(),
            description: String::new(),
        }
    }
}

/// Default start time: the top of the hour after `now`, in UTC.
pub fn default_start_time(now: DateTime<Utc>) -> String {
    let next = now.checked_add_signed(Duration::hours(1)).unwrap_or(now);
    next.with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(next)
        .format(START_TIME_FORMAT)
        .to_string()
}

/// Validated, parsed form values awaiting creation.
#[derive(Debug, Clone, PartialEq)]
pub struct DrSubmission {
    pub name: String,
    pub event_type: DrEventType,
    pub start: NaiveDateTime,
    pub duration_hours: f64,
    pub target_reduction_kw: f64,
    pub reward_price: f64,
    pub description: String,
}

impl DrSubmission {
    pub fn expected_revenue(&self) -> f64 {
        expected_revenue(self.target_reduction_kw, self.duration_hours, self.reward_price)
    }

    /// Turns the submission into a stored event with identifier `id`.
    pub fn into_event(self, id: String) -> DrEvent {
        DrEvent {
            id,
            name: self.name,
            event_type: self.event_type,
            start: self.start,
            duration_hours: self.duration_hours,
            target_reduction_kw: self.target_reduction_kw,
            reward_price: self.reward_price,
            description: self.description,
        }
    }
}

/// Summary produced by the preview action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrPreview {
    pub name: String,
    pub event_type: DrEventType,
    pub duration_hours: f64,
    pub target_reduction_kw: f64,
    /// Expected revenue with two decimals.
    pub expected_revenue: String,
    pub description: String,
}

impl fmt::Display for DrPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DR Event Preview:")?;
        writeln!(f, "- Name: {}", self.name)?;
        writeln!(f, "- Type: {}", self.event_type)?;
        writeln!(f, "- Duration: {} hours", self.duration_hours)?;
        writeln!(f, "- Target Reduction: {} kW", self.target_reduction_kw)?;
        writeln!(f, "- Expected Revenue: ${}", self.expected_revenue)?;
        write!(f, "- Description: {}", self.description)
    }
}

impl DrForm {
    /// Fresh form with the start time preset relative to `now`.
    pub fn with_default_start(now: DateTime<Utc>) -> Self {
        Self {
            start_time: default_start_time(now),
            ..Self::default()
        }
    }

    /// Raw text of `field`.
    pub fn value(&self, field: DrField) -> String {
        match field {
            DrField::Name => self.name.clone(),
            DrField::EventType => self.event_type.as_str().to_string(),
            DrField::StartTime => self.start_time.clone(),
            DrField::Duration => self.duration.clone(),
            DrField::TargetReduction => self.target_reduction.clone(),
            DrField::RewardPrice => self.reward_price.clone(),
            DrField::Description => self.description.clone(),
        }
    }

    /// Writes raw text into `field`. An unknown event type is ignored.
    pub fn set(&mut self, field: DrField, raw: &str) {
        match field {
            DrField::Name => self.name = raw.to_string(),
            DrField::EventType => {
                if let Ok(t) = raw.parse() {
                    self.event_type = t;
                }
            }
            DrField::StartTime => self.start_time = raw.to_string(),
            DrField::Duration => self.duration = raw.to_string(),
            DrField::TargetReduction => self.target_reduction = raw.to_string(),
            DrField::RewardPrice => self.reward_price = raw.to_string(),
            DrField::Description => self.description = raw.to_string(),
        }
    }

    pub fn field_status(&self, field: DrField) -> FieldStatus {
        if field.required() && self.value(field).trim().is_empty() {
            FieldStatus::MissingRequired
        } else {
            FieldStatus::Ok
        }
    }

    /// Labels of empty required fields, in form order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        DrField::ALL
            .into_iter()
            .filter(|f| self.field_status(*f) == FieldStatus::MissingRequired)
            .map(DrField::label)
            .collect()
    }

    /// Validates and parses the form.
    ///
    /// # Errors
    ///
    /// `MissingFields` when a required field is empty, `InvalidValue` when a
    /// number or the start time does not parse.
    pub fn submission(&self) -> Result<DrSubmission, FlowError> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(FlowError::MissingFields { fields: missing });
        }

        let start = NaiveDateTime::parse_from_str(self.start_time.trim(), START_TIME_FORMAT)
            .map_err(|_| FlowError::InvalidValue {
                field: DrField::StartTime.label(),
                value: self.start_time.clone(),
                expected: "a YYYY-MM-DDTHH:MM time",
            })?;

        Ok(DrSubmission {
            name: self.name.trim().to_string(),
            event_type: self.event_type,
            start,
            duration_hours: parse_number(DrField::Duration, &self.duration)?,
            target_reduction_kw: parse_number(DrField::TargetReduction, &self.target_reduction)?,
            reward_price: parse_number(DrField::RewardPrice, &self.reward_price)?,
            description: self.description.clone(),
        })
    }

    /// Validates the form and summarises it.
    ///
    /// # Errors
    ///
    /// Same as [`DrForm::submission`].
    pub fn preview(&self) -> Result<DrPreview, FlowError> {
        let sub = self.submission()?;
        Ok(DrPreview {
            expected_revenue: format!("{:.2}", sub.expected_revenue()),
            name: sub.name,
            event_type: sub.event_type,
            duration_hours: sub.duration_hours,
            target_reduction_kw: sub.target_reduction_kw,
            description: sub.description,
        })
    }

    /// Clears the per-event fields; type and duration are kept.
    pub fn clear_after_create(&mut self) {
        self.name.clear();
        self.start_time.clear();
        self.target_reduction.clear();
        self.reward_price.clear();
        self.description.clear();
    }
}

/// Empty optional numbers count as zero.
fn parse_number(field: DrField, raw: &str) -> Result<f64, FlowError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FlowError::InvalidValue {
            field: field.label(),
            value: raw.to_string(),
            expected: "a number",
        })
}

/// Follow-up actions on an existing event or settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrAction {
    ViewDetails(String),
    Manage(String),
    Edit(String),
    ViewSettlement(String),
}

impl DrAction {
    /// Info message shown for the action.
    pub fn message(&self) -> String {
        match self {
            Self::ViewDetails(id) => format!("Viewing details for DR Event {id}"),
            Self::Manage(id) => format!("Managing DR Event {id}"),
            Self::Edit(id) => format!("Editing DR Event {id}"),
            Self::ViewSettlement(id) => format!("Viewing settlement {id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn filled() -> DrForm {
        DrForm {
            name: "Evening peak".to_string(),
            start_time: "2026-07-01T17:00".to_string(),
            target_reduction: "40".to_string(),
            reward_price: "0.5".to_string(),
            duration: "3".to_string(),
            description: "Heatwave".to_string(),
            ..DrForm::default()
        }
    }

    #[test]
    fn default_start_is_next_full_hour_utc() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 14, 37, 12).unwrap();
        assert_eq!(default_start_time(now), "2026-10-19T15:00");

        let late = Utc.with_ymd_and_hms(2026, 12, 31, 23, 5, 0).unwrap();
        assert_eq!(default_start_time(late), "2027-01-01T00:00");
    }

    #[test]
    fn missing_required_fields_are_reported_in_order() {
        let form = DrForm::default();
        assert_eq!(
            form.missing_required(),
            vec![
                "Event name",
                "Start time",
                "Target reduction (kW)",
                "Reward price ($/kWh)"
            ]
        );
        assert_eq!(form.field_status(DrField::Description), FieldStatus::Ok);
        assert_eq!(
            form.field_status(DrField::Name),
            FieldStatus::MissingRequired
        );
    }

    #[test]
    fn preview_computes_revenue() {
        let preview = filled().preview().unwrap();
        assert_eq!(preview.expected_revenue, "60.00");
        let text = preview.to_string();
        assert!(text.contains("- Expected Revenue: $60.00"));
        assert!(text.contains("- Type: peak-reduction"));
    }

    #[test]
    fn non_numeric_target_is_invalid() {
        let form = DrForm {
            target_reduction: "lots".to_string(),
            ..filled()
        };
        assert!(matches!(
            form.submission(),
            Err(FlowError::InvalidValue { field: "Target reduction (kW)", .. })
        ));
    }

    #[test]
    fn empty_duration_counts_as_zero() {
        let form = DrForm {
            duration: String::new(),
            ..filled()
        };
        assert_eq!(form.preview().unwrap().expected_revenue, "0.00");
    }

    #[test]
    fn clear_keeps_type_and_duration() {
        let mut form = DrForm {
            event_type: DrEventType::Emergency,
            ..filled()
        };
        form.clear_after_create();
        assert!(form.name.is_empty() && form.start_time.is_empty());
        assert!(form.target_reduction.is_empty() && form.reward_price.is_empty());
        assert!(form.description.is_empty());
        assert_eq!(form.event_type, DrEventType::Emergency);
        assert_eq!(form.duration, "3");
    }

    #[test]
    fn action_messages_name_the_target() {
        assert_eq!(
            DrAction::ViewDetails("DR-001".to_string()).message(),
            "Viewing details for DR Event DR-001"
        );
        assert_eq!(
            DrAction::ViewSettlement("ST-7".to_string()).message(),
            "Viewing settlement ST-7"
        );
    }
}
