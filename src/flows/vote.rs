//! Community vote settings, email preview and the simulated launch flow.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{FlowError, StoreError};
use crate::flows::store::KeyValueStore;

/// Storage key of the single saved draft.
pub const DRAFT_KEY: &str = "voteDraft";

/// Subject shown in the preview when none is entered.
pub const DEFAULT_SUBJECT: &str = "Community Energy Strategy Vote";
/// Approval threshold shown in the preview when none is entered.
pub const DEFAULT_THRESHOLD: &str = "60%";
/// Minimum participation shown in the preview when none is entered.
pub const DEFAULT_MIN_PARTICIPATION: &str = "40%";

pub const MSG_SENDING: &str = "Sending vote emails...";
pub const MSG_LAUNCHED: &str = "Vote launched successfully! Emails sent to residents.";
pub const MSG_DRAFT_SAVED: &str = "Draft saved successfully!";
pub const MSG_LINK_COPIED: &str = "Vote link copied to clipboard!";
pub const MSG_LINK_FAILED: &str = "Failed to copy link";

/// Raw vote settings as entered; also the shape of a saved draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteSettings {
    /// `YYYY-MM-DDTHH:MM` local deadline.
    pub deadline: String,
    pub subject: String,
    pub threshold: String,
    pub min_participation: String,
}

/// A saved snapshot of [`VoteSettings`]; never validated.
pub type VoteDraft = VoteSettings;

impl VoteSettings {
    /// Labels of required fields that are empty. Whitespace counts as a value.
    pub fn missing_for_launch(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.deadline.is_empty() {
            missing.push("Vote deadline");
        }
        if self.subject.is_empty() {
            missing.push("Email subject");
        }
        missing
    }
}

/// Formats a `datetime-local` value the way an en-US locale renders it.
///
/// Returns `"Invalid Date"` when the value cannot be parsed.
pub fn format_deadline(raw: &str) -> String {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_or_else(
            |_| "Invalid Date".to_string(),
            |dt| dt.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
        )
}

/// Text shown in the invitation email preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailPreview {
    /// Rendered deadline; `None` until a deadline has been entered.
    pub deadline: Option<String>,
    pub subject: String,
    pub threshold: String,
    pub min_participation: String,
}

impl Default for EmailPreview {
    fn default() -> Self {
        Self {
            deadline: None,
            subject: DEFAULT_SUBJECT.to_string(),
            threshold: DEFAULT_THRESHOLD.to_string(),
            min_participation: DEFAULT_MIN_PARTICIPATION.to_string(),
        }
    }
}

impl EmailPreview {
    /// Rewrites the preview from `settings`.
    ///
    /// Empty fields fall back to the defaults; an empty deadline keeps the
    /// previously rendered one.
    pub fn refresh(&mut self, settings: &VoteSettings) {
        let or_default = |value: &str, default: &str| {
            if value.is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        };
        if !settings.deadline.is_empty() {
            self.deadline = Some(format_deadline(&settings.deadline));
        }
        self.subject = or_default(&settings.subject, DEFAULT_SUBJECT);
        self.threshold = or_default(&settings.threshold, DEFAULT_THRESHOLD);
        self.min_participation = or_default(&settings.min_participation, DEFAULT_MIN_PARTICIPATION);
    }
}

/// Where the launch flow stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum VotePhase {
    #[default]
    Editing,
    /// Emails are "being sent"; completion is pending on the timer queue.
    Sending,
    Launched,
}

/// Running vote counts shown once the vote is live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VoteTally {
    pub approve: u32,
    pub oppose: u32,
    pub participation: u32,
}

/// Visibility of the vote step's panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VotePanels {
    pub settings: bool,
    pub preview: bool,
    pub actions: bool,
    pub status: bool,
}

/// State of the vote launch flow.
#[derive(Debug, Clone, Default)]
pub struct VoteFlow {
    phase: VotePhase,
    preview: EmailPreview,
    tally: VoteTally,
}

impl VoteFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> VotePhase {
        self.phase
    }

    pub fn preview(&self) -> &EmailPreview {
        &self.preview
    }

    pub fn tally(&self) -> VoteTally {
        self.tally
    }

    pub fn refresh_preview(&mut self, settings: &VoteSettings) {
        self.preview.refresh(settings);
    }

    /// Validates `settings` and moves to [`VotePhase::Sending`].
    ///
    /// # Errors
    ///
    /// `MissingFields` when the deadline or subject is empty, `InProgress`
    /// while a launch is pending and `Completed` once launched. Nothing
    /// changes on error.
    pub fn begin_launch(&mut self, settings: &VoteSettings) -> Result<(), FlowError> {
        match self.phase {
            VotePhase::Sending => return Err(FlowError::InProgress("Vote launch")),
            VotePhase::Launched => return Err(FlowError::Completed("Vote launch")),
            VotePhase::Editing => {}
        }
        let missing = settings.missing_for_launch();
        if !missing.is_empty() {
            return Err(FlowError::MissingFields { fields: missing });
        }
        self.phase = VotePhase::Sending;
        info!(subject = %settings.subject, deadline = %settings.deadline, "vote launch started");
        Ok(())
    }

    /// Marks the pending launch as delivered.
    pub fn complete_launch(&mut self) {
        if self.phase == VotePhase::Sending {
            self.phase = VotePhase::Launched;
            info!("vote launched");
        }
    }

    /// Settings, preview and actions are shown until launch; status after.
    pub fn panels(&self) -> VotePanels {
        let launched = self.phase == VotePhase::Launched;
        VotePanels {
            settings: !launched,
            preview: !launched,
            actions: !launched,
            status: launched,
        }
    }
}

/// Writes `settings` verbatim under [`DRAFT_KEY`], replacing any prior draft.
///
/// # Errors
///
/// Returns a `StoreError` if serialization or the store write fails.
pub fn save_draft(store: &mut dyn KeyValueStore, settings: &VoteDraft) -> Result<(), StoreError> {
    let json = serde_json::to_string(settings)?;
    store.set(DRAFT_KEY, json)?;
    info!(key = DRAFT_KEY, "vote draft saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::store::MemoryStore;

    fn filled() -> VoteSettings {
        VoteSettings {
            deadline: "2026-10-19T17:00".to_string(),
            subject: "Pick a strategy".to_string(),
            threshold: "55%".to_string(),
            min_participation: String::new(),
        }
    }

    #[test]
    fn deadline_renders_en_us() {
        assert_eq!(format_deadline("2026-10-19T17:00"), "10/19/2026, 5:00:00 PM");
        assert_eq!(format_deadline("2026-01-05T00:30"), "1/5/2026, 12:30:00 AM");
        assert_eq!(format_deadline("tomorrow"), "Invalid Date");
    }

    #[test]
    fn preview_falls_back_to_defaults() {
        let mut preview = EmailPreview::default();
        preview.refresh(&VoteSettings::default());
        assert_eq!(preview.subject, DEFAULT_SUBJECT);
        assert_eq!(preview.threshold, DEFAULT_THRESHOLD);
        assert_eq!(preview.min_participation, DEFAULT_MIN_PARTICIPATION);
        assert_eq!(preview.deadline, None);

        preview.refresh(&filled());
        assert_eq!(preview.subject, "Pick a strategy");
        assert_eq!(preview.threshold, "55%");
        assert_eq!(preview.min_participation, DEFAULT_MIN_PARTICIPATION);
        assert_eq!(preview.deadline.as_deref(), Some("10/19/2026, 5:00:00 PM"));
    }

    #[test]
    fn empty_deadline_keeps_previous_preview() {
        let mut preview = EmailPreview::default();
        preview.refresh(&filled());
        preview.refresh(&VoteSettings {
            deadline: String::new(),
            ..filled()
        });
        assert_eq!(preview.deadline.as_deref(), Some("10/19/2026, 5:00:00 PM"));
    }

    #[test]
    fn launch_without_subject_changes_nothing() {
        let mut flow = VoteFlow::new();
        let settings = VoteSettings {
            subject: String::new(),
            ..filled()
        };
        let err = flow.begin_launch(&settings).unwrap_err();
        assert_eq!(
            err,
            FlowError::MissingFields {
                fields: vec!["Email subject"]
            }
        );
        assert_eq!(flow.phase(), VotePhase::Editing);
        assert!(flow.panels().settings);
        assert!(!flow.panels().status);
    }

    #[test]
    fn whitespace_subject_is_a_value() {
        let settings = VoteSettings {
            subject: "   ".to_string(),
            ..filled()
        };
        assert!(settings.missing_for_launch().is_empty());

        let settings = VoteSettings {
            deadline: String::new(),
            subject: String::new(),
            ..filled()
        };
        assert_eq!(
            settings.missing_for_launch(),
            ["Vote deadline", "Email subject"]
        );
    }

    #[test]
    fn launch_moves_through_phases() {
        let mut flow = VoteFlow::new();
        flow.begin_launch(&filled()).unwrap();
        assert_eq!(flow.phase(), VotePhase::Sending);
        assert_eq!(
            flow.begin_launch(&filled()),
            Err(FlowError::InProgress("Vote launch"))
        );

        flow.complete_launch();
        let panels = flow.panels();
        assert!(!panels.settings && !panels.preview && !panels.actions);
        assert!(panels.status);
        assert_eq!(flow.tally(), VoteTally::default());
    }

    #[test]
    fn draft_is_stored_as_camel_case_json() {
        let mut store = MemoryStore::new();
        save_draft(&mut store, &filled()).unwrap();
        let raw = store.get(DRAFT_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["subject"], "Pick a strategy");
        assert_eq!(value["minParticipation"], "");
        let back: VoteDraft = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, filled());
    }
}
