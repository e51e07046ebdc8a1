//! Step wizard state machine and its derived view.

use serde::Serialize;
use tracing::debug;

/// Number of wizard steps.
pub const TOTAL_STEPS: usize = 6;
/// Step that hosts the load curve comparison chart.
pub const CHART_STEP: usize = 4;

/// Wizard steps in display order (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Step {
    CommunityProfile = 1,
    EvCharging = 2,
    ComfortParticipation = 3,
    StrategyComparison = 4,
    CommunityVote = 5,
    DemandResponse = 6,
}

impl Step {
    pub const ALL: [Self; TOTAL_STEPS] = [
        Self::CommunityProfile,
        Self::EvCharging,
        Self::ComfortParticipation,
        Self::StrategyComparison,
        Self::CommunityVote,
        Self::DemandResponse,
    ];

    /// Looks up a step by its 1-based number.
    pub fn from_number(n: usize) -> Option<Self> {
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn number(self) -> usize {
        self as usize
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::CommunityProfile => "Community Profile",
            Self::EvCharging => "EV Charging",
            Self::ComfortParticipation => "Comfort & Participation",
            Self::StrategyComparison => "Strategy Comparison",
            Self::CommunityVote => "Community Vote",
            Self::DemandResponse => "Demand Response",
        }
    }
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The wizard moved (or re-entered) `to`.
    Moved { from: usize, to: usize },
    /// The request was out of range and nothing changed.
    Ignored,
}

impl Transition {
    /// Returns `true` when the transition landed on `step`.
    pub fn entered(self, step: usize) -> bool {
        matches!(self, Self::Moved { to, .. } if to == step)
    }
}

/// Current position of the wizard.
///
/// `current` is always within `1..=total`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    current: usize,
    total: usize,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new(TOTAL_STEPS)
    }
}

impl WizardState {
    /// Creates a wizard with `total` steps positioned on step 1.
    ///
    /// # Panics
    ///
    /// Panics if `total` is zero.
    pub fn new(total: usize) -> Self {
        assert!(total > 0, "wizard needs at least one step");
        Self { current: 1, total }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// The named step for the current position, if it is one of [`Step::ALL`].
    pub fn step(&self) -> Option<Step> {
        Step::from_number(self.current)
    }

    /// Advances one step; a no-op on the last step.
    pub fn next(&mut self) -> Transition {
        if self.current < self.total {
            self.move_to(self.current + 1)
        } else {
            debug!(step = self.current, "next ignored on last step");
            Transition::Ignored
        }
    }

    /// Goes back one step; a no-op on the first step.
    pub fn previous(&mut self) -> Transition {
        if self.current > 1 {
            self.move_to(self.current - 1)
        } else {
            debug!("previous ignored on first step");
            Transition::Ignored
        }
    }

    /// Jumps to step `n`; a no-op when `n` is outside `1..=total`.
    pub fn go_to(&mut self, n: usize) -> Transition {
        if (1..=self.total).contains(&n) {
            self.move_to(n)
        } else {
            debug!(requested = n, total = self.total, "go_to out of range ignored");
            Transition::Ignored
        }
    }

    fn move_to(&mut self, to: usize) -> Transition {
        let from = self.current;
        self.current = to;
        debug!(from, to, "wizard step changed");
        Transition::Moved { from, to }
    }

    /// Derives panel visibility, indicator and navigation state.
    pub fn view(&self) -> StepView {
        StepView {
            panels: (1..=self.total).map(|i| i == self.current).collect(),
            indicators: (1..=self.total).map(|i| i <= self.current).collect(),
            previous_enabled: self.current != 1,
            next_visible: self.current != self.total,
        }
    }
}

/// Presentation state derived from [`WizardState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    /// Visibility per step panel; exactly one entry is `true`.
    pub panels: Vec<bool>,
    /// Indicator activity per step; active for every step up to the current one.
    pub indicators: Vec<bool>,
    pub previous_enabled: bool,
    pub next_visible: bool,
}

impl StepView {
    /// 1-based number of the visible panel.
    pub fn visible_panel(&self) -> Option<usize> {
        self.panels.iter().position(|v| *v).map(|i| i + 1)
    }
}
