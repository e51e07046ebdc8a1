//! Application state and the controller every user action goes through.
//!
//! [`App`] owns all wizard state. User input arrives as [`Action`]s via
//! [`App::dispatch`]; simulated delays are scheduled on a virtual clock and
//! fire from [`App::advance_to`]. Front-ends render from the accessors and
//! never mutate state directly.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::config::PlannerConfig;
use crate::error::{FlowError, PlannerError, Result};
use crate::flows::MSG_MISSING_FIELDS;
use crate::flows::clipboard::Clipboard;
use crate::flows::dr::{self, DrAction, DrForm, DrPreview, DrSubmission};
use crate::flows::notify::{Level, Notification, Notifier};
use crate::flows::store::KeyValueStore;
use crate::flows::vote::{self, VoteFlow};
use crate::model::curve::{LoadCurveGenerator, LoadCurves};
use crate::model::dr_event::DrEvent;
use crate::model::kpi::{KpiPanel, Projection, project};
use crate::wizard::binder::{Effect, Field, FormState};
use crate::wizard::chart::{ChartAdapter, ChartDisplay, ChartInit};
use crate::wizard::step::{CHART_STEP, StepView, Transition, WizardState};
use crate::wizard::timers::{Millis, Timers};

/// A user intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Next,
    Previous,
    GoTo(usize),
    /// Replace the raw text of a field.
    Edit { field: Field, raw: String },
    /// Step a number or slider, or cycle a choice.
    Nudge { field: Field, delta: i64 },
    LaunchVote,
    PreviewEmail,
    SaveDraft,
    CopyLink,
    PreviewDrEvent,
    CreateDrEvent,
    DrEvent(DrAction),
}

/// Identity of a deferred task; at most one per key is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKey {
    ChartReconcile,
    ChartCreate,
    VoteSent,
    DrEventCreated,
}

#[derive(Debug, Clone)]
enum Deferred {
    ChartReconcile,
    ChartCreate,
    VoteSent,
    DrEventCreated(DrSubmission),
}

/// The whole planner: wizard, form, derived values, flows and timers.
pub struct App {
    config: PlannerConfig,
    now: Millis,
    wizard: WizardState,
    form: FormState,
    projection: Projection,
    kpi: KpiPanel,
    generator: LoadCurveGenerator,
    curves: Option<LoadCurves>,
    chart: ChartAdapter,
    vote: VoteFlow,
    dr_events: Vec<DrEvent>,
    last_dr_preview: Option<DrPreview>,
    notifier: Notifier,
    timers: Timers<TaskKey, Deferred>,
    store: Box<dyn KeyValueStore>,
    clipboard: Box<dyn Clipboard>,
}

impl App {
    /// Creates the planner on step 1 with the current wall-clock time.
    pub fn new(
        config: PlannerConfig,
        store: Box<dyn KeyValueStore>,
        clipboard: Box<dyn Clipboard>,
    ) -> Self {
        Self::with_now(config, store, clipboard, Utc::now())
    }

    /// Like [`App::new`] with an explicit wall-clock time, which seeds the
    /// default DR start time.
    pub fn with_now(
        config: PlannerConfig,
        store: Box<dyn KeyValueStore>,
        clipboard: Box<dyn Clipboard>,
        wall_clock: DateTime<Utc>,
    ) -> Self {
        let form = FormState {
            community: config.community.clone(),
            strategy: config.strategy.to_inputs(),
            dr: DrForm::with_default_start(wall_clock),
            ..FormState::default()
        };
        let projection = project(&form.strategy);
        let mut kpi = KpiPanel::default();
        kpi.update(&projection);

        let mut app = Self {
            generator: LoadCurveGenerator::from_seed_option(config.chart.seed),
            chart: ChartAdapter::new(config.chart.container),
            notifier: Notifier::new(config.timing.toast_ms),
            config,
            now: 0,
            wizard: WizardState::default(),
            form,
            projection,
            kpi,
            curves: None,
            vote: VoteFlow::new(),
            dr_events: Vec::new(),
            last_dr_preview: None,
            timers: Timers::new(),
            store,
            clipboard,
        };
        if app.config.chart.eager_init {
            app.create_chart();
        }
        info!(
            step = app.wizard.current(),
            participation = app.form.strategy.participation_pct,
            "planner ready"
        );
        app
    }

    /// Applies a user action. Failures become toasts; nothing is returned.
    pub fn dispatch(&mut self, action: Action) {
        debug!(?action, "dispatch");
        let result = match action {
            Action::Next => {
                let t = self.wizard.next();
                self.after_transition(t);
                Ok(())
            }
            Action::Previous => {
                let t = self.wizard.previous();
                self.after_transition(t);
                Ok(())
            }
            Action::GoTo(n) => {
                let t = self.wizard.go_to(n);
                self.after_transition(t);
                Ok(())
            }
            Action::Edit { field, raw } => {
                let binding = self.form.apply(field, &raw);
                self.apply_effect(binding.effect);
                Ok(())
            }
            Action::Nudge { field, delta } => {
                if let Some(binding) = self.form.nudge(field, delta) {
                    self.apply_effect(binding.effect);
                }
                Ok(())
            }
            Action::LaunchVote => self.launch_vote(),
            Action::PreviewEmail => {
                self.vote.refresh_preview(&self.form.vote);
                Ok(())
            }
            Action::SaveDraft => self.save_draft(),
            Action::CopyLink => self.copy_link(),
            Action::PreviewDrEvent => self.preview_dr_event(),
            Action::CreateDrEvent => self.create_dr_event(),
            Action::DrEvent(action) => {
                self.toast(Level::Info, action.message());
                Ok(())
            }
        };
        if let Err(err) = result {
            self.report(err);
        }
    }

    /// Catch-all for failures no flow anticipates: logs and shows an error
    /// toast. Nothing is retried.
    pub fn handle_error(&mut self, err: &PlannerError, context: &str) {
        error!(error = %err, context, "unhandled failure");
        self.toast(Level::Error, format!("{context}: {err}"));
    }

    /// Moves the clock forward to `now`, firing every task due on the way in
    /// due-time order.
    pub fn advance_to(&mut self, now: Millis) {
        while let Some((due, key, task)) = self.timers.pop_due(now) {
            self.now = self.now.max(due);
            debug!(?key, due, "deferred task fired");
            self.run(task);
        }
        self.now = self.now.max(now);
        self.notifier.prune(self.now);
    }

    pub fn advance_by(&mut self, ms: Millis) {
        self.advance_to(self.now.saturating_add(ms));
    }

    /// Runs the clock until no deferred work is pending.
    pub fn settle(&mut self) {
        while let Some(due) = self.timers.next_due() {
            self.advance_to(due);
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn wizard(&self) -> &WizardState {
        &self.wizard
    }

    pub fn view(&self) -> StepView {
        self.wizard.view()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Slider value label as last mirrored by the binder.
    pub fn label(&self, field: Field) -> Option<String> {
        self.form.label_text(field)
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn kpi(&self) -> &KpiPanel {
        &self.kpi
    }

    pub fn chart(&self) -> &ChartAdapter {
        &self.chart
    }

    /// Curves behind the current chart instance.
    pub fn curves(&self) -> Option<&LoadCurves> {
        self.curves.as_ref()
    }

    pub fn vote(&self) -> &VoteFlow {
        &self.vote
    }

    pub fn dr_events(&self) -> &[DrEvent] {
        &self.dr_events
    }

    pub fn last_dr_preview(&self) -> Option<&DrPreview> {
        self.last_dr_preview.as_ref()
    }

    pub fn toasts(&self) -> &[Notification] {
        self.notifier.toasts()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn is_pending(&self, key: TaskKey) -> bool {
        self.timers.is_pending(key)
    }

    /// Number of deferred tasks waiting to fire.
    pub fn pending_tasks(&self) -> usize {
        self.timers.len()
    }

    pub fn clipboard_contents(&self) -> Option<&str> {
        self.clipboard.contents()
    }

    fn after_transition(&mut self, transition: Transition) {
        if transition.entered(CHART_STEP) {
            let due = self.due_in(self.config.timing.chart_settle_ms);
            if self
                .timers
                .schedule(TaskKey::ChartReconcile, due, Deferred::ChartReconcile)
            {
                debug!(due, "pending chart reconcile superseded");
            }
        }
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::RecomputeKpi => {
                self.projection = project(&self.form.strategy);
                self.kpi.update(&self.projection);
            }
            Effect::RefreshEmailPreview => self.vote.refresh_preview(&self.form.vote),
            Effect::None => {}
        }
    }

    fn run(&mut self, task: Deferred) {
        match task {
            Deferred::ChartReconcile => {
                if self.wizard.current() != CHART_STEP {
                    debug!(step = self.wizard.current(), "chart step left before reconcile");
                    return;
                }
                match self.chart.ensure_display() {
                    ChartDisplay::NoContainer => debug!("no chart container"),
                    ChartDisplay::CreatePending => {
                        let due = self.due_in(self.config.timing.chart_settle_ms);
                        self.timers.schedule(TaskKey::ChartCreate, due, Deferred::ChartCreate);
                    }
                    ChartDisplay::Redrawn => {}
                }
            }
            Deferred::ChartCreate => {
                if self.create_chart() != ChartInit::NoContainer {
                    self.chart.mark_loaded();
                }
            }
            Deferred::VoteSent => {
                self.vote.complete_launch();
                self.toast(Level::Success, vote::MSG_LAUNCHED);
            }
            Deferred::DrEventCreated(submission) => {
                let id = DrEvent::id_for(self.dr_events.len() + 1);
                info!(%id, name = %submission.name, "DR event created");
                self.dr_events.push(submission.into_event(id));
                self.form.dr.clear_after_create();
                self.toast(Level::Success, dr::MSG_CREATED);
            }
        }
    }

    fn create_chart(&mut self) -> ChartInit {
        self.chart.initialize_with(|| {
            let curves = self.generator.generate();
            self.curves = Some(curves.clone());
            curves
        })
    }

    fn launch_vote(&mut self) -> Result<()> {
        self.vote.begin_launch(&self.form.vote)?;
        self.toast(Level::Info, vote::MSG_SENDING);
        let due = self.due_in(self.config.timing.submit_latency_ms);
        self.timers.schedule(TaskKey::VoteSent, due, Deferred::VoteSent);
        Ok(())
    }

    fn save_draft(&mut self) -> Result<()> {
        vote::save_draft(self.store.as_mut(), &self.form.vote)?;
        self.toast(Level::Success, vote::MSG_DRAFT_SAVED);
        Ok(())
    }

    fn copy_link(&mut self) -> Result<()> {
        self.clipboard.write_text(&self.config.vote.link)?;
        self.toast(Level::Success, vote::MSG_LINK_COPIED);
        Ok(())
    }

    fn preview_dr_event(&mut self) -> Result<()> {
        let preview = self.form.dr.preview()?;
        info!(preview = %preview, "DR event preview");
        self.last_dr_preview = Some(preview);
        self.toast(Level::Success, dr::MSG_PREVIEWED);
        Ok(())
    }

    fn create_dr_event(&mut self) -> Result<()> {
        if self.timers.is_pending(TaskKey::DrEventCreated) {
            return Err(FlowError::InProgress("DR event creation").into());
        }
        let submission = self.form.dr.submission()?;
        self.toast(Level::Info, dr::MSG_CREATING);
        let due = self.due_in(self.config.timing.submit_latency_ms);
        self.timers.schedule(
            TaskKey::DrEventCreated,
            due,
            Deferred::DrEventCreated(submission),
        );
        Ok(())
    }

    fn report(&mut self, err: PlannerError) {
        match &err {
            PlannerError::Flow(FlowError::MissingFields { fields }) => {
                warn!(?fields, "required fields missing");
                self.toast(Level::Error, MSG_MISSING_FIELDS);
            }
            PlannerError::Flow(e @ FlowError::InvalidValue { .. }) => {
                warn!(error = %e, "invalid field value");
                self.toast(Level::Error, e.to_string());
            }
            PlannerError::Flow(e @ (FlowError::InProgress(_) | FlowError::Completed(_))) => {
                debug!(error = %e, "submit ignored");
                self.toast(Level::Info, e.to_string());
            }
            PlannerError::Store(_) => self.handle_error(&err, "Saving draft failed"),
            PlannerError::Clipboard(e) => {
                warn!(error = %e, "copying vote link failed");
                self.toast(Level::Error, vote::MSG_LINK_FAILED);
            }
        }
    }

    /// Virtual time `ms` from now, saturating at the end of the clock.
    fn due_in(&self, ms: Millis) -> Millis {
        self.now.saturating_add(ms)
    }

    fn toast(&mut self, level: Level, message: impl Into<String>) {
        self.notifier.push(level, message, self.now);
    }
}
