//! Terminal session state wrapped around the planner.

use std::time::Instant;

use crate::app::{Action, App};
use crate::flows::dr::DrAction;
use crate::wizard::binder::{Field, FieldKind};
use crate::wizard::step::Step;
use crate::wizard::timers::Millis;

/// Step size for `+`/`-` on number inputs.
const NUMBER_STEP: i64 = 10;
/// Step size for `+`/`-` on percentage sliders.
const PERCENT_STEP: i64 = 5;

/// What the terminal adds on top of [`App`]: focus, an edit buffer and
/// the wall clock driving the planner's timers.
pub struct Session {
    pub app: App,
    /// Index into the fields of the current step.
    pub focus: usize,
    /// Text being typed into the focused field, if editing.
    pub editing: Option<String>,
    pub quit: bool,
    started: Instant,
}

impl Session {
    pub fn new(app: App) -> Self {
        Self {
            app,
            focus: 0,
            editing: None,
            quit: false,
            started: Instant::now(),
        }
    }

    /// Milliseconds since the session started.
    pub fn elapsed_ms(&self) -> Millis {
        Millis::try_from(self.started.elapsed().as_millis()).unwrap_or(Millis::MAX)
    }

    /// Fires deferred work that is due by now.
    pub fn tick(&mut self) {
        let now = self.elapsed_ms();
        self.app.advance_to(now);
    }

    pub fn step(&self) -> Step {
        self.app.wizard().step().unwrap_or(Step::CommunityProfile)
    }

    /// Inputs on the current step.
    pub fn fields(&self) -> Vec<Field> {
        Field::for_step(self.step())
    }

    pub fn focused_field(&self) -> Option<Field> {
        self.fields().get(self.focus).copied()
    }

    pub fn focus_next(&mut self) {
        let n = self.fields().len();
        if n > 0 {
            self.focus = (self.focus + 1) % n;
        }
    }

    pub fn focus_previous(&mut self) {
        let n = self.fields().len();
        if n > 0 {
            self.focus = (self.focus + n - 1) % n;
        }
    }

    /// Dispatches `action`, resetting focus when the step changes.
    pub fn dispatch(&mut self, action: Action) {
        let before = self.app.wizard().current();
        self.app.dispatch(action);
        if self.app.wizard().current() != before {
            self.focus = 0;
            self.editing = None;
        }
    }

    /// Opens the edit buffer on the focused field with its current text.
    pub fn begin_edit(&mut self) {
        if let Some(field) = self.focused_field() {
            self.editing = Some(self.app.form().raw_value(field));
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(buf) = self.editing.as_mut() {
            buf.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(buf) = self.editing.as_mut() {
            buf.pop();
        }
    }

    /// Writes the edit buffer into the focused field.
    pub fn commit_edit(&mut self) {
        let Some(raw) = self.editing.take() else {
            return;
        };
        if let Some(field) = self.focused_field() {
            self.dispatch(Action::Edit { field, raw });
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Steps the focused slider/number or cycles the focused choice.
    pub fn nudge(&mut self, direction: i64) {
        let Some(field) = self.focused_field() else {
            return;
        };
        let delta = match field.kind() {
            FieldKind::Number => direction * NUMBER_STEP,
            FieldKind::Slider { max, .. } if max > 10 => direction * PERCENT_STEP,
            _ => direction,
        };
        self.dispatch(Action::Nudge { field, delta });
    }

    /// Step-dependent preview: email on the vote step, DR event on the DR step.
    pub fn preview(&mut self) {
        match self.step() {
            Step::CommunityVote => self.dispatch(Action::PreviewEmail),
            Step::DemandResponse => self.dispatch(Action::PreviewDrEvent),
            _ => {}
        }
    }

    /// Runs a follow-up action on the most recently created DR event.
    pub fn latest_event_action(&mut self, make: fn(String) -> DrAction, settlement: bool) {
        let Some(event) = self.app.dr_events().last() else {
            return;
        };
        let id = if settlement {
            event.settlement_id()
        } else {
            event.id.clone()
        };
        self.dispatch(Action::DrEvent(make(id)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::flows::clipboard::MemoryClipboard;
    use crate::flows::store::MemoryStore;

    fn session() -> Session {
        let mut config = PlannerConfig::standard();
        config.chart.seed = Some(1);
        Session::new(App::new(
            config,
            Box::new(MemoryStore::new()),
            Box::new(MemoryClipboard::new()),
        ))
    }

    #[test]
    fn focus_wraps_within_step() {
        let mut s = session();
        assert_eq!(s.focused_field(), Some(Field::Households));
        s.focus_previous();
        assert_eq!(s.focused_field(), Some(Field::Tariff));
        s.focus_next();
        assert_eq!(s.focused_field(), Some(Field::Households));
    }

    #[test]
    fn edit_buffer_commits_into_field() {
        let mut s = session();
        s.dispatch(Action::GoTo(3));
        s.focus_next();
        assert_eq!(s.focused_field(), Some(Field::Participation));
        s.begin_edit();
        s.backspace();
        s.backspace();
        s.push_char('6');
        s.push_char('0');
        s.commit_edit();
        assert!(s.editing.is_none());
        assert_eq!(s.app.form().strategy.participation_pct, 60);
    }

    #[test]
    fn step_change_resets_focus() {
        let mut s = session();
        s.focus_next();
        s.dispatch(Action::Next);
        assert_eq!(s.focus, 0);
        assert_eq!(s.focused_field(), Some(Field::EvRatio));
    }

    #[test]
    fn numbers_nudge_by_ten() {
        let mut s = session();
        s.nudge(1);
        assert_eq!(s.app.form().community.households, 130);
    }

    #[test]
    fn event_actions_need_an_event() {
        let mut s = session();
        s.latest_event_action(DrAction::Manage, false);
        assert!(s.app.toasts().is_empty());
    }
}
