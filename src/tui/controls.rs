//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::Session;
use crate::app::Action;
use crate::flows::dr::DrAction;
use crate::wizard::step::Step;

/// Maps a key event to a session or planner action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
/// While a field is being edited, printable keys go into the edit buffer.
pub fn handle_key(session: &mut Session, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        session.quit = true;
        return;
    }

    if session.editing.is_some() {
        match key.code {
            KeyCode::Enter | KeyCode::Tab => session.commit_edit(),
            KeyCode::Esc => session.cancel_edit(),
            KeyCode::Backspace => session.backspace(),
            KeyCode::Char(c) => session.push_char(c),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => session.quit = true,
        KeyCode::Right | KeyCode::PageDown => session.dispatch(Action::Next),
        KeyCode::Left | KeyCode::PageUp => session.dispatch(Action::Previous),
        KeyCode::Char(c @ '1'..='9') => {
            let n = c.to_digit(10).map_or(0, |d| d as usize);
            session.dispatch(Action::GoTo(n));
        }
        KeyCode::Down | KeyCode::Tab => session.focus_next(),
        KeyCode::Up | KeyCode::BackTab => session.focus_previous(),
        KeyCode::Enter => session.begin_edit(),
        KeyCode::Char('+' | '=') => session.nudge(1),
        KeyCode::Char('-') => session.nudge(-1),
        KeyCode::Char('p') => session.preview(),
        KeyCode::Char(c) => match session.step() {
            Step::CommunityVote => vote_key(session, c),
            Step::DemandResponse => dr_key(session, c),
            _ => {}
        },
        _ => {}
    }
}

fn vote_key(session: &mut Session, c: char) {
    match c {
        'l' => session.dispatch(Action::LaunchVote),
        's' => session.dispatch(Action::SaveDraft),
        'y' => session.dispatch(Action::CopyLink),
        _ => {}
    }
}

fn dr_key(session: &mut Session, c: char) {
    match c {
        'c' => session.dispatch(Action::CreateDrEvent),
        'v' => session.latest_event_action(DrAction::ViewDetails, false),
        'm' => session.latest_event_action(DrAction::Manage, false),
        'e' => session.latest_event_action(DrAction::Edit, false),
        't' => session.latest_event_action(DrAction::ViewSettlement, true),
        _ => {}
    }
}
