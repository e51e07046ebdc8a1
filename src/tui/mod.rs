//! Interactive terminal wizard.
//!
//! Feature-gated behind `tui`. Launch with `--tui` on the CLI.

mod controls;
mod layout;
/// Session state around the planner.
pub mod runtime;
mod style;

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;

use crate::app::App;
use runtime::Session;

/// How often the loop wakes to fire timers and redraw without input.
const FRAME_MS: u64 = 50;

/// Runs the wizard until the user quits.
///
/// Sets up the terminal (raw mode, alternate screen), runs the event loop,
/// and restores the terminal on exit, also when the loop fails.
///
/// # Errors
///
/// Returns terminal setup, drawing or input errors.
pub fn run(app: App) -> io::Result<()> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e);
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = disable_raw_mode();
            return Err(e);
        }
    };

    info!("terminal wizard started");
    let mut session = Session::new(app);
    let result = event_loop(&mut terminal, &mut session);

    // Teardown: always restore terminal state
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    info!(events = session.app.dr_events().len(), "terminal wizard closed");
    result
}

/// Core event loop: fire due timers, draw, poll input.
fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &mut Session,
) -> io::Result<()> {
    let frame = Duration::from_millis(FRAME_MS);
    loop {
        session.tick();
        terminal.draw(|f| layout::render(f, session))?;

        if session.quit {
            return Ok(());
        }

        if event::poll(frame)? {
            if let Event::Key(key) = event::read()? {
                controls::handle_key(session, key);
            }
        }
    }
}
