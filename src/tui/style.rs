//! Color constants for the TUI.

use ratatui::style::Color;

use crate::flows::notify::Level;
use crate::model::kpi::Scenario;
use crate::wizard::chart::scenario_color;

/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Completed or current step indicator.
pub const STEP_ACTIVE: Color = Color::Green;
/// Focused input row.
pub const FOCUS_FG: Color = Color::Yellow;
/// Required input left empty.
pub const DANGER: Color = Color::Red;
/// Secondary text such as slider labels.
pub const MUTED: Color = Color::Gray;

/// Line color for a scenario, matching the chart palette.
pub fn series_color(scenario: Scenario) -> Color {
    let rgb = scenario_color(scenario);
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

pub fn toast_color(level: Level) -> Color {
    match level {
        Level::Info => Color::Cyan,
        Level::Success => Color::Green,
        Level::Error => DANGER,
    }
}
