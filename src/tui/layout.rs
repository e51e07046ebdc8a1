//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, Paragraph, Row, Table, Wrap};

use super::runtime::Session;
use super::style;
use crate::flows::dr::FieldStatus;
use crate::flows::notify::Phase;
use crate::flows::vote::VotePhase;
use crate::model::kpi::Scenario;
use crate::wizard::binder::{Field, FieldKind};
use crate::wizard::chart::ChartInstance;
use crate::wizard::step::Step;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, session: &Session) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(10),   // step panel
            Constraint::Length(4), // toasts
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, session, chunks[0]);
    render_step(frame, session, chunks[1]);
    render_toasts(frame, session, chunks[2]);
    render_footer(frame, session, chunks[3]);
}

/// Header bar: step title, progress and one indicator per step.
fn render_header(frame: &mut Frame, session: &Session, area: Rect) {
    let wizard = session.app.wizard();
    let view = session.app.view();

    let mut spans = vec![
        Span::styled(
            " CO-LAB ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            session.step().title(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" │ {}/{} │ ", wizard.current(), wizard.total())),
    ];
    for (i, active) in view.indicators.iter().enumerate() {
        let (symbol, color) = if *active {
            ("●", style::STEP_ACTIVE)
        } else {
            ("○", style::FOOTER_FG)
        };
        spans.push(Span::styled(symbol, Style::default().fg(color)));
        if i + 1 < view.indicators.len() {
            spans.push(Span::raw(" "));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_step(frame: &mut Frame, session: &Session, area: Rect) {
    match session.step() {
        Step::StrategyComparison => render_kpis_and_chart(frame, session, area),
        Step::CommunityVote => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(area);
            render_fields(frame, session, chunks[0]);
            render_vote(frame, session, chunks[1]);
        }
        Step::DemandResponse => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(area);
            render_fields(frame, session, chunks[0]);
            render_dr(frame, session, chunks[1]);
        }
        _ => render_fields(frame, session, area),
    }
}

/// Input list for the current step, focused row highlighted.
fn render_fields(frame: &mut Frame, session: &Session, area: Rect) {
    let form = session.app.form();
    let lines: Vec<Line> = session
        .fields()
        .into_iter()
        .enumerate()
        .map(|(i, field)| {
            let focused = i == session.focus;
            let value = match (&session.editing, focused) {
                (Some(buf), true) => format!("{buf}▏"),
                _ => form.raw_value(field),
            };
            let missing = matches!(field, Field::Dr(dr) if form.dr.field_status(dr) == FieldStatus::MissingRequired);

            let mut label_style = Style::default();
            if focused {
                label_style = label_style.fg(style::FOCUS_FG).add_modifier(Modifier::BOLD);
            }
            let value_style = if missing {
                Style::default().fg(style::DANGER)
            } else {
                Style::default()
            };

            let marker = if focused { "▶ " } else { "  " };
            let mut spans = vec![
                Span::styled(format!("{marker}{:<28}", field.label()), label_style),
                Span::styled(value, value_style),
            ];
            if let FieldKind::Slider { min, max } = field.kind() {
                spans.push(Span::styled(
                    format!("  [{min}..{max}]"),
                    Style::default().fg(style::MUTED),
                ));
            }
            if let Some(label) = session.app.label(field) {
                spans.push(Span::styled(
                    format!("  {label}"),
                    Style::default().fg(style::MUTED),
                ));
            }
            Line::from(spans)
        })
        .collect();

    let block = Block::default()
        .title(format!(" {} ", session.step().title()))
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_kpis_and_chart(frame: &mut Frame, session: &Session, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(8)])
        .split(area);

    let kpi = session.app.kpi();
    let rows = Scenario::ALL.iter().map(|&scenario| {
        let row = kpi.row(scenario);
        Row::new(vec![
            scenario.label().to_string(),
            row.cost.clone(),
            row.peak.clone(),
            row.emissions.clone(),
            row.comfort.clone(),
        ])
        .style(Style::default().fg(style::series_color(scenario)))
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(11),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(
        Row::new(vec!["", "Cost", "Peak", "Emissions", "Comfort"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().title(" KPIs ").borders(Borders::ALL));
    frame.render_widget(table, chunks[0]);

    let chart = session.app.chart();
    match chart.instance() {
        Some(instance) if chart.is_loaded() => render_chart(frame, instance, chunks[1]),
        _ => {
            let text = if chart.container_present() {
                "Loading chart..."
            } else {
                "Chart unavailable"
            };
            let placeholder = Paragraph::new(Line::from(Span::styled(
                text,
                Style::default().fg(style::MUTED),
            )))
            .block(Block::default().title(" Load Curves ").borders(Borders::ALL));
            frame.render_widget(placeholder, chunks[1]);
        }
    }
}

/// Load curve comparison drawn from the chart instance's spec.
fn render_chart(frame: &mut Frame, instance: &ChartInstance, area: Rect) {
    let spec = &instance.spec;
    let points: Vec<Vec<(f64, f64)>> = spec
        .series
        .iter()
        .map(|s| {
            s.data
                .iter()
                .enumerate()
                .map(|(hour, &kw)| (hour as f64, kw))
                .collect()
        })
        .collect();

    let datasets = spec
        .series
        .iter()
        .zip(&points)
        .map(|(series, data)| {
            let rgb = series.rgb;
            Dataset::default()
                .name(series.label)
                .marker(symbols::Marker::Braille)
                .style(Style::default().fg(Color::Rgb(rgb.0, rgb.1, rgb.2)))
                .data(data)
        })
        .collect();

    let x_hi = spec.labels.len().saturating_sub(1).max(1) as f64;
    let x_labels = vec![
        spec.labels.first().cloned().unwrap_or_default(),
        spec.labels.last().cloned().unwrap_or_default(),
    ];
    let y_bounds = spec.y_bounds();
    let y_labels = vec![
        format!("{:.0}", y_bounds[0]),
        format!("{:.0}", y_bounds[1]),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!(" {} ", spec.title))
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title(spec.x_axis.title)
                .bounds([0.0, x_hi])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(spec.y_axis.title)
                .bounds(y_bounds)
                .labels(y_labels),
        );
    frame.render_widget(chart, area);
}

fn render_vote(frame: &mut Frame, session: &Session, area: Rect) {
    let vote = session.app.vote();
    let panels = vote.panels();
    let mut lines = Vec::new();

    if panels.preview {
        let preview = vote.preview();
        lines.push(Line::from(Span::styled(
            "Email preview",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!("Subject: {}", preview.subject)));
        lines.push(Line::from(format!(
            "Deadline: {}",
            preview.deadline.as_deref().unwrap_or("-")
        )));
        lines.push(Line::from(format!("Approval threshold: {}", preview.threshold)));
        lines.push(Line::from(format!(
            "Minimum participation: {}",
            preview.min_participation
        )));
        lines.push(Line::from(""));
    }

    let phase = match vote.phase() {
        VotePhase::Editing => "Not launched",
        VotePhase::Sending => "Sending...",
        VotePhase::Launched => "Launched",
    };
    lines.push(Line::from(format!("Status: {phase}")));

    if panels.status {
        let tally = vote.tally();
        lines.push(Line::from(format!(
            "Approve {}%  Oppose {}%  Participation {}%",
            tally.approve, tally.oppose, tally.participation
        )));
    }
    if let Some(link) = session.app.clipboard_contents() {
        lines.push(Line::from(Span::styled(
            format!("Clipboard: {link}"),
            Style::default().fg(style::MUTED),
        )));
    }

    let block = Block::default().title(" Vote ").borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn render_dr(frame: &mut Frame, session: &Session, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(3)])
        .split(area);

    let preview_text = session
        .app
        .last_dr_preview()
        .map_or_else(|| "Press p to preview the event.".to_string(), ToString::to_string);
    let preview = Paragraph::new(preview_text)
        .block(Block::default().title(" Preview ").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(preview, chunks[0]);

    let rows = session.app.dr_events().iter().map(|event| {
        Row::new(vec![
            event.id.clone(),
            event.name.clone(),
            event.event_type.to_string(),
            event.start.format("%m-%d %H:%M").to_string(),
            format!("{} kW", event.target_reduction_kw),
            format!("${:.2}", event.expected_revenue()),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Min(10),
            Constraint::Length(16),
            Constraint::Length(12),
            Constraint::Length(9),
            Constraint::Length(10),
        ],
    )
    .header(
        Row::new(vec!["ID", "Name", "Type", "Start", "Target", "Revenue"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().title(" Events ").borders(Borders::ALL));
    frame.render_widget(table, chunks[1]);
}

/// Live toasts, newest last; leaving toasts are dimmed.
fn render_toasts(frame: &mut Frame, session: &Session, area: Rect) {
    let now = session.app.now();
    let notifier = session.app.notifier();
    let visible = usize::from(area.height.saturating_sub(2));
    let toasts = session.app.toasts();
    let lines: Vec<Line> = toasts
        .iter()
        .skip(toasts.len().saturating_sub(visible))
        .filter_map(|toast| {
            let phase = notifier.phase(toast, now)?;
            let mut style = Style::default().fg(style::toast_color(toast.level));
            if phase != Phase::Shown {
                style = style.add_modifier(Modifier::DIM);
            }
            Some(Line::from(Span::styled(
                format!(" {} {}", toast.level.icon(), toast.message),
                style,
            )))
        })
        .collect();

    let block = Block::default().title(" Messages ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Footer with keybinding hints for the current step.
fn render_footer(frame: &mut Frame, session: &Session, area: Rect) {
    let hints = if session.editing.is_some() {
        " Enter:Apply  Esc:Cancel"
    } else {
        match session.step() {
            Step::CommunityVote => {
                " q:Quit  ←/→:Step  ↑/↓:Field  Enter:Edit  +/-:Adjust  p:Preview  l:Launch  s:Save  y:Copy link"
            }
            Step::DemandResponse => {
                " q:Quit  ←/→:Step  ↑/↓:Field  Enter:Edit  p:Preview  c:Create  v/m/e/t:Latest event"
            }
            _ => " q:Quit  ←/→:Step  1-6:Jump  ↑/↓:Field  Enter:Edit  +/-:Adjust",
        }
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        hints,
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}
