use crate::app::AppState;
use crate::clock::ClockWidget;
use crate::domain::{TimerField, TimerPhase, UiMode};
use crate::ui::styles::{
    active_style, border_style, clock_style, default_style, gauge_style, inactive_style,
    selected_style, snoozed_style, title_style,
};
use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
    Frame,
};

/// Render the focused clock: wall time, alarm list and countdown
pub fn render_clock_pane(f: &mut Frame, app: &AppState, clock: &ClockWidget, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Wall clock
            Constraint::Min(4),    // Alarm list
            Constraint::Length(4), // Countdown
        ])
        .split(area);

    render_wall_clock(f, chunks[0]);
    render_alarm_list(f, clock, chunks[1]);
    render_timer(f, app, clock, chunks[2]);
}

fn render_wall_clock(f: &mut Frame, area: Rect) {
    let now = Local::now();
    let line = Line::from(Span::styled(
        now.format(" %I:%M:%S %p  ·  %A %d %B ").to_string(),
        clock_style(),
    ));

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(" Clock ", title_style())),
    );
    f.render_widget(paragraph, area);
}

fn render_alarm_list(f: &mut Frame, clock: &ClockWidget, area: Rect) {
    let items: Vec<ListItem> = clock
        .alarms
        .iter()
        .enumerate()
        .map(|(i, alarm)| {
            let cursor = i == clock.alarm_cursor;

            let badge = if alarm.active {
                Span::styled("[on] ", active_style())
            } else {
                Span::styled("[off]", inactive_style())
            };

            let mut spans = vec![
                badge,
                Span::styled(
                    format!(" {}  {}  {}", alarm.time, alarm.label, alarm.recurrence),
                    if cursor { selected_style() } else { default_style() },
                ),
            ];
            if let Some(postponed) = alarm.postponed {
                spans.push(Span::styled(
                    format!("  (snoozed to {})", postponed),
                    snoozed_style(),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(" Alarms ", title_style())),
    );
    f.render_widget(list, area);
}

fn render_timer(f: &mut Frame, app: &AppState, clock: &ClockWidget, area: Rect) {
    let editing = app.ui_mode == UiMode::TimerEdit;

    let phase = match clock.timer.phase() {
        TimerPhase::Editing => {
            if editing {
                match clock.timer_field {
                    TimerField::Hours => "editing hours",
                    TimerField::Minutes => "editing minutes",
                    TimerField::Seconds => "editing seconds",
                }
            } else {
                "ready"
            }
        }
        TimerPhase::Running => "running",
        TimerPhase::Locked => "stopped",
    };

    let label = format!(" {}  ({}) ", clock.timer, phase);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(" Timer ", title_style())),
        )
        .gauge_style(gauge_style())
        .percent(clock.timer.progress().clamp(0.0, 100.0) as u16)
        .label(label);

    f.render_widget(gauge, area);
}
