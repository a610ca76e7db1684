use crate::app::AppState;
use crate::domain::Widget;
use crate::ui::styles::{
    border_style, default_style, ringing_style, selected_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// One-line summary for a widget row
fn widget_summary(widget: &Widget) -> String {
    match widget {
        Widget::Note(note) => {
            let first_line = note.body.lines().next().unwrap_or("");
            if first_line.is_empty() {
                "(empty)".to_string()
            } else {
                first_line.chars().take(24).collect()
            }
        }
        Widget::Clock(clock) => {
            let active = clock.alarms.iter().filter(|a| a.active).count();
            format!("{} alarms, {} active", clock.alarms.len(), active)
        }
        Widget::AutoClicker(clicker) => {
            if clicker.armed {
                format!("armed, {}ms", clicker.interval_ms)
            } else {
                format!("disarmed, {}ms", clicker.interval_ms)
            }
        }
    }
}

/// Render the widget list on the left
pub fn render_sidebar(f: &mut Frame, app: &AppState, area: Rect) {
    let items: Vec<ListItem> = app
        .widgets
        .iter()
        .enumerate()
        .map(|(i, widget)| {
            let selected = i == app.selected_index;
            let ringing = matches!(widget, Widget::Clock(c) if c.session.is_ringing());

            let style = if selected {
                selected_style()
            } else if ringing {
                ringing_style()
            } else {
                default_style()
            };

            let marker = if ringing { "⏰ " } else { "" };
            let line = Line::from(vec![
                Span::styled(format!(" {}{} ", marker, widget.title()), style),
                Span::styled(widget_summary(widget), style),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(" Widgets ", title_style())),
    );

    f.render_widget(list, area);
}
