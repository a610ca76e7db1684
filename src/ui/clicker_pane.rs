use crate::app::AppState;
use crate::domain::ClickerSettings;
use crate::ui::styles::{
    active_style, border_style, default_style, hint_style, inactive_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the auto-clicker settings panel
pub fn render_clicker_pane(f: &mut Frame, app: &AppState, clicker: &ClickerSettings, area: Rect) {
    let armed = if clicker.armed {
        Span::styled("ARMED", active_style())
    } else {
        Span::styled("disarmed", inactive_style())
    };

    let trigger = if app.capturing_trigger_key {
        Span::styled("<press a key>", title_style())
    } else {
        Span::styled(clicker.trigger_key.clone(), default_style())
    };

    let lines = vec![
        Line::raw(""),
        Line::from(vec![Span::raw("  Status:      "), armed]),
        Line::from(vec![
            Span::raw("  Interval:    "),
            Span::styled(format!("{} ms", clicker.interval_ms), default_style()),
        ]),
        Line::from(vec![
            Span::raw("  Button:      "),
            Span::styled(clicker.button.name(), default_style()),
        ]),
        Line::from(vec![
            Span::raw("  Click type:  "),
            Span::styled(clicker.click_kind.name(), default_style()),
        ]),
        Line::from(vec![Span::raw("  Trigger key: "), trigger]),
        Line::raw(""),
        Line::from(Span::styled(
            "  Enter arm/disarm   +/- interval   b button   m type   g trigger key",
            hint_style(),
        )),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(" Auto Clicker ", title_style())),
    );

    f.render_widget(paragraph, area);
}
