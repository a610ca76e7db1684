use crate::app::AppState;
use crate::domain::{Note, UiMode};
use crate::ui::styles::{border_style, default_style, modal_title_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the focused sticky note
pub fn render_note_pane(f: &mut Frame, app: &AppState, note: &Note, area: Rect) {
    let editing = app.ui_mode == UiMode::EditingNote;

    let title = if editing { " Note (editing) " } else { " Note " };

    let mut lines: Vec<Line> = note.body.lines().map(Line::raw).collect();
    if note.body.ends_with('\n') || lines.is_empty() {
        lines.push(Line::raw(""));
    }
    if editing {
        // Block cursor at the end of the last line
        if let Some(last) = lines.pop() {
            let mut spans = last.spans;
            spans.push(Span::styled("█", modal_title_style()));
            lines.push(Line::from(spans));
        }
    }

    let paragraph = Paragraph::new(lines)
        .style(default_style())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(title, title_style())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
