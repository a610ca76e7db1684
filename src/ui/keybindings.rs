use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, area: Rect) {
    let hints = Line::from(vec![
        Span::raw(" ↑/↓ select   "),
        Span::raw("n note   "),
        Span::raw("c clock   "),
        Span::raw("a clicker   "),
        Span::raw("x delete   "),
        Span::raw("C clear   "),
        Span::raw("o alarm   "),
        Span::raw("Space arm   "),
        Span::raw("s/S/r timer   "),
        Span::raw("t set   "),
        Span::raw("q quit"),
    ]);

    let paragraph = Paragraph::new(hints).style(hint_style());
    f.render_widget(paragraph, area);
}
