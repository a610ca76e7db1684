pub mod clicker_pane;
pub mod clock_pane;
pub mod dialog;
pub mod keybindings;
pub mod layout;
pub mod note_pane;
pub mod sidebar;
pub mod styles;

use crate::app::AppState;
use crate::domain::{UiMode, Widget};
use clicker_pane::render_clicker_pane;
use clock_pane::render_clock_pane;
use dialog::{render_alarm_form, render_confirm_clear, render_ringing_modal, render_ringtone_prompt};
use keybindings::render_keybindings;
use layout::create_layout;
use note_pane::render_note_pane;
use ratatui::{
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use sidebar::render_sidebar;
use styles::{border_style, hint_style, title_style};

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, layout.keybindings_area);
    render_sidebar(f, app, layout.sidebar_area);

    match app.selected_widget() {
        Some(Widget::Note(note)) => render_note_pane(f, app, note, layout.detail_area),
        Some(Widget::Clock(clock)) => render_clock_pane(f, app, clock, layout.detail_area),
        Some(Widget::AutoClicker(clicker)) => {
            render_clicker_pane(f, app, clicker, layout.detail_area)
        }
        None => render_empty_pane(f, layout.detail_area),
    }

    // Ringing takes precedence over any open form
    if app.ui_mode == UiMode::Ringing {
        render_ringing_modal(f, app, size);
        return;
    }

    match app.ui_mode {
        UiMode::AlarmForm => render_alarm_form(f, app, size),
        UiMode::RingtonePrompt => render_ringtone_prompt(f, app, size),
        UiMode::ConfirmClear => render_confirm_clear(f, size),
        _ => {}
    }
}

fn render_empty_pane(f: &mut Frame, area: ratatui::layout::Rect) {
    let paragraph = Paragraph::new(ratatui::text::Line::styled(
        " n adds a note, c a clock, a an auto-clicker ",
        hint_style(),
    ))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(" Gridpad ", title_style())),
    );
    f.render_widget(paragraph, area);
}
