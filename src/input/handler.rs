use crate::app::{AppState, RingtoneTarget};
use crate::domain::{UiMode, Widget};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::EditingNote => handle_note_editing_mode(app, key),
        UiMode::AlarmForm => handle_alarm_form_mode(app, key),
        UiMode::RingtonePrompt => handle_ringtone_prompt_mode(app, key),
        UiMode::TimerEdit => handle_timer_edit_mode(app, key),
        UiMode::Ringing => handle_ringing_mode(app, key),
        UiMode::ConfirmClear => handle_confirm_clear_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    // A pending trigger-key capture eats the next printable key
    if app.capturing_trigger_key {
        if let KeyCode::Char(c) = key.code {
            if let Some(Widget::AutoClicker(clicker)) = app.selected_widget_mut() {
                clicker.trigger_key = c.to_string();
                app.needs_save = true;
            }
        }
        app.capturing_trigger_key = false;
        return Ok(false);
    }

    match key.code {
        // Widget selection
        KeyCode::Up => {
            app.select_previous();
            Ok(false)
        }
        KeyCode::Down => {
            app.select_next();
            Ok(false)
        }

        // Add widgets
        KeyCode::Char('n') => {
            app.add_note();
            Ok(false)
        }
        KeyCode::Char('c') => {
            app.add_clock();
            Ok(false)
        }
        KeyCode::Char('a') => {
            // Refused when an auto-clicker already exists
            app.add_clicker();
            Ok(false)
        }

        // Delete selected widget
        KeyCode::Char('x') | KeyCode::Delete => {
            app.delete_selected();
            Ok(false)
        }

        // Clear the whole dashboard (with confirmation)
        KeyCode::Char('C') => {
            if !app.widgets.is_empty() {
                app.ui_mode = UiMode::ConfirmClear;
            }
            Ok(false)
        }

        // Edit / interact with the focused widget
        KeyCode::Enter => {
            match app.selected_widget() {
                Some(Widget::Note(_)) => app.start_note_edit(),
                Some(Widget::AutoClicker(_)) => {
                    if let Some(Widget::AutoClicker(clicker)) = app.selected_widget_mut() {
                        clicker.armed = !clicker.armed;
                        app.needs_save = true;
                    }
                }
                _ => {}
            }
            Ok(false)
        }

        // Auto-clicker settings
        KeyCode::Char('+') | KeyCode::Char('=') => {
            if let Some(Widget::AutoClicker(clicker)) = app.selected_widget_mut() {
                clicker.increase_interval();
                app.needs_save = true;
            }
            Ok(false)
        }
        KeyCode::Char('-') | KeyCode::Char('_') => {
            if let Some(Widget::AutoClicker(clicker)) = app.selected_widget_mut() {
                clicker.decrease_interval();
                app.needs_save = true;
            }
            Ok(false)
        }
        KeyCode::Char('b') => {
            if let Some(Widget::AutoClicker(clicker)) = app.selected_widget_mut() {
                clicker.button = clicker.button.next();
                app.needs_save = true;
            }
            Ok(false)
        }
        KeyCode::Char('m') => {
            if let Some(Widget::AutoClicker(clicker)) = app.selected_widget_mut() {
                clicker.click_kind = clicker.click_kind.toggled();
                app.needs_save = true;
            }
            Ok(false)
        }
        KeyCode::Char('g') => {
            if matches!(app.selected_widget(), Some(Widget::AutoClicker(_))) {
                app.capturing_trigger_key = true;
            }
            Ok(false)
        }

        // Alarm list on the focused clock
        KeyCode::Char('j') => {
            if let Some(clock) = app.selected_clock_mut() {
                clock.select_next_alarm();
            }
            Ok(false)
        }
        KeyCode::Char('k') => {
            if let Some(clock) = app.selected_clock_mut() {
                clock.select_previous_alarm();
            }
            Ok(false)
        }
        KeyCode::Char(' ') => {
            app.toggle_selected_alarm();
            Ok(false)
        }
        KeyCode::Char('o') => {
            if let Some(clock) = app.selected_clock_mut() {
                clock.open_new_alarm_form();
                app.ui_mode = UiMode::AlarmForm;
            }
            Ok(false)
        }
        KeyCode::Char('e') => {
            let opened = app
                .selected_clock_mut()
                .map(|clock| {
                    clock.open_edit_alarm_form();
                    clock.dialog.is_some()
                })
                .unwrap_or(false);
            if opened {
                app.ui_mode = UiMode::AlarmForm;
            }
            Ok(false)
        }
        KeyCode::Char('d') => {
            app.remove_selected_alarm();
            Ok(false)
        }

        // Countdown timer on the focused clock
        KeyCode::Char('s') => {
            if let Some(clock) = app.selected_clock_mut() {
                clock.timer.start();
            }
            Ok(false)
        }
        KeyCode::Char('S') => {
            app.stop_timer();
            Ok(false)
        }
        KeyCode::Char('r') => {
            if let Some(clock) = app.selected_clock_mut() {
                clock.timer.reset();
            }
            Ok(false)
        }
        KeyCode::Char('t') => {
            let editable = app
                .selected_clock_mut()
                .map(|clock| clock.timer.is_editable())
                .unwrap_or(false);
            if editable {
                app.ui_mode = UiMode::TimerEdit;
            }
            Ok(false)
        }
        KeyCode::Char('R') => {
            if matches!(app.selected_widget(), Some(Widget::Clock(_))) {
                app.open_ringtone_prompt(RingtoneTarget::Timer);
            }
            Ok(false)
        }

        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => Ok(true),

        _ => Ok(false),
    }
}

/// Handle keys while editing a sticky note body
fn handle_note_editing_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.finish_note_edit();
            Ok(false)
        }
        KeyCode::Enter => {
            app.note_add_char('\n');
            Ok(false)
        }
        KeyCode::Backspace => {
            app.note_backspace();
            Ok(false)
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.note_add_char(c);
            Ok(false)
        }
        _ => Ok(false),
    }
}

/// Handle keys in the alarm create/edit form
fn handle_alarm_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    // Ctrl+R imports a ringtone into the form's ringtone field
    if key.code == KeyCode::Char('r') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.open_ringtone_prompt(RingtoneTarget::AlarmForm);
        return Ok(false);
    }

    match key.code {
        KeyCode::Enter => {
            // Invalid time or recurrence text keeps the form open
            app.submit_alarm_form();
            Ok(false)
        }
        KeyCode::Esc => {
            if let Some(clock) = app.selected_clock_mut() {
                clock.cancel_alarm_form();
            }
            app.ui_mode = UiMode::Normal;
            Ok(false)
        }
        KeyCode::Tab => {
            if let Some(clock) = app.selected_clock_mut() {
                if let Some(dialog) = &mut clock.dialog {
                    dialog.form_mut().toggle_field();
                }
            }
            Ok(false)
        }
        KeyCode::Backspace => {
            if let Some(clock) = app.selected_clock_mut() {
                if let Some(dialog) = &mut clock.dialog {
                    dialog.form_mut().backspace();
                }
            }
            Ok(false)
        }
        KeyCode::Char(c) => {
            if let Some(clock) = app.selected_clock_mut() {
                if let Some(dialog) = &mut clock.dialog {
                    dialog.form_mut().add_char(c);
                }
            }
            Ok(false)
        }
        _ => Ok(false),
    }
}

/// Handle keys in the ringtone import path prompt
fn handle_ringtone_prompt_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => {
            app.submit_ringtone_prompt();
            Ok(false)
        }
        KeyCode::Esc => {
            app.cancel_ringtone_prompt();
            Ok(false)
        }
        KeyCode::Backspace => {
            if let Some(prompt) = &mut app.ringtone_prompt {
                prompt.buffer.pop();
            }
            Ok(false)
        }
        KeyCode::Char(c) => {
            if let Some(prompt) = &mut app.ringtone_prompt {
                prompt.buffer.push(c);
            }
            Ok(false)
        }
        _ => Ok(false),
    }
}

/// Handle keys while editing the countdown fields
fn handle_timer_edit_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            app.ui_mode = UiMode::Normal;
            Ok(false)
        }
        KeyCode::Tab => {
            if let Some(clock) = app.selected_clock_mut() {
                clock.timer_field = clock.timer_field.next();
            }
            Ok(false)
        }
        KeyCode::Backspace => {
            if let Some(clock) = app.selected_clock_mut() {
                let field = clock.timer_field;
                clock.timer.clear_field(field);
            }
            Ok(false)
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if let Some(clock) = app.selected_clock_mut() {
                let field = clock.timer_field;
                clock.timer.push_digit(field, c as u8 - b'0');
            }
            Ok(false)
        }
        _ => Ok(false),
    }
}

/// Handle keys while an alarm rings
fn handle_ringing_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Stop: one-shot alarms deactivate
        KeyCode::Char('s') | KeyCode::Enter => {
            app.stop_ringing();
            Ok(false)
        }
        // Sleep: ring again ten minutes past the nominal time
        KeyCode::Char('z') => {
            app.sleep_ringing();
            Ok(false)
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            app.player.adjust_volume(true);
            Ok(false)
        }
        KeyCode::Char('-') => {
            app.player.adjust_volume(false);
            Ok(false)
        }
        _ => Ok(false),
    }
}

/// Handle keys in the clear-dashboard confirmation
fn handle_confirm_clear_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.clear_dashboard();
            Ok(false)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.ui_mode = UiMode::Normal;
            Ok(false)
        }
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::Dashboard;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;

    fn create_test_app() -> AppState {
        AppState::new(Dashboard::default())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn test_handle_quit() {
        let mut app = create_test_app();
        let should_quit = handle_key(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(should_quit);
    }

    #[test]
    fn test_handle_navigation() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('n'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.selected_index, 1);

        handle_key(&mut app, key(KeyCode::Up)).unwrap();
        assert_eq!(app.selected_index, 0);

        handle_key(&mut app, key(KeyCode::Down)).unwrap();
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn test_handle_note_edit_flow() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('n'))).unwrap();
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.ui_mode, UiMode::EditingNote);

        for c in "hi".chars() {
            handle_key(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_key(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.ui_mode, UiMode::Normal);

        match &app.widgets[0] {
            Widget::Note(note) => assert_eq!(note.body, "hi"),
            other => panic!("expected a note, got {:?}", other),
        }
    }

    #[test]
    fn test_handle_alarm_form_flow() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('c'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('o'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::AlarmForm);

        // Default form fields are valid, so Enter submits
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.ui_mode, UiMode::Normal);

        let clock = app.selected_clock_mut().unwrap();
        assert_eq!(clock.alarms.len(), 1);
    }

    #[test]
    fn test_handle_timer_edit_digits() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('c'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('t'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::TimerEdit);

        // Two digits into hours, tab to minutes, one digit
        handle_key(&mut app, key(KeyCode::Char('1'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('2'))).unwrap();
        handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        handle_key(&mut app, key(KeyCode::Char('5'))).unwrap();
        handle_key(&mut app, key(KeyCode::Esc)).unwrap();

        let clock = app.selected_clock_mut().unwrap();
        assert_eq!(clock.timer.to_string(), "12:05:00");
    }

    #[test]
    fn test_handle_trigger_key_capture() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('g'))).unwrap();
        assert!(app.capturing_trigger_key);

        handle_key(&mut app, key(KeyCode::Char('f'))).unwrap();
        assert!(!app.capturing_trigger_key);
        match &app.widgets[0] {
            Widget::AutoClicker(clicker) => assert_eq!(clicker.trigger_key, "f"),
            other => panic!("expected the auto-clicker, got {:?}", other),
        }
    }

    #[test]
    fn test_handle_timer_stop_key_halts_countdown() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('c'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('t'))).unwrap();
        handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        handle_key(&mut app, key(KeyCode::Char('5'))).unwrap();
        handle_key(&mut app, key(KeyCode::Esc)).unwrap();
        handle_key(&mut app, key(KeyCode::Char('s'))).unwrap();

        // One second elapses, then Stop freezes the remainder and
        // cancels the chime
        assert!(!app.selected_clock_mut().unwrap().timer.tick());
        handle_key(&mut app, key(KeyCode::Char('S'))).unwrap();

        let clock = app.selected_clock_mut().unwrap();
        assert_eq!(clock.timer.to_string(), "00:00:04");
        assert!(!clock.timer.tick());
        assert_eq!(clock.timer.to_string(), "00:00:04");
    }

    #[test]
    fn test_handle_ringing_volume_keys() {
        let mut app = create_test_app();
        app.ui_mode = UiMode::Ringing;

        handle_key(&mut app, key(KeyCode::Char('+'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('+'))).unwrap();
        assert!(app.player.volume() > 1.0);

        handle_key(&mut app, key(KeyCode::Char('-'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('-'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('-'))).unwrap();
        assert!(app.player.volume() < 1.0);
    }

    #[test]
    fn test_handle_confirm_clear() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('n'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('C'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::ConfirmClear);

        handle_key(&mut app, key(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.widgets.len(), 1);

        handle_key(&mut app, key(KeyCode::Char('C'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('y'))).unwrap();
        assert!(app.widgets.is_empty());
    }
}
