use crate::audio::RingtonePlayer;
use crate::clock::{ClockWidget, RingSession};
use crate::domain::{ClickerSettings, Note, UiMode, Widget};
use crate::notifications;
use crate::persistence::{self, ClockRecord, Dashboard};
use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use log::warn;
use uuid::Uuid;

/// Which ringtone slot a typed import path is destined for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingtoneTarget {
    /// The ringtone field of the open alarm form
    AlarmForm,
    /// The focused clock's timer chime
    Timer,
}

/// Prompt state for importing a ringtone by file path
#[derive(Debug, Clone)]
pub struct RingtonePromptState {
    pub buffer: String,
    pub target: RingtoneTarget,
}

/// Main application state
pub struct AppState {
    pub widgets: Vec<Widget>,
    pub selected_index: usize,
    pub ui_mode: UiMode,
    pub needs_save: bool,
    pub player: RingtonePlayer,
    pub ringtone_prompt: Option<RingtonePromptState>,
    /// Clock whose ringing modal is showing
    pub ringing_clock: Option<Uuid>,
    /// Cursor position while editing a note body
    pub note_cursor_pos: usize,
    /// Next key press becomes the auto-clicker trigger key
    pub capturing_trigger_key: bool,
    /// Wall-clock second last seen; alarm/timer logic runs once per change
    last_second: NaiveDateTime,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Self {
        let mut widgets: Vec<Widget> = Vec::new();
        for note in dashboard.notes {
            widgets.push(Widget::Note(note));
        }
        for record in dashboard.clocks {
            widgets.push(Widget::Clock(Box::new(ClockWidget::from_parts(
                record.id,
                record.alarms,
                record.timer_ringtone,
            ))));
        }
        if let Some(clicker) = dashboard.clicker {
            widgets.push(Widget::AutoClicker(clicker));
        }

        let now = Local::now().naive_local();
        let mut app = Self {
            widgets,
            selected_index: 0,
            ui_mode: UiMode::Normal,
            needs_save: false,
            player: RingtonePlayer::new(),
            ringtone_prompt: None,
            ringing_clock: None,
            note_cursor_pos: 0,
            capturing_trigger_key: false,
            last_second: now,
        };
        for clock in app.clocks_mut() {
            clock.scheduler.rebuild(&clock.alarms, now);
        }
        app
    }

    /// Load the dashboard document from disk
    pub fn load() -> Result<Self> {
        let path = persistence::dashboard_file()?;
        let dashboard = persistence::load_dashboard(path)?;
        Ok(Self::new(dashboard))
    }

    fn clocks_mut(&mut self) -> impl Iterator<Item = &mut ClockWidget> {
        self.widgets.iter_mut().filter_map(Widget::as_clock_mut)
    }

    /// Snapshot the widget list back into the persisted document
    pub fn to_dashboard(&self) -> Dashboard {
        let mut dashboard = Dashboard::default();
        for widget in &self.widgets {
            match widget {
                Widget::Note(note) => dashboard.notes.push(note.clone()),
                Widget::Clock(clock) => dashboard.clocks.push(ClockRecord {
                    id: clock.id,
                    alarms: clock.alarms.clone(),
                    timer_ringtone: clock.timer.ringtone.clone(),
                }),
                Widget::AutoClicker(clicker) => dashboard.clicker = Some(clicker.clone()),
            }
        }
        dashboard
    }

    pub fn save(&mut self) -> Result<()> {
        let path = persistence::dashboard_file()?;
        persistence::save_dashboard(path, &self.to_dashboard())?;
        self.needs_save = false;
        Ok(())
    }

    /// Delete a stored ringtone once nothing references it anymore.
    /// Playback failures and file errors are logged, never fatal.
    fn cleanup_ringtone(&self, name: &str, exclude: Option<Uuid>) {
        if name.is_empty() || !self.to_dashboard().ringtone_unused(name, exclude) {
            return;
        }
        if let Err(e) = persistence::remove_ringtone(name) {
            warn!("could not remove ringtone {}: {}", name, e);
        }
    }

    // ---- Tick ----

    /// Called on every event-loop pass. Alarm and timer logic advances
    /// only when the wall-clock second has changed.
    pub fn tick(&mut self) {
        let now = Local::now().naive_local();
        if now.and_utc().timestamp() == self.last_second.and_utc().timestamp() {
            return;
        }
        self.last_second = now;

        let mut finished_timers: Vec<String> = Vec::new();
        let mut fired: Vec<(String, String, String)> = Vec::new();
        let mut changed = false;

        for clock in self.clocks_mut() {
            let outcome = clock.tick(now);
            changed |= outcome.alarms_changed;
            if let Some(ringtone) = outcome.timer_finished {
                finished_timers.push(ringtone);
            }
            if let Some(f) = outcome.fired {
                fired.push((f.label, f.time.to_string(), f.ringtone));
            }
        }

        // The chime loops until timer Stop silences it
        for ringtone in finished_timers {
            self.play_looping(&ringtone);
            notifications::notify_timer_done();
        }

        if let Some((label, time, ringtone)) = fired.into_iter().next() {
            if self.ringing_clock.is_none() {
                self.begin_ringing_modal(&label, &time, &ringtone);
            }
        }

        if changed {
            self.needs_save = true;
        }
    }

    fn begin_ringing_modal(&mut self, label: &str, time: &str, ringtone: &str) {
        self.ringing_clock = self
            .widgets
            .iter()
            .find_map(|w| match w {
                Widget::Clock(clock) if clock.session.is_ringing() => Some(clock.id),
                _ => None,
            });
        self.ui_mode = UiMode::Ringing;
        self.play_looping(ringtone);
        notifications::notify_alarm(label, time);
    }

    fn play_looping(&mut self, ringtone: &str) {
        match persistence::ringtone_path(ringtone) {
            Ok(path) => {
                if let Err(e) = self.player.play_looping(&path) {
                    warn!("ringtone playback failed: {}", e);
                }
            }
            Err(e) => warn!("cannot resolve ringtone {}: {}", ringtone, e),
        }
    }

    /// Stop or snooze resolved; silence audio and, if another clock is
    /// still ringing, hand the modal to it.
    fn after_ring_action(&mut self) {
        self.player.stop();
        self.ringing_clock = None;

        let next = self.widgets.iter().find_map(|w| match w {
            Widget::Clock(clock) => match &clock.session {
                RingSession::Ringing { alarm_id, label } => {
                    let alarm = clock.alarms.iter().find(|a| a.id == *alarm_id);
                    Some((
                        clock.id,
                        label.clone(),
                        alarm.map(|a| a.time.to_string()).unwrap_or_default(),
                        alarm.map(|a| a.ringtone.clone()).unwrap_or_default(),
                    ))
                }
                RingSession::Idle => None,
            },
            _ => None,
        });

        match next {
            Some((clock_id, label, time, ringtone)) => {
                self.ringing_clock = Some(clock_id);
                self.ui_mode = UiMode::Ringing;
                self.play_looping(&ringtone);
                notifications::notify_alarm(&label, &time);
            }
            None => {
                self.ui_mode = UiMode::Normal;
            }
        }
    }

    pub fn stop_ringing(&mut self) {
        let now = Local::now().naive_local();
        if let Some(id) = self.ringing_clock {
            let changed = self
                .clocks_mut()
                .find(|c| c.id == id)
                .map(|clock| clock.stop_ringing(now))
                .unwrap_or(false);
            if changed {
                self.needs_save = true;
            }
        }
        self.after_ring_action();
    }

    pub fn sleep_ringing(&mut self) {
        let now = Local::now().naive_local();
        if let Some(id) = self.ringing_clock {
            let changed = self
                .clocks_mut()
                .find(|c| c.id == id)
                .map(|clock| clock.sleep_ringing(now))
                .unwrap_or(false);
            if changed {
                self.needs_save = true;
            }
        }
        self.after_ring_action();
    }

    /// Stop the focused countdown and cancel any pending chime
    pub fn stop_timer(&mut self) {
        if let Some(clock) = self.selected_clock_mut() {
            clock.timer.stop();
        }
        self.player.stop();
    }

    // ---- Widget management ----

    pub fn selected_widget(&self) -> Option<&Widget> {
        self.widgets.get(self.selected_index)
    }

    pub fn selected_widget_mut(&mut self) -> Option<&mut Widget> {
        self.widgets.get_mut(self.selected_index)
    }

    pub fn selected_clock_mut(&mut self) -> Option<&mut ClockWidget> {
        self.widgets
            .get_mut(self.selected_index)
            .and_then(Widget::as_clock_mut)
    }

    pub fn select_next(&mut self) {
        if !self.widgets.is_empty() && self.selected_index + 1 < self.widgets.len() {
            self.selected_index += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn add_note(&mut self) {
        self.widgets.push(Widget::Note(Note::default()));
        self.selected_index = self.widgets.len() - 1;
        self.needs_save = true;
    }

    pub fn add_clock(&mut self) {
        let now = Local::now().naive_local();
        let mut clock = ClockWidget::new();
        clock.scheduler.rebuild(&clock.alarms, now);
        self.widgets.push(Widget::Clock(Box::new(clock)));
        self.selected_index = self.widgets.len() - 1;
        self.needs_save = true;
    }

    /// At most one auto-clicker may exist; returns false when refused
    pub fn add_clicker(&mut self) -> bool {
        let exists = self
            .widgets
            .iter()
            .any(|w| matches!(w, Widget::AutoClicker(_)));
        if exists {
            return false;
        }
        self.widgets.push(Widget::AutoClicker(ClickerSettings::new()));
        self.selected_index = self.widgets.len() - 1;
        self.needs_save = true;
        true
    }

    pub fn delete_selected(&mut self) {
        if self.selected_index >= self.widgets.len() {
            return;
        }
        let removed = self.widgets.remove(self.selected_index);
        if self.selected_index > 0 && self.selected_index >= self.widgets.len() {
            self.selected_index -= 1;
        }
        self.needs_save = true;

        if let Widget::Clock(clock) = removed {
            if self.ringing_clock == Some(clock.id) {
                self.after_ring_action();
            }
            // Ringtones only this clock referenced are now orphans
            self.cleanup_ringtone(&clock.timer.ringtone, None);
            for alarm in &clock.alarms {
                self.cleanup_ringtone(&alarm.ringtone, None);
            }
        }
    }

    /// Remove every widget and all orphaned ringtone files
    pub fn clear_dashboard(&mut self) {
        let ringtones: Vec<String> = self
            .widgets
            .iter()
            .filter_map(|w| match w {
                Widget::Clock(clock) => Some(clock),
                _ => None,
            })
            .flat_map(|clock| {
                std::iter::once(clock.timer.ringtone.clone())
                    .chain(clock.alarms.iter().map(|a| a.ringtone.clone()))
            })
            .collect();

        self.widgets.clear();
        self.selected_index = 0;
        self.player.stop();
        self.ringing_clock = None;
        self.ui_mode = UiMode::Normal;
        self.needs_save = true;

        for name in ringtones {
            self.cleanup_ringtone(&name, None);
        }
    }

    // ---- Note editing ----

    pub fn start_note_edit(&mut self) {
        if let Some(Widget::Note(note)) = self.selected_widget() {
            self.note_cursor_pos = note.body.len();
            self.ui_mode = UiMode::EditingNote;
        }
    }

    pub fn note_add_char(&mut self, c: char) {
        let pos = self.note_cursor_pos;
        if let Some(Widget::Note(note)) = self.selected_widget_mut() {
            if pos <= note.body.len() && note.body.is_char_boundary(pos) {
                note.body.insert(pos, c);
                self.note_cursor_pos = pos + c.len_utf8();
            }
        }
    }

    pub fn note_backspace(&mut self) {
        let pos = self.note_cursor_pos;
        if let Some(Widget::Note(note)) = self.selected_widget_mut() {
            if pos > 0 {
                let mut new_pos = pos - 1;
                while new_pos > 0 && !note.body.is_char_boundary(new_pos) {
                    new_pos -= 1;
                }
                note.body.remove(new_pos);
                self.note_cursor_pos = new_pos;
            }
        }
    }

    pub fn finish_note_edit(&mut self) {
        self.ui_mode = UiMode::Normal;
        self.needs_save = true;
    }

    // ---- Ringtone import prompt ----

    pub fn open_ringtone_prompt(&mut self, target: RingtoneTarget) {
        self.ringtone_prompt = Some(RingtonePromptState {
            buffer: String::new(),
            target,
        });
        self.ui_mode = UiMode::RingtonePrompt;
    }

    pub fn cancel_ringtone_prompt(&mut self) {
        let target = self.ringtone_prompt.take().map(|p| p.target);
        self.ui_mode = match target {
            Some(RingtoneTarget::AlarmForm) => UiMode::AlarmForm,
            _ => UiMode::Normal,
        };
    }

    /// Copy the typed file into the ringtones directory and point the
    /// pending slot at it
    pub fn submit_ringtone_prompt(&mut self) {
        let Some(prompt) = self.ringtone_prompt.take() else {
            return;
        };
        let source = std::path::PathBuf::from(prompt.buffer.trim());
        match persistence::import_ringtone(&source) {
            Ok(name) => match prompt.target {
                RingtoneTarget::AlarmForm => {
                    if let Some(clock) = self.selected_clock_mut() {
                        if let Some(dialog) = &mut clock.dialog {
                            dialog.form_mut().ringtone = name;
                        }
                    }
                    self.ui_mode = UiMode::AlarmForm;
                }
                RingtoneTarget::Timer => {
                    let old = self
                        .selected_clock_mut()
                        .map(|clock| std::mem::replace(&mut clock.timer.ringtone, name));
                    if let Some(old) = old {
                        self.cleanup_ringtone(&old, None);
                    }
                    self.needs_save = true;
                    self.ui_mode = UiMode::Normal;
                }
            },
            Err(e) => {
                warn!("ringtone import failed: {}", e);
                self.ui_mode = match prompt.target {
                    RingtoneTarget::AlarmForm => UiMode::AlarmForm,
                    RingtoneTarget::Timer => UiMode::Normal,
                };
            }
        }
    }

    // ---- Alarm operations on the focused clock ----

    pub fn submit_alarm_form(&mut self) {
        let now = Local::now().naive_local();
        // Snapshot ringtones that may become orphans after an edit
        let old_ringtones: Vec<String> = self
            .selected_clock_mut()
            .map(|clock| clock.alarms.iter().map(|a| a.ringtone.clone()).collect())
            .unwrap_or_default();

        let submitted = self
            .selected_clock_mut()
            .map(|clock| clock.submit_alarm_form(now))
            .unwrap_or(false);

        if submitted {
            self.ui_mode = UiMode::Normal;
            self.needs_save = true;
            for name in old_ringtones {
                self.cleanup_ringtone(&name, None);
            }
        }
    }

    pub fn remove_selected_alarm(&mut self) {
        let now = Local::now().naive_local();
        let removed = self
            .selected_clock_mut()
            .and_then(|clock| clock.remove_selected_alarm(now));
        if let Some(alarm) = removed {
            self.needs_save = true;
            self.cleanup_ringtone(&alarm.ringtone, None);
            if self.ringing_clock.is_some() {
                // The ringing alarm may be the one just removed
                let still_ringing = self.widgets.iter().any(|w| {
                    matches!(w, Widget::Clock(c) if c.session.is_ringing())
                });
                if !still_ringing {
                    self.after_ring_action();
                }
            }
        }
    }

    pub fn toggle_selected_alarm(&mut self) {
        let now = Local::now().naive_local();
        let toggled = self
            .selected_clock_mut()
            .map(|clock| clock.toggle_selected_alarm(now))
            .unwrap_or(false);
        if toggled {
            self.needs_save = true;
        }
    }
}
