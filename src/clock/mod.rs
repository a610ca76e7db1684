pub mod scheduler;
pub mod session;

pub use scheduler::{AlarmScheduler, Fired};
pub use session::{RingSession, SessionOutcome};

use crate::domain::{
    toggle_active, Alarm, Countdown, Meridiem, Recurrence, TimeOfDay, TimerField,
    DEFAULT_RINGTONE,
};
use chrono::NaiveDateTime;
use uuid::Uuid;

/// Form state for creating or editing an alarm
#[derive(Debug, Clone)]
pub struct AlarmForm {
    pub label: String,
    pub hours: String,
    pub minutes: String,
    pub meridiem: Meridiem,
    pub recurrence: String, // "Once", "Weekend" or comma-separated day abbrevs
    pub ringtone: String,
    pub editing_field: usize, // 0 = label, 1 = hours, 2 = minutes, 3 = meridiem, 4 = recurrence, 5 = ringtone
}

pub const FORM_FIELDS: usize = 6;

impl Default for AlarmForm {
    fn default() -> Self {
        Self {
            label: String::new(),
            hours: "07".to_string(),
            minutes: "00".to_string(),
            meridiem: Meridiem::AM,
            recurrence: "Once".to_string(),
            ringtone: String::new(),
            editing_field: 0,
        }
    }
}

impl AlarmForm {
    pub fn from_alarm(alarm: &Alarm) -> Self {
        Self {
            label: alarm.label.clone(),
            hours: format!("{:02}", alarm.time.hour()),
            minutes: format!("{:02}", alarm.time.minute()),
            meridiem: alarm.time.meridiem(),
            recurrence: alarm.recurrence.to_string(),
            ringtone: alarm.ringtone.clone(),
            editing_field: 0,
        }
    }

    pub fn toggle_field(&mut self) {
        self.editing_field = (self.editing_field + 1) % FORM_FIELDS;
    }

    pub fn add_char(&mut self, c: char) {
        match self.editing_field {
            0 => self.label.push(c),
            1 | 2 => {
                // Time fields take digits only, two at most
                let buf = if self.editing_field == 1 {
                    &mut self.hours
                } else {
                    &mut self.minutes
                };
                if c.is_ascii_digit() && buf.len() < 2 {
                    buf.push(c);
                }
            }
            3 => {
                if c == ' ' {
                    self.meridiem = self.meridiem.toggled();
                }
            }
            4 => self.recurrence.push(c),
            5 => self.ringtone.push(c),
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.editing_field {
            0 => {
                self.label.pop();
            }
            1 => {
                self.hours.pop();
            }
            2 => {
                self.minutes.pop();
            }
            4 => {
                self.recurrence.pop();
            }
            5 => {
                self.ringtone.pop();
            }
            _ => {}
        }
    }

    /// None when the hour/minute buffers are out of range
    pub fn parsed_time(&self) -> Option<TimeOfDay> {
        let hour: u8 = self.hours.parse().ok()?;
        let minute: u8 = self.minutes.parse().ok()?;
        TimeOfDay::new(hour, minute, self.meridiem)
    }

    /// None when the recurrence text is empty or names an unknown day
    pub fn parsed_recurrence(&self) -> Option<Recurrence> {
        self.recurrence.parse().ok()
    }
}

/// Whether the open alarm form creates a new alarm or edits one
#[derive(Debug, Clone)]
pub enum AlarmDialog {
    Creating(AlarmForm),
    Editing { alarm_id: Uuid, form: AlarmForm },
}

impl AlarmDialog {
    pub fn form(&self) -> &AlarmForm {
        match self {
            AlarmDialog::Creating(form) => form,
            AlarmDialog::Editing { form, .. } => form,
        }
    }

    pub fn form_mut(&mut self) -> &mut AlarmForm {
        match self {
            AlarmDialog::Creating(form) => form,
            AlarmDialog::Editing { form, .. } => form,
        }
    }
}

/// What happened on one clock during a 1-second tick
#[derive(Debug, Default)]
pub struct TickOutcome {
    /// The countdown just reached zero; play this ringtone once
    pub timer_finished: Option<String>,
    /// An alarm started ringing on this clock
    pub fired: Option<Fired>,
    /// Alarm state mutated (postponements cleared); persist it
    pub alarms_changed: bool,
}

/// One clock widget: an alarm list plus a countdown timer
#[derive(Debug)]
pub struct ClockWidget {
    pub id: Uuid,
    pub alarms: Vec<Alarm>,
    pub timer: Countdown,
    pub timer_field: TimerField,
    pub scheduler: AlarmScheduler,
    pub session: RingSession,
    pub dialog: Option<AlarmDialog>,
    pub alarm_cursor: usize,
}

impl ClockWidget {
    pub fn new() -> Self {
        Self::from_parts(Uuid::new_v4(), Vec::new(), DEFAULT_RINGTONE.to_string())
    }

    pub fn from_parts(id: Uuid, alarms: Vec<Alarm>, timer_ringtone: String) -> Self {
        Self {
            id,
            alarms,
            timer: Countdown::with_ringtone(timer_ringtone),
            timer_field: TimerField::Hours,
            scheduler: AlarmScheduler::new(),
            session: RingSession::default(),
            dialog: None,
            alarm_cursor: 0,
        }
    }

    pub fn select_next_alarm(&mut self) {
        if !self.alarms.is_empty() && self.alarm_cursor + 1 < self.alarms.len() {
            self.alarm_cursor += 1;
        }
    }

    pub fn select_previous_alarm(&mut self) {
        self.alarm_cursor = self.alarm_cursor.saturating_sub(1);
    }

    pub fn selected_alarm(&self) -> Option<&Alarm> {
        self.alarms.get(self.alarm_cursor)
    }

    pub fn open_new_alarm_form(&mut self) {
        self.dialog = Some(AlarmDialog::Creating(AlarmForm::default()));
    }

    pub fn open_edit_alarm_form(&mut self) {
        if let Some(alarm) = self.alarms.get(self.alarm_cursor) {
            self.dialog = Some(AlarmDialog::Editing {
                alarm_id: alarm.id,
                form: AlarmForm::from_alarm(alarm),
            });
        }
    }

    pub fn cancel_alarm_form(&mut self) {
        self.dialog = None;
    }

    /// Apply the open form. Returns false (and keeps the form open)
    /// when the time or recurrence text does not parse.
    pub fn submit_alarm_form(&mut self, now: NaiveDateTime) -> bool {
        let Some(dialog) = &self.dialog else {
            return false;
        };
        let form = dialog.form();
        let (Some(time), Some(recurrence)) = (form.parsed_time(), form.parsed_recurrence())
        else {
            return false;
        };

        match self.dialog.take() {
            Some(AlarmDialog::Creating(form)) => {
                self.alarms
                    .push(Alarm::new(form.label, time, recurrence, form.ringtone));
                self.alarm_cursor = self.alarms.len() - 1;
            }
            Some(AlarmDialog::Editing { alarm_id, form }) => {
                if let Some(alarm) = self.alarms.iter_mut().find(|a| a.id == alarm_id) {
                    alarm.label = if form.label.trim().is_empty() {
                        crate::domain::DEFAULT_LABEL.to_string()
                    } else {
                        form.label
                    };
                    alarm.time = time;
                    alarm.recurrence = recurrence;
                    alarm.ringtone = if form.ringtone.trim().is_empty() {
                        DEFAULT_RINGTONE.to_string()
                    } else {
                        form.ringtone
                    };
                    // A rescheduled alarm forfeits any pending snooze
                    alarm.postponed = None;
                }
            }
            None => return false,
        }
        self.scheduler.rebuild(&self.alarms, now);
        true
    }

    /// Toggle the selected alarm, deactivating any same-time siblings
    pub fn toggle_selected_alarm(&mut self, now: NaiveDateTime) -> bool {
        let Some(id) = self.alarms.get(self.alarm_cursor).map(|a| a.id) else {
            return false;
        };
        toggle_active(&mut self.alarms, id);
        self.scheduler.rebuild(&self.alarms, now);
        true
    }

    /// Remove the selected alarm, returning it for ringtone cleanup
    pub fn remove_selected_alarm(&mut self, now: NaiveDateTime) -> Option<Alarm> {
        if self.alarm_cursor >= self.alarms.len() {
            return None;
        }
        let removed = self.alarms.remove(self.alarm_cursor);
        if self.alarm_cursor > 0 && self.alarm_cursor >= self.alarms.len() {
            self.alarm_cursor -= 1;
        }
        // A removed alarm cannot keep ringing
        if let RingSession::Ringing { alarm_id, .. } = &self.session {
            if *alarm_id == removed.id {
                self.session = RingSession::Idle;
            }
        }
        self.scheduler.rebuild(&self.alarms, now);
        Some(removed)
    }

    /// Advance the clock by one second of wall time
    pub fn tick(&mut self, now: NaiveDateTime) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if self.timer.tick() {
            outcome.timer_finished = Some(self.timer.ringtone.clone());
        }

        // One ringing alarm at a time. Polling would consume a due
        // entry and clear its postponement, so other alarms stay
        // queued until the session resolves.
        if !self.session.is_ringing() {
            if let Some(fired) = self.scheduler.poll(&mut self.alarms, now) {
                outcome.alarms_changed = true;
                self.session.begin(fired.alarm_id, fired.label.clone());
                outcome.fired = Some(fired);
            }
        }

        outcome
    }

    /// Stop the ringing alarm (one-shots deactivate)
    pub fn stop_ringing(&mut self, now: NaiveDateTime) -> bool {
        let outcome = self.session.stop(&mut self.alarms);
        if outcome == SessionOutcome::Changed {
            self.scheduler.rebuild(&self.alarms, now);
            true
        } else {
            false
        }
    }

    /// Snooze the ringing alarm ten minutes past its nominal time
    pub fn sleep_ringing(&mut self, now: NaiveDateTime) -> bool {
        let outcome = self.session.sleep(&mut self.alarms);
        if outcome == SessionOutcome::Changed {
            self.scheduler.rebuild(&self.alarms, now);
            true
        } else {
            false
        }
    }
}

impl Default for ClockWidget {
    fn default() -> Self {
        Self::new()
    }
}
