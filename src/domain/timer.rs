use super::alarm::DEFAULT_RINGTONE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Countdown phase. `Locked` is the stopped-but-nonzero state: the
/// display is frozen and the fields are read-only until reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerPhase {
    Editing,
    Running,
    Locked,
}

/// Which duration field a timer edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerField {
    Hours,
    Minutes,
    Seconds,
}

impl TimerField {
    pub fn next(&self) -> Self {
        match self {
            Self::Hours => Self::Minutes,
            Self::Minutes => Self::Seconds,
            Self::Seconds => Self::Hours,
        }
    }
}

/// Single countdown timer, one per clock widget.
///
/// Only the ringtone reference is persisted; the countdown itself is
/// ephemeral and resets on restart.
#[derive(Debug, Clone)]
pub struct Countdown {
    hours: u8,
    minutes: u8,
    seconds: u8,
    initial_seconds: u32,
    progress: f64,
    phase: TimerPhase,
    pub ringtone: String,
}

impl Default for Countdown {
    fn default() -> Self {
        Self {
            hours: 0,
            minutes: 0,
            seconds: 0,
            initial_seconds: 0,
            progress: 0.0,
            phase: TimerPhase::Editing,
            ringtone: DEFAULT_RINGTONE.to_string(),
        }
    }
}

impl Countdown {
    pub fn with_ringtone(ringtone: String) -> Self {
        Self {
            ringtone,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    /// Progress fraction in [0, 100], growing as time elapses
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn total_seconds(&self) -> u32 {
        u32::from(self.hours) * 3600 + u32::from(self.minutes) * 60 + u32::from(self.seconds)
    }

    fn field_value(&mut self, field: TimerField) -> &mut u8 {
        match field {
            TimerField::Hours => &mut self.hours,
            TimerField::Minutes => &mut self.minutes,
            TimerField::Seconds => &mut self.seconds,
        }
    }

    /// Append a typed digit to a field, keeping the last two digits.
    /// Ignored unless the timer is editable. Fields are raw 0-99 values
    /// with no semantic clamp beyond the two digits.
    pub fn push_digit(&mut self, field: TimerField, digit: u8) {
        if self.phase != TimerPhase::Editing || digit > 9 {
            return;
        }
        let value = self.field_value(field);
        *value = (*value % 10) * 10 + digit;
    }

    /// Clear a field back to zero (backspace in the edit form)
    pub fn clear_field(&mut self, field: TimerField) {
        if self.phase == TimerPhase::Editing {
            *self.field_value(field) = 0;
        }
    }

    /// Start the countdown. No-op while running or when the displayed
    /// duration is zero.
    pub fn start(&mut self) {
        if self.phase == TimerPhase::Running {
            return;
        }
        let total = self.total_seconds();
        if total == 0 {
            return;
        }
        self.initial_seconds = total;
        self.progress = 0.0;
        self.phase = TimerPhase::Running;
    }

    /// Advance one second. Returns true exactly once, on the tick the
    /// countdown reaches zero; the caller owes a ringtone request.
    pub fn tick(&mut self) -> bool {
        if self.phase != TimerPhase::Running {
            return false;
        }

        let remaining = self.total_seconds().saturating_sub(1);
        self.hours = (remaining / 3600).min(99) as u8;
        self.minutes = ((remaining % 3600) / 60) as u8;
        self.seconds = (remaining % 60) as u8;

        if self.initial_seconds > 0 {
            self.progress =
                100.0 - (f64::from(remaining) / f64::from(self.initial_seconds)) * 100.0;
        }

        if remaining == 0 {
            // Expired: observably identical to a stop at zero
            self.phase = TimerPhase::Editing;
            return true;
        }
        false
    }

    /// User stop. Freezes a nonzero display; the caller cancels any
    /// pending playback either way.
    pub fn stop(&mut self) {
        if self.phase != TimerPhase::Running {
            return;
        }
        self.phase = if self.total_seconds() > 0 {
            TimerPhase::Locked
        } else {
            TimerPhase::Editing
        };
    }

    /// Back to an editable 00:00:00 from any phase
    pub fn reset(&mut self) {
        self.hours = 0;
        self.minutes = 0;
        self.seconds = 0;
        self.initial_seconds = 0;
        self.progress = 0.0;
        self.phase = TimerPhase::Editing;
    }

    pub fn is_editable(&self) -> bool {
        self.phase == TimerPhase::Editing
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}
