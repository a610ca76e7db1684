pub mod alarm;
pub mod enums;
pub mod time_of_day;
pub mod timer;
pub mod widget;

pub use alarm::{toggle_active, Alarm, Recurrence, DEFAULT_LABEL, DEFAULT_RINGTONE};
pub use enums::{ClickButton, ClickKind, Meridiem, UiMode};
pub use time_of_day::{TimeOfDay, SNOOZE_MINUTES};
pub use timer::{Countdown, TimerField, TimerPhase};
pub use widget::{ClickerSettings, Note, Widget};
