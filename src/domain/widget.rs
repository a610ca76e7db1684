use super::enums::{ClickButton, ClickKind};
use crate::clock::ClockWidget;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sticky note: free text, edited inline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    #[serde(default)]
    pub body: String,
}

impl Note {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            body: String::new(),
        }
    }
}

impl Default for Note {
    fn default() -> Self {
        Self::new()
    }
}

/// Auto-clicker settings row. The actual input synthesis belongs to the
/// host platform; this widget owns the configuration and the armed flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickerSettings {
    pub id: Uuid,
    pub interval_ms: u64,
    pub button: ClickButton,
    pub click_kind: ClickKind,
    pub trigger_key: String,
    #[serde(default)]
    pub armed: bool,
}

impl ClickerSettings {
    pub const MIN_INTERVAL_MS: u64 = 10;
    pub const INTERVAL_STEP_MS: u64 = 10;

    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            interval_ms: 100,
            button: ClickButton::Left,
            click_kind: ClickKind::Single,
            trigger_key: "`".to_string(),
            armed: false,
        }
    }

    pub fn increase_interval(&mut self) {
        self.interval_ms = self.interval_ms.saturating_add(Self::INTERVAL_STEP_MS);
    }

    pub fn decrease_interval(&mut self) {
        self.interval_ms = self
            .interval_ms
            .saturating_sub(Self::INTERVAL_STEP_MS)
            .max(Self::MIN_INTERVAL_MS);
    }
}

impl Default for ClickerSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// One widget on the grid
#[derive(Debug)]
pub enum Widget {
    Note(Note),
    Clock(Box<ClockWidget>),
    AutoClicker(ClickerSettings),
}

impl Widget {
    pub fn id(&self) -> Uuid {
        match self {
            Self::Note(note) => note.id,
            Self::Clock(clock) => clock.id,
            Self::AutoClicker(clicker) => clicker.id,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Note(_) => "Note",
            Self::Clock(_) => "Clock",
            Self::AutoClicker(_) => "Auto Clicker",
        }
    }

    pub fn as_clock_mut(&mut self) -> Option<&mut ClockWidget> {
        match self {
            Self::Clock(clock) => Some(clock),
            _ => None,
        }
    }

    pub fn as_clock(&self) -> Option<&ClockWidget> {
        match self {
            Self::Clock(clock) => Some(clock),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clicker_interval_floor() {
        let mut clicker = ClickerSettings::new();
        clicker.interval_ms = 10;
        clicker.decrease_interval();
        assert_eq!(clicker.interval_ms, ClickerSettings::MIN_INTERVAL_MS);

        clicker.increase_interval();
        assert_eq!(clicker.interval_ms, 20);
    }

    #[test]
    fn test_widget_id_dispatch() {
        let note = Note::new();
        let id = note.id;
        let widget = Widget::Note(note);
        assert_eq!(widget.id(), id);
        assert_eq!(widget.title(), "Note");
    }
}
