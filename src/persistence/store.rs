use crate::domain::{Alarm, ClickerSettings, Note, DEFAULT_RINGTONE};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Persisted form of one clock widget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockRecord {
    pub id: Uuid,
    #[serde(default)]
    pub alarms: Vec<Alarm>,
    #[serde(default = "default_timer_ringtone")]
    pub timer_ringtone: String,
}

fn default_timer_ringtone() -> String {
    DEFAULT_RINGTONE.to_string()
}

/// The whole dashboard stored in dashboard.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub clocks: Vec<ClockRecord>,
    #[serde(default)]
    pub clicker: Option<ClickerSettings>,
}

impl Dashboard {
    /// Count how many alarms and timers reference a ringtone file,
    /// skipping `exclude` (the alarm about to change or be removed).
    pub fn ringtone_references(&self, name: &str, exclude: Option<Uuid>) -> usize {
        let mut count = 0;
        for clock in &self.clocks {
            if clock.timer_ringtone == name {
                count += 1;
            }
            for alarm in &clock.alarms {
                if Some(alarm.id) == exclude {
                    continue;
                }
                if alarm.ringtone == name {
                    count += 1;
                }
            }
        }
        count
    }

    /// Whether a ringtone file may be deleted once `exclude` lets go
    /// of it. The bundled default is never deleted.
    pub fn ringtone_unused(&self, name: &str, exclude: Option<Uuid>) -> bool {
        name != DEFAULT_RINGTONE && self.ringtone_references(name, exclude) == 0
    }
}

/// Load the dashboard document, defaulting when the file is missing
pub fn load_dashboard<P: AsRef<Path>>(path: P) -> Result<Dashboard> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Dashboard::default());
    }

    let content = std::fs::read_to_string(path)?;
    let dashboard: Dashboard = serde_json::from_str(&content)?;
    Ok(dashboard)
}

/// Save the dashboard document atomically
pub fn save_dashboard<P: AsRef<Path>>(path: P, dashboard: &Dashboard) -> Result<()> {
    let json = serde_json::to_string_pretty(dashboard)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn alarm_with_ringtone(ringtone: &str) -> Alarm {
        Alarm::new(
            "Wake".to_string(),
            "07:00 AM".parse().unwrap(),
            "Once".parse().unwrap(),
            ringtone.to_string(),
        )
    }

    #[test]
    fn test_load_nonexistent_dashboard() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("dashboard.json");

        let dashboard = load_dashboard(&path).unwrap();
        assert!(dashboard.notes.is_empty());
        assert!(dashboard.clocks.is_empty());
        assert!(dashboard.clicker.is_none());
    }

    #[test]
    fn test_save_and_load_dashboard() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("dashboard.json");

        let mut dashboard = Dashboard::default();
        let mut note = Note::new();
        note.body = "buy milk".to_string();
        dashboard.notes.push(note);
        dashboard.clocks.push(ClockRecord {
            id: Uuid::new_v4(),
            alarms: vec![alarm_with_ringtone("chime.mp3")],
            timer_ringtone: DEFAULT_RINGTONE.to_string(),
        });

        save_dashboard(&path, &dashboard).unwrap();

        let loaded = load_dashboard(&path).unwrap();
        assert_eq!(loaded.notes.len(), 1);
        assert_eq!(loaded.notes[0].body, "buy milk");
        assert_eq!(loaded.clocks.len(), 1);
        assert_eq!(loaded.clocks[0].alarms[0].ringtone, "chime.mp3");
    }

    #[test]
    fn test_ringtone_reference_counting() {
        let mut dashboard = Dashboard::default();
        let first = alarm_with_ringtone("chime.mp3");
        let second = alarm_with_ringtone("chime.mp3");
        let second_id = second.id;
        dashboard.clocks.push(ClockRecord {
            id: Uuid::new_v4(),
            alarms: vec![first, second],
            timer_ringtone: "chime.mp3".to_string(),
        });

        assert_eq!(dashboard.ringtone_references("chime.mp3", None), 3);
        // Excluding one alarm still leaves the other alarm and the timer
        assert!(!dashboard.ringtone_unused("chime.mp3", Some(second_id)));
    }

    #[test]
    fn test_unused_ringtone_may_be_deleted() {
        let mut dashboard = Dashboard::default();
        let alarm = alarm_with_ringtone("rare.mp3");
        let id = alarm.id;
        dashboard.clocks.push(ClockRecord {
            id: Uuid::new_v4(),
            alarms: vec![alarm],
            timer_ringtone: DEFAULT_RINGTONE.to_string(),
        });

        assert!(dashboard.ringtone_unused("rare.mp3", Some(id)));
    }

    #[test]
    fn test_default_ringtone_is_never_deleted() {
        let dashboard = Dashboard::default();
        assert!(!dashboard.ringtone_unused(DEFAULT_RINGTONE, None));
    }
}
