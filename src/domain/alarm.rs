use super::time_of_day::TimeOfDay;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// File name of the bundled fallback ringtone inside the data directory
pub const DEFAULT_RINGTONE: &str = "alarm-default.mp3";

/// Label applied when the user leaves the field empty
pub const DEFAULT_LABEL: &str = "New Alarm";

/// Which calendar days an alarm is eligible to fire on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Recurrence {
    /// Fires on any day; deactivated by an explicit Stop while ringing
    Once,
    /// Saturday or Sunday
    Weekend,
    /// Explicit weekday set, serialized as "Mon, Wed, Fri"
    Days(Vec<Weekday>),
}

impl Recurrence {
    /// Whether the alarm may fire on `day`
    pub fn allows(&self, day: Weekday) -> bool {
        match self {
            Self::Once => true,
            Self::Weekend => matches!(day, Weekday::Sat | Weekday::Sun),
            Self::Days(days) => days.contains(&day),
        }
    }
}

fn day_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

fn parse_day(abbrev: &str) -> Option<Weekday> {
    match abbrev {
        "Mon" => Some(Weekday::Mon),
        "Tue" => Some(Weekday::Tue),
        "Wed" => Some(Weekday::Wed),
        "Thu" => Some(Weekday::Thu),
        "Fri" => Some(Weekday::Fri),
        "Sat" => Some(Weekday::Sat),
        "Sun" => Some(Weekday::Sun),
        _ => None,
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Once => write!(f, "Once"),
            Self::Weekend => write!(f, "Weekend"),
            Self::Days(days) => {
                let parts: Vec<&str> = days.iter().copied().map(day_abbrev).collect();
                write!(f, "{}", parts.join(", "))
            }
        }
    }
}

impl FromStr for Recurrence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err("empty recurrence".to_string()),
            "Once" => Ok(Self::Once),
            "Weekend" => Ok(Self::Weekend),
            other => {
                let days: Option<Vec<Weekday>> =
                    other.split(',').map(|part| parse_day(part.trim())).collect();
                match days {
                    Some(days) if !days.is_empty() => Ok(Self::Days(days)),
                    _ => Err(format!("bad recurrence: {other:?}")),
                }
            }
        }
    }
}

impl TryFrom<String> for Recurrence {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Recurrence> for String {
    fn from(value: Recurrence) -> Self {
        value.to_string()
    }
}

/// A single alarm belonging to a clock widget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alarm {
    /// Unique id, assigned at creation, immutable
    pub id: Uuid,
    pub label: String,
    /// Nominal trigger time
    pub time: TimeOfDay,
    pub recurrence: Recurrence,
    /// The alarm only fires on its nominal time when true
    pub active: bool,
    /// One-shot override trigger set by snooze, cleared on fire or stop
    #[serde(default)]
    pub postponed: Option<TimeOfDay>,
    /// Ringtone file name inside the data directory
    pub ringtone: String,
}

impl Alarm {
    pub fn new(label: String, time: TimeOfDay, recurrence: Recurrence, ringtone: String) -> Self {
        let label = if label.trim().is_empty() {
            DEFAULT_LABEL.to_string()
        } else {
            label
        };
        let ringtone = if ringtone.trim().is_empty() {
            DEFAULT_RINGTONE.to_string()
        } else {
            ringtone
        };
        Self {
            id: Uuid::new_v4(),
            label,
            time,
            recurrence,
            active: false,
            postponed: None,
            ringtone,
        }
    }
}

/// Toggle an alarm's active state, enforcing the one-active-per-time
/// invariant: any other alarm sharing the toggled alarm's nominal time is
/// deactivated and loses its postponement. The toggled alarm's own
/// postponement is also cleared.
pub fn toggle_active(alarms: &mut [Alarm], id: Uuid) {
    let Some(time) = alarms.iter().find(|a| a.id == id).map(|a| a.time) else {
        return;
    };

    for alarm in alarms.iter_mut() {
        if alarm.id == id {
            alarm.active = !alarm.active;
            alarm.postponed = None;
        } else if alarm.time == time {
            alarm.active = false;
            alarm.postponed = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn alarm_at(time: &str) -> Alarm {
        Alarm::new(
            "Test".to_string(),
            time.parse().unwrap(),
            Recurrence::Once,
            String::new(),
        )
    }

    #[test]
    fn test_recurrence_round_trip() {
        for s in ["Once", "Weekend", "Mon, Wed, Fri", "Sat"] {
            let r: Recurrence = s.parse().unwrap();
            assert_eq!(r.to_string(), s);
        }
    }

    #[test]
    fn test_recurrence_rejects_empty_and_garbage() {
        assert!("".parse::<Recurrence>().is_err());
        assert!("Mon, Funday".parse::<Recurrence>().is_err());
    }

    #[test]
    fn test_recurrence_allows() {
        let weekdays: Recurrence = "Mon, Wed, Fri".parse().unwrap();
        assert!(weekdays.allows(Weekday::Wed));
        assert!(!weekdays.allows(Weekday::Tue));

        assert!(Recurrence::Weekend.allows(Weekday::Sat));
        assert!(Recurrence::Weekend.allows(Weekday::Sun));
        assert!(!Recurrence::Weekend.allows(Weekday::Mon));

        assert!(Recurrence::Once.allows(Weekday::Thu));
    }

    #[test]
    fn test_alarm_defaults() {
        let alarm = alarm_at("06:00 PM");
        assert_eq!(alarm.label, "Test");
        assert_eq!(alarm.ringtone, DEFAULT_RINGTONE);
        assert!(!alarm.active);
        assert!(alarm.postponed.is_none());

        let unnamed = Alarm::new(
            "  ".to_string(),
            "06:00 PM".parse().unwrap(),
            Recurrence::Once,
            String::new(),
        );
        assert_eq!(unnamed.label, DEFAULT_LABEL);
    }

    #[test]
    fn test_toggle_active_deactivates_same_time() {
        let mut alarms = vec![alarm_at("06:00 AM"), alarm_at("06:00 AM"), alarm_at("07:00 AM")];
        alarms[0].active = true;
        alarms[0].postponed = Some("06:10 AM".parse().unwrap());
        alarms[2].active = true;

        let id = alarms[1].id;
        toggle_active(&mut alarms, id);

        // The toggled alarm is now the only active one for 06:00 AM,
        // and the displaced alarm's postponement is gone
        assert!(!alarms[0].active);
        assert!(alarms[0].postponed.is_none());
        assert!(alarms[1].active);
        // Alarms at other times are untouched
        assert!(alarms[2].active);
    }

    #[test]
    fn test_toggle_active_clears_own_postponement() {
        let mut alarms = vec![alarm_at("06:00 AM")];
        alarms[0].active = true;
        alarms[0].postponed = Some("06:10 AM".parse().unwrap());

        let id = alarms[0].id;
        toggle_active(&mut alarms, id);

        assert!(!alarms[0].active);
        assert!(alarms[0].postponed.is_none());
    }

    #[test]
    fn test_toggle_active_unknown_id_is_noop() {
        let mut alarms = vec![alarm_at("06:00 AM")];
        toggle_active(&mut alarms, Uuid::new_v4());
        assert!(!alarms[0].active);
    }

    #[test]
    fn test_alarm_serde_round_trip() {
        let mut alarm = alarm_at("11:55 PM");
        alarm.recurrence = "Mon, Fri".parse().unwrap();
        alarm.postponed = Some("12:05 AM".parse().unwrap());

        let json = serde_json::to_string(&alarm).unwrap();
        let back: Alarm = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, alarm.id);
        assert_eq!(back.time, alarm.time);
        assert_eq!(back.recurrence, alarm.recurrence);
        assert_eq!(back.postponed, alarm.postponed);
    }
}
