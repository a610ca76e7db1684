use super::enums::Meridiem;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minutes added by a snooze
pub const SNOOZE_MINUTES: u32 = 10;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// A 12-hour clock time with meridiem, the alarm trigger value.
///
/// Canonical string shape is `"HH:MM AM"` with zero-padded fields,
/// hours in [1,12] and minutes in [0,59]. Matching against wall-clock
/// time is done at minute granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
    meridiem: Meridiem,
}

impl TimeOfDay {
    /// Construct a time of day, rejecting out-of-range fields
    pub fn new(hour: u8, minute: u8, meridiem: Meridiem) -> Option<Self> {
        if (1..=12).contains(&hour) && minute <= 59 {
            Some(Self {
                hour,
                minute,
                meridiem,
            })
        } else {
            None
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn meridiem(&self) -> Meridiem {
        self.meridiem
    }

    /// Minutes since midnight, mapping 12 AM -> 0 and 12 PM -> 12:00
    pub fn minutes_from_midnight(&self) -> u32 {
        let mut hour = u32::from(self.hour) % 12;
        if self.meridiem == Meridiem::PM {
            hour += 12;
        }
        hour * 60 + u32::from(self.minute)
    }

    /// Inverse of `minutes_from_midnight`, wrapping past 24h
    pub fn from_minutes(total: u32) -> Self {
        let total = total % MINUTES_PER_DAY;
        let hour24 = total / 60;
        let minute = (total % 60) as u8;
        let meridiem = if hour24 >= 12 {
            Meridiem::PM
        } else {
            Meridiem::AM
        };
        let hour = match hour24 % 12 {
            0 => 12,
            h => h as u8,
        };
        Self {
            hour,
            minute,
            meridiem,
        }
    }

    /// A new time exactly `minutes` later, carrying across the hour,
    /// the 12<->1 boundary and the noon/midnight transition
    pub fn plus_minutes(&self, minutes: u32) -> Self {
        Self::from_minutes(self.minutes_from_midnight() + minutes)
    }

    /// The postponed time a snooze produces
    pub fn snoozed(&self) -> Self {
        self.plus_minutes(SNOOZE_MINUTES)
    }

    /// Truncate a wall-clock time to minute granularity
    pub fn from_naive(time: NaiveTime) -> Self {
        Self::from_minutes(time.hour() * 60 + time.minute())
    }

    /// Whether a wall-clock time, truncated to the minute, equals this value
    pub fn matches(&self, time: NaiveTime) -> bool {
        *self == Self::from_naive(time)
    }

    /// The same instant as a `NaiveTime` with zero seconds
    pub fn to_naive(&self) -> NaiveTime {
        let total = self.minutes_from_midnight();
        // Range is always valid: total < 1440
        NaiveTime::from_hms_opt(total / 60, total % 60, 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02} {}",
            self.hour,
            self.minute,
            self.meridiem.to_tag()
        )
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (clock, meridiem) = s
            .trim()
            .split_once(' ')
            .ok_or_else(|| format!("missing meridiem in time: {s:?}"))?;
        let meridiem = Meridiem::from_tag(meridiem.trim())
            .ok_or_else(|| format!("bad meridiem in time: {s:?}"))?;
        let (hours, minutes) = clock
            .split_once(':')
            .ok_or_else(|| format!("missing ':' in time: {s:?}"))?;
        let hour: u8 = hours
            .parse()
            .map_err(|_| format!("bad hours in time: {s:?}"))?;
        let minute: u8 = minutes
            .parse()
            .map_err(|_| format!("bad minutes in time: {s:?}"))?;
        Self::new(hour, minute, meridiem).ok_or_else(|| format!("time out of range: {s:?}"))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tod(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_format_round_trip() {
        for s in ["06:00 PM", "12:00 AM", "12:30 PM", "01:05 AM", "11:59 PM"] {
            assert_eq!(tod(s).to_string(), s);
        }
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!("00:30 AM".parse::<TimeOfDay>().is_err());
        assert!("13:00 PM".parse::<TimeOfDay>().is_err());
        assert!("10:60 AM".parse::<TimeOfDay>().is_err());
        assert!("10:30".parse::<TimeOfDay>().is_err());
        assert!("10:30 XX".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn test_minutes_from_midnight() {
        assert_eq!(tod("12:00 AM").minutes_from_midnight(), 0);
        assert_eq!(tod("01:00 AM").minutes_from_midnight(), 60);
        assert_eq!(tod("12:00 PM").minutes_from_midnight(), 12 * 60);
        assert_eq!(tod("11:59 PM").minutes_from_midnight(), 24 * 60 - 1);
    }

    #[test]
    fn test_snooze_simple_carry() {
        assert_eq!(tod("06:00 AM").snoozed(), tod("06:10 AM"));
        assert_eq!(tod("06:55 AM").snoozed(), tod("07:05 AM"));
    }

    #[test]
    fn test_snooze_noon_and_midnight_wrap() {
        // 12-hour wraparound at both transitions
        assert_eq!(tod("11:55 AM").snoozed(), tod("12:05 PM"));
        assert_eq!(tod("11:55 PM").snoozed(), tod("12:05 AM"));
        assert_eq!(tod("12:55 PM").snoozed(), tod("01:05 PM"));
        assert_eq!(tod("12:55 AM").snoozed(), tod("01:05 AM"));
    }

    #[test]
    fn test_matches_truncates_seconds() {
        let t = tod("06:00 AM");
        assert!(t.matches(NaiveTime::from_hms_opt(6, 0, 0).unwrap()));
        assert!(t.matches(NaiveTime::from_hms_opt(6, 0, 42).unwrap()));
        assert!(!t.matches(NaiveTime::from_hms_opt(6, 1, 0).unwrap()));
        assert!(!t.matches(NaiveTime::from_hms_opt(18, 0, 0).unwrap()));
    }

    #[test]
    fn test_to_naive() {
        assert_eq!(
            tod("06:30 PM").to_naive(),
            NaiveTime::from_hms_opt(18, 30, 0).unwrap()
        );
        assert_eq!(
            tod("12:00 AM").to_naive(),
            NaiveTime::from_hms_opt(0, 0, 0).unwrap()
        );
    }
}
