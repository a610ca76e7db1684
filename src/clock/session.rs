use crate::domain::{Alarm, Recurrence};
use uuid::Uuid;

/// What a Stop/Sleep request did to the alarm set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Nothing was ringing
    Idle,
    /// Ringing ended; the alarm set changed (save and reschedule)
    Changed,
}

/// Tracks the alarm currently sounding on one clock. At most one rings
/// at a time; a second fire while ringing is dropped by the caller.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum RingSession {
    #[default]
    Idle,
    Ringing {
        alarm_id: Uuid,
        label: String,
    },
}

impl RingSession {
    pub fn is_ringing(&self) -> bool {
        matches!(self, RingSession::Ringing { .. })
    }

    pub fn begin(&mut self, alarm_id: Uuid, label: String) {
        *self = RingSession::Ringing { alarm_id, label };
    }

    /// Stop the ringing alarm. One-shot alarms are deactivated so they
    /// do not ring again tomorrow; recurring alarms stay armed.
    pub fn stop(&mut self, alarms: &mut [Alarm]) -> SessionOutcome {
        let alarm_id = match self {
            RingSession::Ringing { alarm_id, .. } => *alarm_id,
            RingSession::Idle => return SessionOutcome::Idle,
        };
        if let Some(alarm) = alarms.iter_mut().find(|a| a.id == alarm_id) {
            alarm.postponed = None;
            if alarm.recurrence == Recurrence::Once {
                alarm.active = false;
            }
        }
        *self = RingSession::Idle;
        SessionOutcome::Changed
    }

    /// Snooze the ringing alarm: postpone it ten minutes past its
    /// nominal time, keeping it active.
    pub fn sleep(&mut self, alarms: &mut [Alarm]) -> SessionOutcome {
        let alarm_id = match self {
            RingSession::Ringing { alarm_id, .. } => *alarm_id,
            RingSession::Idle => return SessionOutcome::Idle,
        };
        if let Some(alarm) = alarms.iter_mut().find(|a| a.id == alarm_id) {
            alarm.postponed = Some(alarm.time.snoozed());
        }
        *self = RingSession::Idle;
        SessionOutcome::Changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn alarm(time: &str, recurrence: &str) -> Alarm {
        let mut a = Alarm::new(
            "Wake".to_string(),
            time.parse().unwrap(),
            recurrence.parse().unwrap(),
            String::new(),
        );
        a.active = true;
        a
    }

    #[test]
    fn test_stop_deactivates_one_shot_alarm() {
        let mut alarms = vec![alarm("07:00 AM", "Once")];
        let mut session = RingSession::default();
        session.begin(alarms[0].id, alarms[0].label.clone());

        assert_eq!(session.stop(&mut alarms), SessionOutcome::Changed);
        assert!(!alarms[0].active);
        assert!(!session.is_ringing());
    }

    #[test]
    fn test_stop_keeps_recurring_alarm_active() {
        let mut alarms = vec![alarm("07:00 AM", "Mon, Wed, Fri")];
        let mut session = RingSession::default();
        session.begin(alarms[0].id, alarms[0].label.clone());

        assert_eq!(session.stop(&mut alarms), SessionOutcome::Changed);
        assert!(alarms[0].active);
    }

    #[test]
    fn test_sleep_postpones_ten_minutes_past_nominal() {
        let mut alarms = vec![alarm("07:00 AM", "Once")];
        let mut session = RingSession::default();
        session.begin(alarms[0].id, alarms[0].label.clone());

        assert_eq!(session.sleep(&mut alarms), SessionOutcome::Changed);
        assert_eq!(alarms[0].postponed, Some("07:10 AM".parse().unwrap()));
        assert!(alarms[0].active);
        assert!(!session.is_ringing());
    }

    #[test]
    fn test_sleep_wraps_past_noon() {
        let mut alarms = vec![alarm("11:55 AM", "Once")];
        let mut session = RingSession::default();
        session.begin(alarms[0].id, alarms[0].label.clone());

        session.sleep(&mut alarms);
        assert_eq!(alarms[0].postponed, Some("12:05 PM".parse().unwrap()));
    }

    #[test]
    fn test_requests_while_idle_are_no_ops() {
        let mut alarms = vec![alarm("07:00 AM", "Once")];
        let mut session = RingSession::default();

        assert_eq!(session.stop(&mut alarms), SessionOutcome::Idle);
        assert_eq!(session.sleep(&mut alarms), SessionOutcome::Idle);
        assert!(alarms[0].active);
        assert!(alarms[0].postponed.is_none());
    }
}
