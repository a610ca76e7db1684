use crate::domain::{Alarm, TimeOfDay};
use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use uuid::Uuid;

/// Which trigger an entry was computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Trigger {
    Nominal,
    Postponed,
}

/// A computed future fire instant for one alarm
#[derive(Debug, Clone, PartialEq, Eq)]
struct FireEntry {
    at: NaiveDateTime,
    /// Insertion sequence; ties fire in alarm iteration order
    seq: u64,
    alarm_id: Uuid,
    trigger: Trigger,
}

impl Ord for FireEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.at, self.seq).cmp(&(other.at, other.seq))
    }
}

impl PartialOrd for FireEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A fired alarm, reported to the owning clock widget
#[derive(Debug, Clone)]
pub struct Fired {
    pub alarm_id: Uuid,
    pub label: String,
    /// Nominal time, shown in the ringing modal (even for postponed fires)
    pub time: TimeOfDay,
    pub ringtone: String,
}

/// Decides, once per 1-second tick, whether exactly one alarm fires.
///
/// Instead of re-deriving every alarm against the wall clock each tick,
/// the scheduler keeps a min-heap of computed next-fire instants and
/// re-validates the winning entry against current alarm state at fire
/// time. The observable contract is unchanged from a per-tick scan:
/// minute-granularity matching, at most one fire per tick, recurrence
/// gate on nominal triggers, postponed triggers exempt from the gate.
#[derive(Debug, Default)]
pub struct AlarmScheduler {
    queue: BinaryHeap<Reverse<FireEntry>>,
    next_seq: u64,
    /// Last fire instant per alarm, truncated to the minute. Guards
    /// against a refire inside the same minute after a clock jump.
    fired_at: HashMap<Uuid, NaiveDateTime>,
}

/// Start of the minute containing `t`
fn minute_floor(t: NaiveDateTime) -> NaiveDateTime {
    t.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}

/// Next instant with the given time of day, no earlier than the minute
/// containing `after`. Matching is minute-granular, so the minute that
/// is still in progress at `after` remains eligible.
fn next_at(time: TimeOfDay, after: NaiveDateTime) -> NaiveDateTime {
    let candidate = after.date().and_time(time.to_naive());
    if candidate >= minute_floor(after) {
        candidate
    } else {
        candidate + Duration::days(1)
    }
}

/// Next instant the nominal trigger is eligible, honoring recurrence
fn next_nominal(alarm: &Alarm, after: NaiveDateTime) -> Option<NaiveDateTime> {
    for offset in 0..=7 {
        let date = after.date() + Duration::days(offset);
        let at = date.and_time(alarm.time.to_naive());
        if at >= minute_floor(after) && alarm.recurrence.allows(date.weekday()) {
            return Some(at);
        }
    }
    None
}

impl AlarmScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, at: NaiveDateTime, alarm_id: Uuid, trigger: Trigger) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(FireEntry {
            at,
            seq,
            alarm_id,
            trigger,
        }));
    }

    /// Recompute the queue from the alarm set. Call after any alarm
    /// mutation (create, edit, toggle, remove, snooze).
    pub fn rebuild(&mut self, alarms: &[Alarm], now: NaiveDateTime) {
        self.queue.clear();
        for alarm in alarms {
            if let Some(postponed) = alarm.postponed {
                self.push(next_at(postponed, now), alarm.id, Trigger::Postponed);
            }
            if alarm.active {
                if let Some(at) = next_nominal(alarm, now) {
                    self.push(at, alarm.id, Trigger::Nominal);
                }
            }
        }
    }

    /// One evaluation pass. Pops every due entry, re-validates it
    /// against current alarm state, and fires at most one alarm.
    /// Firing clears that alarm's postponement and reschedules its
    /// nominal trigger; the alarm itself stays active.
    pub fn poll(&mut self, alarms: &mut [Alarm], now: NaiveDateTime) -> Option<Fired> {
        self.fired_at
            .retain(|_, at| *at + Duration::minutes(2) > now);

        while let Some(Reverse(entry)) = self.queue.peek() {
            if entry.at > now {
                return None;
            }
            let entry = match self.queue.pop() {
                Some(Reverse(entry)) => entry,
                None => return None,
            };

            let Some(alarm) = alarms.iter_mut().find(|a| a.id == entry.alarm_id) else {
                continue; // removed since scheduling
            };

            // A missed minute (system sleep, clock jump) makes the entry
            // stale; skip the fire and reschedule, matching the original
            // poll's silent-skip behavior.
            let due = match entry.trigger {
                Trigger::Postponed => alarm
                    .postponed
                    .is_some_and(|p| p.matches(now.time())),
                Trigger::Nominal => {
                    alarm.active
                        && alarm.time.matches(now.time())
                        && alarm.recurrence.allows(now.weekday())
                }
            };

            let minute = now - Duration::seconds(i64::from(now.time().second()));
            let already_fired = self
                .fired_at
                .get(&alarm.id)
                .is_some_and(|at| *at == minute);

            // Rescheduling from inside the pop loop must land beyond
            // the current minute, or a due entry would be popped again
            // in this same pass.
            let horizon = minute_floor(now) + Duration::minutes(1);

            if due && !already_fired {
                alarm.postponed = None;
                self.fired_at.insert(alarm.id, minute);
                let fired = Fired {
                    alarm_id: alarm.id,
                    label: alarm.label.clone(),
                    time: alarm.time,
                    ringtone: alarm.ringtone.clone(),
                };
                if alarm.active {
                    if let Some(at) = next_nominal(alarm, horizon) {
                        self.push(at, alarm.id, Trigger::Nominal);
                    }
                }
                return Some(fired);
            }

            // Stale or deduplicated entry: keep the alarm scheduled
            match entry.trigger {
                Trigger::Postponed => {
                    if let Some(postponed) = alarm.postponed {
                        self.push(next_at(postponed, horizon), alarm.id, Trigger::Postponed);
                    }
                }
                Trigger::Nominal => {
                    if alarm.active {
                        if let Some(at) = next_nominal(alarm, horizon) {
                            self.push(at, alarm.id, Trigger::Nominal);
                        }
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Recurrence;
    use chrono::{NaiveDate, Timelike};
    use pretty_assertions::assert_eq;

    // 2024-01-03 is a Wednesday, 2024-01-06 a Saturday
    fn wednesday(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 3)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn saturday(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 6)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn alarm(time: &str, recurrence: &str, active: bool) -> Alarm {
        let mut a = Alarm::new(
            "Wake".to_string(),
            time.parse().unwrap(),
            recurrence.parse().unwrap(),
            String::new(),
        );
        a.active = active;
        a
    }

    fn fire_at(
        alarms: &mut [Alarm],
        built_at: NaiveDateTime,
        poll_at: NaiveDateTime,
    ) -> Option<Fired> {
        let mut sched = AlarmScheduler::new();
        sched.rebuild(alarms, built_at);
        sched.poll(alarms, poll_at)
    }

    #[test]
    fn test_weekday_set_gates_nominal_fire() {
        let mut alarms = vec![alarm("06:00 AM", "Mon, Wed, Fri", true)];
        let fired = fire_at(&mut alarms, wednesday(5, 59, 0), wednesday(6, 0, 0));
        assert!(fired.is_some());

        let mut alarms = vec![alarm("06:00 AM", "Tue, Thu", true)];
        let fired = fire_at(&mut alarms, wednesday(5, 59, 0), wednesday(6, 0, 0));
        assert!(fired.is_none());
    }

    #[test]
    fn test_weekend_fires_on_saturday() {
        let mut alarms = vec![alarm("06:00 AM", "Weekend", true)];
        assert!(fire_at(&mut alarms, saturday(5, 59, 0), saturday(6, 0, 0)).is_some());

        let mut alarms = vec![alarm("06:00 AM", "Weekend", true)];
        assert!(fire_at(&mut alarms, wednesday(5, 59, 0), wednesday(6, 0, 0)).is_none());
    }

    #[test]
    fn test_inactive_alarm_does_not_fire() {
        let mut alarms = vec![alarm("06:00 AM", "Once", false)];
        assert!(fire_at(&mut alarms, wednesday(5, 59, 0), wednesday(6, 0, 0)).is_none());
    }

    #[test]
    fn test_postponed_fire_bypasses_recurrence_gate() {
        // Recurrence would never allow a Wednesday, but the snoozed
        // time is a one-shot override
        let mut alarms = vec![alarm("06:00 AM", "Tue, Thu", true)];
        alarms[0].postponed = Some("06:10 AM".parse().unwrap());

        let fired = fire_at(&mut alarms, wednesday(6, 5, 0), wednesday(6, 10, 0));
        let fired = fired.expect("postponed alarm should fire");
        assert_eq!(fired.alarm_id, alarms[0].id);
        // Postponement is cleared on fire
        assert!(alarms[0].postponed.is_none());
    }

    #[test]
    fn test_fire_reports_nominal_time_and_ringtone() {
        let mut alarms = vec![alarm("06:00 AM", "Once", true)];
        let fired = fire_at(&mut alarms, wednesday(5, 59, 0), wednesday(6, 0, 0)).unwrap();
        assert_eq!(fired.label, "Wake");
        assert_eq!(fired.time, "06:00 AM".parse().unwrap());
        assert_eq!(fired.ringtone, crate::domain::DEFAULT_RINGTONE);
    }

    #[test]
    fn test_at_most_one_fire_per_tick() {
        let mut alarms = vec![
            alarm("06:00 AM", "Once", true),
            alarm("06:00 AM", "Once", true),
        ];
        let first_id = alarms[0].id;
        let second_id = alarms[1].id;

        let mut sched = AlarmScheduler::new();
        sched.rebuild(&alarms, wednesday(5, 59, 0));

        // First tick: only the first (iteration order) fires
        let fired = sched.poll(&mut alarms, wednesday(6, 0, 0)).unwrap();
        assert_eq!(fired.alarm_id, first_id);

        // Next tick, same minute: the second still matches and fires
        let fired = sched.poll(&mut alarms, wednesday(6, 0, 1)).unwrap();
        assert_eq!(fired.alarm_id, second_id);
    }

    #[test]
    fn test_rebuild_mid_minute_keeps_pending_fire() {
        // A rebuild partway through the trigger minute (user stopped
        // another alarm, toggled a widget) must not push a still-due
        // alarm to the next day
        let mut alarms = vec![alarm("06:00 AM", "Once", true)];
        let fired = fire_at(&mut alarms, wednesday(6, 0, 10), wednesday(6, 0, 11));
        assert!(fired.is_some());

        let mut alarms = vec![alarm("06:00 AM", "Tue, Thu", true)];
        alarms[0].postponed = Some("06:00 AM".parse().unwrap());
        let fired = fire_at(&mut alarms, wednesday(6, 0, 10), wednesday(6, 0, 11));
        assert!(fired.is_some());
    }

    #[test]
    fn test_no_refire_within_the_same_minute() {
        let mut alarms = vec![alarm("06:00 AM", "Once", true)];
        let mut sched = AlarmScheduler::new();
        sched.rebuild(&alarms, wednesday(5, 59, 0));

        assert!(sched.poll(&mut alarms, wednesday(6, 0, 0)).is_some());
        for s in 1..60 {
            assert!(sched.poll(&mut alarms, wednesday(6, 0, s)).is_none());
        }
    }

    #[test]
    fn test_recurring_alarm_stays_active_and_reschedules() {
        let mut alarms = vec![alarm("06:00 AM", "Mon, Wed, Fri", true)];
        let mut sched = AlarmScheduler::new();
        sched.rebuild(&alarms, wednesday(5, 59, 0));

        assert!(sched.poll(&mut alarms, wednesday(6, 0, 0)).is_some());
        assert!(alarms[0].active);

        // Friday 2024-01-05
        let friday = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        assert!(sched.poll(&mut alarms, friday).is_some());
    }

    #[test]
    fn test_missed_minute_skips_silently() {
        // The process slept through the trigger minute; the stale entry
        // must neither fire late nor wedge the queue
        let mut alarms = vec![alarm("06:00 AM", "Once", true)];
        let mut sched = AlarmScheduler::new();
        sched.rebuild(&alarms, wednesday(5, 59, 0));

        assert!(sched.poll(&mut alarms, wednesday(6, 5, 0)).is_none());

        // Rescheduled for the next day
        let thursday = NaiveDate::from_ymd_opt(2024, 1, 4)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        assert!(sched.poll(&mut alarms, thursday).is_some());
    }

    #[test]
    fn test_next_at_rolls_to_tomorrow_after_the_minute() {
        let time: TimeOfDay = "06:00 AM".parse().unwrap();

        // The minute still in progress stays eligible today
        let at = next_at(time, wednesday(6, 0, 30));
        assert_eq!(at.date(), NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());

        let at = next_at(time, wednesday(6, 1, 0));
        assert_eq!(at.date(), NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        assert_eq!(at.time().hour(), 6);
    }
}
