//! Next-alarm selection.
//!
//! Finds the soonest alarm that will ring after a given local time. All
//! deltas are `chrono::Duration`, so recurring and one-shot candidates
//! compete in the same unit.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use tracing::debug;

use super::{Alarm, DayOfWeek, MINUTES_PER_DAY};

/// Time until `alarm` next rings, as seen from `now`.
///
/// Returns `None` when the alarm is disabled, when it is a one-shot alarm
/// whose time today is not strictly after `now`, or when it is a recurring
/// alarm not scheduled on today's weekday.
///
/// Recurring alarms only look at today's weekday. If today's slot has
/// already passed, the delta wraps to the same time tomorrow even when
/// tomorrow is not one of the alarm's days, so the result can be early.
/// An alarm whose slot equals the current minute rings a day after the
/// start of that minute.
///
/// Both kinds are measured from `now` itself, seconds included.
pub fn time_until(alarm: &Alarm, now: NaiveDateTime) -> Option<Duration> {
    if !alarm.is_enabled {
        return None;
    }

    if alarm.is_recurring {
        if !alarm.recurs_on(DayOfWeek::from(now.weekday())) {
            return None;
        }
        let current = now.hour() * 60 + now.minute();
        let target = alarm.time.minutes_since_midnight();
        let diff = if target > current {
            target - current
        } else {
            MINUTES_PER_DAY - (current - target)
        };
        let into_minute =
            Duration::seconds(now.second() as i64) + Duration::nanoseconds(now.nanosecond() as i64);
        Some(Duration::minutes(diff as i64) - into_minute)
    } else {
        let ring_at = now.date().and_time(alarm.time.to_naive_time());
        (ring_at > now).then(|| ring_at - now)
    }
}

/// Select the enabled alarm that rings soonest after `now`.
///
/// Ties go to the alarm that appears first in `alarms`.
pub fn select_next_alarm(alarms: &[Alarm], now: NaiveDateTime) -> Option<&Alarm> {
    let mut best: Option<(&Alarm, Duration)> = None;

    for alarm in alarms {
        let Some(diff) = time_until(alarm, now) else {
            continue;
        };
        match best {
            Some((_, min)) if diff >= min => {}
            _ => best = Some((alarm, diff)),
        }
    }

    if let Some((alarm, diff)) = &best {
        debug!(
            alarm_id = %alarm.id,
            minutes = diff.num_minutes(),
            "selected next alarm"
        );
    }
    best.map(|(alarm, _)| alarm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::{AlarmSound, AlarmTime};
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    // 2024-01-15 is a Monday.
    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn one_shot(id: &str, time: &str) -> Alarm {
        Alarm {
            id: id.to_string(),
            time: time.parse().unwrap(),
            label: format!("alarm {id}"),
            is_enabled: true,
            is_recurring: false,
            days: BTreeSet::new(),
            sound: AlarmSound::Gentle,
            vibration: true,
            smart_wake: false,
        }
    }

    fn recurring(id: &str, time: &str, days: &[DayOfWeek]) -> Alarm {
        Alarm {
            is_recurring: true,
            days: days.iter().copied().collect(),
            ..one_shot(id, time)
        }
    }

    #[test]
    fn one_shot_in_future_is_selected() {
        let alarms = vec![one_shot("a", "07:00")];
        assert_eq!(select_next_alarm(&alarms, at(15, 6, 0)).map(|a| a.id.as_str()), Some("a"));
    }

    #[test]
    fn one_shot_in_past_is_ignored() {
        let alarms = vec![one_shot("a", "07:00")];
        assert!(select_next_alarm(&alarms, at(15, 8, 0)).is_none());
    }

    #[test]
    fn one_shot_at_exact_now_is_not_upcoming() {
        let alarms = vec![one_shot("a", "07:00")];
        assert!(select_next_alarm(&alarms, at(15, 7, 0)).is_none());
    }

    #[test]
    fn one_shot_delta_accounts_for_seconds() {
        let alarm = one_shot("a", "07:00");
        let now = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(6, 59, 30)
            .unwrap();
        assert_eq!(time_until(&alarm, now), Some(Duration::seconds(30)));
    }

    #[test]
    fn disabled_alarm_is_never_selected() {
        let mut near = one_shot("near", "06:05");
        near.is_enabled = false;
        let alarms = vec![near, one_shot("far", "09:00")];
        assert_eq!(select_next_alarm(&alarms, at(15, 6, 0)).map(|a| a.id.as_str()), Some("far"));
    }

    #[test]
    fn recurring_not_scheduled_today_is_skipped() {
        let alarms = vec![recurring("weekend", "06:30", &[DayOfWeek::Sat, DayOfWeek::Sun])];
        assert!(select_next_alarm(&alarms, at(15, 6, 0)).is_none());
    }

    #[test]
    fn recurring_later_today() {
        let alarm = recurring("wk", "07:00", &DayOfWeek::WEEKDAYS);
        assert_eq!(time_until(&alarm, at(15, 6, 0)), Some(Duration::minutes(60)));
    }

    #[test]
    fn recurring_past_slot_wraps_to_tomorrow() {
        let alarm = recurring("wk", "07:00", &DayOfWeek::WEEKDAYS);
        assert_eq!(time_until(&alarm, at(15, 8, 0)), Some(Duration::minutes(23 * 60)));
    }

    #[test]
    fn recurring_wrap_ignores_whether_tomorrow_is_scheduled() {
        // Friday 2024-01-19, alarm only on Fri: wraps to "tomorrow" anyway.
        let alarm = recurring("fri", "07:00", &[DayOfWeek::Fri]);
        assert_eq!(time_until(&alarm, at(19, 8, 0)), Some(Duration::minutes(23 * 60)));
    }

    #[test]
    fn recurring_at_current_minute_reports_full_day() {
        let alarm = recurring("wk", "07:00", &DayOfWeek::WEEKDAYS);
        assert_eq!(time_until(&alarm, at(15, 7, 0)), Some(Duration::minutes(1440)));
    }

    #[test]
    fn recurring_and_one_shot_compare_in_same_unit() {
        // one-shot in 30 min beats recurring in 60 min
        let alarms = vec![
            recurring("rec", "07:00", &DayOfWeek::WEEKDAYS),
            one_shot("once", "06:30"),
        ];
        assert_eq!(select_next_alarm(&alarms, at(15, 6, 0)).map(|a| a.id.as_str()), Some("once"));
    }

    #[test]
    fn ties_go_to_first_alarm() {
        let alarms = vec![
            one_shot("first", "07:00"),
            one_shot("second", "07:00"),
            recurring("third", "07:00", &DayOfWeek::ALL),
        ];
        assert_eq!(select_next_alarm(&alarms, at(15, 6, 0)).map(|a| a.id.as_str()), Some("first"));
    }

    #[test]
    fn recurring_delta_accounts_for_seconds() {
        let alarm = recurring("wk", "07:00", &DayOfWeek::WEEKDAYS);
        let now = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(6, 0, 30)
            .unwrap();
        assert_eq!(time_until(&alarm, now), Some(Duration::seconds(3570)));
    }

    #[test]
    fn ties_go_to_first_alarm_mid_minute() {
        let now = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(6, 0, 30)
            .unwrap();
        let alarms = vec![
            recurring("rec", "07:00", &DayOfWeek::ALL),
            one_shot("once", "07:00"),
        ];
        assert_eq!(select_next_alarm(&alarms, now).map(|a| a.id.as_str()), Some("rec"));

        let alarms = vec![
            one_shot("once", "07:00"),
            recurring("rec", "07:00", &DayOfWeek::ALL),
        ];
        assert_eq!(select_next_alarm(&alarms, now).map(|a| a.id.as_str()), Some("once"));
    }

    #[test]
    fn empty_list_has_no_next_alarm() {
        assert!(select_next_alarm(&[], at(15, 6, 0)).is_none());
    }

    #[test]
    fn sample_alarms_on_saturday_pick_weekend_wakeup() {
        let alarms = crate::alarm::sample_alarms();
        // 2024-01-20 is a Saturday
        let next = select_next_alarm(&alarms, at(20, 6, 0)).unwrap();
        assert_eq!(next.label, "Weekend Wake-up");
        assert_eq!(next.time, AlarmTime::new(8, 30).unwrap());
    }
}
