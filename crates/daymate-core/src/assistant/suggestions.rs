//! Alarm suggestions derived from the user's routine.

use serde::{Deserialize, Serialize};

use crate::alarm::AlarmTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkHours {
    pub start: AlarmTime,
    pub end: AlarmTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub wake_up_time: Option<AlarmTime>,
    pub work_hours: Option<WorkHours>,
}

/// Suggestion chips for setting an alarm.
///
/// Uses the preferred wake-up time when known, otherwise offers 7, 8 and
/// 9 AM. With work hours set, also suggests one hour before work starts.
pub fn smart_alarm_suggestions(prefs: &UserPreferences) -> Vec<String> {
    let mut suggestions = match prefs.wake_up_time {
        Some(time) => vec![format!("Set alarm for {time}")],
        None => vec![
            "Set 7:00 AM alarm".to_string(),
            "Set 8:00 AM alarm".to_string(),
            "Set 9:00 AM alarm".to_string(),
        ],
    };

    if let Some(work) = prefs.work_hours {
        let wake = work.start.wrapping_sub_minutes(60);
        suggestions.push(format!("Set alarm for {wake} (1 hour before work)"));
    }

    suggestions
}
