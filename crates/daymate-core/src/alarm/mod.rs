//! Alarm definitions, form input and validation.
//!
//! An [`Alarm`] is either one-shot (rings once today at its time) or
//! recurring (rings on a set of weekdays). Times are stored as
//! [`AlarmTime`], which can only hold a valid 24h `HH:MM` value, so the
//! selector in [`next`] never has to deal with malformed input.

pub mod next;
pub mod store;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{AlarmError, ValidationError};

pub use next::{select_next_alarm, time_until};
pub use store::AlarmStore;

/// Message shown when an alarm form is submitted without a label.
pub const EMPTY_LABEL_MESSAGE: &str = "Please enter a label for the alarm";

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Wall-clock time of day an alarm rings at, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AlarmTime {
    hour: u8,
    minute: u8,
}

impl AlarmTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, AlarmError> {
        if hour > 23 || minute > 59 {
            return Err(AlarmError::InvalidTime {
                value: format!("{hour:02}:{minute:02}"),
            });
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Minutes since midnight (0..1440).
    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        // hour/minute are range-checked on construction
        NaiveTime::from_hms_opt(self.hour as u32, self.minute as u32, 0).unwrap_or_default()
    }

    /// Shift back by `minutes`, wrapping around midnight.
    pub fn wrapping_sub_minutes(&self, minutes: u32) -> Self {
        let total = (self.minutes_since_midnight() + MINUTES_PER_DAY
            - minutes % MINUTES_PER_DAY)
            % MINUTES_PER_DAY;
        Self {
            hour: (total / 60) as u8,
            minute: (total % 60) as u8,
        }
    }
}

impl Default for AlarmTime {
    fn default() -> Self {
        Self { hour: 7, minute: 0 }
    }
}

impl fmt::Display for AlarmTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for AlarmTime {
    type Err = AlarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AlarmError::InvalidTime {
            value: s.to_string(),
        };
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;

        let is_digits = |part: &str, max_len: usize| {
            !part.is_empty() && part.len() <= max_len && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !is_digits(h, 2) || m.len() != 2 || !is_digits(m, 2) {
            return Err(invalid());
        }

        let hour: u8 = h.parse().map_err(|_| invalid())?;
        let minute: u8 = m.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for AlarmTime {
    type Error = AlarmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AlarmTime> for String {
    fn from(time: AlarmTime) -> Self {
        time.to_string()
    }
}

/// Day of week, Monday first. Serialized as the three-letter abbreviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Mon,
        DayOfWeek::Tue,
        DayOfWeek::Wed,
        DayOfWeek::Thu,
        DayOfWeek::Fri,
        DayOfWeek::Sat,
        DayOfWeek::Sun,
    ];

    pub const WEEKDAYS: [DayOfWeek; 5] = [
        DayOfWeek::Mon,
        DayOfWeek::Tue,
        DayOfWeek::Wed,
        DayOfWeek::Thu,
        DayOfWeek::Fri,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Mon => "Mon",
            DayOfWeek::Tue => "Tue",
            DayOfWeek::Wed => "Wed",
            DayOfWeek::Thu => "Thu",
            DayOfWeek::Fri => "Fri",
            DayOfWeek::Sat => "Sat",
            DayOfWeek::Sun => "Sun",
        }
    }
}

impl From<chrono::Weekday> for DayOfWeek {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => DayOfWeek::Mon,
            chrono::Weekday::Tue => DayOfWeek::Tue,
            chrono::Weekday::Wed => DayOfWeek::Wed,
            chrono::Weekday::Thu => DayOfWeek::Thu,
            chrono::Weekday::Fri => DayOfWeek::Fri,
            chrono::Weekday::Sat => DayOfWeek::Sat,
            chrono::Weekday::Sun => DayOfWeek::Sun,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = AlarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        DayOfWeek::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| AlarmError::InvalidDay(s.to_string()))
    }
}

/// Ringtone played when the alarm fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmSound {
    #[default]
    Gentle,
    Nature,
    Classic,
    Modern,
}

impl AlarmSound {
    pub const ALL: [AlarmSound; 4] = [
        AlarmSound::Gentle,
        AlarmSound::Nature,
        AlarmSound::Classic,
        AlarmSound::Modern,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlarmSound::Gentle => "gentle",
            AlarmSound::Nature => "nature",
            AlarmSound::Classic => "classic",
            AlarmSound::Modern => "modern",
        }
    }
}

impl fmt::Display for AlarmSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlarmSound {
    type Err = AlarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        AlarmSound::ALL
            .into_iter()
            .find(|sound| sound.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| AlarmError::InvalidSound(s.to_string()))
    }
}

/// A stored alarm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarm {
    pub id: String,
    pub time: AlarmTime,
    pub label: String,
    pub is_enabled: bool,
    pub is_recurring: bool,
    /// Only consulted when `is_recurring` is set.
    #[serde(default)]
    pub days: BTreeSet<DayOfWeek>,
    #[serde(default)]
    pub sound: AlarmSound,
    #[serde(default = "default_true")]
    pub vibration: bool,
    #[serde(default)]
    pub smart_wake: bool,
}

fn default_true() -> bool {
    true
}

impl Alarm {
    /// Whether a recurring alarm is scheduled on `day`. Always false for
    /// one-shot alarms.
    pub fn recurs_on(&self, day: DayOfWeek) -> bool {
        self.is_recurring && self.days.contains(&day)
    }

    /// Human-readable day list, e.g. "Mon, Tue, Wed".
    pub fn days_label(&self) -> String {
        self.days
            .iter()
            .map(DayOfWeek::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Alarm form input, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmDraft {
    pub time: AlarmTime,
    pub label: String,
    pub is_enabled: bool,
    pub is_recurring: bool,
    pub days: BTreeSet<DayOfWeek>,
    pub sound: AlarmSound,
    pub vibration: bool,
    pub smart_wake: bool,
}

impl Default for AlarmDraft {
    fn default() -> Self {
        Self {
            time: AlarmTime::default(),
            label: String::new(),
            is_enabled: true,
            is_recurring: false,
            days: BTreeSet::new(),
            sound: AlarmSound::Gentle,
            vibration: true,
            smart_wake: false,
        }
    }
}

impl AlarmDraft {
    pub fn new(label: impl Into<String>, time: AlarmTime) -> Self {
        Self {
            label: label.into(),
            time,
            ..Self::default()
        }
    }

    /// Add `day` if absent, remove it if present.
    pub fn toggle_day(&mut self, day: DayOfWeek) {
        if !self.days.remove(&day) {
            self.days.insert(day);
        }
    }

    /// # Errors
    ///
    /// Returns an error if the label is empty or whitespace.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_label(&self.label)
    }

    pub(crate) fn into_alarm(self, id: String) -> Alarm {
        Alarm {
            id,
            time: self.time,
            label: self.label.trim().to_string(),
            is_enabled: self.is_enabled,
            is_recurring: self.is_recurring,
            days: self.days,
            sound: self.sound,
            vibration: self.vibration,
            smart_wake: self.smart_wake,
        }
    }
}

/// Partial update for an existing alarm. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlarmPatch {
    pub time: Option<AlarmTime>,
    pub label: Option<String>,
    pub is_enabled: Option<bool>,
    pub is_recurring: Option<bool>,
    pub days: Option<BTreeSet<DayOfWeek>>,
    pub sound: Option<AlarmSound>,
    pub vibration: Option<bool>,
    pub smart_wake: Option<bool>,
}

impl AlarmPatch {
    /// # Errors
    ///
    /// Returns an error if a new label is given and it is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.label {
            Some(label) => validate_label(label),
            None => Ok(()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply(self, alarm: &mut Alarm) {
        if let Some(time) = self.time {
            alarm.time = time;
        }
        if let Some(label) = self.label {
            alarm.label = label.trim().to_string();
        }
        if let Some(enabled) = self.is_enabled {
            alarm.is_enabled = enabled;
        }
        if let Some(recurring) = self.is_recurring {
            alarm.is_recurring = recurring;
        }
        if let Some(days) = self.days {
            alarm.days = days;
        }
        if let Some(sound) = self.sound {
            alarm.sound = sound;
        }
        if let Some(vibration) = self.vibration {
            alarm.vibration = vibration;
        }
        if let Some(smart_wake) = self.smart_wake {
            alarm.smart_wake = smart_wake;
        }
    }
}

fn validate_label(label: &str) -> Result<(), ValidationError> {
    if label.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "label".to_string(),
            message: EMPTY_LABEL_MESSAGE.to_string(),
        });
    }
    Ok(())
}

/// Parse a comma-separated day list such as "Mon,Wed,fri".
///
/// # Errors
///
/// Returns an error on the first unknown abbreviation.
pub fn parse_days(list: &str) -> Result<BTreeSet<DayOfWeek>, AlarmError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

/// The two alarms a fresh install starts with.
pub fn sample_alarms() -> Vec<Alarm> {
    vec![
        Alarm {
            id: "1".to_string(),
            time: AlarmTime { hour: 7, minute: 0 },
            label: "Morning Alarm".to_string(),
            is_enabled: true,
            is_recurring: true,
            days: DayOfWeek::WEEKDAYS.into_iter().collect(),
            sound: AlarmSound::Gentle,
            vibration: true,
            smart_wake: true,
        },
        Alarm {
            id: "2".to_string(),
            time: AlarmTime { hour: 8, minute: 30 },
            label: "Weekend Wake-up".to_string(),
            is_enabled: true,
            is_recurring: true,
            days: [DayOfWeek::Sat, DayOfWeek::Sun].into_iter().collect(),
            sound: AlarmSound::Nature,
            vibration: false,
            smart_wake: false,
        },
    ]
}
