//! Alarm management commands for CLI.

use chrono::{Local, NaiveDateTime};
use clap::Subcommand;
use daymate_core::alarm::parse_days;
use daymate_core::assistant::smart_alarm_suggestions;
use daymate_core::{
    time_until, Alarm, AlarmDraft, AlarmPatch, AlarmSound, AlarmStore, AlarmTime, Config,
    UserPreferences, WorkHours,
};

#[derive(Subcommand)]
pub enum AlarmAction {
    /// List alarms
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create an alarm
    Add {
        /// Alarm label
        label: String,
        /// Time as HH:MM (default: alarms.default_time)
        #[arg(long)]
        time: Option<String>,
        /// Comma-separated weekdays (e.g. "Mon,Wed,Fri"); makes the alarm recurring
        #[arg(long)]
        days: Option<String>,
        /// Sound: gentle, nature, classic or modern (default: alarms.default_sound)
        #[arg(long)]
        sound: Option<String>,
        /// Disable vibration
        #[arg(long)]
        no_vibration: bool,
        /// Enable smart wake
        #[arg(long)]
        smart_wake: bool,
        /// Create the alarm switched off
        #[arg(long)]
        disabled: bool,
    },
    /// Edit an alarm
    Edit {
        /// Alarm ID
        id: String,
        #[arg(long)]
        label: Option<String>,
        /// Time as HH:MM
        #[arg(long)]
        time: Option<String>,
        /// Comma-separated weekdays; makes the alarm recurring
        #[arg(long, conflicts_with = "once")]
        days: Option<String>,
        /// Make the alarm one-shot
        #[arg(long)]
        once: bool,
        #[arg(long)]
        sound: Option<String>,
        #[arg(long)]
        vibration: Option<bool>,
        #[arg(long)]
        smart_wake: Option<bool>,
    },
    /// Enable or disable an alarm
    Toggle {
        /// Alarm ID
        id: String,
    },
    /// Delete an alarm
    Delete {
        /// Alarm ID
        id: String,
    },
    /// Show the next alarm to ring
    Next {
        /// Reference time "YYYY-MM-DD HH:MM" (default: now)
        #[arg(long)]
        at: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Suggest alarm times from your routine
    Suggest {
        /// Preferred wake-up time (HH:MM)
        #[arg(long)]
        wake: Option<String>,
        /// Work start time (HH:MM)
        #[arg(long, requires = "work_end")]
        work_start: Option<String>,
        /// Work end time (HH:MM)
        #[arg(long, requires = "work_start")]
        work_end: Option<String>,
    },
}

fn format_delta(delta: chrono::Duration) -> String {
    let minutes = delta.num_minutes().max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

fn print_alarm(alarm: &Alarm) {
    let state = if alarm.is_enabled { "on " } else { "off" };
    let repeat = if alarm.is_recurring {
        alarm.days_label()
    } else {
        "once".to_string()
    };
    println!(
        "{}  [{}] {}  {}  ({}, sound: {}{}{})",
        alarm.id,
        state,
        alarm.time,
        alarm.label,
        repeat,
        alarm.sound,
        if alarm.vibration { ", vibration" } else { "" },
        if alarm.smart_wake { ", smart wake" } else { "" },
    );
}

fn parse_at(at: Option<String>) -> Result<NaiveDateTime, Box<dyn std::error::Error>> {
    match at {
        Some(s) => Ok(NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M")
            .map_err(|e| format!("invalid --at '{s}': {e} (expected YYYY-MM-DD HH:MM)"))?),
        None => Ok(Local::now().naive_local()),
    }
}

pub fn run(action: AlarmAction) -> Result<(), Box<dyn std::error::Error>> {
    let path = AlarmStore::default_path()?;
    let mut store = AlarmStore::load(&path)?;

    match action {
        AlarmAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(store.list())?);
            } else if store.is_empty() {
                println!("No alarms");
            } else {
                store.list().iter().for_each(print_alarm);
            }
        }
        AlarmAction::Add {
            label,
            time,
            days,
            sound,
            no_vibration,
            smart_wake,
            disabled,
        } => {
            let defaults = Config::load_or_default().alarms;
            let mut draft = AlarmDraft {
                label,
                time: defaults.default_time,
                sound: defaults.default_sound,
                vibration: !no_vibration,
                smart_wake,
                is_enabled: !disabled,
                ..AlarmDraft::default()
            };
            if let Some(time) = time {
                draft.time = time.parse::<AlarmTime>()?;
            }
            if let Some(days) = days {
                draft.days = parse_days(&days)?;
                draft.is_recurring = true;
            }
            if let Some(sound) = sound {
                draft.sound = sound.parse::<AlarmSound>()?;
            }

            let alarm = store.create(draft)?.clone();
            store.save(&path)?;
            println!("Alarm created: {}", alarm.id);
            println!("{}", serde_json::to_string_pretty(&alarm)?);
        }
        AlarmAction::Edit {
            id,
            label,
            time,
            days,
            once,
            sound,
            vibration,
            smart_wake,
        } => {
            let mut patch = AlarmPatch {
                label,
                vibration,
                smart_wake,
                ..AlarmPatch::default()
            };
            if let Some(time) = time {
                patch.time = Some(time.parse::<AlarmTime>()?);
            }
            if let Some(days) = days {
                patch.days = Some(parse_days(&days)?);
                patch.is_recurring = Some(true);
            }
            if once {
                patch.is_recurring = Some(false);
            }
            if let Some(sound) = sound {
                patch.sound = Some(sound.parse::<AlarmSound>()?);
            }
            if patch.is_empty() {
                return Err("nothing to update".into());
            }

            let alarm = store.update(&id, patch)?.clone();
            store.save(&path)?;
            println!("Alarm updated: {}", alarm.id);
            print_alarm(&alarm);
        }
        AlarmAction::Toggle { id } => {
            let enabled = store.toggle(&id)?;
            store.save(&path)?;
            println!("Alarm {id} {}", if enabled { "enabled" } else { "disabled" });
        }
        AlarmAction::Delete { id } => {
            let removed = store.delete(&id)?;
            store.save(&path)?;
            println!("Alarm deleted: {} ({})", removed.id, removed.label);
        }
        AlarmAction::Next { at, json } => {
            let now = parse_at(at)?;
            match store.next_alarm(now) {
                Some(alarm) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(alarm)?);
                    } else {
                        let delta = time_until(alarm, now).unwrap_or_else(chrono::Duration::zero);
                        println!(
                            "Next alarm: {} {} (in {})",
                            alarm.time,
                            alarm.label,
                            format_delta(delta)
                        );
                    }
                }
                None if json => println!("null"),
                None => println!("No upcoming alarms"),
            }
        }
        AlarmAction::Suggest {
            wake,
            work_start,
            work_end,
        } => {
            let wake_up_time = wake.map(|s| s.parse::<AlarmTime>()).transpose()?;
            let work_hours = match (work_start, work_end) {
                (Some(start), Some(end)) => Some(WorkHours {
                    start: start.parse::<AlarmTime>()?,
                    end: end.parse::<AlarmTime>()?,
                }),
                _ => None,
            };
            let prefs = UserPreferences {
                wake_up_time,
                work_hours,
            };
            for suggestion in smart_alarm_suggestions(&prefs) {
                println!("{suggestion}");
            }
        }
    }
    Ok(())
}
