//! Alarm storage.
//!
//! [`AlarmStore`] is an ordered in-memory list with explicit
//! create/update/toggle/delete operations. Order is insertion order and
//! matters: it is the tie-break for [`select_next_alarm`]. The CLI keeps the
//! list between runs in `alarms.toml` under the data directory.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{sample_alarms, select_next_alarm, Alarm, AlarmDraft, AlarmPatch};
use crate::error::{AlarmError, CoreError, Result};
use crate::storage::data_dir;

/// Wrapper for serializing alarms to TOML
#[derive(Serialize, Deserialize)]
struct AlarmsFile {
    #[serde(default)]
    alarms: Vec<Alarm>,
}

#[derive(Debug, Clone, Default)]
pub struct AlarmStore {
    alarms: Vec<Alarm>,
}

impl AlarmStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with the sample morning and weekend alarms.
    pub fn with_samples() -> Self {
        Self {
            alarms: sample_alarms(),
        }
    }

    pub fn list(&self) -> &[Alarm] {
        &self.alarms
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Alarm> {
        self.alarms.iter().find(|a| a.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Alarm> {
        self.alarms
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AlarmError::NotFound(id.to_string()).into())
    }

    /// Validate the draft and append it as a new alarm.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the label is empty; the store is left
    /// unchanged.
    pub fn create(&mut self, draft: AlarmDraft) -> Result<&Alarm> {
        draft.validate()?;
        let alarm = draft.into_alarm(Uuid::new_v4().to_string());
        info!(alarm_id = %alarm.id, time = %alarm.time, "alarm created");
        self.alarms.push(alarm);
        let idx = self.alarms.len() - 1;
        Ok(&self.alarms[idx])
    }

    /// Apply a partial update in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the alarm does not exist or the patch carries an
    /// empty label.
    pub fn update(&mut self, id: &str, patch: AlarmPatch) -> Result<&Alarm> {
        patch.validate()?;
        let alarm = self.get_mut(id)?;
        patch.apply(alarm);
        info!(alarm_id = %id, "alarm updated");
        Ok(alarm)
    }

    /// Flip `is_enabled`, returning the new state.
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        let alarm = self.get_mut(id)?;
        alarm.is_enabled = !alarm.is_enabled;
        info!(alarm_id = %id, enabled = alarm.is_enabled, "alarm toggled");
        Ok(alarm.is_enabled)
    }

    pub fn delete(&mut self, id: &str) -> Result<Alarm> {
        let idx = self
            .alarms
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| CoreError::from(AlarmError::NotFound(id.to_string())))?;
        info!(alarm_id = %id, "alarm deleted");
        Ok(self.alarms.remove(idx))
    }

    pub fn next_alarm(&self, now: NaiveDateTime) -> Option<&Alarm> {
        select_next_alarm(&self.alarms, now)
    }

    /// Default location of the alarms file.
    pub fn default_path() -> Result<PathBuf> {
        let dir = data_dir().map_err(CoreError::Config)?;
        Ok(dir.join("alarms.toml"))
    }

    /// Load alarms from `path`. A missing file yields the sample alarms.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::with_samples());
        }
        let content = std::fs::read_to_string(path)?;
        let file: AlarmsFile = toml::from_str(&content)?;
        Ok(Self { alarms: file.alarms })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = AlarmsFile {
            alarms: self.alarms.clone(),
        };
        let content = toml::to_string_pretty(&file)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
