//! # Daymate Core Library
//!
//! Core logic for the Daymate productivity assistant. The CLI binary is a
//! thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Alarms**: alarm definitions, an ordered in-memory store with TOML
//!   persistence, and next-alarm selection
//! - **Assistant**: keyword-driven canned replies with an injectable random
//!   source, plus routine-based alarm suggestions
//! - **Backend**: HTTP client for the external chat/suggestions service
//! - **Chat**: conversation state that falls back to a fixed apology when
//!   the backend is unreachable
//! - **Storage**: TOML configuration and the data directory
//!
//! ## Key Components
//!
//! - [`select_next_alarm`]: soonest upcoming alarm
//! - [`AlarmStore`]: alarm create/update/toggle/delete
//! - [`Responder`]: rule-based reply selection
//! - [`ChatSession`]: message history and reply generation
//! - [`Config`]: application configuration management

pub mod alarm;
pub mod assistant;
pub mod backend;
pub mod chat;
pub mod error;
pub mod storage;

pub use alarm::{
    select_next_alarm, time_until, Alarm, AlarmDraft, AlarmPatch, AlarmSound, AlarmStore,
    AlarmTime, DayOfWeek,
};
pub use assistant::{Category, Reply, Responder, UserPreferences, WorkHours};
pub use backend::{BackendClient, HealthStatus};
pub use chat::{ChatSession, Message};
pub use error::{AlarmError, BackendError, ConfigError, CoreError, ValidationError};
pub use storage::Config;
