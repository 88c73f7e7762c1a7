pub mod alarm;
pub mod chat;
pub mod config;
