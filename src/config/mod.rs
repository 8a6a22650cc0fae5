//! Configuration module for Svar.
//!
//! Handles loading and managing application settings. Secret tokens are
//! read from the environment, never from the config file.

mod settings;

pub use settings::{
    AgentSettings, GeneralSettings, RecordsSettings, Settings, SlackSettings,
};
