//! Configuration module for druidkit.
//!
//! Handles endpoint, retry, timeout and authentication settings.

mod settings;

pub use settings::{expand_env_vars, AuthSettings, Settings, SettingsError, TimeoutSettings};
