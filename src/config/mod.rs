//! Configuration module for dbdoc.
//!
//! Handles connection parameters, pool settings, and the settings file.

mod connection;
mod settings;

pub use connection::{ConnectionError, ConnectionParams, Driver};
pub use settings::{
    expand_env_vars, ConnectionSettings, EngineSettings, OutputSettings, PoolSettings, Settings,
    SettingsError,
};
