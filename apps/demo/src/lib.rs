//! # Herald demo
//!
//! Bootstraps configuration and logging, then walks an [`EventEmitter`]
//! through registration, emission, removal and one-shot listeners.
//!
//! [`EventEmitter`]: herald_events::EventEmitter

pub mod config;
pub mod error;
pub mod logging;
pub mod scenario;

pub use config::{DemoConfig, LogConfig, load_config};
pub use error::{DemoError, DemoErrorExt};
