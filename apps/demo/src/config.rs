use crate::error::{DemoError, DemoErrorExt};
use config::{Config, Environment, File};
use herald_events::EmitterConfig;
use serde::Deserialize;
use std::path::Path;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "herald";

/// Prefix of environment overrides, e.g. `HERALD__EMITTER__PANIC_POLICY=isolate`.
pub const ENV_PREFIX: &str = "HERALD";

/// Top-level demo configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub log: LogConfig,
    pub emitter: EmitterConfig,
}

/// Console logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default level directive (`trace`, `debug`, `info`, `warn`, `error`, `off`).
    pub level: String,
    /// Explicit filter such as `herald_events=trace`; `RUST_LOG` is used when absent.
    pub filter: Option<String>,
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), filter: None, ansi: true }
    }
}

/// Loads the demo configuration from a file layered with environment overrides.
///
/// 1. **Base file**: `path` if given (must exist), otherwise an optional
///    `herald.{toml,json,...}` in the working directory.
/// 2. **Environment**: variables prefixed with `HERALD__`, nested keys separated
///    by `__` (`HERALD__LOG__LEVEL=debug` maps to `log.level`).
///
/// # Errors
/// Returns [`DemoError::Config`] if an explicit file is missing, a source cannot
/// be parsed, or the merged values do not fit [`DemoConfig`].
pub fn load_config(path: Option<&Path>) -> Result<DemoConfig, DemoError> {
    let file = path.map_or_else(
        || File::with_name(DEFAULT_CONFIG_FILE).required(false),
        |p| File::from(p).required(true),
    );

    Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .convert_case(config::Case::Snake),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<DemoConfig>()
        .context("Failed to deserialize config")
}
