use crate::config::LogConfig;
use crate::error::{DemoError, DemoErrorExt};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global tracing subscriber: env filter plus a compact console layer.
///
/// # Errors
/// Returns [`DemoError::InvalidConfiguration`] for an unknown level or a malformed
/// filter, and [`DemoError::Subscriber`] if a global subscriber is already set.
pub fn init(config: &LogConfig) -> Result<(), DemoError> {
    let filter = build_env_filter(config)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false).with_ansi(config.ansi))
        .try_init()
        .context("Failed to install console logger")
}

/// Resolves the level and filter settings into an [`EnvFilter`].
///
/// # Errors
/// Returns [`DemoError::InvalidConfiguration`] if either setting cannot be parsed.
pub fn build_env_filter(config: &LogConfig) -> Result<EnvFilter, DemoError> {
    let level = config.level.parse::<LevelFilter>().map_err(|e| {
        DemoError::InvalidConfiguration {
            message: format!("Invalid log level '{}': {e}", config.level).into(),
            context: None,
        }
    })?;

    let builder = EnvFilter::builder().with_default_directive(level.into());
    config.filter.as_ref().map_or_else(
        || Ok(builder.from_env_lossy()),
        |filter| {
            builder.parse(filter).map_err(|e| DemoError::InvalidConfiguration {
                message: format!("Invalid env filter '{filter}': {e}").into(),
                context: None,
            })
        },
    )
}
