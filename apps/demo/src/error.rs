use std::borrow::Cow;

/// Errors raised while bootstrapping the demo.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// Loading or deserializing the layered configuration failed.
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    /// A global tracing subscriber is already installed.
    #[error("Tracing subscriber error{}: {source}", format_context(.context))]
    Subscriber {
        source: tracing_subscriber::util::TryInitError,
        context: Option<Cow<'static, str>>,
    },

    /// A configuration value is syntactically valid but unusable.
    #[error("Invalid configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Attaches human-readable context to fallible bootstrap steps.
pub trait DemoErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, DemoError>;
}

impl<T> DemoErrorExt<T> for Result<T, DemoError> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                DemoError::Config { context: c, .. }
                | DemoError::Subscriber { context: c, .. }
                | DemoError::InvalidConfiguration { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl<T> DemoErrorExt<T> for Result<T, config::ConfigError> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, DemoError> {
        self.map_err(|source| DemoError::Config { source, context: Some(context.into()) })
    }
}

impl<T> DemoErrorExt<T> for Result<T, tracing_subscriber::util::TryInitError> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, DemoError> {
        self.map_err(|source| DemoError::Subscriber { source, context: Some(context.into()) })
    }
}

impl From<config::ConfigError> for DemoError {
    fn from(source: config::ConfigError) -> Self {
        Self::Config { source, context: None }
    }
}

impl From<tracing_subscriber::util::TryInitError> for DemoError {
    fn from(source: tracing_subscriber::util::TryInitError) -> Self {
        Self::Subscriber { source, context: None }
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
