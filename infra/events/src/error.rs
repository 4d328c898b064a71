use std::borrow::Cow;

/// Errors reported by the event emitter.
///
/// Registry operations themselves are total; the only failure source is a
/// listener panicking while it is being invoked.
#[derive(Debug, thiserror::Error)]
pub enum EmitterError {
    /// One or more listeners panicked during a [`try_emit`](crate::EventEmitter::try_emit) pass.
    /// Delivery to the remaining listeners still took place.
    #[error("Listener panicked{}: {message}", format_context(.context))]
    ListenerPanicked { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
