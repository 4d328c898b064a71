use serde::Deserialize;

/// What `emit` does when a listener panics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanicPolicy {
    /// Fail fast: the panic unwinds out of `emit`, later listeners in the same
    /// pass are skipped.
    #[default]
    Propagate,
    /// Catch the panic, log it and keep delivering to the remaining listeners.
    Isolate,
}

/// Emitter tuning knobs.
///
/// Deserializable so it can be embedded into an application config file:
///
/// ```toml
/// [emitter]
/// panic_policy = "isolate"
/// max_listeners = 32
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    pub panic_policy: PanicPolicy,
    /// Soft per-event listener threshold. Crossing it logs a possible-leak
    /// warning; registration still succeeds. `0` disables the check.
    pub max_listeners: usize,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self { panic_policy: PanicPolicy::Propagate, max_listeners: DEFAULT_MAX_LISTENERS }
    }
}

/// Threshold at which a single event's listener list starts to look like a leak.
pub const DEFAULT_MAX_LISTENERS: usize = 64;

impl EmitterConfig {
    #[must_use = "Sets the listener panic policy"]
    pub const fn with_panic_policy(mut self, policy: PanicPolicy) -> Self {
        self.panic_policy = policy;
        self
    }

    #[must_use = "Sets the per-event listener warning threshold"]
    pub const fn with_max_listeners(mut self, max: usize) -> Self {
        self.max_listeners = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_fail_fast() {
        let config = EmitterConfig::default();
        assert_eq!(config.panic_policy, PanicPolicy::Propagate);
        assert_eq!(config.max_listeners, DEFAULT_MAX_LISTENERS);
    }

    #[test]
    fn deserializes_partial_input() {
        let config: EmitterConfig =
            serde_json::from_value(serde_json::json!({ "panic_policy": "isolate" }))
                .expect("config deserialize");
        assert_eq!(config.panic_policy, PanicPolicy::Isolate);
        assert_eq!(config.max_listeners, DEFAULT_MAX_LISTENERS);
    }
}
