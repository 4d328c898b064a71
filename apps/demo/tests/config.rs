use herald_demo::{DemoError, LogConfig, load_config};
use herald_events::{DEFAULT_MAX_LISTENERS, PanicPolicy};
use std::io::Write;

#[test]
fn config_defaults_are_sane() {
    let log = LogConfig::default();
    assert_eq!(log.level, "info");
    assert!(log.filter.is_none());
    assert!(log.ansi);
}

#[test]
fn loads_toml_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().expect("temp file");
    writeln!(
        file,
        r#"
[log]
level = "debug"
filter = "herald_events=trace"

[emitter]
panic_policy = "isolate"
max_listeners = 8
"#
    )
    .expect("write config");

    let config = load_config(Some(file.path())).expect("config loads");
    assert_eq!(config.log.level, "debug");
    assert_eq!(config.log.filter.as_deref(), Some("herald_events=trace"));
    assert_eq!(config.emitter.panic_policy, PanicPolicy::Isolate);
    assert_eq!(config.emitter.max_listeners, 8);
}

#[test]
fn partial_file_keeps_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().expect("temp file");
    writeln!(file, "[emitter]\npanic_policy = \"propagate\"").expect("write config");

    let config = load_config(Some(file.path())).expect("config loads");
    assert_eq!(config.log.level, "info");
    assert_eq!(config.emitter.max_listeners, DEFAULT_MAX_LISTENERS);
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = load_config(Some(dir.path().join("absent.toml").as_path())).unwrap_err();

    assert!(matches!(err, DemoError::Config { .. }));
    assert!(err.to_string().contains("Failed to build config"));
}

#[test]
fn unknown_policy_is_rejected() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().expect("temp file");
    writeln!(file, "[emitter]\npanic_policy = \"ignore\"").expect("write config");

    let err = load_config(Some(file.path())).unwrap_err();
    assert!(err.to_string().contains("Failed to deserialize config"));
}
