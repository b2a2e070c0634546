// tests/config_loading.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;

use toolrun::config::{
    ConfigFile, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, RawConfigFile, default_config_path,
    load_and_validate, load_from_path, load_or_default, parse_duration,
};
use toolrun::errors::ToolrunError;
use toolrun::types::OutputMode;

fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("toolrun.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn full_config_is_parsed_and_validated() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        dir.path(),
        r#"
[retry]
max_attempts = 4
delay = "250ms"

[retry.signatures]
"connection reset by peer" = "flaky network"
"TLS handshake timeout" = "registry hiccup"

[exec]
timeout = "10m"
working_dir = "/srv/compose"
output = "stdout_only"

[exec.env]
COMPOSE_HTTP_TIMEOUT = "120"
"#,
    );

    let cfg = load_and_validate(&path).unwrap();

    assert_eq!(cfg.retry.max_attempts(), 4);
    assert_eq!(cfg.retry.delay(), Duration::from_millis(250));
    assert_eq!(
        cfg.retry.match_signature("read: connection reset by peer"),
        Some(("connection reset by peer", "flaky network"))
    );
    assert_eq!(cfg.exec.timeout, Some(Duration::from_secs(600)));
    assert_eq!(cfg.exec.working_dir, Some(PathBuf::from("/srv/compose")));
    assert_eq!(cfg.exec.output, OutputMode::StdoutOnly);
    assert_eq!(cfg.exec.env.get("COMPOSE_HTTP_TIMEOUT").map(String::as_str), Some("120"));
}

#[test]
fn empty_file_gets_section_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "");

    let cfg = load_and_validate(&path).unwrap();

    assert_eq!(cfg.retry.max_attempts(), DEFAULT_MAX_ATTEMPTS);
    assert_eq!(cfg.retry.delay(), DEFAULT_RETRY_DELAY);
    assert!(cfg.retry.signatures().is_empty());
    assert_eq!(cfg.exec.timeout, None);
    assert_eq!(cfg.exec.output, OutputMode::Combined);
}

#[test]
fn relative_working_dir_is_resolved_against_the_config_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "[exec]\nworking_dir = \"fixtures/compose\"\n");

    let cfg = load_and_validate(&path).unwrap();

    assert_eq!(cfg.exec.working_dir, Some(dir.path().join("fixtures/compose")));
}

#[test]
fn zero_attempts_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "[retry]\nmax_attempts = 0\n");

    let err = load_and_validate(&path).unwrap_err();
    assert!(matches!(err, ToolrunError::ConfigError(_)), "{err:?}");
}

#[test]
fn bad_delay_names_the_field() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "[retry]\ndelay = \"soon\"\n");

    match load_and_validate(&path) {
        Err(ToolrunError::ConfigError(msg)) => assert!(msg.contains("[retry].delay"), "{msg}"),
        other => panic!("expected ConfigError, got {:?}", other),
    }
}

#[test]
fn zero_timeout_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "[exec]\ntimeout = \"0s\"\n");

    match load_and_validate(&path) {
        Err(ToolrunError::ConfigError(msg)) => assert!(msg.contains("[exec].timeout"), "{msg}"),
        other => panic!("expected ConfigError, got {:?}", other),
    }
}

#[test]
fn env_key_with_equals_sign_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "[exec.env]\n\"A=B\" = \"c\"\n");

    assert!(matches!(
        load_and_validate(&path),
        Err(ToolrunError::ConfigError(_))
    ));
}

#[test]
fn invalid_toml_is_a_toml_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "[retry\nmax_attempts = 2");

    assert!(matches!(load_from_path(&path), Err(ToolrunError::TomlError(_))));
}

#[test]
fn unknown_output_mode_is_a_toml_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "[exec]\noutput = \"interleaved\"\n");

    assert!(matches!(load_from_path(&path), Err(ToolrunError::TomlError(_))));
}

#[test]
fn missing_file_falls_back_to_single_attempt_defaults() {
    let dir = TempDir::new().unwrap();

    let cfg = load_or_default(dir.path().join("absent.toml")).unwrap();

    assert_eq!(cfg.retry.max_attempts(), 1);
    assert_eq!(cfg.exec.timeout, None);
    assert!(cfg.exec.env.is_empty());
}

#[test]
fn load_from_path_reports_io_errors() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        load_from_path(dir.path().join("absent.toml")),
        Err(ToolrunError::IoError(_))
    ));
}

#[test]
fn raw_default_converts_to_a_valid_config() {
    let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
    assert_eq!(cfg.retry, ConfigFile::default().retry);
}

#[test]
fn empty_file_and_missing_file_give_the_same_policy() {
    let dir = TempDir::new().unwrap();
    let empty = write_config(dir.path(), "");

    let from_empty = load_or_default(&empty).unwrap();
    let from_missing = load_or_default(dir.path().join("absent.toml")).unwrap();

    assert_eq!(from_empty.retry, from_missing.retry);
    assert_eq!(from_empty.exec.timeout, from_missing.exec.timeout);
    assert_eq!(from_empty.exec.output, from_missing.exec.output);
}

#[test]
fn attempts_without_a_delay_use_the_default_delay() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "[retry]\nmax_attempts = 4\n");

    let cfg = load_and_validate(&path).unwrap();

    assert_eq!(cfg.retry.max_attempts(), 4);
    assert_eq!(cfg.retry.delay(), DEFAULT_RETRY_DELAY);
}

#[test]
fn default_path_is_in_the_current_directory() {
    assert_eq!(default_config_path(), PathBuf::from("toolrun.toml"));
}

#[test]
fn durations_accept_the_usual_suffixes() {
    assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
    assert_eq!(parse_duration("3s"), Ok(Duration::from_secs(3)));
    assert_eq!(parse_duration(" 2m "), Ok(Duration::from_secs(120)));
    assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
    assert!(parse_duration("").is_err());
    assert!(parse_duration("15").is_err());
    assert!(parse_duration("5 days").is_err());
}
