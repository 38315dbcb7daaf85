//! Startup logging: config diagnostics are captured once the subscriber is up

use pearl_analyzer::logging;
use pearl_common::config::{TomlConfig, CONFIG_ENV_VAR};
use serial_test::serial;
use std::env;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLog {
    type Writer = CapturedLog;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
#[serial]
fn test_config_fallback_warnings_are_logged() {
    env::remove_var("RUST_LOG");
    env::set_var(CONFIG_ENV_VAR, "/nonexistent/pearl-config.toml");

    let log = CapturedLog::default();
    let (subscriber, _level) = logging::subscriber(log.clone());
    let result = tracing::subscriber::with_default(subscriber, TomlConfig::load_or_default);

    env::remove_var(CONFIG_ENV_VAR);

    result.unwrap();

    let output = log.contents();
    assert!(output.contains("points to missing file"), "log was: {}", output);
    assert!(output.contains("/nonexistent/pearl-config.toml"), "log was: {}", output);
}

#[test]
#[serial]
fn test_config_level_applied_after_startup() {
    env::remove_var("RUST_LOG");

    let log = CapturedLog::default();
    let (subscriber, level) = logging::subscriber(log.clone());

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("before reload");
        level.apply_config_level("warn").unwrap();
        tracing::info!("hidden after reload");
        tracing::warn!("shown after reload");
    });

    let output = log.contents();
    assert!(output.contains("before reload"));
    assert!(!output.contains("hidden after reload"));
    assert!(output.contains("shown after reload"));
}

#[test]
#[serial]
fn test_rust_log_overrides_config_level() {
    env::set_var("RUST_LOG", "debug");

    let log = CapturedLog::default();
    let (subscriber, level) = logging::subscriber(log.clone());

    tracing::subscriber::with_default(subscriber, || {
        level.apply_config_level("error").unwrap();
        tracing::debug!("debug still shown");
    });

    env::remove_var("RUST_LOG");
    assert!(log.contents().contains("debug still shown"));
}

#[test]
#[serial]
fn test_invalid_config_level_is_error() {
    env::remove_var("RUST_LOG");

    let (_subscriber, level) = logging::subscriber(io::sink);

    assert!(level.apply_config_level("pearl_analyzer=loud").is_err());
}
