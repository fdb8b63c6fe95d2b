use latency_api::settings::{DatasetSettings, Settings};
use std::io::Write;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_partial_config_keeps_defaults() {
    let file = config_file(
        r#"
log_level = "debug"

[server]
listen_addr = "127.0.0.1:9000"

[stats]
default_threshold_ms = 150.0

[metrics]
addr = "127.0.0.1:9090"
"#,
    );

    let settings = Settings::from_path(file.path()).unwrap();

    assert_eq!(settings.log_level, "debug");
    assert_eq!(settings.server.listen_addr.to_string(), "127.0.0.1:9000");
    assert_eq!(settings.server.max_body_bytes, 64 * 1024);
    assert_eq!(settings.stats.default_threshold_ms, 150.0);
    assert_eq!(
        settings.metrics.map(|m| m.addr.to_string()),
        Some("127.0.0.1:9090".to_string())
    );
    assert!(settings.dataset.path.is_none());
}

#[test]
fn test_empty_config_is_default() {
    let file = config_file("");
    let settings = Settings::from_path(file.path()).unwrap();

    assert_eq!(settings.log_level, "info");
    assert_eq!(settings.server.listen_addr.to_string(), "0.0.0.0:8080");
    assert_eq!(settings.stats.default_threshold_ms, 180.0);
    assert!(settings.metrics.is_none());
}

#[test]
fn test_invalid_log_level_rejected() {
    let file = config_file(r#"log_level = "chatty""#);
    assert!(Settings::from_path(file.path()).is_err());
}

#[test]
fn test_metrics_on_listen_addr_rejected() {
    let file = config_file(
        r#"
[server]
listen_addr = "127.0.0.1:9000"

[metrics]
addr = "127.0.0.1:9000"
"#,
    );
    assert!(Settings::from_path(file.path()).is_err());
}

#[test]
fn test_missing_config_file() {
    assert!(Settings::from_path("/nonexistent/latency.toml").is_err());
}

#[test]
fn test_dataset_load_embedded() {
    let dataset = DatasetSettings::default().load().unwrap();

    assert_eq!(dataset.len(), 36);
    assert_eq!(dataset.regions(), vec!["apac", "emea", "amer"]);
}

#[test]
fn test_dataset_load_from_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(
        br#"[
            {"region": "lab", "latency_ms": 120.0, "uptime_pct": 99.5, "timestamp": 20250301},
            {"region": "lab", "latency_ms": 240.0, "uptime_pct": 97.5, "timestamp": 20250302}
        ]"#,
    )
    .unwrap();
    file.flush().unwrap();

    let settings = DatasetSettings {
        path: Some(file.path().to_path_buf()),
    };
    let dataset = settings.load().unwrap();

    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.regions(), vec!["lab"]);
}

#[test]
fn test_dataset_load_bad_path() {
    let settings = DatasetSettings {
        path: Some("/nonexistent/telemetry.json".into()),
    };

    let err = settings.load().unwrap_err();
    assert!(err.to_string().contains("Failed to load dataset"));
}
