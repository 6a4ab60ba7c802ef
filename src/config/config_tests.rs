use super::*;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_empty_toml_produces_defaults() {
    let cfg = parse_config("").expect("Should parse empty TOML");
    assert_eq!(cfg, AppConfig::default());
}

#[test]
fn test_client_defaults() {
    let client = ClientConfig::default();
    assert_eq!(client.poll_interval, Duration::from_millis(4500));
    assert_eq!(client.resync_delay, Duration::from_millis(600));
    assert_eq!(client.pulse, Duration::from_millis(320));
    assert!(client.request_timeout.is_none());
}

#[test]
fn test_server_defaults() {
    let server = ServerConfig::default();
    assert_eq!(server.addr, "0.0.0.0:5000");
    assert!(!server.in_memory);
    assert!(server.cors_origins.iter().any(|o| o == "http://localhost"));
}

#[test]
fn test_partial_tables() {
    let toml_str = r#"
[client]
server_url = "http://voting.local:8080"
poll_interval = "10s"
request_timeout = "3s"

[bubble]
max = 150.0
"#;
    let cfg = parse_config(toml_str).expect("Should parse partial config");
    assert_eq!(cfg.client.server_url, "http://voting.local:8080");
    assert_eq!(cfg.client.poll_interval, Duration::from_secs(10));
    assert_eq!(cfg.client.request_timeout, Some(Duration::from_secs(3)));
    assert_eq!(cfg.client.resync_delay, Duration::from_millis(600));
    assert!((cfg.bubble.max - 150.0).abs() < f64::EPSILON);
    assert!((cfg.bubble.base - BubbleConfig::default().base).abs() < f64::EPSILON);
    assert_eq!(cfg.server, ServerConfig::default());
}

#[test]
fn test_unknown_field_is_rejected() {
    let err = parse_config("[client]\npoll = \"1s\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn test_bad_duration_is_rejected() {
    assert!(parse_config("[client]\npoll_interval = \"soon\"\n").is_err());
}

#[test]
fn test_roundtrip_serialization() {
    let mut cfg = AppConfig::default();
    cfg.client.request_timeout = Some(Duration::from_millis(1500));
    let serialized = toml::to_string(&cfg).expect("Should serialize");
    let deserialized = parse_config(&serialized).expect("Should deserialize");
    assert_eq!(cfg, deserialized);
}

#[test]
fn test_reset_schedule() {
    let reset = ResetConfig::default().daily_reset().unwrap();
    assert!(reset.is_some());

    let disabled = ResetConfig {
        enabled: false,
        ..ResetConfig::default()
    };
    assert!(disabled.daily_reset().unwrap().is_none());

    let broken = ResetConfig {
        at: "25:99".to_string(),
        ..ResetConfig::default()
    };
    assert!(matches!(
        broken.daily_reset(),
        Err(ConfigError::InvalidReset(_))
    ));
}

#[test]
fn test_load_missing_file_gives_defaults() {
    let dir = tempdir().expect("tempdir");
    let cfg = load_config(Some(&dir.path().join("config.toml"))).expect("defaults");
    assert_eq!(cfg, AppConfig::default());
}

#[test]
fn test_load_from_file() {
    let dir = tempdir().expect("tempdir");
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "# bubble-vote config\n\n[server]\nin_memory = true\n")
        .expect("write config");

    let cfg = load_config(Some(&config_path)).expect("parse config");
    assert!(cfg.server.in_memory);
}

#[test]
fn test_voter_token_is_kept_between_runs() {
    let dir = tempdir().expect("tempdir");
    let home = dir.path().join("home");

    let first = load_or_create_voter_token(&home).expect("mint token");
    let second = load_or_create_voter_token(&home).expect("reload token");
    assert_eq!(first, second);
    assert_eq!(
        fs::read_to_string(home.join(VOTER_TOKEN_FILE)).expect("token file"),
        first
    );
}

#[test]
fn test_malformed_voter_token_is_replaced() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(VOTER_TOKEN_FILE), "not a token!").expect("write");

    let token = load_or_create_voter_token(dir.path()).expect("token");
    assert_ne!(token, "not a token!");
    assert_eq!(token.len(), 32);
}
