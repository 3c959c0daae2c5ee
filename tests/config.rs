//! Configuration files as shipped and as users break them.

use seedbox_upload::config::validation::ValidationError;
use seedbox_upload::config::{parse_config, ConfigError, ConfigStore, LogFormat};
use seedbox_upload::torrent::ClientType;

#[test]
fn test_example_config_parses() {
    let config = parse_config(include_str!("../seedbox.example.toml")).unwrap();

    assert_eq!(config.upload.timeout_secs, 15);
    assert!(config.upload.capture_labels);
    assert_eq!(config.observability.log_format, LogFormat::Pretty);
    assert_eq!(config.servers.len(), 2);
    assert_eq!(config.servers[0].client, ClientType::RutorrentV3);
    assert_eq!(config.servers[1].client, ClientType::Deluge);

    assert_eq!(config.find_server("deluge").unwrap().host, "https://seedbox.example.net:8112");
    assert_eq!(config.find_server("0").unwrap().name.as_deref(), Some("home"));
    assert!(config.find_server("2").is_none());
}

#[test]
fn test_every_error_is_reported() {
    let result = parse_config(
        r#"
        [upload]
        timeout_secs = 0

        [[servers]]
        name = "a"
        host = "seedbox.example.net"
        user = "u"
        pass = "p"
        client = "utorrent"

        [[servers]]
        name = "a"
        host = "ftp://seedbox.example.net/"
        user = "u"
        pass = "p"
        client = "generic"
        "#,
    );

    let errors = match result {
        Err(ConfigError::Validation(errors)) => errors,
        other => panic!("expected validation errors, got {:?}", other.map(|_| ())),
    };
    assert_eq!(errors.len(), 4);
    assert!(errors.contains(&ValidationError::ZeroTimeout));
    assert!(errors.contains(&ValidationError::DuplicateName {
        index: 1,
        name: "a".to_string()
    }));
}

#[test]
fn test_unknown_client_is_a_parse_error() {
    let result = parse_config(
        r#"
        [[servers]]
        host = "http://x.example/"
        user = "u"
        pass = "p"
        client = "transmission"
        "#,
    );
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_reload_does_not_touch_running_snapshot() {
    let store = ConfigStore::new(parse_config("[upload]\ntimeout_secs = 5").unwrap());
    let running = store.snapshot();

    store.replace(parse_config("[upload]\ntimeout_secs = 30").unwrap());

    assert_eq!(running.upload.timeout_secs, 5);
    assert_eq!(store.snapshot().upload.timeout_secs, 30);
}
