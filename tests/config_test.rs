//! Tests for loading server and client configuration from TOML.

use std::io::Write;
use std::path::Path;

use strictly_arena::{ClientConfig, ServerConfig};
use tempfile::NamedTempFile;

#[test]
fn test_partial_file_keeps_defaults() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "port = 9001").unwrap();
    writeln!(file, "history_path = \"results/arena.json\"").unwrap();

    let config = ServerConfig::from_file(file.path()).expect("Load failed");
    assert_eq!(config.host(), "0.0.0.0");
    assert_eq!(*config.port(), 9001);
    assert_eq!(config.history_path(), Path::new("results/arena.json"));
}

#[test]
fn test_cli_overrides_win_over_file() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "host = \"10.0.0.1\"").unwrap();
    writeln!(file, "port = 9001").unwrap();

    let config = ServerConfig::from_file(file.path())
        .expect("Load failed")
        .with_overrides(Some("127.0.0.1".to_string()), None, None);
    assert_eq!(config.bind_addr(), "127.0.0.1:9001");
}

#[test]
fn test_missing_file_is_an_error() {
    let err = ServerConfig::from_file("/definitely/not/here.toml").unwrap_err();
    assert!(err.message.contains("Failed to read config file"));
}

#[test]
fn test_malformed_file_is_an_error() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "port = \"not a number\"").unwrap();

    let err = ServerConfig::from_file(file.path()).unwrap_err();
    assert!(err.message.contains("Failed to parse config"));
}

#[test]
fn test_server_and_client_share_one_file() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "port = 9001").unwrap();
    writeln!(file, "server_addr = \"arena.local:9001\"").unwrap();

    let server = ServerConfig::from_file(file.path()).expect("Server load failed");
    assert_eq!(*server.port(), 9001);

    let client = ClientConfig::from_file(file.path()).expect("Client load failed");
    assert_eq!(client.server_addr(), "arena.local:9001");

    let client = client.with_override(Some("127.0.0.1:8080".to_string()));
    assert_eq!(client.server_addr(), "127.0.0.1:8080");
}
