#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

// ============================================================================
// URL resolution
// ============================================================================

#[test_case("https://api.example.com", "/users", "https://api.example.com/users" ; "slash on endpoint only")]
#[test_case("https://api.example.com/", "/users", "https://api.example.com/users" ; "slash on both")]
#[test_case("https://api.example.com/", "users", "https://api.example.com/users" ; "slash on base only")]
#[test_case("https://api.example.com", "users", "https://api.example.com/users" ; "no slashes")]
#[test_case("", "/users", "/users" ; "empty base")]
#[test_case("https://api.example.com", "http://other.example.com/x", "http://other.example.com/x" ; "absolute http endpoint")]
#[test_case("https://api.example.com", "https://other.example.com/x", "https://other.example.com/x" ; "absolute https endpoint")]
#[test_case("https://api.example.com", "", "https://api.example.com" ; "empty endpoint")]
fn ExecutionConfig___resolve_url___joins_base(base: &str, endpoint: &str, expected: &str) {
    let config = ExecutionConfig::new().with_base_url(base);

    assert_eq!(config.resolve_url(endpoint), expected);
}

// ============================================================================
// Log level parsing
// ============================================================================

#[test_case(r#"{"log_level": "trace"}"#, LogLevel::Trace)]
#[test_case(r#"{"log_level": "DEBUG"}"#, LogLevel::Debug)]
#[test_case(r#"{"log_level": "warn"}"#, LogLevel::Warn)]
#[test_case(r#"{"log_level": "error"}"#, LogLevel::Error)]
#[test_case(r#"{"log_level": "off"}"#, LogLevel::Off)]
#[test_case(r#"{}"#, LogLevel::Info)]
fn ExecutionConfig___log_level_json___parses_correctly(json: &str, expected: LogLevel) {
    let config = ExecutionConfig::from_json(json.as_bytes()).unwrap();

    assert_eq!(config.log_level(), expected);
}

#[test_case(r#"{"worker_threads": 1}"#, Some(1))]
#[test_case(r#"{"worker_threads": 8}"#, Some(8))]
#[test_case(r#"{}"#, None)]
fn ExecutionConfig___worker_threads_json___parses_correctly(json: &str, expected: Option<usize>) {
    let config = ExecutionConfig::from_json(json.as_bytes()).unwrap();

    assert_eq!(config.worker_threads, expected);
}
