#![allow(non_snake_case)]

use super::*;
use std::error::Error as _;

#[derive(Debug)]
struct SocketClosed;

impl fmt::Display for SocketClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "socket closed")
    }
}

impl std::error::Error for SocketClosed {}

// TransportError tests

#[test]
fn TransportError___from_status___classifies_server_errors() {
    let err = TransportError::from_status(503, b"unavailable".to_vec());

    assert_eq!(err.kind(), TransportErrorKind::Server);
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.body(), Some(&b"unavailable"[..]));
    assert!(err.is_server_error());
}

#[test]
fn TransportError___from_status___classifies_client_errors() {
    let err = TransportError::from_status(404, Vec::new());

    assert_eq!(err.kind(), TransportErrorKind::Client);
    assert!(!err.is_server_error());
}

#[test]
fn TransportError___display___includes_status_when_present() {
    let err = TransportError::new(TransportErrorKind::Server, "boom").with_status(500);

    assert_eq!(err.to_string(), "server error (500): boom");
}

#[test]
fn TransportError___display___omits_missing_status() {
    let err = TransportError::new(TransportErrorKind::Timeout, "no answer");

    assert_eq!(err.to_string(), "timeout: no answer");
}

#[test]
fn TransportError___with_source___exposes_cause() {
    let err = TransportError::new(TransportErrorKind::Connection, "reset").with_source(SocketClosed);

    assert_eq!(err.cause().map(|c| c.to_string()), Some("socket closed".to_string()));
    assert_eq!(err.source().map(|c| c.to_string()), Some("socket closed".to_string()));
}

#[test]
fn TransportError___new___has_no_cause() {
    let err = TransportError::new(TransportErrorKind::Other, "x");

    assert!(err.cause().is_none());
    assert!(err.source().is_none());
}

// RpcError tests

#[test]
fn RpcError___rpc___displays_message_only() {
    let err = RpcError::rpc("Server Error");

    assert_eq!(err.to_string(), "Server Error");
    assert!(err.transport_error().is_none());
}

#[test]
fn RpcError___rpc_with_transport___exposes_transport_as_source() {
    let transport = TransportError::from_status(500, Vec::new());
    let err = RpcError::Rpc {
        message: "Server Error".to_string(),
        transport: Some(transport),
    };

    assert_eq!(err.transport_error().map(|t| t.status()), Some(Some(500)));
    assert!(err.source().is_some());
}

#[test]
fn RpcError___from_context_error___wraps_variant() {
    let err: RpcError = ContextError::MissingEndpoint { type_name: "Login" }.into();

    assert!(matches!(err, RpcError::Context(_)));
    assert!(err.is_request_failure());
    assert_eq!(err.to_string(), "context error: Login declares no endpoint");
}

#[test]
fn RpcError___from_transport_error___is_transport_variant() {
    let err: RpcError = TransportError::new(TransportErrorKind::Timeout, "slow").into();

    assert!(matches!(err, RpcError::Transport(_)));
    assert!(!err.is_request_failure());
}

#[test]
fn RpcError___cause___is_transparent() {
    let cause: SharedError = Arc::new(SocketClosed);
    let err = RpcError::Cause(cause);

    assert_eq!(err.to_string(), "socket closed");
}

#[test]
fn ResponseValidationError___display___includes_message() {
    let err = ResponseValidationError::new("status was not ok");

    assert_eq!(err.message(), "status was not ok");
    assert_eq!(err.to_string(), "response validation failed: status was not ok");
}

#[test]
fn SerializationError___bind___reports_field_and_source() {
    let err = SerializationError::Bind {
        field: "age".to_string(),
        source: BindError::Convert("not a number".to_string()),
    };

    assert_eq!(err.to_string(), "failed to read field `age`: not a number");
    assert!(err.source().is_some());
}

#[test]
fn DeserializationError___from_context_error___is_descriptor_variant() {
    let err: DeserializationError = ContextError::MissingEndpoint { type_name: "X" }.into();

    assert!(matches!(err, DeserializationError::Descriptor(_)));
}
