#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

// ============================================================================
// Parameterized error code mapping tests
// ============================================================================

#[test_case(RpcError::Context(ContextError::MissingEndpoint { type_name: "T" }), 1, "Context")]
#[test_case(
    RpcError::Serialization(SerializationError::MissingField { field: "a".into() }),
    2,
    "Serialization"
)]
#[test_case(
    RpcError::Deserialization(DeserializationError::MissingField { key: "a".into() }),
    3,
    "Deserialization"
)]
#[test_case(
    RpcError::ResponseValidation(ResponseValidationError::new("bad")),
    4,
    "ResponseValidation"
)]
#[test_case(RpcError::rpc("Server Error"), 5, "Rpc")]
#[test_case(
    RpcError::Transport(TransportError::new(TransportErrorKind::Other, "x")),
    6,
    "Transport"
)]
fn RpcError___variant___maps_to_correct_code(error: RpcError, expected_code: u32, variant: &str) {
    assert_eq!(
        error.error_code(),
        expected_code,
        "{} should map to code {}",
        variant,
        expected_code
    );
}

// ============================================================================
// Status classification
// ============================================================================

#[test_case(500, TransportErrorKind::Server)]
#[test_case(502, TransportErrorKind::Server)]
#[test_case(599, TransportErrorKind::Server)]
#[test_case(400, TransportErrorKind::Client)]
#[test_case(401, TransportErrorKind::Client)]
#[test_case(499, TransportErrorKind::Client)]
#[test_case(302, TransportErrorKind::Other)]
fn TransportError___from_status___classifies(status: u16, expected: TransportErrorKind) {
    assert_eq!(TransportError::from_status(status, Vec::new()).kind(), expected);
}

// ============================================================================
// Display messages
// ============================================================================

#[test_case(
    DeserializationError::UnsupportedContentType("text/html".into()),
    "unsupported content type `text/html`"
)]
#[test_case(
    DeserializationError::MissingField { key: "user_id".into() },
    "required key `user_id` is missing"
)]
#[test_case(
    DeserializationError::NotAnObject { path: "address".into() },
    "expected an object at `address`"
)]
#[test_case(
    DeserializationError::TypeMismatch { key: "age".into(), message: "invalid type".into() },
    "value at `age` does not match the field type: invalid type"
)]
fn DeserializationError___display___is_descriptive(error: DeserializationError, expected: &str) {
    assert_eq!(error.to_string(), expected);
}
