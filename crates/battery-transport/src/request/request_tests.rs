#![allow(non_snake_case)]

use super::*;

// HttpRequest tests

#[test]
fn HttpRequest___new___has_no_body_or_headers() {
    let request = HttpRequest::new(HttpMethod::Get, "https://api.example.com/users");

    assert_eq!(request.method(), HttpMethod::Get);
    assert_eq!(request.url(), "https://api.example.com/users");
    assert!(request.headers().is_empty());
    assert!(request.body().is_none());
}

#[test]
fn HttpRequest___header___lookup_is_case_insensitive() {
    let request = HttpRequest::new(HttpMethod::Post, "/x").with_header("Content-Type", "application/json");

    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.header("accept"), None);
}

#[test]
fn HttpRequest___with_header___keeps_insertion_order() {
    let request = HttpRequest::new(HttpMethod::Post, "/x")
        .with_header("X-First", "1")
        .with_header("X-Second", "2")
        .with_header("X-First", "3");

    let names: Vec<_> = request.headers().iter().map(|(name, _)| name.as_str()).collect();

    assert_eq!(names, vec!["X-First", "X-Second", "X-First"]);
    assert_eq!(request.header("x-first"), Some("1"));
}

#[test]
fn HttpRequest___into_body___returns_bytes() {
    let request = HttpRequest::new(HttpMethod::Put, "/x").with_body(b"a=1".to_vec());

    assert_eq!(request.into_body(), Some(b"a=1".to_vec()));
}

// ResponseDelegate tests

#[test]
fn ResponseDelegate___new___defaults_to_ok_status() {
    let response = ResponseDelegate::new(Some("text/plain".to_string()), b"hi".to_vec());

    assert_eq!(response.status(), 200);
    assert_eq!(response.content_type(), Some("text/plain"));
    assert_eq!(response.body(), b"hi");
}

#[test]
fn ResponseDelegate___json___sets_content_type() {
    let response = ResponseDelegate::json(r#"{"a":1}"#).with_status(201);

    assert_eq!(response.content_type(), Some("application/json"));
    assert_eq!(response.status(), 201);
    assert_eq!(response.into_body(), br#"{"a":1}"#.to_vec());
}
