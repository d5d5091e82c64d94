#![allow(non_snake_case)]

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

fn scope() -> CallScope {
    CallScope::new(Uuid::new_v4(), "tests::GetUser", HttpMethod::Get, "/users/{id}")
}

fn counting(counter: &Arc<AtomicUsize>, result: bool) -> Arc<dyn ErrorHandler> {
    let counter = Arc::clone(counter);
    Arc::new(move |_: &CallScope, _: &RpcError| {
        counter.fetch_add(1, Ordering::SeqCst);
        result
    })
}

// ErrorHandlerChain::dispatch tests

#[test]
fn ErrorHandlerChain___dispatch___empty_chain_declines() {
    let chain = ErrorHandlerChain::default();

    assert!(!chain.dispatch(&scope(), &RpcError::rpc("x")));
    assert!(chain.is_empty());
}

#[test]
fn ErrorHandlerChain___dispatch___first_handled_stops_iteration() {
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let third = Arc::new(AtomicUsize::new(0));
    let chain = ErrorHandlerChain::new(vec![
        counting(&first, false),
        counting(&second, true),
        counting(&third, true),
    ]);

    let handled = chain.dispatch(&scope(), &RpcError::rpc("x"));

    assert!(handled);
    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 1);
    assert_eq!(third.load(Ordering::SeqCst), 0);
}

#[test]
fn ErrorHandlerChain___dispatch___all_decline_returns_false() {
    let calls = Arc::new(AtomicUsize::new(0));
    let chain = ErrorHandlerChain::new(vec![counting(&calls, false), counting(&calls, false)]);

    assert!(!chain.dispatch(&scope(), &RpcError::rpc("x")));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn ErrorHandlerChain___dispatch___panicking_handler_counts_as_declined() {
    let after = Arc::new(AtomicUsize::new(0));
    let panicking: Arc<dyn ErrorHandler> =
        Arc::new(|_: &CallScope, _: &RpcError| -> bool { panic!("handler bug") });
    let chain = ErrorHandlerChain::new(vec![panicking, counting(&after, true)]);

    let handled = chain.dispatch(&scope(), &RpcError::rpc("x"));

    assert!(handled);
    assert_eq!(after.load(Ordering::SeqCst), 1);
}

#[test]
fn ErrorHandlerChain___dispatch___handler_sees_scope_and_error() {
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let recorder: Arc<dyn ErrorHandler> = Arc::new(move |scope: &CallScope, error: &RpcError| {
        sink.lock().push(format!("{} {} {}", scope.method(), scope.endpoint(), error));
        false
    });
    let chain = ErrorHandlerChain::new(vec![recorder]);

    chain.dispatch(&scope(), &RpcError::rpc("Server Error"));

    assert_eq!(seen.lock().as_slice(), ["GET /users/{id} Server Error"]);
}

// CallScope tests

#[test]
fn CallScope___new___exposes_fields() {
    let id = Uuid::new_v4();

    let scope = CallScope::new(id, "tests::Ping", HttpMethod::Post, "/ping");

    assert_eq!(scope.call_id(), id);
    assert_eq!(scope.type_name(), "tests::Ping");
    assert_eq!(scope.method(), HttpMethod::Post);
    assert_eq!(scope.endpoint(), "/ping");
}
