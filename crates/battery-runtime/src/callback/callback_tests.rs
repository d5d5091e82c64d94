#![allow(non_snake_case)]

use super::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn from_fns___on_response___runs_success_closure_only() {
    let successes = Arc::new(AtomicUsize::new(0));
    let failures = Arc::new(AtomicUsize::new(0));
    let (s, f) = (Arc::clone(&successes), Arc::clone(&failures));

    let callback = from_fns(
        move |value: i32| {
            assert_eq!(value, 7);
            s.fetch_add(1, Ordering::SeqCst);
        },
        move |_| {
            f.fetch_add(1, Ordering::SeqCst);
        },
    );
    callback.on_response(7);

    assert_eq!(successes.load(Ordering::SeqCst), 1);
    assert_eq!(failures.load(Ordering::SeqCst), 0);
}

#[test]
fn from_fns___on_failure___passes_error() {
    let seen = Arc::new(parking_lot::Mutex::new(None));
    let slot = Arc::clone(&seen);

    let callback = from_fns(
        |_: i32| panic!("success closure must not run"),
        move |error: RpcError| *slot.lock() = Some(error.to_string()),
    );
    callback.on_failure(RpcError::rpc("Server Error"));

    assert_eq!(seen.lock().as_deref(), Some("Server Error"));
}

#[tokio::test]
async fn Sender___on_response___completes_receiver() {
    let (tx, rx) = oneshot::channel::<Result<&'static str, RpcError>>();

    tx.on_response("done");

    assert_eq!(rx.await.unwrap().unwrap(), "done");
}

#[tokio::test]
async fn Sender___on_failure___completes_receiver_with_error() {
    let (tx, rx) = oneshot::channel::<Result<u8, RpcError>>();

    tx.on_failure(RpcError::rpc("boom"));

    assert!(matches!(rx.await.unwrap(), Err(RpcError::Rpc { .. })));
}

#[test]
fn Sender___dropped_receiver___is_ignored() {
    let (tx, rx) = oneshot::channel::<Result<u8, RpcError>>();
    drop(rx);

    tx.on_response(1);
}
