//! Single-shot completion callbacks
//!
//! Both methods consume the callback, so a call can complete it at most once.

use battery_core::RpcError;
use tokio::sync::oneshot;

/// Receives the outcome of one call
pub trait OnResponse<T>: Send + 'static {
    /// The decoded and validated object
    fn on_response(self, object: T);

    /// A failure no error handler claimed
    fn on_failure(self, error: RpcError);
}

/// Callback built from a pair of closures
pub struct FnCallback<S, F> {
    on_response: S,
    on_failure: F,
}

/// Build a callback from a success closure and a failure closure
pub fn from_fns<T, S, F>(on_response: S, on_failure: F) -> FnCallback<S, F>
where
    S: FnOnce(T) + Send + 'static,
    F: FnOnce(RpcError) + Send + 'static,
{
    FnCallback {
        on_response,
        on_failure,
    }
}

impl<T, S, F> OnResponse<T> for FnCallback<S, F>
where
    S: FnOnce(T) + Send + 'static,
    F: FnOnce(RpcError) + Send + 'static,
{
    fn on_response(self, object: T) {
        (self.on_response)(object)
    }

    fn on_failure(self, error: RpcError) {
        (self.on_failure)(error)
    }
}

/// Completes a future-style caller; a dropped receiver is ignored
impl<T: Send + 'static> OnResponse<T> for oneshot::Sender<Result<T, RpcError>> {
    fn on_response(self, object: T) {
        let _ = self.send(Ok(object));
    }

    fn on_failure(self, error: RpcError) {
        let _ = self.send(Err(error));
    }
}

#[cfg(test)]
#[path = "callback/callback_tests.rs"]
mod callback_tests;
