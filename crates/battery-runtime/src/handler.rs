//! Error handler chain
//!
//! Handlers observe failures raised after a request was submitted. The first
//! handler that reports the error as handled stops the chain and suppresses
//! `on_failure`. Handlers cannot replace the error.

use battery_core::{HttpMethod, RpcError, RpcObjectDescriptor};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Identifies the call a failure belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallScope {
    call_id: Uuid,
    type_name: &'static str,
    method: HttpMethod,
    endpoint: String,
}

impl CallScope {
    pub fn new(
        call_id: Uuid,
        type_name: &'static str,
        method: HttpMethod,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            call_id,
            type_name,
            method,
            endpoint: endpoint.into(),
        }
    }

    /// Scope for a fresh call of the described type
    pub fn for_descriptor(descriptor: &RpcObjectDescriptor) -> Self {
        Self::new(
            Uuid::new_v4(),
            descriptor.type_name(),
            descriptor.method(),
            descriptor.endpoint(),
        )
    }

    pub fn call_id(&self) -> Uuid {
        self.call_id
    }

    /// Rust type name of the request object
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Endpoint template as declared
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Decides whether a failure is fully handled
pub trait ErrorHandler: Send + Sync {
    /// Return `true` to suppress delivery of `error` to the caller
    fn handle(&self, scope: &CallScope, error: &RpcError) -> bool;
}

impl<F> ErrorHandler for F
where
    F: Fn(&CallScope, &RpcError) -> bool + Send + Sync,
{
    fn handle(&self, scope: &CallScope, error: &RpcError) -> bool {
        self(scope, error)
    }
}

/// Ordered, immutable list of error handlers
#[derive(Clone, Default)]
pub struct ErrorHandlerChain {
    handlers: Arc<[Arc<dyn ErrorHandler>]>,
}

impl ErrorHandlerChain {
    pub fn new(handlers: Vec<Arc<dyn ErrorHandler>>) -> Self {
        Self {
            handlers: handlers.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Offer `error` to each handler in registration order.
    ///
    /// Returns `true` as soon as one handler claims the error. A handler that
    /// panics is logged and counts as not handling it.
    pub fn dispatch(&self, scope: &CallScope, error: &RpcError) -> bool {
        for (index, handler) in self.handlers.iter().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| handler.handle(scope, error))) {
                Ok(true) => {
                    debug!(call_id = %scope.call_id(), handler = index, "error handled");
                    return true;
                }
                Ok(false) => {}
                Err(payload) => {
                    warn!(
                        call_id = %scope.call_id(),
                        handler = index,
                        panic = panic_message(payload.as_ref()),
                        "error handler panicked"
                    );
                }
            }
        }
        false
    }
}

impl std::fmt::Debug for ErrorHandlerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorHandlerChain")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
#[path = "handler/handler_tests.rs"]
mod handler_tests;
