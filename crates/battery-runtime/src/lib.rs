//! battery-runtime - Execution context and async call lifecycle
//!
//! This crate provides:
//! - [`ExecutionContext`] which runs one RPC call from request object to callback
//! - [`OnResponse`], the single-shot callback contract
//! - [`ErrorHandler`] chain dispatch and [`ResponseValidator`] hooks
//! - [`AsyncRuntime`] for contexts created outside a Tokio runtime

mod callback;
mod context;
mod handler;
mod runtime;
mod state;
mod validator;

pub use callback::{FnCallback, OnResponse, from_fns};
pub use context::{ExecutionContext, ExecutionContextBuilder};
pub use handler::{CallScope, ErrorHandler, ErrorHandlerChain};
pub use runtime::{AsyncRuntime, RuntimeConfig, RuntimeError};
pub use state::CallState;
pub use validator::ResponseValidator;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CallScope, ErrorHandler, ExecutionContext, ExecutionContextBuilder, OnResponse,
        ResponseValidator, from_fns,
    };
}
