//! # battery
//!
//! A declarative RPC client. A request type declares its endpoint and bound
//! fields once; the same object is serialized into the HTTP request and then
//! populated in place from the response.
//!
//! - Field names are translated between local and wire conventions
//! - JSON, form-urlencoded and multipart request bodies
//! - Async execution on Tokio with single-shot callbacks
//! - Error handler chain and response validation hooks
//! - Logs bridged to any platform logger through `tracing`
//!
//! ## Declaring a call
//!
//! ```ignore
//! use battery::prelude::*;
//! use serde_json::Value;
//!
//! #[derive(Default)]
//! pub struct GetUser {
//!     pub user_id: i64,
//!     pub display_name: String,
//! }
//!
//! impl RpcFields for GetUser {
//!     fn declare_fields(fields: &mut FieldSet) {
//!         fields.field("user_id");
//!         fields.field("display_name").optional();
//!     }
//!
//!     fn read_field(&self, id: &str) -> Result<Option<Value>, BindError> {
//!         match id {
//!             "user_id" => bind::read(&self.user_id),
//!             "display_name" => Ok(None),
//!             _ => Err(bind::unknown(id)),
//!         }
//!     }
//!
//!     fn write_field(&mut self, id: &str, value: &Value) -> Result<(), BindError> {
//!         match id {
//!             "user_id" => bind::write(&mut self.user_id, value),
//!             "display_name" => bind::write(&mut self.display_name, value),
//!             _ => Err(bind::unknown(id)),
//!         }
//!     }
//! }
//!
//! impl RpcObject for GetUser {
//!     fn declare_rpc() -> RpcDeclaration {
//!         RpcDeclaration::get("/users/{user_id}").expect_content_type("application/json")
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = ExecutionContext::builder()
//!         .config(ExecutionConfig::new().with_base_url("https://api.example.com"))
//!         .transport(MyHttpTransport::default())
//!         .build()?;
//!
//!     let user = GetUser { user_id: 7, ..Default::default() };
//!     if let Some(result) = context.call(user).await {
//!         println!("{}", result?.display_name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`battery_core`] - Naming, field binding, descriptors, errors and configuration
//! - [`battery_transport`] - Codecs, request factory, object builder and the transport seam
//! - [`battery_runtime`] - Execution context, callbacks and error handlers
//! - [`battery_logging`] - Tracing bridge to a platform log sink

// Re-export core types
pub use battery_core::{
    BindError, CamelCaseNameTransformer, ContentType, ContextError, DescriptorRegistry,
    DeserializationError, ExecutionConfig, FieldNameTranslator, FieldSet, HttpMethod,
    IdentityNameTransformer, KebabCaseNameTransformer, LogLevel, NameTransformer,
    ResponseValidationError, RpcDeclaration, RpcError, RpcFields, RpcObject,
    RpcObjectDescriptor, RpcResult, SerializationError, TransportError, TransportErrorKind,
    UnderscoreNameTransformer, bind, downcast_ref,
};

// Re-export the wire layer
pub use battery_transport::{
    BodyCodec, HttpRequest, ObjectBuilder, RequestFactory, ResponseDelegate, Transport,
    WireContext,
};

// Re-export execution
pub use battery_runtime::{
    CallScope, CallState, ErrorHandler, ExecutionContext, ExecutionContextBuilder, OnResponse,
    ResponseValidator, RuntimeError, from_fns,
};

// Re-export logging
pub use battery_logging::{LogSink, init_logging, register_sink, set_log_level};

// Re-export common dependencies that client authors need
pub use async_trait::async_trait;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tracing;

/// Prelude module for convenient imports.
///
/// Use `use battery::prelude::*;` to declare request types and run calls.
pub mod prelude {
    pub use crate::{
        BindError, CallScope, ContentType, ExecutionConfig, ExecutionContext, FieldSet, HttpMethod,
        HttpRequest, OnResponse, ResponseDelegate, RpcDeclaration, RpcError, RpcFields,
        RpcObject, Transport, TransportError, async_trait, bind,
    };

    pub use serde::{Deserialize, Serialize};
}
