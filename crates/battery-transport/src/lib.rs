//! battery-transport - Request encoding, response decoding and the transport seam
//!
//! This crate provides:
//! - [`HttpRequest`] and [`ResponseDelegate`], the transport-agnostic request and response
//! - [`Transport`], the async capability that submits a request
//! - [`BodyCodec`] implementations for JSON, form-urlencoded and multipart bodies
//! - [`RequestFactory`], which turns a request object into an [`HttpRequest`]
//! - [`ObjectBuilder`], which populates a target object from a raw response body

mod builder;
mod codec;
mod context;
mod factory;
mod request;
mod transport;

pub use builder::ObjectBuilder;
pub use codec::{
    BodyCodec, EncodedBody, FormCodec, JsonCodec, MultipartCodec, WireField, codec_for, percent,
};
pub use context::WireContext;
pub use factory::RequestFactory;
pub use request::{HttpRequest, ResponseDelegate};
pub use transport::Transport;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BodyCodec, HttpRequest, ObjectBuilder, RequestFactory, ResponseDelegate, Transport,
        WireContext,
    };
}
