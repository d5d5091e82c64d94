//! battery-core - Core types for the battery RPC client
//!
//! This crate provides the building blocks shared by the request and
//! response pipelines:
//! - [`NameTransformer`] and [`FieldNameTranslator`] for wire-key naming
//! - [`RpcFields`] / [`RpcObject`] for declaring bindable request objects
//! - [`RpcObjectDescriptor`] and [`DescriptorRegistry`] for resolved call metadata
//! - [`RpcError`] and the per-stage error types
//! - [`ExecutionConfig`] for client configuration

mod config;
mod descriptor;
mod error;
mod fields;
mod http;
mod naming;

pub use config::ExecutionConfig;
pub use descriptor::{DescriptorRegistry, ObjectShape, RpcDeclaration, RpcObjectDescriptor};
pub use error::{
    BindError, ContextError, DeserializationError, ResponseValidationError, RpcError, RpcResult,
    SerializationError, SharedError, TransportError, TransportErrorKind,
};
pub use fields::{FieldBinding, FieldKind, FieldSet, NestedType, RpcFields, RpcObject, bind, downcast_ref};
pub use http::{ContentType, HttpMethod};
pub use naming::{
    CamelCaseNameTransformer, FieldNameTranslator, IdentityNameTransformer,
    KebabCaseNameTransformer, NameTransformer, UnderscoreNameTransformer,
};

/// Log levels understood by the battery logging bridge
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Off = 5,
}

impl LogLevel {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Trace,
            1 => LogLevel::Debug,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            _ => LogLevel::Off,
        }
    }

    /// Parse a level name as written in configuration files (case-insensitive)
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            "off" | "none" => Some(LogLevel::Off),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Off => write!(f, "OFF"),
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ContentType, DescriptorRegistry, ExecutionConfig, FieldNameTranslator, FieldSet,
        HttpMethod, LogLevel, RpcDeclaration, RpcError, RpcFields, RpcObject, RpcResult, bind,
    };
}
