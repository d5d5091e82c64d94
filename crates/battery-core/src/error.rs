//! Error types for the battery RPC pipeline
//!
//! Every pipeline stage has its own error enum so that callers and error
//! handlers can tell where a call failed. [`RpcError`] is the type delivered
//! to callbacks and handed to error handlers.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Shared, cloneable error used for transport causes
pub type SharedError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for pipeline operations
pub type RpcResult<T> = Result<T, RpcError>;

/// Descriptor resolution failed for a request object type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// The type declared an empty endpoint
    #[error("{type_name} declares no endpoint")]
    MissingEndpoint { type_name: &'static str },

    /// Two bindings share the same field identifier
    #[error("{type_name} declares field `{field}` more than once")]
    DuplicateField {
        type_name: &'static str,
        field: String,
    },

    /// Two bindings translate to the same wire key
    #[error("{type_name} maps fields `{first}` and `{second}` to the same wire key `{wire_key}`")]
    DuplicateWireKey {
        type_name: &'static str,
        wire_key: String,
        first: String,
        second: String,
    },

    /// An endpoint placeholder names no declared field
    #[error("endpoint of {type_name} references unknown field `{placeholder}`")]
    UnknownPlaceholder {
        type_name: &'static str,
        placeholder: String,
    },

    /// The endpoint template is not well formed
    #[error("endpoint `{endpoint}` of {type_name} is malformed: {reason}")]
    InvalidEndpoint {
        type_name: &'static str,
        endpoint: String,
        reason: String,
    },
}

/// A field accessor could not read or assign a value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("no field `{0}` on this type")]
    UnknownField(String),

    #[error("{0}")]
    Convert(String),
}

/// Object to wire encoding failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// A required field had no value
    #[error("required field `{field}` has no value")]
    MissingField { field: String },

    /// The value cannot be expressed in the target encoding
    #[error("field `{field}` cannot be encoded as {encoding}")]
    Unrepresentable {
        field: String,
        encoding: &'static str,
    },

    /// The field accessor failed
    #[error("failed to read field `{field}`: {source}")]
    Bind {
        field: String,
        #[source]
        source: BindError,
    },

    /// The body encoder failed
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Wire to object decoding failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeserializationError {
    /// No decoder exists for the content type (empty when none was reported)
    #[error("unsupported content type `{0}`")]
    UnsupportedContentType(String),

    /// The body could not be parsed
    #[error("malformed {content_type} body: {message}")]
    Malformed {
        content_type: &'static str,
        message: String,
    },

    /// The body (or a nested fragment) is not a key/value object
    #[error("expected an object at `{path}`")]
    NotAnObject { path: String },

    /// A required key is absent from the response
    #[error("required key `{key}` is missing")]
    MissingField { key: String },

    /// The value at `key` does not fit the declared field type
    #[error("value at `{key}` does not match the field type: {message}")]
    TypeMismatch { key: String, message: String },

    /// A nested descriptor could not be resolved
    #[error("nested descriptor resolution failed: {0}")]
    Descriptor(#[from] ContextError),
}

/// A decoded object failed semantic validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("response validation failed: {message}")]
pub struct ResponseValidationError {
    message: String,
}

impl ResponseValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Classification of transport failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The server answered with a server-side error (5xx)
    Server,
    /// The server rejected the request (4xx)
    Client,
    /// No response arrived in time
    Timeout,
    /// The connection could not be established or was lost
    Connection,
    /// Anything else
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Server => write!(f, "server error"),
            TransportErrorKind::Client => write!(f, "client error"),
            TransportErrorKind::Timeout => write!(f, "timeout"),
            TransportErrorKind::Connection => write!(f, "connection error"),
            TransportErrorKind::Other => write!(f, "transport error"),
        }
    }
}

/// Failure reported by a transport instead of a response
#[derive(Debug, Clone)]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
    status: Option<u16>,
    body: Option<Vec<u8>>,
    source: Option<SharedError>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            body: None,
            source: None,
        }
    }

    /// Build an error from an HTTP status, classifying 4xx and 5xx
    pub fn from_status(status: u16, body: Vec<u8>) -> Self {
        let kind = match status {
            500..=599 => TransportErrorKind::Server,
            400..=499 => TransportErrorKind::Client,
            _ => TransportErrorKind::Other,
        };
        Self::new(kind, format!("unexpected status {}", status))
            .with_status(status)
            .with_body(body)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Raw error response body, if the transport captured one
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// The underlying cause, if the transport supplied one
    pub fn cause(&self) -> Option<&SharedError> {
        self.source.as_ref()
    }

    pub fn is_server_error(&self) -> bool {
        self.kind == TransportErrorKind::Server
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({}): {}", self.kind, status, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

/// Error delivered to `on_failure` and offered to error handlers
#[derive(Error, Debug, Clone)]
pub enum RpcError {
    /// Descriptor resolution failed before a request existed
    #[error("context error: {0}")]
    Context(#[from] ContextError),

    /// Request encoding failed before a request existed
    #[error("serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// The response could not be decoded into the target object
    #[error("deserialization error: {0}")]
    Deserialization(#[from] DeserializationError),

    /// The decoded object was rejected by the response validator
    #[error(transparent)]
    ResponseValidation(#[from] ResponseValidationError),

    /// Transport-level failure without a more specific cause
    #[error("{message}")]
    Rpc {
        message: String,
        #[source]
        transport: Option<TransportError>,
    },

    /// The raw error reported by the transport
    #[error(transparent)]
    Transport(TransportError),

    /// The underlying cause carried by a transport error
    #[error(transparent)]
    Cause(SharedError),
}

impl RpcError {
    /// Create an [`RpcError::Rpc`] with no attached transport error
    pub fn rpc(message: impl Into<String>) -> Self {
        RpcError::Rpc {
            message: message.into(),
            transport: None,
        }
    }

    /// Stable numeric code per variant
    pub fn error_code(&self) -> u32 {
        match self {
            RpcError::Context(_) => 1,
            RpcError::Serialization(_) => 2,
            RpcError::Deserialization(_) => 3,
            RpcError::ResponseValidation(_) => 4,
            RpcError::Rpc { .. } => 5,
            RpcError::Transport(_) => 6,
            RpcError::Cause(_) => 7,
        }
    }

    /// The transport error behind this failure, if any
    pub fn transport_error(&self) -> Option<&TransportError> {
        match self {
            RpcError::Transport(err) => Some(err),
            RpcError::Rpc { transport, .. } => transport.as_ref(),
            _ => None,
        }
    }

    /// True for failures raised while building the request
    pub fn is_request_failure(&self) -> bool {
        matches!(self, RpcError::Context(_) | RpcError::Serialization(_))
    }
}

impl From<TransportError> for RpcError {
    fn from(err: TransportError) -> Self {
        RpcError::Transport(err)
    }
}

#[cfg(test)]
#[path = "error/error_tests.rs"]
mod error_tests;

#[cfg(test)]
#[path = "error/error_parameterized_tests.rs"]
mod error_parameterized_tests;
