//! The capability the execution pipeline submits requests through

use crate::request::{HttpRequest, ResponseDelegate};
use async_trait::async_trait;
use battery_core::TransportError;
use std::sync::Arc;

/// Submits a request and yields either the raw response or a transport error.
///
/// Implementations own connection handling, retries and timeouts. The future
/// completes exactly once; a timeout is reported as
/// [`TransportErrorKind::Timeout`](battery_core::TransportErrorKind::Timeout).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn submit(&self, request: HttpRequest) -> Result<ResponseDelegate, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn submit(&self, request: HttpRequest) -> Result<ResponseDelegate, TransportError> {
        (**self).submit(request).await
    }
}
