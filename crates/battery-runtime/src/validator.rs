//! Post-decode semantic checks

use battery_core::{ResponseValidationError, RpcFields};

/// Checks a decoded object before it is delivered.
///
/// The object is type-erased; use [`battery_core::downcast_ref`] to inspect
/// a concrete type.
pub trait ResponseValidator: Send + Sync {
    fn validate(&self, object: &dyn RpcFields) -> Result<(), ResponseValidationError>;
}

impl<F> ResponseValidator for F
where
    F: Fn(&dyn RpcFields) -> Result<(), ResponseValidationError> + Send + Sync,
{
    fn validate(&self, object: &dyn RpcFields) -> Result<(), ResponseValidationError> {
        self(object)
    }
}
