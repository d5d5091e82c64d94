//! Field binding between request objects and wire values
//!
//! Instead of runtime reflection, an RPC-capable type declares its fields in
//! [`RpcFields::declare_fields`] and exposes them through string-keyed
//! accessors. Field values cross the boundary as [`serde_json::Value`], so any
//! `Serialize + DeserializeOwned` field type can be bound with the helpers in
//! [`bind`].
//!
//! # Example
//!
//! ```
//! use battery_core::{bind, BindError, FieldSet, HttpMethod, RpcDeclaration, RpcFields, RpcObject};
//! use serde_json::Value;
//!
//! #[derive(Default)]
//! struct GetUser {
//!     user_id: i64,
//!     nickname: Option<String>,
//! }
//!
//! impl RpcFields for GetUser {
//!     fn declare_fields(fields: &mut FieldSet) {
//!         fields.field("user_id");
//!         fields.field("nickname").optional();
//!     }
//!
//!     fn read_field(&self, id: &str) -> Result<Option<Value>, BindError> {
//!         match id {
//!             "user_id" => bind::read(&self.user_id),
//!             "nickname" => bind::read(&self.nickname),
//!             _ => Err(bind::unknown(id)),
//!         }
//!     }
//!
//!     fn write_field(&mut self, id: &str, value: &Value) -> Result<(), BindError> {
//!         match id {
//!             "user_id" => bind::write(&mut self.user_id, value),
//!             "nickname" => bind::write(&mut self.nickname, value),
//!             _ => Err(bind::unknown(id)),
//!         }
//!     }
//! }
//!
//! impl RpcObject for GetUser {
//!     fn declare_rpc() -> RpcDeclaration {
//!         RpcDeclaration::new(HttpMethod::Get, "/users/{user_id}")
//!     }
//! }
//! ```

use crate::descriptor::RpcDeclaration;
use crate::error::BindError;
use serde_json::Value;
use std::any::{Any, TypeId};
use std::fmt;

/// A type whose fields can be written to and read from wire values.
///
/// Implemented by request objects and by the nested objects they contain.
pub trait RpcFields: Any + Send {
    /// Declare the bound fields, in wire order
    fn declare_fields(fields: &mut FieldSet)
    where
        Self: Sized;

    /// Current value of a field; `None` when the field has no value
    fn read_field(&self, id: &str) -> Result<Option<Value>, BindError>;

    /// Assign a decoded value to a field
    fn write_field(&mut self, id: &str, value: &Value) -> Result<(), BindError>;

    /// Nested object behind a field declared with [`FieldSet::nested`]
    fn nested(&self, id: &str) -> Option<&dyn RpcFields> {
        let _ = id;
        None
    }

    /// Mutable nested object, created on demand for optional fields
    fn nested_mut(&mut self, id: &str) -> Option<&mut dyn RpcFields> {
        let _ = id;
        None
    }
}

/// A top-level object that maps to one RPC call
pub trait RpcObject: RpcFields + Sized {
    /// Endpoint, method and content types of the call
    fn declare_rpc() -> RpcDeclaration;
}

/// Downcast a type-erased object handed to validators or handlers
pub fn downcast_ref<T: RpcFields>(object: &dyn RpcFields) -> Option<&T> {
    let any: &dyn Any = object;
    any.downcast_ref::<T>()
}

/// Reference to the declaration of a nested object type
#[derive(Clone, Copy)]
pub struct NestedType {
    type_id: TypeId,
    type_name: &'static str,
    declare: fn(&mut FieldSet),
}

impl NestedType {
    pub fn of<T: RpcFields>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            declare: T::declare_fields,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Run the nested type's field declaration
    pub fn declare(&self, fields: &mut FieldSet) {
        (self.declare)(fields)
    }

    /// The nested type's [`RpcFields::declare_fields`]
    pub fn declare_fn(&self) -> fn(&mut FieldSet) {
        self.declare
    }
}

impl fmt::Debug for NestedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NestedType")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// What kind of value a field holds
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Any serde-convertible value
    Value,
    /// A nested object decoded with its own bindings
    Object(NestedType),
}

/// Binding rule for one field
#[derive(Debug, Clone)]
pub struct FieldBinding {
    id: String,
    wire_key: Option<String>,
    required: bool,
    kind: FieldKind,
}

impl FieldBinding {
    fn new(id: String, kind: FieldKind) -> Self {
        Self {
            id,
            wire_key: None,
            required: true,
            kind,
        }
    }

    /// Use an explicit wire key instead of translating the identifier
    pub fn wire_name(&mut self, key: impl Into<String>) -> &mut Self {
        self.wire_key = Some(key.into());
        self
    }

    /// Allow the field to be absent on the wire
    pub fn optional(&mut self) -> &mut Self {
        self.required = false;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Explicit wire key override, if declared
    pub fn wire_key(&self) -> Option<&str> {
        self.wire_key.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_nested(&self) -> bool {
        matches!(self.kind, FieldKind::Object(_))
    }
}

/// Ordered collection of field bindings filled by [`RpcFields::declare_fields`]
#[derive(Debug, Default)]
pub struct FieldSet {
    bindings: Vec<FieldBinding>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a required value field
    pub fn field(&mut self, id: impl Into<String>) -> &mut FieldBinding {
        self.push(FieldBinding::new(id.into(), FieldKind::Value))
    }

    /// Declare a required nested object field
    pub fn nested<T: RpcFields>(&mut self, id: impl Into<String>) -> &mut FieldBinding {
        self.push(FieldBinding::new(
            id.into(),
            FieldKind::Object(NestedType::of::<T>()),
        ))
    }

    pub fn bindings(&self) -> &[FieldBinding] {
        &self.bindings
    }

    pub fn into_bindings(self) -> Vec<FieldBinding> {
        self.bindings
    }

    fn push(&mut self, binding: FieldBinding) -> &mut FieldBinding {
        let index = self.bindings.len();
        self.bindings.push(binding);
        &mut self.bindings[index]
    }
}

/// Helpers for implementing [`RpcFields`] accessors with serde
pub mod bind {
    use crate::error::BindError;
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Serialize};
    use serde_json::Value;

    /// Convert a field to a wire value; `null` becomes `None`
    pub fn read<T: Serialize>(value: &T) -> Result<Option<Value>, BindError> {
        match serde_json::to_value(value) {
            Ok(Value::Null) => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(err) => Err(BindError::Convert(err.to_string())),
        }
    }

    /// Convert a wire value into the field's type and assign it.
    ///
    /// Values that do not convert directly get two retries. Strings holding
    /// a number or boolean literal are read as that literal, so form-encoded
    /// `"42"` fills an integer field and `["1", "2"]` fills a `Vec<u32>`.
    /// A lone scalar offered to a sequence field is read as a one-element
    /// sequence, since form bodies cannot tell `tag=7` from `[7]`. Other
    /// mismatches are errors, and the slot is untouched on failure.
    pub fn write<T: DeserializeOwned>(slot: &mut T, value: &Value) -> Result<(), BindError> {
        let parsed = match T::deserialize(value) {
            Ok(parsed) => parsed,
            Err(err) => retry::<T>(value).ok_or_else(|| BindError::Convert(err.to_string()))?,
        };
        *slot = parsed;
        Ok(())
    }

    fn retry<T: DeserializeOwned>(value: &Value) -> Option<T> {
        let coerced = coerce_literals(value);
        if let Some(coerced) = &coerced
            && let Ok(parsed) = T::deserialize(coerced)
        {
            return Some(parsed);
        }

        if value.is_array() || value.is_object() || !accepts_sequence::<T>() {
            return None;
        }
        let single = Value::Array(vec![value.clone()]);
        T::deserialize(&single)
            .ok()
            .or_else(|| T::deserialize(&coerce_literals(&single)?).ok())
    }

    /// Number and boolean literals only; `"null"` or `"{..}"` stay strings
    fn coerce_literals(value: &Value) -> Option<Value> {
        match value {
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(literal @ (Value::Number(_) | Value::Bool(_))) => Some(literal),
                _ => None,
            },
            Value::Array(items) => Some(Value::Array(
                items
                    .iter()
                    .map(|item| coerce_literals(item).unwrap_or_else(|| item.clone()))
                    .collect(),
            )),
            _ => None,
        }
    }

    fn accepts_sequence<T: DeserializeOwned>() -> bool {
        T::deserialize(&Value::Array(Vec::new())).is_ok()
    }

    /// Error for an identifier the type does not know
    pub fn unknown(id: &str) -> BindError {
        BindError::UnknownField(id.to_string())
    }
}
