//! Response decoding into target objects

use crate::codec::codec_for;
use crate::context::WireContext;
use battery_core::{
    BindError, ContentType, DeserializationError, DescriptorRegistry, FieldKind,
    FieldNameTranslator, NestedType, ObjectShape, RpcFields,
};
use serde_json::{Map, Value};
use tracing::trace;

/// Populates target objects from raw response bodies.
///
/// The target is mutated in place. When decoding fails part-way the fields
/// assigned so far keep their new values.
pub struct ObjectBuilder;

impl ObjectBuilder {
    /// Decode `raw` and populate `target` using the shape registered for `T`
    pub fn build<T: RpcFields>(
        wire: &WireContext,
        content_type: Option<&str>,
        raw: &[u8],
        target: &mut T,
        translator: &FieldNameTranslator,
    ) -> Result<(), DeserializationError> {
        let shape = wire.registry().resolve_shape(NestedType::of::<T>())?;
        Self::build_shape(wire, content_type, raw, target, &shape, translator)
    }

    /// Decode `raw` and populate a type-erased `target` with a known shape
    pub fn build_shape(
        wire: &WireContext,
        content_type: Option<&str>,
        raw: &[u8],
        target: &mut dyn RpcFields,
        shape: &ObjectShape,
        translator: &FieldNameTranslator,
    ) -> Result<(), DeserializationError> {
        let object = Self::parse(content_type, raw)?;
        populate(wire.registry(), &object, target, shape, translator, "")
    }

    /// Parse a body into a key/value object with the decoder for `content_type`
    pub fn parse(
        content_type: Option<&str>,
        raw: &[u8],
    ) -> Result<Map<String, Value>, DeserializationError> {
        let declared = content_type.unwrap_or_default();
        let content_type = ContentType::parse(declared)
            .ok_or_else(|| DeserializationError::UnsupportedContentType(declared.to_string()))?;
        codec_for(content_type).decode(raw)
    }
}

fn populate(
    registry: &DescriptorRegistry,
    object: &Map<String, Value>,
    target: &mut dyn RpcFields,
    shape: &ObjectShape,
    translator: &FieldNameTranslator,
    prefix: &str,
) -> Result<(), DeserializationError> {
    for binding in shape.fields() {
        let key = ObjectShape::wire_key(binding, translator);
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        let Some(value) = object.get(&key) else {
            if binding.is_required() {
                return Err(DeserializationError::MissingField { key: path });
            }
            continue;
        };

        match binding.kind() {
            FieldKind::Value => {
                target
                    .write_field(binding.id(), value)
                    .map_err(|err| mismatch(&path, err))?;
            }
            FieldKind::Object(nested) => {
                if value.is_null() && !binding.is_required() {
                    continue;
                }
                let Value::Object(inner) = value else {
                    return Err(DeserializationError::TypeMismatch {
                        key: path,
                        message: "expected an object".to_string(),
                    });
                };
                match target.nested_mut(binding.id()) {
                    Some(child) => {
                        let nested_shape = registry.resolve_shape(nested)?;
                        populate(registry, inner, child, &nested_shape, translator, &path)?;
                    }
                    // Types without a nested accessor decode the object with serde
                    None => target
                        .write_field(binding.id(), value)
                        .map_err(|err| mismatch(&path, err))?,
                }
            }
        }
        trace!(key = %path, "assigned field");
    }

    Ok(())
}

fn mismatch(path: &str, err: BindError) -> DeserializationError {
    let message = match err {
        BindError::Convert(message) => message,
        other => other.to_string(),
    };
    DeserializationError::TypeMismatch {
        key: path.to_string(),
        message,
    }
}
