//! Request construction from RPC objects

use crate::codec::{FormCodec, WireField, codec_for, percent, scalar_text};
use crate::context::WireContext;
use crate::request::HttpRequest;
use battery_core::{
    DescriptorRegistry, FieldKind, FieldNameTranslator, ObjectShape, RpcError, RpcFields,
    RpcObject, RpcObjectDescriptor, SerializationError,
};
use serde_json::{Map, Value};
use tracing::debug;

/// Builds [`HttpRequest`]s from request objects and their descriptors.
///
/// Building a request has no network side effects.
pub struct RequestFactory;

impl RequestFactory {
    /// Resolve the descriptor of `T` and build the request for `object`
    pub fn create_request<T: RpcObject>(
        wire: &WireContext,
        object: &T,
    ) -> Result<HttpRequest, RpcError> {
        let descriptor = wire.registry().resolve::<T>()?;
        Self::create_with_descriptor(wire, &descriptor, object)
    }

    /// Build the request for an object whose descriptor is already resolved
    pub fn create_with_descriptor(
        wire: &WireContext,
        descriptor: &RpcObjectDescriptor,
        object: &dyn RpcFields,
    ) -> Result<HttpRequest, RpcError> {
        let translator = descriptor.name_translator();
        let mut fields = collect_fields(
            wire.registry(),
            object,
            descriptor.shape(),
            translator,
            "",
        )?;

        let endpoint = substitute_path(descriptor, &mut fields)?;
        let mut url = wire.config().resolve_url(&endpoint);
        let wire_fields: Vec<WireField> = fields
            .into_iter()
            .map(|field| (field.wire_key, field.value))
            .collect();

        let method = descriptor.method();
        let config = wire.config();
        let mut headers: Vec<(String, String)> = config
            .default_headers
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        let has_header = |headers: &[(String, String)], name: &str| {
            headers.iter().any(|(key, _)| key.eq_ignore_ascii_case(name))
        };
        if !config.user_agent.is_empty() && !has_header(&headers, "User-Agent") {
            headers.push(("User-Agent".to_string(), config.user_agent.clone()));
        }
        if let Some(expected) = descriptor.expected_content_type()
            && !has_header(&headers, "Accept")
        {
            headers.push(("Accept".to_string(), expected.to_string()));
        }

        let body = if method.has_body() {
            let encoded = codec_for(descriptor.request_content_type()).encode(&wire_fields)?;
            headers.push(("Content-Type".to_string(), encoded.content_type));
            Some(encoded.bytes)
        } else {
            let query = FormCodec::encode_pairs(&wire_fields)?;
            if !query.is_empty() {
                url.push(if url.contains('?') { '&' } else { '?' });
                url.push_str(&query);
            }
            None
        };

        debug!(
            type_name = descriptor.type_name(),
            method = %method,
            url = %url,
            "built request"
        );

        let mut request = HttpRequest::new(method, url);
        for (name, value) in headers {
            request = request.with_header(name, value);
        }
        if let Some(body) = body {
            request = request.with_body(body);
        }
        Ok(request)
    }
}

/// A field read from the object, ready for encoding
struct CollectedField {
    id: String,
    wire_key: String,
    value: Value,
}

fn collect_fields(
    registry: &DescriptorRegistry,
    object: &dyn RpcFields,
    shape: &ObjectShape,
    translator: &FieldNameTranslator,
    prefix: &str,
) -> Result<Vec<CollectedField>, RpcError> {
    let mut collected = Vec::with_capacity(shape.fields().len());

    for binding in shape.fields() {
        let path = if prefix.is_empty() {
            binding.id().to_string()
        } else {
            format!("{}.{}", prefix, binding.id())
        };

        let value = match (binding.kind(), object.nested(binding.id())) {
            (FieldKind::Object(nested), Some(child)) => {
                let nested_shape = registry.resolve_shape(nested)?;
                let inner = collect_fields(registry, child, &nested_shape, translator, &path)?;
                let map: Map<String, Value> = inner
                    .into_iter()
                    .map(|field| (field.wire_key, field.value))
                    .collect();
                Some(Value::Object(map))
            }
            _ => object
                .read_field(binding.id())
                .map_err(|source| SerializationError::Bind {
                    field: path.clone(),
                    source,
                })?
                .filter(|value| !value.is_null()),
        };

        match value {
            Some(value) => collected.push(CollectedField {
                id: binding.id().to_string(),
                wire_key: ObjectShape::wire_key(binding, translator),
                value,
            }),
            None if binding.is_required() => {
                return Err(SerializationError::MissingField { field: path }.into());
            }
            None => {}
        }
    }

    Ok(collected)
}

/// Replace `{field}` placeholders and drop those fields from the body
fn substitute_path(
    descriptor: &RpcObjectDescriptor,
    fields: &mut Vec<CollectedField>,
) -> Result<String, SerializationError> {
    let mut endpoint = descriptor.endpoint().to_string();

    for param in descriptor.path_params() {
        let placeholder = format!("{{{}}}", param);
        if !endpoint.contains(&placeholder) {
            continue;
        }
        let index = fields
            .iter()
            .position(|field| &field.id == param)
            .ok_or_else(|| SerializationError::MissingField {
                field: param.clone(),
            })?;
        let field = fields.remove(index);
        let text = scalar_text(&field.value).ok_or_else(|| SerializationError::Unrepresentable {
            field: param.clone(),
            encoding: "path",
        })?;
        endpoint = endpoint.replace(&placeholder, &percent::encode_path(&text));
    }

    Ok(endpoint)
}
