//! Resolved call metadata for RPC object types
//!
//! [`RpcDeclaration`] is what a type declares; [`RpcObjectDescriptor`] is the
//! validated, immutable result that the request and response pipelines share.
//! [`DescriptorRegistry`] resolves each type once and caches the result for
//! its own lifetime.

use crate::error::ContextError;
use crate::fields::{FieldBinding, FieldKind, FieldSet, NestedType, RpcObject};
use crate::http::{ContentType, HttpMethod};
use crate::naming::FieldNameTranslator;
use dashmap::DashMap;
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Call metadata declared by an [`RpcObject`]
#[derive(Debug, Clone)]
pub struct RpcDeclaration {
    method: HttpMethod,
    endpoint: String,
    request_content_type: ContentType,
    expected_content_type: Option<String>,
    name_translator: Option<FieldNameTranslator>,
}

impl RpcDeclaration {
    /// Declare a call; the request body defaults to form encoding
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            request_content_type: ContentType::FormUrlEncoded,
            expected_content_type: None,
            name_translator: None,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, endpoint)
    }

    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, endpoint)
    }

    /// Encoding of the request body
    pub fn request_content_type(mut self, content_type: ContentType) -> Self {
        self.request_content_type = content_type;
        self
    }

    /// Force the response content type instead of trusting the server
    pub fn expect_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.expected_content_type = Some(content_type.into());
        self
    }

    /// Use a translator other than the registry default for this type
    pub fn name_translator(mut self, translator: FieldNameTranslator) -> Self {
        self.name_translator = Some(translator);
        self
    }
}

/// Validated field layout of one type
#[derive(Debug)]
pub struct ObjectShape {
    type_name: &'static str,
    fields: Vec<FieldBinding>,
}

impl ObjectShape {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[FieldBinding] {
        &self.fields
    }

    pub fn field(&self, id: &str) -> Option<&FieldBinding> {
        self.fields.iter().find(|binding| binding.id() == id)
    }

    /// Wire key of a binding: the explicit override, else the translated identifier
    pub fn wire_key(binding: &FieldBinding, translator: &FieldNameTranslator) -> String {
        match binding.wire_key() {
            Some(key) => key.to_string(),
            None => translator.local_to_remote(binding.id()),
        }
    }
}

/// Immutable metadata for one request object type
#[derive(Debug)]
pub struct RpcObjectDescriptor {
    method: HttpMethod,
    endpoint: String,
    path_params: Vec<String>,
    request_content_type: ContentType,
    expected_content_type: Option<String>,
    name_translator: FieldNameTranslator,
    shape: Arc<ObjectShape>,
}

impl RpcObjectDescriptor {
    pub fn type_name(&self) -> &'static str {
        self.shape.type_name
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Endpoint template, possibly containing `{field}` placeholders
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Field identifiers substituted into the endpoint, in template order
    pub fn path_params(&self) -> &[String] {
        &self.path_params
    }

    pub fn request_content_type(&self) -> ContentType {
        self.request_content_type
    }

    /// Declared response content type; `None` when unset or empty
    pub fn expected_content_type(&self) -> Option<&str> {
        self.expected_content_type
            .as_deref()
            .filter(|content_type| !content_type.is_empty())
    }

    pub fn name_translator(&self) -> &FieldNameTranslator {
        &self.name_translator
    }

    pub fn shape(&self) -> &Arc<ObjectShape> {
        &self.shape
    }

    pub fn fields(&self) -> &[FieldBinding] {
        self.shape.fields()
    }
}

/// Resolves and caches descriptors keyed by type identity.
///
/// Resolution is compute-if-absent: concurrent first lookups may both build
/// a descriptor, but only the first inserted instance is ever handed out.
/// Entries are never evicted.
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    translator: FieldNameTranslator,
    descriptors: DashMap<TypeId, Arc<RpcObjectDescriptor>>,
    shapes: DashMap<TypeId, Arc<ObjectShape>>,
}

impl DescriptorRegistry {
    /// Create a registry whose types default to `translator`
    pub fn new(translator: FieldNameTranslator) -> Self {
        Self {
            translator,
            descriptors: DashMap::new(),
            shapes: DashMap::new(),
        }
    }

    /// Translator used by types that do not declare their own
    pub fn default_translator(&self) -> &FieldNameTranslator {
        &self.translator
    }

    /// Resolve the descriptor of `T`, building it on first use
    pub fn resolve<T: RpcObject>(&self) -> Result<Arc<RpcObjectDescriptor>, ContextError> {
        let key = TypeId::of::<T>();
        if let Some(found) = self.descriptors.get(&key) {
            return Ok(Arc::clone(found.value()));
        }

        let descriptor = Arc::new(self.build_descriptor::<T>()?);
        let entry = self.descriptors.entry(key).or_insert(descriptor);
        Ok(Arc::clone(entry.value()))
    }

    /// Resolve the shape of a nested object type.
    ///
    /// Shapes are cached by type alone; wire-key collisions depend on the
    /// translator and are checked by each descriptor that uses the shape.
    pub fn resolve_shape(&self, nested: NestedType) -> Result<Arc<ObjectShape>, ContextError> {
        self.shape_of(nested.type_id(), nested.type_name(), nested.declare_fn())
    }

    /// Number of cached descriptors
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    fn build_descriptor<T: RpcObject>(&self) -> Result<RpcObjectDescriptor, ContextError> {
        let type_name = std::any::type_name::<T>();
        let declaration = T::declare_rpc();
        let translator = declaration
            .name_translator
            .unwrap_or_else(|| self.translator.clone());

        if declaration.endpoint.trim().is_empty() {
            return Err(ContextError::MissingEndpoint { type_name });
        }

        let shape = self.shape_of(TypeId::of::<T>(), type_name, T::declare_fields)?;
        self.validate_tree(&shape, TypeId::of::<T>(), &translator, &mut Vec::new())?;

        let path_params = parse_placeholders(type_name, &declaration.endpoint)?;
        if let Some(unknown) = path_params.iter().find(|name| shape.field(name).is_none()) {
            return Err(ContextError::UnknownPlaceholder {
                type_name,
                placeholder: unknown.clone(),
            });
        }

        Ok(RpcObjectDescriptor {
            method: declaration.method,
            endpoint: declaration.endpoint,
            path_params,
            request_content_type: declaration.request_content_type,
            expected_content_type: declaration.expected_content_type,
            name_translator: translator,
            shape,
        })
    }

    fn shape_of(
        &self,
        type_id: TypeId,
        type_name: &'static str,
        declare: fn(&mut FieldSet),
    ) -> Result<Arc<ObjectShape>, ContextError> {
        if let Some(found) = self.shapes.get(&type_id) {
            return Ok(Arc::clone(found.value()));
        }

        let mut fields = FieldSet::new();
        declare(&mut fields);
        let fields = fields.into_bindings();
        check_unique_ids(type_name, &fields)?;

        let shape = Arc::new(ObjectShape { type_name, fields });
        let entry = self.shapes.entry(type_id).or_insert(shape);
        Ok(Arc::clone(entry.value()))
    }

    /// Check wire keys of `shape` and every shape nested in it under `translator`
    fn validate_tree(
        &self,
        shape: &ObjectShape,
        type_id: TypeId,
        translator: &FieldNameTranslator,
        visiting: &mut Vec<TypeId>,
    ) -> Result<(), ContextError> {
        check_wire_keys(shape.type_name, &shape.fields, translator)?;

        // Recursive types stop at the cycle.
        visiting.push(type_id);
        for binding in &shape.fields {
            if let FieldKind::Object(nested) = binding.kind()
                && !visiting.contains(&nested.type_id())
            {
                let nested_shape = self.resolve_shape(nested)?;
                self.validate_tree(&nested_shape, nested.type_id(), translator, visiting)?;
            }
        }
        visiting.pop();

        Ok(())
    }
}

fn check_unique_ids(type_name: &'static str, fields: &[FieldBinding]) -> Result<(), ContextError> {
    let mut seen = HashSet::new();
    for binding in fields {
        if !seen.insert(binding.id()) {
            return Err(ContextError::DuplicateField {
                type_name,
                field: binding.id().to_string(),
            });
        }
    }
    Ok(())
}

fn check_wire_keys(
    type_name: &'static str,
    fields: &[FieldBinding],
    translator: &FieldNameTranslator,
) -> Result<(), ContextError> {
    let mut seen: HashMap<String, &str> = HashMap::new();

    for binding in fields {
        let wire_key = ObjectShape::wire_key(binding, translator);
        if let Some(first) = seen.get(&wire_key) {
            return Err(ContextError::DuplicateWireKey {
                type_name,
                wire_key,
                first: first.to_string(),
                second: binding.id().to_string(),
            });
        }
        seen.insert(wire_key, binding.id());
    }

    Ok(())
}

/// Extract `{name}` placeholders from an endpoint template
fn parse_placeholders(type_name: &'static str, endpoint: &str) -> Result<Vec<String>, ContextError> {
    let invalid = |reason: &str| ContextError::InvalidEndpoint {
        type_name,
        endpoint: endpoint.to_string(),
        reason: reason.to_string(),
    };

    let mut names = Vec::new();
    let mut rest = endpoint;
    while let Some(open) = rest.find(['{', '}']) {
        if rest[open..].starts_with('}') {
            return Err(invalid("unmatched `}`"));
        }
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| invalid("unclosed `{`"))?;
        let name = &after[..close];
        if name.is_empty() || name.contains('{') {
            return Err(invalid("empty or nested placeholder"));
        }
        names.push(name.to_string());
        rest = &after[close + 1..];
    }

    Ok(names)
}
