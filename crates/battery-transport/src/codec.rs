//! Body codecs for the supported request and response encodings
//!
//! Codecs work on the generic value tree: encoding takes the ordered
//! `(wire key, value)` pairs produced by [`RequestFactory`](crate::RequestFactory)
//! and decoding yields a key/value object for [`ObjectBuilder`](crate::ObjectBuilder).

use battery_core::{ContentType, DeserializationError, SerializationError};
use serde_json::{Map, Value};

/// One encoded field: wire key and value
pub type WireField = (String, Value);

/// An encoded request body and the `Content-Type` header that describes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Trait for request body encoding and response body decoding
pub trait BodyCodec: Send + Sync {
    /// Encoding implemented by this codec
    fn content_type(&self) -> ContentType;

    /// Encode fields in declaration order
    fn encode(&self, fields: &[WireField]) -> Result<EncodedBody, SerializationError>;

    /// Decode a response body into a key/value object
    fn decode(&self, body: &[u8]) -> Result<Map<String, Value>, DeserializationError>;
}

static JSON: JsonCodec = JsonCodec;
static FORM: FormCodec = FormCodec;
static MULTIPART: MultipartCodec = MultipartCodec;

/// Codec for a content type
pub fn codec_for(content_type: ContentType) -> &'static dyn BodyCodec {
    match content_type {
        ContentType::Json => &JSON,
        ContentType::FormUrlEncoded => &FORM,
        ContentType::Multipart => &MULTIPART,
    }
}

/// JSON object bodies
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl BodyCodec for JsonCodec {
    fn content_type(&self) -> ContentType {
        ContentType::Json
    }

    fn encode(&self, fields: &[WireField]) -> Result<EncodedBody, SerializationError> {
        let object: Map<String, Value> = fields.iter().cloned().collect();
        let bytes = serde_json::to_vec(&Value::Object(object))
            .map_err(|err| SerializationError::Encode(err.to_string()))?;
        Ok(EncodedBody {
            content_type: ContentType::Json.mime().to_string(),
            bytes,
        })
    }

    fn decode(&self, body: &[u8]) -> Result<Map<String, Value>, DeserializationError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|err| DeserializationError::Malformed {
                content_type: ContentType::Json.mime(),
                message: err.to_string(),
            })?;
        match value {
            Value::Object(object) => Ok(object),
            _ => Err(DeserializationError::NotAnObject {
                path: "$".to_string(),
            }),
        }
    }
}

/// `application/x-www-form-urlencoded` bodies and query strings
#[derive(Debug, Clone, Copy, Default)]
pub struct FormCodec;

impl FormCodec {
    /// Encode fields as `key=value` pairs joined with `&`
    pub fn encode_pairs(fields: &[WireField]) -> Result<String, SerializationError> {
        let mut out = String::new();
        for (key, text) in flatten_scalars(fields, "form-urlencoded")? {
            if !out.is_empty() {
                out.push('&');
            }
            out.push_str(&percent::encode_form(&key));
            out.push('=');
            out.push_str(&percent::encode_form(&text));
        }
        Ok(out)
    }
}

impl BodyCodec for FormCodec {
    fn content_type(&self) -> ContentType {
        ContentType::FormUrlEncoded
    }

    fn encode(&self, fields: &[WireField]) -> Result<EncodedBody, SerializationError> {
        Ok(EncodedBody {
            content_type: ContentType::FormUrlEncoded.mime().to_string(),
            bytes: Self::encode_pairs(fields)?.into_bytes(),
        })
    }

    fn decode(&self, body: &[u8]) -> Result<Map<String, Value>, DeserializationError> {
        let malformed = |message: String| DeserializationError::Malformed {
            content_type: ContentType::FormUrlEncoded.mime(),
            message,
        };
        let text = std::str::from_utf8(body).map_err(|err| malformed(err.to_string()))?;

        let mut object = Map::new();
        for pair in text.split('&').filter(|pair| !pair.is_empty()) {
            let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = percent::decode_form(raw_key)
                .ok_or_else(|| malformed(format!("invalid escape in `{}`", raw_key)))?;
            let value = percent::decode_form(raw_value)
                .ok_or_else(|| malformed(format!("invalid escape in `{}`", raw_value)))?;

            // Repeated keys collect into an array
            match object.get_mut(&key) {
                Some(Value::Array(items)) => items.push(Value::String(value)),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, Value::String(value)]);
                }
                None => {
                    object.insert(key, Value::String(value));
                }
            }
        }
        Ok(object)
    }
}

/// `multipart/form-data` request bodies with one text part per value
#[derive(Debug, Clone, Copy, Default)]
pub struct MultipartCodec;

impl MultipartCodec {
    /// Encode with an explicit boundary
    pub fn encode_with_boundary(
        fields: &[WireField],
        boundary: &str,
    ) -> Result<EncodedBody, SerializationError> {
        let mut bytes = Vec::new();
        for (key, text) in flatten_scalars(fields, "multipart/form-data")? {
            bytes.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
            bytes.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    escape_part_name(&key)
                )
                .as_bytes(),
            );
            bytes.extend_from_slice(text.as_bytes());
            bytes.extend_from_slice(b"\r\n");
        }
        bytes.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

        Ok(EncodedBody {
            content_type: format!("{}; boundary={}", ContentType::Multipart.mime(), boundary),
            bytes,
        })
    }
}

/// Percent-encode the characters that would end a quoted header value
fn escape_part_name(name: &str) -> String {
    name.replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

impl BodyCodec for MultipartCodec {
    fn content_type(&self) -> ContentType {
        ContentType::Multipart
    }

    fn encode(&self, fields: &[WireField]) -> Result<EncodedBody, SerializationError> {
        let boundary = format!("battery-{}", uuid::Uuid::new_v4().simple());
        Self::encode_with_boundary(fields, &boundary)
    }

    fn decode(&self, _body: &[u8]) -> Result<Map<String, Value>, DeserializationError> {
        Err(DeserializationError::UnsupportedContentType(
            ContentType::Multipart.mime().to_string(),
        ))
    }
}

/// Text form of a scalar, `None` for objects and arrays
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Flatten fields into text pairs; arrays of scalars repeat the key
fn flatten_scalars(
    fields: &[WireField],
    encoding: &'static str,
) -> Result<Vec<(String, String)>, SerializationError> {
    let unrepresentable = |key: &str| SerializationError::Unrepresentable {
        field: key.to_string(),
        encoding,
    };

    let mut pairs = Vec::with_capacity(fields.len());
    for (key, value) in fields {
        match value {
            Value::Array(items) => {
                for item in items {
                    let text = scalar_text(item).ok_or_else(|| unrepresentable(key))?;
                    pairs.push((key.clone(), text));
                }
            }
            other => {
                let text = scalar_text(other).ok_or_else(|| unrepresentable(key))?;
                pairs.push((key.clone(), text));
            }
        }
    }
    Ok(pairs)
}

/// Percent-encoding for form components and URL path segments
pub mod percent {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    /// Form component encoding: space becomes `+`, `*-._` and alphanumerics stay
    pub fn encode_form(input: &str) -> String {
        encode(input, |byte| {
            byte.is_ascii_alphanumeric() || matches!(byte, b'*' | b'-' | b'.' | b'_')
        }, true)
    }

    /// Path segment encoding: RFC 3986 unreserved characters stay
    pub fn encode_path(input: &str) -> String {
        encode(input, |byte| {
            byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
        }, false)
    }

    /// Decode a form component; `None` on a bad escape or invalid UTF-8
    pub fn decode_form(input: &str) -> Option<String> {
        let bytes = input.as_bytes();
        let mut out = Vec::with_capacity(bytes.len());
        let mut index = 0;
        while index < bytes.len() {
            match bytes[index] {
                b'+' => out.push(b' '),
                b'%' => {
                    let high = hex_value(*bytes.get(index + 1)?)?;
                    let low = hex_value(*bytes.get(index + 2)?)?;
                    out.push((high << 4) | low);
                    index += 2;
                }
                byte => out.push(byte),
            }
            index += 1;
        }
        String::from_utf8(out).ok()
    }

    fn encode(input: &str, keep: impl Fn(u8) -> bool, plus_for_space: bool) -> String {
        let mut out = String::with_capacity(input.len());
        for &byte in input.as_bytes() {
            if keep(byte) {
                out.push(byte as char);
            } else if plus_for_space && byte == b' ' {
                out.push('+');
            } else {
                out.push('%');
                out.push(HEX[(byte >> 4) as usize] as char);
                out.push(HEX[(byte & 0x0F) as usize] as char);
            }
        }
        out
    }

    fn hex_value(byte: u8) -> Option<u8> {
        match byte {
            b'0'..=b'9' => Some(byte - b'0'),
            b'a'..=b'f' => Some(byte - b'a' + 10),
            b'A'..=b'F' => Some(byte - b'A' + 10),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "codec/codec_tests.rs"]
mod codec_tests;
