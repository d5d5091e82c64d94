#![allow(non_snake_case)]

use super::*;
use serde_json::json;
use test_case::test_case;

fn fields(pairs: &[(&str, Value)]) -> Vec<WireField> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

// JsonCodec tests

#[test]
fn JsonCodec___encode___produces_object() {
    let body = JsonCodec
        .encode(&fields(&[("user_id", json!(42)), ("tags", json!(["a", "b"]))]))
        .unwrap();

    let parsed: Value = serde_json::from_slice(&body.bytes).unwrap();
    assert_eq!(parsed, json!({"user_id": 42, "tags": ["a", "b"]}));
    assert_eq!(body.content_type, "application/json");
}

#[test]
fn JsonCodec___decode___returns_object() {
    let object = JsonCodec.decode(br#"{"user_id": 42, "extra": "ignored"}"#).unwrap();

    assert_eq!(object.get("user_id"), Some(&json!(42)));
    assert_eq!(object.len(), 2);
}

#[test]
fn JsonCodec___decode___array_is_not_an_object() {
    let result = JsonCodec.decode(b"[1, 2]");

    assert!(matches!(result, Err(DeserializationError::NotAnObject { .. })));
}

#[test]
fn JsonCodec___decode___invalid_json_is_malformed() {
    let result = JsonCodec.decode(b"{\"user_id\": ");

    assert!(matches!(
        result,
        Err(DeserializationError::Malformed { content_type: "application/json", .. })
    ));
}

#[test]
fn JsonCodec___decode___empty_body_is_malformed() {
    assert!(matches!(
        JsonCodec.decode(b""),
        Err(DeserializationError::Malformed { .. })
    ));
}

// FormCodec tests

#[test]
fn FormCodec___encode___joins_pairs_in_order() {
    let body = FormCodec
        .encode(&fields(&[("name", json!("Kim Min")), ("age", json!(30)), ("admin", json!(true))]))
        .unwrap();

    assert_eq!(String::from_utf8(body.bytes).unwrap(), "name=Kim+Min&age=30&admin=true");
    assert_eq!(body.content_type, "application/x-www-form-urlencoded");
}

#[test]
fn FormCodec___encode___arrays_repeat_key() {
    let encoded = FormCodec::encode_pairs(&fields(&[("id", json!([1, 2, 3]))])).unwrap();

    assert_eq!(encoded, "id=1&id=2&id=3");
}

#[test]
fn FormCodec___encode___object_is_unrepresentable() {
    let result = FormCodec.encode(&fields(&[("address", json!({"city": "Seoul"}))]));

    assert!(matches!(
        result,
        Err(SerializationError::Unrepresentable { field, encoding: "form-urlencoded" }) if field == "address"
    ));
}

#[test]
fn FormCodec___encode___nested_array_is_unrepresentable() {
    let result = FormCodec.encode(&fields(&[("matrix", json!([[1], [2]]))]));

    assert!(matches!(result, Err(SerializationError::Unrepresentable { .. })));
}

#[test]
fn FormCodec___decode___collects_repeated_keys() {
    let object = FormCodec.decode(b"id=1&id=2&name=a+b&id=3").unwrap();

    assert_eq!(object.get("id"), Some(&json!(["1", "2", "3"])));
    assert_eq!(object.get("name"), Some(&json!("a b")));
}

#[test]
fn FormCodec___decode___key_without_value_is_empty_string() {
    let object = FormCodec.decode(b"flag&other=").unwrap();

    assert_eq!(object.get("flag"), Some(&json!("")));
    assert_eq!(object.get("other"), Some(&json!("")));
}

#[test]
fn FormCodec___decode___empty_body_is_empty_object() {
    assert!(FormCodec.decode(b"").unwrap().is_empty());
}

#[test]
fn FormCodec___decode___bad_escape_is_malformed() {
    let result = FormCodec.decode(b"name=%zz");

    assert!(matches!(result, Err(DeserializationError::Malformed { .. })));
}

// MultipartCodec tests

#[test]
fn MultipartCodec___encode_with_boundary___writes_one_part_per_value() {
    let body = MultipartCodec::encode_with_boundary(
        &fields(&[("title", json!("hello")), ("tag", json!(["a", "b"]))]),
        "XYZ",
    )
    .unwrap();

    let text = String::from_utf8(body.bytes).unwrap();
    assert_eq!(
        text,
        "--XYZ\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\nhello\r\n\
         --XYZ\r\nContent-Disposition: form-data; name=\"tag\"\r\n\r\na\r\n\
         --XYZ\r\nContent-Disposition: form-data; name=\"tag\"\r\n\r\nb\r\n\
         --XYZ--\r\n"
    );
    assert_eq!(body.content_type, "multipart/form-data; boundary=XYZ");
}

#[test]
fn MultipartCodec___encode_with_boundary___escapes_line_breaks_in_names() {
    let body = MultipartCodec::encode_with_boundary(
        &fields(&[("note\r\nX-Injected: 1", json!("v")), ("say \"hi\"", json!("w"))]),
        "XYZ",
    )
    .unwrap();

    let text = String::from_utf8(body.bytes).unwrap();
    assert!(!text.contains("\r\nX-Injected"));
    assert!(text.contains("name=\"note%0D%0AX-Injected: 1\""));
    assert!(text.contains("name=\"say %22hi%22\""));
}

#[test]
fn MultipartCodec___encode___uses_random_boundary() {
    let first = MultipartCodec.encode(&fields(&[("a", json!(1))])).unwrap();
    let second = MultipartCodec.encode(&fields(&[("a", json!(1))])).unwrap();

    assert!(first.content_type.starts_with("multipart/form-data; boundary=battery-"));
    assert_ne!(first.content_type, second.content_type);
}

#[test]
fn MultipartCodec___encode___object_is_unrepresentable() {
    let result = MultipartCodec.encode(&fields(&[("meta", json!({"k": 1}))]));

    assert!(matches!(
        result,
        Err(SerializationError::Unrepresentable { encoding: "multipart/form-data", .. })
    ));
}

#[test]
fn MultipartCodec___decode___is_unsupported() {
    assert!(matches!(
        MultipartCodec.decode(b"--x--"),
        Err(DeserializationError::UnsupportedContentType(_))
    ));
}

// codec_for tests

#[test_case(ContentType::Json)]
#[test_case(ContentType::FormUrlEncoded)]
#[test_case(ContentType::Multipart)]
fn codec_for___content_type___matches(content_type: ContentType) {
    assert_eq!(codec_for(content_type).content_type(), content_type);
}

// percent tests

#[test_case("abc-._*", "abc-._*" ; "unreserved")]
#[test_case("a b", "a+b" ; "space")]
#[test_case("a&b=c", "a%26b%3Dc" ; "delimiters")]
#[test_case("~", "%7E" ; "tilde")]
#[test_case("한", "%ED%95%9C" ; "utf8")]
fn percent___encode_form___escapes(input: &str, expected: &str) {
    assert_eq!(percent::encode_form(input), expected);
}

#[test_case("user 1", "user%201" ; "space")]
#[test_case("a/b", "a%2Fb" ; "slash")]
#[test_case("v1.2~x", "v1.2~x" ; "unreserved")]
fn percent___encode_path___escapes(input: &str, expected: &str) {
    assert_eq!(percent::encode_path(input), expected);
}

#[test_case("a+b", Some("a b") ; "plus")]
#[test_case("%ED%95%9C", Some("한") ; "utf8")]
#[test_case("%e2%82%ac", Some("€") ; "lowercase hex")]
#[test_case("%2", None ; "truncated")]
#[test_case("%FF", None ; "invalid utf8")]
fn percent___decode_form___decodes(input: &str, expected: Option<&str>) {
    assert_eq!(percent::decode_form(input).as_deref(), expected);
}
