use rstest::rstest;

use hawkjson::{Document, ErrorKind, Value, ValueId};

fn parse(input: &str) -> Document {
    hawkjson::parse_str(input).unwrap()
}

fn parse_err(input: &str) -> hawkjson::Error {
    hawkjson::parse_str(input).unwrap_err()
}

/// Structural equality ignoring object key order and float formatting.
fn value_eq(a: &Document, id_a: ValueId, b: &Document, id_b: ValueId) -> bool {
    match (*a.get(id_a), *b.get(id_b)) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => (x.is_nan() && y.is_nan()) || x == y,
        (Value::Str(x), Value::Str(y)) => a.arena().bytes(x) == b.arena().bytes(y),
        (Value::Array(x), Value::Array(y)) => {
            let count = a.arena().element_count(x);
            count == b.arena().element_count(y)
                && (0..count).all(|index| {
                    let left = a.arena().element(x, index).unwrap();
                    let right = b.arena().element(y, index).unwrap();
                    value_eq(a, left, b, right)
                })
        }
        (Value::Object(x), Value::Object(y)) => {
            let left = a.arena().pairs(x);
            left.len() == b.arena().pairs(y).len()
                && left.iter().all(|pair| {
                    let key = std::str::from_utf8(a.arena().bytes(pair.key)).unwrap();
                    match b.arena().field(y, key) {
                        Some(other) => value_eq(a, pair.value, b, other),
                        None => false,
                    }
                })
        }
        _ => false,
    }
}

#[test]
fn empty_object_parses_and_serializes() {
    let doc = parse("{}");
    match *doc.get(doc.root()) {
        Value::Object(range) => assert_eq!(range.len, 0),
        ref other => panic!("expected object, got {other:?}"),
    }
    assert_eq!(hawkjson::to_string(&doc), "{}");
}

#[test]
fn integer_array_parses() {
    let doc = parse("[1,2,3]");
    let Value::Array(slice) = *doc.get(doc.root()) else {
        panic!("expected array");
    };
    assert_eq!(doc.arena().element_count(slice), 3);
    let values: Vec<Value> = doc
        .arena()
        .elements(slice)
        .map(|id| *doc.get(id))
        .collect();
    assert_eq!(values, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[rstest]
#[case("true", Value::Bool(true))]
#[case("false", Value::Bool(false))]
#[case("0", Value::Int(0))]
#[case("-42", Value::Int(-42))]
#[case("3.5", Value::Float(3.5))]
#[case("-0.25", Value::Float(-0.25))]
#[case("3.14e10", Value::Float(3.14e10))]
#[case("2E-3", Value::Float(2e-3))]
#[case("1e5", Value::Float(1e5))]
fn scalar_literals(#[case] input: &str, #[case] expected: Value) {
    let doc = parse(input);
    assert_eq!(*doc.get(doc.root()), expected);
}

#[test]
fn null_literal_is_an_absent_reference() {
    let doc = parse("null");
    assert_eq!(doc.root(), hawkjson::NULL_ID);
    assert_eq!(*doc.get(doc.root()), Value::Null);
}

#[test]
fn string_escapes_decode_to_control_characters() {
    let doc = parse(r#""a\tb\nc\\d\"e\/f\b\r\f""#);
    let Value::Str(slice) = *doc.get(doc.root()) else {
        panic!("expected string");
    };
    assert_eq!(
        doc.arena().bytes(slice),
        b"a\tb\nc\\d\"e/f\x08\r\x0c".as_slice()
    );
}

#[test]
fn unicode_escape_is_validated_but_not_decoded() {
    let doc = parse("\"pre\\u00e9post\"");
    let Value::Str(slice) = *doc.get(doc.root()) else {
        panic!("expected string");
    };
    assert_eq!(doc.arena().bytes(slice), b"pre\\u00e9post".as_slice());
}

#[rstest]
#[case(r#""bad\u00g9""#)]
#[case(r#""bad\u00""#)]
fn malformed_unicode_escape_is_fatal(#[case] input: &str) {
    assert_eq!(parse_err(input).kind, ErrorKind::Syntax);
}

#[test]
fn duplicate_keys_overwrite() {
    let doc = parse(r#"{"a": 1, "a": 2}"#);
    let Value::Object(range) = *doc.get(doc.root()) else {
        panic!("expected object");
    };
    assert_eq!(range.len, 1);
    let id = doc.arena().field(range, "a").unwrap();
    assert_eq!(*doc.get(id), Value::Int(2));
}

#[test]
fn nested_document_round_trips_by_value() {
    let input = r#"{
        "name": "probe",
        "enabled": true,
        "retries": 3,
        "ratio": 0.5,
        "tags": ["a", "b"],
        "extra": null,
        "limits": {"low": 1, "high": 100}
    }"#;
    let first = parse(input);
    let rendered = hawkjson::to_string(&first);
    let second = parse(&rendered);
    assert!(value_eq(&first, first.root(), &second, second.root()));
}

#[rstest]
#[case("{}")]
#[case("[]")]
#[case("[1,2,3]")]
#[case(r#"{"a": [1, 2.5, false], "b": {"c": null}}"#)]
#[case(r#"["x", -7, 1e3, true, null]"#)]
fn reparse_of_serialized_form_is_value_equal(#[case] input: &str) {
    let first = parse(input);
    let second = parse(&hawkjson::to_string(&first));
    assert!(value_eq(&first, first.root(), &second, second.root()));
}

#[rstest]
#[case("[1,2,]")]
#[case(r#"{"a": 1,}"#)]
fn trailing_comma_is_structural(#[case] input: &str) {
    assert_eq!(parse_err(input).kind, ErrorKind::Structural);
}

#[rstest]
#[case("[1 2]")]
#[case(r#"{"a": 1 "b": 2}"#)]
#[case(r#"{"a" 1}"#)]
#[case("{,}")]
#[case(r#"{"a": 1,, "b": 2}"#)]
#[case("[1,2")]
#[case(r#"{"a": 1"#)]
fn structural_violations(#[case] input: &str) {
    assert_eq!(parse_err(input).kind, ErrorKind::Structural);
}

#[rstest]
#[case("")]
#[case("tru")]
#[case("{a: 1}")]
#[case(r#"{'a': 1}"#)]
#[case(r#""open"#)]
#[case("\"line\nbreak\"")]
#[case(r#""bad\qescape""#)]
#[case("3.")]
#[case(".5")]
#[case("-")]
#[case("1.2.3")]
#[case("1e2e3")]
#[case("// comment\n1")]
fn syntax_violations(#[case] input: &str) {
    assert_eq!(parse_err(input).kind, ErrorKind::Syntax);
}

#[test]
fn hex_prefix_breaks_strict_arrays() {
    // The number production stops at 'x', so the element never reaches the
    // closing bracket cleanly.
    assert_eq!(parse_err("[0x1F]").kind, ErrorKind::Structural);
}

#[test]
fn errors_carry_line_and_column() {
    let err = parse_err("{\n  \"a\": x}");
    let location = err.location.unwrap();
    assert_eq!(location.line, 2);
    assert_eq!(location.column, 8);
}

#[test]
fn trailing_bytes_after_first_value_are_ignored() {
    let doc = parse("[1] trailing garbage");
    let Value::Array(slice) = *doc.get(doc.root()) else {
        panic!("expected array");
    };
    assert_eq!(doc.arena().element_count(slice), 1);
}

#[test]
fn object_entry_point_requires_brace() {
    assert!(hawkjson::parse_object_str(r#"{"a": 1}"#).is_ok());
    assert!(hawkjson::parse_object_str("[1]").is_err());
    assert!(hawkjson::parse_object_str("  42").is_err());
}

#[test]
fn element_and_field_replacement() {
    let mut doc = parse(r#"{"items": [1, 2]}"#);
    let Value::Object(range) = *doc.get(doc.root()) else {
        panic!("expected object");
    };
    let items = doc.arena().field(range, "items").unwrap();
    let Value::Array(slice) = *doc.get(items) else {
        panic!("expected array");
    };

    let replacement = doc.arena_mut().push(Value::Int(9));
    assert!(doc.arena_mut().set_element(slice, 0, replacement));
    assert_eq!(hawkjson::to_string(&doc), r#"{"items": [9,2]}"#);

    let flag = doc.arena_mut().push(Value::Bool(true));
    assert!(doc.arena_mut().set_field(range, "items", flag));
    assert_eq!(hawkjson::to_string(&doc), r#"{"items": true}"#);
}
