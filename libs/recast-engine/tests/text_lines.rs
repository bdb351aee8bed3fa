use recast_api::{ConversionError, Schema, Value};
use recast_avro::parse_schema;
use recast_engine::{RecastConfig, TextConverter, convert_line};

const EVENT: &str = r#"{
    "type": "record", "name": "Event",
    "fields": [
        {"name": "id", "type": "long"},
        {"name": "kind", "type": {"type": "enum", "name": "Kind", "symbols": ["CLICK", "VIEW"]}},
        {"name": "tag", "type": {"type": "fixed", "name": "Tag", "size": 4}},
        {"name": "ratio", "type": ["null", "float"]},
        {"name": "payload", "type": "bytes"}
    ]
}"#;

fn event() -> std::sync::Arc<recast_api::RecordSchema> {
    match parse_schema(EVENT).unwrap() {
        Schema::Record(r) => r,
        other => panic!("expected record, got {other}"),
    }
}

#[test]
fn a_full_line() {
    let r = convert_line(Some("99\tVIEW\tab\t0.25\thello"), &event()).unwrap();
    assert_eq!(r.get_by_name("id"), Some(&Value::Long(99)));
    assert_eq!(r.get_by_name("kind"), Some(&Value::Enum(1, "VIEW".into())));
    assert_eq!(r.get_by_name("tag"), Some(&Value::Fixed(vec![b'a', b'b', 0, 0])));
    assert_eq!(r.get_by_name("ratio"), Some(&Value::Float(0.25)));
    assert_eq!(r.get_by_name("payload"), Some(&Value::Bytes(b"hello".to_vec())));
    assert_eq!(
        r.to_json(),
        serde_json::json!({
            "id": 99, "kind": "VIEW", "tag": "YWIAAA==", "ratio": 0.25, "payload": "aGVsbG8="
        })
    );
}

#[test]
fn unknown_enum_symbol_fails_the_line() {
    let err = convert_line(Some("1\tSCROLL\tab\t1\tx"), &event()).unwrap_err();
    assert!(matches!(err, ConversionError::UnknownSymbol { .. }));
}

#[test]
fn short_line_is_empty_record() {
    let r = convert_line(Some("1\tVIEW"), &event()).unwrap();
    assert!(r.is_empty());
}

#[test]
fn configured_converter() {
    let cfg = RecastConfig::parse("[text]\ndelimiter = \"|\"").unwrap();
    let conv = TextConverter::new(cfg.text);
    let r = conv.convert(Some("5|CLICK|abcdefg|2|p"), &event()).unwrap();
    assert_eq!(r.get_by_name("tag"), Some(&Value::Fixed(b"abcd".to_vec())));
    assert_eq!(r.get_by_name("ratio"), Some(&Value::Float(2.0)));
}
