/* Builder tests: synthesized types, zero values and JSON loading */

use assert_matches::assert_matches;
use num_bigint::BigUint;
use serde_json::json;
use welder_reflect::{
    Builder, BuilderOptions, FloatKind, IntKind, PrimitiveValue, ReflectError, ValueType, Value,
};
use welder_types::{Element, ElementType, SchemaError};

fn uint(size: usize) -> Element {
    Element::new(ElementType::Uint).sized(size)
}

#[test]
fn unset_int_builds_a_64_bit_container() {
    let built = Builder::default()
        .build(&Element::new(ElementType::Int))
        .expect("build int");
    assert_eq!(built.ty, ValueType::Int(IntKind::I64));
    assert_eq!(built.value, Value::Primitive(PrimitiveValue::I64(0)));
}

#[test]
fn integer_widths_choose_native_or_arbitrary_precision() {
    let builder = Builder::default();
    let cases = [
        (8, IntKind::U8),
        (16, IntKind::U16),
        (32, IntKind::U32),
        (64, IntKind::U64),
        (128, IntKind::BigUint),
        (256, IntKind::BigUint),
    ];
    for (size, kind) in cases {
        let built = builder.build(&uint(size)).expect("build uint");
        assert_eq!(built.ty, ValueType::Int(kind), "uint{size}");
    }
    let signed = builder
        .build(&Element::new(ElementType::Int).sized(24))
        .expect("build int24");
    assert_eq!(signed.ty, ValueType::Int(IntKind::BigInt));
}

#[test]
fn dynamic_array_builds_an_empty_growable_sequence() {
    let built = Builder::default()
        .build(&Element::array(Element::new(ElementType::String)))
        .expect("build string[]");
    assert_eq!(
        built.ty,
        ValueType::Sequence {
            element: Box::new(ValueType::String),
            len: None,
        }
    );
    assert_eq!(built.value.get_sequence_length(), Some(0));
}

#[test]
fn object_builds_a_record_with_fields_in_order() {
    let schema = Element::object(vec![
        Element::new(ElementType::String).named("a"),
        Element::new(ElementType::Int).named("b"),
    ]);
    let built = Builder::default().build(&schema).expect("build object");
    let record = built.ty.as_record().expect("record type");
    assert_eq!(record.field_names(), vec!["a", "b"]);
    assert_eq!(record.fields[1].ty, ValueType::Int(IntKind::I64));
    assert_eq!(record.fields[0].tag.get("json"), Some("a"));

    let Value::Record { fields } = &built.value else {
        panic!("record value expected");
    };
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].0, "a");
    assert_eq!(fields[1].0, "b");
}

#[test]
fn array_arity_is_enforced() {
    let builder = Builder::default();
    let empty = Element::new(ElementType::Array);
    assert_matches!(
        builder.build(&empty),
        Err(ReflectError::Schema(SchemaError::Arity { found: 0, .. }))
    );
    let two = Element::new(ElementType::Array).with_children(vec![
        Element::new(ElementType::String),
        Element::new(ElementType::String),
    ]);
    assert_matches!(
        builder.build(&two),
        Err(ReflectError::Schema(SchemaError::Arity { found: 2, .. }))
    );
}

#[test]
fn empty_object_is_rejected() {
    assert_matches!(
        Builder::default().build(&Element::object(vec![])),
        Err(ReflectError::Schema(SchemaError::EmptyObject { .. }))
    );
}

#[test]
fn unknown_kinds_fail_instead_of_panicking() {
    let schema = Element::object(vec![
        Element::new(ElementType::Unknown("decimal".to_string())).named("price"),
    ]);
    let err = Builder::default().build(&schema).unwrap_err();
    assert_matches!(
        &err,
        ReflectError::Schema(SchemaError::UnsupportedType { kind, .. }) if kind == "decimal"
    );
    assert_eq!(err.to_string(), "unsupported type 'decimal' at $.price");
}

#[test]
fn builds_is_fail_fast() {
    let schema = vec![
        Element::new(ElementType::String),
        Element::new(ElementType::Array),
        Element::new(ElementType::Unknown("x".to_string())),
    ];
    let err = Builder::default().builds(&schema).unwrap_err();
    assert_matches!(
        err,
        ReflectError::Schema(SchemaError::Arity { ref path, .. }) if path.to_string() == "$[1]"
    );
}

#[test]
fn float_kind_builds_by_default() {
    let built = Builder::default()
        .build(&Element::new(ElementType::Float))
        .expect("build float");
    assert_eq!(built.ty, ValueType::Float(FloatKind::F64));
}

#[test]
fn fixed_array_zero_value_has_full_length() {
    let built = Builder::default()
        .build(&Element::array(Element::new(ElementType::Bool)).sized(4))
        .expect("build bool[4]");
    assert_eq!(built.value.get_sequence_length(), Some(4));
    assert_eq!(built.ty.to_string(), "[bool; 4]");
}

#[test]
fn oversized_fixed_arrays_fail_before_allocating() {
    let schema: Vec<Element> = serde_json::from_value(json!([
        {"type": "array", "size": usize::MAX, "children": [{"type": "bool"}]}
    ]))
    .expect("parse schema");
    let err = Builder::default().builds(&schema).unwrap_err();
    assert_matches!(
        &err,
        ReflectError::Schema(SchemaError::InvalidSize { size, .. }) if *size == usize::MAX
    );
    assert_eq!(
        err.to_string(),
        format!("array at $[0] has invalid size {}", usize::MAX)
    );

    let grid = Element::array(Element::array(uint(8)).sized(100_000)).sized(100_000);
    assert_matches!(
        Builder::default().build(&grid),
        Err(ReflectError::Schema(SchemaError::InvalidSize { size: 100_000, ref path, .. }))
            if path.to_string() == "$"
    );
}

#[test]
fn element_limit_covers_whole_records() {
    let builder = Builder::new(BuilderOptions::default().with_max_elements(10));
    let fits = Element::object(vec![Element::array(uint(8)).sized(5).named("bids")]);
    assert!(builder.build(&fits).is_ok());

    let split = Element::object(vec![
        Element::array(uint(8)).sized(6).named("bids"),
        Element::array(uint(8)).sized(6).named("asks"),
    ]);
    assert_matches!(
        builder.builds(&[split]),
        Err(ReflectError::Schema(SchemaError::TooLarge { limit: 10, ref path }))
            if path.to_string() == "$[0]"
    );
}

#[test]
fn built_values_load_structured_input() {
    let schema = Element::object(vec![
        Element::new(ElementType::String).named("name"),
        Element::new(ElementType::Array)
            .named("prices")
            .with_children(vec![uint(256)]),
        Element::object(vec![
            Element::new(ElementType::Bool).named("valid"),
            Element::new(ElementType::Int).named("count"),
        ])
        .named("detail"),
    ]);
    let mut built = Builder::default().build(&schema).expect("build schema");

    built
        .assign_json(&json!({
            "name": "welder",
            "prices": [1, "2", "0x10"],
            "detail": { "valid": true },
            "ignored": 7
        }))
        .expect("load JSON");

    assert_eq!(
        built.get_field("name"),
        Some(&Value::Primitive(PrimitiveValue::String("welder".to_string())))
    );
    let prices = built.get_field("prices").expect("prices");
    assert_eq!(
        prices.get_element(2),
        Some(&Value::Primitive(PrimitiveValue::BigUint(BigUint::from(16u32))))
    );
    let detail = built.get_field("detail").expect("detail");
    assert_eq!(
        detail.get_field("count"),
        Some(&Value::Primitive(PrimitiveValue::I64(0)))
    );
    assert_eq!(
        built.to_json(),
        json!({
            "name": "welder",
            "prices": [1, 2, 16],
            "detail": { "valid": true, "count": 0 }
        })
    );
}

#[test]
fn loading_reports_the_json_path() {
    let schema = Element::object(vec![Element::array(Element::new(ElementType::Bool))
        .named("flags")]);
    let mut built = Builder::default().build(&schema).expect("build schema");
    let err = built
        .assign_json(&json!({ "flags": [true, "yes"] }))
        .unwrap_err();
    assert_eq!(err.to_string(), "expected a boolean at $.flags[1], found a string");
}
