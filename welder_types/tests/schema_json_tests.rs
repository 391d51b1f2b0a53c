/* Schema JSON form: parsing and rendering of element lists */

use welder_types::{Element, ElementType, Elements};

fn parse(json: &str) -> Elements {
    serde_json::from_str(json).expect("parse schema JSON")
}

#[test]
fn single_type() {
    let elements = parse(r#"[{ "type": "string" }]"#);
    assert_eq!(elements, vec![Element::new(ElementType::String)]);
}

#[test]
fn multiple_types() {
    let elements = parse(
        r#"[
            { "type": "int" },
            { "type": "array", "children": [{ "type": "string" }] },
            {
                "type": "object",
                "children": [
                    { "name": "field-string", "type": "string" },
                    { "name": "field-number", "type": "uint", "size": 256 },
                    { "name": "field-boolean", "type": "boolean" }
                ]
            }
        ]"#,
    );

    let expected = vec![
        Element::new(ElementType::Int),
        Element::array(Element::new(ElementType::String)),
        Element::object(vec![
            Element::new(ElementType::String).named("field-string"),
            Element::new(ElementType::Uint).named("field-number").sized(256),
            Element::new(ElementType::Bool).named("field-boolean"),
        ]),
    ];
    assert_eq!(elements, expected);
}

#[test]
fn unknown_kinds_and_extra_keys_are_tolerated() {
    let elements = parse(r#"[{ "type": "decimal", "nullable": true }]"#);
    assert_eq!(elements[0].ty, ElementType::Unknown("decimal".to_string()));
}

#[test]
fn rendering_omits_defaults() {
    let elements = vec![
        Element::new(ElementType::Bytes).sized(32),
        Element::array(Element::new(ElementType::Bool)),
    ];
    let json = serde_json::to_string(&elements).expect("render schema");
    assert_eq!(
        json,
        r#"[{"type":"bytes","size":32},{"type":"array","children":[{"type":"boolean"}]}]"#
    );

    let back: Elements = serde_json::from_str(&json).expect("parse rendered schema");
    assert_eq!(back, elements);
}

#[test]
fn missing_type_is_an_error() {
    let result = serde_json::from_str::<Elements>(r#"[{ "name": "x" }]"#);
    assert!(result.is_err());
}
