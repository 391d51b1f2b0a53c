/* Packing welded values through ethabi, checked against known encodings */

use assert_matches::assert_matches;
use welder_ether::{AbiArguments, EtherError, EtherWelder, Welder};
use welder_reflect::{Decoder, Encoder, PrimitiveValue, Value};
use welder_types::{Element, ElementType};

const INT128_UINT256_BYTES32: &str = "0x000000000000000000000000000000000000000000000000000000000000000100000000000000000000000000000000000000000000000000000000000000650000000000000000000000000000000000000000000000000000000000000001";
const STRING_SLICE: &str = "0x0000000000000000000000000000000000000000000000000000000000000020000000000000000000000000000000000000000000000000000000000000000200000000000000000000000000000000000000000000000000000000000000400000000000000000000000000000000000000000000000000000000000000080000000000000000000000000000000000000000000000000000000000000000568656c6c6f0000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000005776f726c64000000000000000000000000000000000000000000000000000000";
const UINT256_SLICE_OF_SLICES: &str = "0x00000000000000000000000000000000000000000000000000000000000000200000000000000000000000000000000000000000000000000000000000000002000000000000000000000000000000000000000000000000000000000000004000000000000000000000000000000000000000000000000000000000000000c0000000000000000000000000000000000000000000000000000000000000000300000000000000000000000000000000000000000000000000000000000000010000000000000000000000000000000000000000000000000000000000000002000000000000000000000000000000000000000000000000000000000000000300000000000000000000000000000000000000000000000000000000000000030000000000000000000000000000000000000000000000000000000000000004000000000000000000000000000000000000000000000000000000000000000500000000000000000000000000000000000000000000000000000000000003e8";
const ACCOUNT_TUPLE: &str = "0x000000000000000000000000000000000000000000000000000000000000002000000000000000000000000000000000000000000000000000000000000000a0000000000000000000000000000000000000000000000000000000000000000a000000000000000000000000000000000000000000000000000000000000270f00000000000000000000000000000000000000000000000000000000000000010000000000000000000000000000000000000000000000000000000000000001000000000000000000000000000000000000000000000000000000000000000677656c6465720000000000000000000000000000000000000000000000000000";

const ONE_BYTES32: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

fn unhex(s: &str) -> Vec<u8> {
    hex::decode(s.trim_start_matches("0x")).expect("valid hex")
}

fn pack(schema: &[Element], payload: &str) -> Vec<u8> {
    EtherWelder::default()
        .encode(schema, payload.as_bytes(), None)
        .expect("encode payload")
}

#[test]
fn packs_sized_integers_and_fixed_bytes() {
    let schema = vec![
        Element::new(ElementType::Int).sized(128),
        Element::new(ElementType::Uint).sized(256),
        Element::new(ElementType::Bytes).sized(32),
    ];
    let payload = format!(r#"[1, 101, "{ONE_BYTES32}"]"#);
    assert_eq!(pack(&schema, &payload), unhex(INT128_UINT256_BYTES32));
}

#[test]
fn packs_dynamic_string_slices() {
    let schema = vec![Element::array(Element::new(ElementType::String))];
    assert_eq!(
        pack(&schema, r#"[["hello", "world"]]"#),
        unhex(STRING_SLICE)
    );
}

#[test]
fn packs_nested_slices() {
    let schema = vec![Element::array(Element::array(
        Element::new(ElementType::Uint).sized(256),
    ))];
    assert_eq!(
        pack(&schema, "[[[1, 2, 3], [4, 5, 1000]]]"),
        unhex(UINT256_SLICE_OF_SLICES)
    );
}

#[test]
fn packs_tuples_by_field_name() {
    let schema = vec![Element::object(vec![
        Element::new(ElementType::String).named("name"),
        Element::new(ElementType::Int).named("count"),
        Element::new(ElementType::Uint).sized(256).named("balance"),
        Element::new(ElementType::Bytes).sized(32).named("signature"),
        Element::new(ElementType::Bool).named("valid"),
    ])];
    let payload = format!(
        r#"[{{"valid": true, "signature": "{ONE_BYTES32}", "balance": 9999, "count": 10, "name": "welder"}}]"#
    );
    assert_eq!(pack(&schema, &payload), unhex(ACCOUNT_TUPLE));
}

#[test]
fn unpack_restores_welded_values() {
    let welder = EtherWelder::default();
    let schema = vec![
        Element::new(ElementType::Address),
        Element::object(vec![
            Element::new(ElementType::Int).sized(8).named("delta"),
            Element::array(Element::new(ElementType::Bytes)).named("blobs"),
        ]),
    ];
    let payload = br#"["0xb035ad4b31759d909178d32da02266bd199c7e15", {"delta": -5, "blobs": ["0xdead", "0x"]}]"#;

    let welded = welder.weld(&schema, payload).expect("weld");
    let args = welder.serialize(&schema).expect("serialize");
    let values: Vec<Value> = welded.iter().map(|v| v.value.clone()).collect();
    let data = args.encode(&values).expect("encode");

    let decoded = args.decode(&data).expect("decode");
    assert_eq!(decoded, welded);
    assert_eq!(
        decoded[1].get_field("delta"),
        Some(&Value::Primitive(PrimitiveValue::I8(-5)))
    );
}

#[test]
fn selector_prefixes_packed_arguments() {
    let args = AbiArguments::from_json(
        r#"[{"name": "to", "type": "address"}, {"name": "value", "type": "uint256"}]"#,
    )
    .expect("parse descriptors");
    assert_eq!(args.signature("transfer"), "transfer(address,uint256)");

    let to = [0x11u8; 20];
    let values = vec![
        Value::Primitive(PrimitiveValue::Address(to)),
        Value::Primitive(PrimitiveValue::BigUint(1000u32.into())),
    ];
    let data = args
        .encode_with_signature("transfer(address,uint256)", &values)
        .expect("encode call");
    assert_eq!(data.len(), 4 + 64);
    assert_eq!(hex::encode(&data[..4]), "a9059cbb");
    assert_eq!(&data[4 + 12..4 + 32], &to);
    assert_eq!(&data[4 + 62..], &[0x03u8, 0xe8]);
}

#[test]
fn out_of_range_integers_fail() {
    let args = AbiArguments::from_json(r#"[{"name": "x", "type": "uint8"}]"#).expect("parse");
    let err = args
        .encode(&[Value::Primitive(PrimitiveValue::U64(300))])
        .unwrap_err();
    assert_matches!(err, EtherError::Value { .. });
    assert_eq!(err.to_string(), "cannot pack out of range value 300 as uint8 at $[0]");
}

#[test]
fn fixed_bytes_length_is_checked() {
    let args = AbiArguments::from_json(r#"[{"name": "h", "type": "bytes4"}]"#).expect("parse");
    assert_matches!(
        args.encode(&[Value::Primitive(PrimitiveValue::Bytes(vec![1, 2, 3]))]),
        Err(EtherError::Value { .. })
    );
}

#[test]
fn value_count_must_match() {
    let args = AbiArguments::from_json(r#"[{"type": "bool"}, {"type": "bool"}]"#).expect("parse");
    assert_matches!(
        args.encode(&[Value::Primitive(PrimitiveValue::Bool(true))]),
        Err(EtherError::ValueCount { expected: 2, found: 1 })
    );
}

#[test]
fn truncated_data_is_a_codec_error() {
    let args = AbiArguments::from_json(r#"[{"type": "uint256"}]"#).expect("parse");
    assert_matches!(args.decode(&[0u8; 7]), Err(EtherError::Codec(_)));
}
