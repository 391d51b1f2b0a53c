/* Structured input decoding - fills a synthesized type from JSON */

use crate::errors::{ReflectError, ReflectResult};
use crate::types::{FloatKind, IntKind, ValueType};
use crate::value::{PrimitiveValue, Value};
use num_bigint::{BigInt, BigUint, Sign};
use serde_json::{Number, Value as JsonValue};
use std::str::FromStr;
use welder_types::Path;

/* Decode `json` as a value of type `ty`. `null` yields the zero value. */
pub fn decode_json(ty: &ValueType, json: &JsonValue, path: &Path) -> ReflectResult<Value> {
    if json.is_null() {
        return Ok(ty.zero());
    }

    match ty {
        ValueType::String => match json {
            JsonValue::String(s) => Ok(Value::Primitive(PrimitiveValue::String(s.clone()))),
            other => Err(mismatch(path, "a string", other)),
        },
        ValueType::Bool => match json {
            JsonValue::Bool(b) => Ok(Value::Primitive(PrimitiveValue::Bool(*b))),
            other => Err(mismatch(path, "a boolean", other)),
        },
        ValueType::Int(kind) => decode_int(*kind, json, path).map(Value::Primitive),
        ValueType::Float(kind) => match json.as_f64() {
            Some(f) => Ok(Value::Primitive(match kind {
                FloatKind::F32 => PrimitiveValue::F32(f as f32),
                FloatKind::F64 => PrimitiveValue::F64(f),
            })),
            None => Err(mismatch(path, "a number", json)),
        },
        ValueType::Bytes => {
            decode_bytes(json, path).map(|b| Value::Primitive(PrimitiveValue::Bytes(b)))
        }
        ValueType::FixedBytes(n) => {
            let bytes = decode_bytes(json, path)?;
            if bytes.len() != *n {
                return Err(ReflectError::decode(
                    path,
                    format!("{n} bytes"),
                    format!("{} bytes", bytes.len()),
                ));
            }
            Ok(Value::Primitive(PrimitiveValue::FixedBytes(bytes)))
        }
        ValueType::Address => decode_address(json, path),
        ValueType::Sequence { element, len } => {
            let JsonValue::Array(items) = json else {
                return Err(mismatch(path, "an array", json));
            };
            if let Some(n) = len {
                if items.len() != *n {
                    return Err(ReflectError::decode(
                        path,
                        format!("an array of {n} elements"),
                        format!("{} elements", items.len()),
                    ));
                }
            }
            let elements = items
                .iter()
                .enumerate()
                .map(|(i, item)| decode_json(element, item, &path.index(i)))
                .collect::<ReflectResult<Vec<_>>>()?;
            Ok(Value::Sequence { elements })
        }
        ValueType::Record(record) => {
            let JsonValue::Object(map) = json else {
                return Err(mismatch(path, "an object", json));
            };
            let mut fields = Vec::with_capacity(record.fields.len());
            for field in &record.fields {
                let field_path = path.field(&field.name);
                let value = match map.get(field.json_key()) {
                    Some(item) => decode_json(&field.ty, item, &field_path)?,
                    None => field.ty.zero(),
                };
                fields.push((field.name.clone(), value));
            }
            Ok(Value::Record { fields })
        }
    }
}

fn decode_int(kind: IntKind, json: &JsonValue, path: &Path) -> ReflectResult<PrimitiveValue> {
    let expected = kind.name();
    match kind {
        IntKind::BigInt => parse_big(json, path).map(PrimitiveValue::BigInt),
        IntKind::BigUint => {
            let value = parse_big(json, path)?;
            match value.to_biguint() {
                Some(unsigned) => Ok(PrimitiveValue::BigUint(unsigned)),
                None => Err(ReflectError::decode(path, expected, value.to_string())),
            }
        }
        _ => {
            let JsonValue::Number(n) = json else {
                return Err(mismatch(path, expected, json));
            };
            let out_of_range = || ReflectError::decode(path, expected, n.to_string());
            if kind.is_signed() {
                let v = n.as_i64().ok_or_else(out_of_range)?;
                Ok(match kind {
                    IntKind::I8 => PrimitiveValue::I8(i8::try_from(v).map_err(|_| out_of_range())?),
                    IntKind::I16 => {
                        PrimitiveValue::I16(i16::try_from(v).map_err(|_| out_of_range())?)
                    }
                    IntKind::I32 => {
                        PrimitiveValue::I32(i32::try_from(v).map_err(|_| out_of_range())?)
                    }
                    _ => PrimitiveValue::I64(v),
                })
            } else {
                let v = n.as_u64().ok_or_else(out_of_range)?;
                Ok(match kind {
                    IntKind::U8 => PrimitiveValue::U8(u8::try_from(v).map_err(|_| out_of_range())?),
                    IntKind::U16 => {
                        PrimitiveValue::U16(u16::try_from(v).map_err(|_| out_of_range())?)
                    }
                    IntKind::U32 => {
                        PrimitiveValue::U32(u32::try_from(v).map_err(|_| out_of_range())?)
                    }
                    _ => PrimitiveValue::U64(v),
                })
            }
        }
    }
}

/* Big integers arrive as JSON numbers, decimal strings or 0x-prefixed hex */
fn parse_big(json: &JsonValue, path: &Path) -> ReflectResult<BigInt> {
    let parsed = match json {
        JsonValue::Number(n) => parse_number(n),
        JsonValue::String(s) => parse_big_str(s),
        other => return Err(mismatch(path, "an integer", other)),
    };
    parsed.ok_or_else(|| ReflectError::decode(path, "an integer", json.to_string()))
}

fn parse_number(n: &Number) -> Option<BigInt> {
    BigInt::from_str(&n.to_string()).ok()
}

fn parse_big_str(s: &str) -> Option<BigInt> {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex_digits) => BigUint::parse_bytes(hex_digits.as_bytes(), 16)?,
        None => BigUint::from_str(digits).ok()?,
    };
    let sign = if negative { Sign::Minus } else { Sign::Plus };
    Some(BigInt::from_biguint(sign, magnitude))
}

fn decode_bytes(json: &JsonValue, path: &Path) -> ReflectResult<Vec<u8>> {
    match json {
        JsonValue::String(s) => decode_hex(s)
            .ok_or_else(|| ReflectError::decode(path, "a hex string", format!("{s:?}"))),
        JsonValue::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| ReflectError::decode(&path.index(i), "a byte", item.to_string()))
            })
            .collect(),
        other => Err(mismatch(path, "bytes", other)),
    }
}

fn decode_address(json: &JsonValue, path: &Path) -> ReflectResult<Value> {
    let JsonValue::String(s) = json else {
        return Err(mismatch(path, "an address", json));
    };
    let bytes = decode_hex(s)
        .ok_or_else(|| ReflectError::decode(path, "an address", format!("{s:?}")))?;
    let address: [u8; 20] = bytes
        .try_into()
        .map_err(|_| ReflectError::decode(path, "a 20-byte address", format!("{s:?}")))?;
    Ok(Value::Primitive(PrimitiveValue::Address(address)))
}

fn decode_hex(s: &str) -> Option<Vec<u8>> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    hex::decode(digits).ok()
}

fn mismatch(path: &Path, expected: &str, found: &JsonValue) -> ReflectError {
    ReflectError::decode(path, expected, json_kind(found))
}

fn json_kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
