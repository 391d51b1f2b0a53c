/* Synthesized values - instances of a ValueType, optionally paired with it */

use crate::decode::decode_json;
use crate::errors::ReflectResult;
use crate::types::ValueType;
use num_bigint::{BigInt, BigUint};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};
use welder_types::Path;

/* A value paired with the type it was synthesized from */
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectedValue {
    /* Type information */
    pub ty: ValueType,

    /* The value itself */
    pub value: Value,
}

/* Enum representing all values a schema can describe */
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /* Scalar values */
    Primitive(PrimitiveValue),

    /* Sequence values - homogeneous elements */
    Sequence { elements: Vec<Value> },

    /* Record values - ordered list of field name to value */
    Record { fields: Vec<(String, Value)> },
}

/* Scalar value representation */
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveValue {
    String(String),
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    BigInt(BigInt),
    BigUint(BigUint),
    F32(f32),
    F64(f64),
    Bytes(Vec<u8>),
    FixedBytes(Vec<u8>),
    Address([u8; 20]),
}

impl ReflectedValue {
    /* Create the zero value of a type */
    pub fn new(ty: ValueType) -> Self {
        let value = ty.zero();
        Self { ty, value }
    }

    /* Replace the value with structured input decoded against the type */
    pub fn assign_json(&mut self, json: &JsonValue) -> ReflectResult<()> {
        self.assign_json_at(json, &Path::root())
    }

    /* Same as assign_json, reporting errors relative to `path` */
    pub fn assign_json_at(&mut self, json: &JsonValue, path: &Path) -> ReflectResult<()> {
        self.value = decode_json(&self.ty, json, path)?;
        Ok(())
    }

    /* Get a record field by schema name */
    pub fn get_field(&self, field_name: &str) -> Option<&Value> {
        self.value.get_field(field_name)
    }

    /* Render as JSON, keying record fields by their json tag */
    pub fn to_json(&self) -> JsonValue {
        render(&self.ty, &self.value)
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

impl Serialize for ReflectedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl Value {
    /* Get a record field by name */
    pub fn get_field(&self, field_name: &str) -> Option<&Value> {
        if let Value::Record { fields } = self {
            fields
                .iter()
                .find(|(name, _)| name == field_name)
                .map(|(_, value)| value)
        } else {
            None
        }
    }

    /* Get sequence element by index */
    pub fn get_element(&self, index: usize) -> Option<&Value> {
        if let Value::Sequence { elements } = self {
            elements.get(index)
        } else {
            None
        }
    }

    /* Get sequence length */
    pub fn get_sequence_length(&self) -> Option<usize> {
        if let Value::Sequence { elements } = self {
            Some(elements.len())
        } else {
            None
        }
    }

    pub fn as_primitive(&self) -> Option<&PrimitiveValue> {
        if let Value::Primitive(p) = self {
            Some(p)
        } else {
            None
        }
    }

    /* Render as JSON using the field names stored in the value */
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Primitive(p) => p.to_json(),
            Value::Sequence { elements } => {
                JsonValue::Array(elements.iter().map(Value::to_json).collect())
            }
            Value::Record { fields } => {
                let mut map = Map::new();
                for (name, value) in fields {
                    map.insert(name.clone(), value.to_json());
                }
                JsonValue::Object(map)
            }
        }
    }
}

impl PrimitiveValue {
    pub fn to_json(&self) -> JsonValue {
        match self {
            PrimitiveValue::String(v) => JsonValue::String(v.clone()),
            PrimitiveValue::Bool(v) => JsonValue::Bool(*v),
            PrimitiveValue::I8(v) => JsonValue::from(*v),
            PrimitiveValue::I16(v) => JsonValue::from(*v),
            PrimitiveValue::I32(v) => JsonValue::from(*v),
            PrimitiveValue::I64(v) => JsonValue::from(*v),
            PrimitiveValue::U8(v) => JsonValue::from(*v),
            PrimitiveValue::U16(v) => JsonValue::from(*v),
            PrimitiveValue::U32(v) => JsonValue::from(*v),
            PrimitiveValue::U64(v) => JsonValue::from(*v),
            PrimitiveValue::BigInt(v) => big_number(v.to_string()),
            PrimitiveValue::BigUint(v) => big_number(v.to_string()),
            PrimitiveValue::F32(v) => JsonValue::from(*v),
            PrimitiveValue::F64(v) => JsonValue::from(*v),
            PrimitiveValue::Bytes(v) | PrimitiveValue::FixedBytes(v) => {
                JsonValue::String(format!("0x{}", hex::encode(v)))
            }
            PrimitiveValue::Address(v) => JsonValue::String(format!("0x{}", hex::encode(v))),
        }
    }
}

/* Integers wider than 64 bits stay exact as JSON numbers (arbitrary_precision) */
fn big_number(digits: String) -> JsonValue {
    serde_json::from_str::<JsonValue>(&digits).unwrap_or(JsonValue::String(digits))
}

fn render(ty: &ValueType, value: &Value) -> JsonValue {
    match (ty, value) {
        (ValueType::Sequence { element, .. }, Value::Sequence { elements }) => {
            JsonValue::Array(elements.iter().map(|v| render(element, v)).collect())
        }
        (ValueType::Record(record), Value::Record { fields }) => {
            let mut map = Map::new();
            for (name, value) in fields {
                match record.field(name) {
                    Some(field) => map.insert(field.json_key().to_string(), render(&field.ty, value)),
                    None => map.insert(name.clone(), value.to_json()),
                };
            }
            JsonValue::Object(map)
        }
        _ => value.to_json(),
    }
}
