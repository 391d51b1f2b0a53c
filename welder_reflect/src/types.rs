/* Synthesized value types - the runtime shape built from a schema node */

use crate::value::{PrimitiveValue, Value};
use num_bigint::{BigInt, BigUint};
use std::fmt;
use welder_types::FieldTag;

/* Integer representations. Native widths map to fixed-size integers, any
 * other width is carried with arbitrary precision. */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    BigInt,
    BigUint,
}

impl IntKind {
    /* Pick the representation for a signed integer of `bits` (0 means 64) */
    pub fn signed(bits: usize) -> Self {
        match bits {
            8 => IntKind::I8,
            16 => IntKind::I16,
            32 => IntKind::I32,
            0 | 64 => IntKind::I64,
            _ => IntKind::BigInt,
        }
    }

    /* Pick the representation for an unsigned integer of `bits` (0 means 64) */
    pub fn unsigned(bits: usize) -> Self {
        match bits {
            8 => IntKind::U8,
            16 => IntKind::U16,
            32 => IntKind::U32,
            0 | 64 => IntKind::U64,
            _ => IntKind::BigUint,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            IntKind::I8 | IntKind::I16 | IntKind::I32 | IntKind::I64 | IntKind::BigInt
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            IntKind::I8 => "i8",
            IntKind::I16 => "i16",
            IntKind::I32 => "i32",
            IntKind::I64 => "i64",
            IntKind::U8 => "u8",
            IntKind::U16 => "u16",
            IntKind::U32 => "u32",
            IntKind::U64 => "u64",
            IntKind::BigInt => "BigInt",
            IntKind::BigUint => "BigUint",
        }
    }

    fn zero(&self) -> PrimitiveValue {
        match self {
            IntKind::I8 => PrimitiveValue::I8(0),
            IntKind::I16 => PrimitiveValue::I16(0),
            IntKind::I32 => PrimitiveValue::I32(0),
            IntKind::I64 => PrimitiveValue::I64(0),
            IntKind::U8 => PrimitiveValue::U8(0),
            IntKind::U16 => PrimitiveValue::U16(0),
            IntKind::U32 => PrimitiveValue::U32(0),
            IntKind::U64 => PrimitiveValue::U64(0),
            IntKind::BigInt => PrimitiveValue::BigInt(BigInt::default()),
            IntKind::BigUint => PrimitiveValue::BigUint(BigUint::default()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    F32,
    F64,
}

/* The synthesized type of a schema node */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    String,
    Bool,
    Int(IntKind),
    Float(FloatKind),
    /* Dynamically sized byte sequence */
    Bytes,
    /* Byte sequence of exactly n bytes */
    FixedBytes(usize),
    /* 20-byte account identity */
    Address,
    /* Homogeneous sequence; `len` is set for fixed-length sequences */
    Sequence {
        element: Box<ValueType>,
        len: Option<usize>,
    },
    Record(RecordType),
}

/* Record type with one named field per schema child, in child order */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordType {
    pub fields: Vec<RecordField>,
}

/* Record field information */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordField {
    /* Schema field name */
    pub name: String,

    /* Identifier form of the name (CamelCase) */
    pub ident: String,

    /* Lookup tags derived from the name */
    pub tag: FieldTag,

    /* Field type */
    pub ty: ValueType,
}

impl RecordType {
    pub fn field(&self, name: &str) -> Option<&RecordField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

impl RecordField {
    /* Key used to match this field in structured input */
    pub fn json_key(&self) -> &str {
        self.tag.get("json").unwrap_or(&self.name)
    }
}

impl ValueType {
    /* Allocate the zero value of this type */
    pub fn zero(&self) -> Value {
        match self {
            ValueType::String => Value::Primitive(PrimitiveValue::String(String::new())),
            ValueType::Bool => Value::Primitive(PrimitiveValue::Bool(false)),
            ValueType::Int(kind) => Value::Primitive(kind.zero()),
            ValueType::Float(FloatKind::F32) => Value::Primitive(PrimitiveValue::F32(0.0)),
            ValueType::Float(FloatKind::F64) => Value::Primitive(PrimitiveValue::F64(0.0)),
            ValueType::Bytes => Value::Primitive(PrimitiveValue::Bytes(Vec::new())),
            ValueType::FixedBytes(n) => Value::Primitive(PrimitiveValue::FixedBytes(vec![0; *n])),
            ValueType::Address => Value::Primitive(PrimitiveValue::Address([0; 20])),
            ValueType::Sequence { element, len } => Value::Sequence {
                elements: match len {
                    Some(n) => (0..*n).map(|_| element.zero()).collect(),
                    None => Vec::new(),
                },
            },
            ValueType::Record(record) => Value::Record {
                fields: record
                    .fields
                    .iter()
                    .map(|f| (f.name.clone(), f.ty.zero()))
                    .collect(),
            },
        }
    }

    /* Slots the zero value allocates, counting every value as at least one.
     * None when the count overflows usize. */
    pub fn zero_len(&self) -> Option<usize> {
        match self {
            ValueType::FixedBytes(n) => Some((*n).max(1)),
            ValueType::Sequence {
                element,
                len: Some(n),
            } => n.checked_mul(element.zero_len()?).map(|total| total.max(1)),
            ValueType::Record(record) => record
                .fields
                .iter()
                .try_fold(0usize, |acc, f| acc.checked_add(f.ty.zero_len()?))
                .map(|total| total.max(1)),
            _ => Some(1),
        }
    }

    pub fn as_record(&self) -> Option<&RecordType> {
        match self {
            ValueType::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::String => write!(f, "String"),
            ValueType::Bool => write!(f, "bool"),
            ValueType::Int(kind) => write!(f, "{}", kind.name()),
            ValueType::Float(FloatKind::F32) => write!(f, "f32"),
            ValueType::Float(FloatKind::F64) => write!(f, "f64"),
            ValueType::Bytes => write!(f, "Vec<u8>"),
            ValueType::FixedBytes(n) => write!(f, "[u8; {n}]"),
            ValueType::Address => write!(f, "Address"),
            ValueType::Sequence { element, len: None } => write!(f, "Vec<{element}>"),
            ValueType::Sequence {
                element,
                len: Some(n),
            } => write!(f, "[{element}; {n}]"),
            ValueType::Record(record) => {
                write!(f, "struct {{ ")?;
                for (i, field) in record.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {} `{}`", field.ident, field.ty, field.tag)?;
                }
                write!(f, " }}")
            }
        }
    }
}
