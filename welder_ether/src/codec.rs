/* ABI packing through ethabi.
 *
 * Descriptors become ethabi ParamTypes and values become Tokens. Integers
 * travel as 256-bit words, two's complement for signed types, and are range
 * checked against the declared width in both directions. */

use crate::errors::{EtherError, EtherResult};
use crate::selector::selector;
use crate::types::{AbiArguments, AbiTag, AbiType};
use ethabi::{ParamType, Token};
use num_bigint::{BigInt, BigUint, Sign};
use welder_reflect::{
    Decoder, Encoder, IntKind, PrimitiveValue, ReflectedValue, ValueType, Value,
};
use welder_types::{Path, SchemaError};

impl AbiType {
    /// The ethabi parameter type of this descriptor.
    pub fn param_type(&self) -> EtherResult<ParamType> {
        param_type(self, &Path::root())
    }
}

fn param_type(ty: &AbiType, path: &Path) -> EtherResult<ParamType> {
    Ok(match ty.tag {
        AbiTag::Int => ParamType::Int(width(ty.size)),
        AbiTag::Uint => ParamType::Uint(width(ty.size)),
        AbiTag::Bool => ParamType::Bool,
        AbiTag::String => ParamType::String,
        AbiTag::Address => ParamType::Address,
        AbiTag::Bytes => ParamType::Bytes,
        AbiTag::FixedBytes => ParamType::FixedBytes(ty.size),
        AbiTag::Hash => ParamType::FixedBytes(32),
        AbiTag::Slice => ParamType::Array(Box::new(param_type(
            ty.element(path)?,
            &path.element(),
        )?)),
        AbiTag::Array => ParamType::FixedArray(
            Box::new(param_type(ty.element(path)?, &path.element())?),
            ty.size,
        ),
        AbiTag::Tuple => ParamType::Tuple(
            ty.tuple_fields(path)?
                .map(|(name, elem)| param_type(elem, &path.field(name)))
                .collect::<EtherResult<Vec<_>>>()?,
        ),
        AbiTag::FixedPoint | AbiTag::Function => {
            return Err(SchemaError::UnsupportedType {
                kind: ty.tag.to_string(),
                path: path.clone(),
            }
            .into())
        }
    })
}

fn width(size: usize) -> usize {
    if size == 0 {
        256
    } else {
        size
    }
}

impl AbiArguments {
    pub fn param_types(&self) -> EtherResult<Vec<ParamType>> {
        self.iter()
            .enumerate()
            .map(|(i, arg)| param_type(&arg.ty, &Path::root().index(i)))
            .collect()
    }

    /// Pack values, one per argument.
    pub fn pack(&self, values: &[Value]) -> EtherResult<Vec<u8>> {
        if values.len() != self.len() {
            return Err(EtherError::ValueCount {
                expected: self.len(),
                found: values.len(),
            });
        }
        let tokens = self
            .iter()
            .zip(values)
            .enumerate()
            .map(|(i, (arg, value))| to_token(&arg.ty, value, &Path::root().index(i)))
            .collect::<EtherResult<Vec<_>>>()?;
        tracing::debug!(count = tokens.len(), "packing arguments");
        Ok(ethabi::encode(&tokens))
    }

    /// Unpack data into values shaped by the argument types.
    pub fn unpack(&self, data: &[u8]) -> EtherResult<Vec<ReflectedValue>> {
        let types = self.value_types()?;
        let tokens = ethabi::decode(&self.param_types()?, data)?;
        tracing::debug!(count = tokens.len(), bytes = data.len(), "unpacked arguments");
        types
            .into_iter()
            .zip(tokens)
            .enumerate()
            .map(|(i, (ty, token))| {
                let value = from_token(&ty, token, &Path::root().index(i))?;
                Ok(ReflectedValue { ty, value })
            })
            .collect()
    }

    /// Pack values behind the 4-byte selector of `signature`.
    pub fn encode_with_signature(&self, signature: &str, values: &[Value]) -> EtherResult<Vec<u8>> {
        let mut data = selector(signature).to_vec();
        data.extend(self.pack(values)?);
        Ok(data)
    }
}

impl Encoder for AbiArguments {
    type Error = EtherError;

    fn encode(&self, values: &[Value]) -> Result<Vec<u8>, Self::Error> {
        self.pack(values)
    }
}

impl Decoder for AbiArguments {
    type Error = EtherError;

    fn decode(&self, data: &[u8]) -> Result<Vec<ReflectedValue>, Self::Error> {
        self.unpack(data)
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Sequence { .. } => "a sequence",
        Value::Record { .. } => "a record",
        Value::Primitive(p) => match p {
            PrimitiveValue::String(_) => "a string",
            PrimitiveValue::Bool(_) => "a boolean",
            PrimitiveValue::F32(_) | PrimitiveValue::F64(_) => "a float",
            PrimitiveValue::Bytes(_) | PrimitiveValue::FixedBytes(_) => "bytes",
            PrimitiveValue::Address(_) => "an address",
            _ => "an integer",
        },
    }
}

fn to_token(ty: &AbiType, value: &Value, path: &Path) -> EtherResult<Token> {
    let mismatch = || EtherError::value(path, ty.canonical(), describe(value));

    match (ty.tag, value) {
        (AbiTag::String, Value::Primitive(PrimitiveValue::String(s))) => Ok(Token::String(s.clone())),
        (AbiTag::Bool, Value::Primitive(PrimitiveValue::Bool(b))) => Ok(Token::Bool(*b)),
        (AbiTag::Address, Value::Primitive(PrimitiveValue::Address(a))) => {
            Ok(Token::Address(ethabi::Address::from(*a)))
        }
        (AbiTag::Int | AbiTag::Uint, Value::Primitive(p)) => {
            let n = integer(p).ok_or_else(mismatch)?;
            let word = to_word(&n, ty.tag == AbiTag::Int, width(ty.size))
                .ok_or_else(|| EtherError::value(path, ty.canonical(), format!("out of range value {n}")))?;
            let word = ethabi::Uint::from_big_endian(&word);
            Ok(if ty.tag == AbiTag::Int {
                Token::Int(word)
            } else {
                Token::Uint(word)
            })
        }
        (
            AbiTag::Bytes,
            Value::Primitive(PrimitiveValue::Bytes(b) | PrimitiveValue::FixedBytes(b)),
        ) => Ok(Token::Bytes(b.clone())),
        (
            AbiTag::FixedBytes | AbiTag::Hash,
            Value::Primitive(PrimitiveValue::Bytes(b) | PrimitiveValue::FixedBytes(b)),
        ) => {
            let len = if ty.tag == AbiTag::Hash { 32 } else { ty.size };
            if b.len() != len {
                return Err(EtherError::value(
                    path,
                    ty.canonical(),
                    format!("{} bytes", b.len()),
                ));
            }
            Ok(Token::FixedBytes(b.clone()))
        }
        (AbiTag::Slice | AbiTag::Array, Value::Sequence { elements }) => {
            let elem = ty.element(path)?;
            if ty.tag == AbiTag::Array && elements.len() != ty.size {
                return Err(EtherError::value(
                    path,
                    ty.canonical(),
                    format!("{} elements", elements.len()),
                ));
            }
            let inner_path = path.element();
            let tokens = elements
                .iter()
                .map(|e| to_token(elem, e, &inner_path))
                .collect::<EtherResult<Vec<_>>>()?;
            Ok(if ty.tag == AbiTag::Array {
                Token::FixedArray(tokens)
            } else {
                Token::Array(tokens)
            })
        }
        (AbiTag::Tuple, Value::Record { fields }) => {
            let tokens = ty
                .tuple_fields(path)?
                .map(|(name, elem)| {
                    let field_path = path.field(name);
                    let field = fields
                        .iter()
                        .find(|(n, _)| n == name)
                        .map(|(_, v)| v)
                        .ok_or_else(|| EtherError::value(&field_path, elem.canonical(), "nothing"))?;
                    to_token(elem, field, &field_path)
                })
                .collect::<EtherResult<Vec<_>>>()?;
            Ok(Token::Tuple(tokens))
        }
        (AbiTag::FixedPoint | AbiTag::Function, _) => Err(SchemaError::UnsupportedType {
            kind: ty.tag.to_string(),
            path: path.clone(),
        }
        .into()),
        _ => Err(mismatch()),
    }
}

fn integer(p: &PrimitiveValue) -> Option<BigInt> {
    Some(match p {
        PrimitiveValue::I8(v) => BigInt::from(*v),
        PrimitiveValue::I16(v) => BigInt::from(*v),
        PrimitiveValue::I32(v) => BigInt::from(*v),
        PrimitiveValue::I64(v) => BigInt::from(*v),
        PrimitiveValue::U8(v) => BigInt::from(*v),
        PrimitiveValue::U16(v) => BigInt::from(*v),
        PrimitiveValue::U32(v) => BigInt::from(*v),
        PrimitiveValue::U64(v) => BigInt::from(*v),
        PrimitiveValue::BigInt(v) => v.clone(),
        PrimitiveValue::BigUint(v) => BigInt::from(v.clone()),
        _ => return None,
    })
}

/* 32-byte big-endian word, or None when `n` does not fit `bits` */
fn to_word(n: &BigInt, signed: bool, bits: usize) -> Option<[u8; 32]> {
    let bits = bits.min(256) as u64;
    let fits = match (signed, n.sign()) {
        (false, Sign::Minus) => false,
        (false, _) => n.bits() <= bits,
        (true, Sign::Minus) => (-n - 1u32).bits() < bits,
        (true, _) => n.bits() < bits,
    };
    if !fits {
        return None;
    }

    let (fill, bytes) = match n.sign() {
        Sign::Minus => (0xff, n.to_signed_bytes_be()),
        _ => (0x00, n.magnitude().to_bytes_be()),
    };
    let mut word = [fill; 32];
    word[32 - bytes.len()..].copy_from_slice(&bytes);
    Some(word)
}

fn from_token(ty: &ValueType, token: Token, path: &Path) -> EtherResult<Value> {
    let primitive = |p: PrimitiveValue| -> EtherResult<Value> { Ok(Value::Primitive(p)) };

    match (ty, token) {
        (ValueType::String, Token::String(s)) => primitive(PrimitiveValue::String(s)),
        (ValueType::Bool, Token::Bool(b)) => primitive(PrimitiveValue::Bool(b)),
        (ValueType::Address, Token::Address(a)) => primitive(PrimitiveValue::Address(a.0)),
        (ValueType::Bytes, Token::Bytes(b)) => primitive(PrimitiveValue::Bytes(b)),
        (ValueType::FixedBytes(_), Token::FixedBytes(b)) => primitive(PrimitiveValue::FixedBytes(b)),
        (ValueType::Int(kind), Token::Int(word) | Token::Uint(word)) => {
            let mut bytes = [0u8; 32];
            word.to_big_endian(&mut bytes);
            narrow(*kind, &bytes)
                .map(Value::Primitive)
                .ok_or_else(|| EtherError::value(path, kind.name(), "an out of range word"))
        }
        (ValueType::Sequence { element, .. }, Token::Array(tokens) | Token::FixedArray(tokens)) => {
            let inner_path = path.element();
            let elements = tokens
                .into_iter()
                .map(|t| from_token(element, t, &inner_path))
                .collect::<EtherResult<Vec<_>>>()?;
            Ok(Value::Sequence { elements })
        }
        (ValueType::Record(record), Token::Tuple(tokens)) => {
            let fields = record
                .fields
                .iter()
                .zip(tokens)
                .map(|(field, t)| {
                    from_token(&field.ty, t, &path.field(&field.name))
                        .map(|v| (field.name.clone(), v))
                })
                .collect::<EtherResult<Vec<_>>>()?;
            Ok(Value::Record { fields })
        }
        (ty, token) => Err(EtherError::value(path, ty.to_string(), format!("{token:?}"))),
    }
}

/* Interpret a 32-byte word as the integer representation `kind` */
fn narrow(kind: IntKind, word: &[u8; 32]) -> Option<PrimitiveValue> {
    if kind.is_signed() {
        let n = BigInt::from_signed_bytes_be(word);
        Some(match kind {
            IntKind::I8 => PrimitiveValue::I8(i8::try_from(&n).ok()?),
            IntKind::I16 => PrimitiveValue::I16(i16::try_from(&n).ok()?),
            IntKind::I32 => PrimitiveValue::I32(i32::try_from(&n).ok()?),
            IntKind::I64 => PrimitiveValue::I64(i64::try_from(&n).ok()?),
            _ => PrimitiveValue::BigInt(n),
        })
    } else {
        let n = BigUint::from_bytes_be(word);
        Some(match kind {
            IntKind::U8 => PrimitiveValue::U8(u8::try_from(&n).ok()?),
            IntKind::U16 => PrimitiveValue::U16(u16::try_from(&n).ok()?),
            IntKind::U32 => PrimitiveValue::U32(u32::try_from(&n).ok()?),
            IntKind::U64 => PrimitiveValue::U64(u64::try_from(&n).ok()?),
            _ => PrimitiveValue::BigUint(n),
        })
    }
}
