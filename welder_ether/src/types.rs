//! ABI type descriptors.
//!
//! These mirror the codec's own type model: a tag, a size, an element type
//! for sequences and parallel name/type lists for tuples. Tuples also carry
//! the record type used to marshal their values.

use crate::builder::ether_tag;
use std::fmt;
use welder_reflect::{IntKind, RecordField, RecordType, ValueType};
use welder_types::{to_camel_case, Path, SchemaError, SchemaResult};

/// Kind of an ABI type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbiTag {
    Int,
    Uint,
    Bool,
    String,
    /// Dynamically sized sequence (`T[]`).
    Slice,
    /// Fixed-length sequence (`T[n]`).
    Array,
    Tuple,
    Address,
    /// Byte sequence of `size` bytes (`bytesN`).
    FixedBytes,
    Bytes,
    Hash,
    FixedPoint,
    Function,
}

impl AbiTag {
    pub fn name(&self) -> &'static str {
        match self {
            AbiTag::Int => "int",
            AbiTag::Uint => "uint",
            AbiTag::Bool => "bool",
            AbiTag::String => "string",
            AbiTag::Slice => "slice",
            AbiTag::Array => "array",
            AbiTag::Tuple => "tuple",
            AbiTag::Address => "address",
            AbiTag::FixedBytes => "fixed-bytes",
            AbiTag::Bytes => "bytes",
            AbiTag::Hash => "hash",
            AbiTag::FixedPoint => "fixed-point",
            AbiTag::Function => "function",
        }
    }
}

impl fmt::Display for AbiTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single ABI type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiType {
    pub tag: AbiTag,
    /// Bit width for integers, byte length for fixed bytes, length for arrays.
    pub size: usize,
    /// Element type of slices and arrays.
    pub elem: Option<Box<AbiType>>,
    /// Field names of a tuple, in order.
    pub tuple_raw_names: Vec<String>,
    /// Field types of a tuple, parallel to `tuple_raw_names`.
    pub tuple_elems: Vec<AbiType>,
    /// Record type used to marshal tuple values.
    pub tuple_type: Option<RecordType>,
}

impl AbiType {
    pub fn new(tag: AbiTag) -> Self {
        Self {
            tag,
            size: 0,
            elem: None,
            tuple_raw_names: Vec::new(),
            tuple_elems: Vec::new(),
            tuple_type: None,
        }
    }

    pub fn int(size: usize) -> Self {
        Self::new(AbiTag::Int).sized(size)
    }

    pub fn uint(size: usize) -> Self {
        Self::new(AbiTag::Uint).sized(size)
    }

    pub fn fixed_bytes(size: usize) -> Self {
        Self::new(AbiTag::FixedBytes).sized(size)
    }

    pub fn slice(elem: AbiType) -> Self {
        Self {
            elem: Some(Box::new(elem)),
            ..Self::new(AbiTag::Slice)
        }
    }

    pub fn array(elem: AbiType, len: usize) -> Self {
        Self {
            elem: Some(Box::new(elem)),
            ..Self::new(AbiTag::Array).sized(len)
        }
    }

    /// Tuple with the record type derived from the field names using the
    /// Ethereum tag. The record is left unset when the lists disagree.
    pub fn tuple(names: Vec<String>, elems: Vec<AbiType>) -> Self {
        let mut ty = Self {
            tuple_raw_names: names,
            tuple_elems: elems,
            ..Self::new(AbiTag::Tuple)
        };
        ty.tuple_type = ty.derive_record(&Path::root()).ok();
        ty
    }

    pub fn sized(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Canonical signature form, e.g. `(string,uint256)[]`.
    pub fn canonical(&self) -> String {
        match self.tag {
            AbiTag::Int => format!("int{}", bits(self.size)),
            AbiTag::Uint => format!("uint{}", bits(self.size)),
            AbiTag::Bool => "bool".to_string(),
            AbiTag::String => "string".to_string(),
            AbiTag::Address => "address".to_string(),
            AbiTag::Bytes => "bytes".to_string(),
            AbiTag::FixedBytes => format!("bytes{}", self.size),
            AbiTag::Hash => "bytes32".to_string(),
            AbiTag::FixedPoint => format!("fixed{}", bits(self.size)),
            AbiTag::Function => "function".to_string(),
            AbiTag::Slice => format!("{}[]", self.elem_canonical()),
            AbiTag::Array => format!("{}[{}]", self.elem_canonical(), self.size),
            AbiTag::Tuple => {
                let elems: Vec<String> = self.tuple_elems.iter().map(AbiType::canonical).collect();
                format!("({})", elems.join(","))
            }
        }
    }

    fn elem_canonical(&self) -> String {
        self.elem.as_ref().map(|e| e.canonical()).unwrap_or_default()
    }

    /// Value type the codec produces and consumes for this descriptor.
    pub fn value_type(&self) -> SchemaResult<ValueType> {
        self.value_type_at(&Path::root())
    }

    pub fn value_type_at(&self, path: &Path) -> SchemaResult<ValueType> {
        match self.tag {
            AbiTag::Int => Ok(ValueType::Int(IntKind::signed(self.size))),
            AbiTag::Uint => Ok(ValueType::Int(IntKind::unsigned(self.size))),
            AbiTag::Bool => Ok(ValueType::Bool),
            AbiTag::String => Ok(ValueType::String),
            AbiTag::Address => Ok(ValueType::Address),
            AbiTag::Bytes => Ok(ValueType::Bytes),
            AbiTag::FixedBytes => Ok(ValueType::FixedBytes(self.size)),
            AbiTag::Hash => Ok(ValueType::FixedBytes(32)),
            AbiTag::Slice | AbiTag::Array => {
                let elem = self.element(path)?;
                Ok(ValueType::Sequence {
                    element: Box::new(elem.value_type_at(&path.element())?),
                    len: (self.tag == AbiTag::Array).then_some(self.size),
                })
            }
            AbiTag::Tuple => match &self.tuple_type {
                Some(record) => Ok(ValueType::Record(record.clone())),
                None => self.derive_record(path).map(ValueType::Record),
            },
            AbiTag::FixedPoint | AbiTag::Function => Err(SchemaError::UnsupportedType {
                kind: self.tag.to_string(),
                path: path.clone(),
            }),
        }
    }

    /// Element type of a slice or array.
    pub fn element(&self, path: &Path) -> SchemaResult<&AbiType> {
        self.elem
            .as_deref()
            .ok_or_else(|| SchemaError::MissingElementType { path: path.clone() })
    }

    /// Name/type pairs of a tuple.
    pub fn tuple_fields(&self, path: &Path) -> SchemaResult<impl Iterator<Item = (&str, &AbiType)>> {
        if self.tuple_raw_names.len() != self.tuple_elems.len() {
            return Err(SchemaError::InconsistentTuple {
                path: path.clone(),
                names: self.tuple_raw_names.len(),
                types: self.tuple_elems.len(),
            });
        }
        Ok(self
            .tuple_raw_names
            .iter()
            .map(String::as_str)
            .zip(self.tuple_elems.iter()))
    }

    fn derive_record(&self, path: &Path) -> SchemaResult<RecordType> {
        let mut fields = Vec::with_capacity(self.tuple_elems.len());
        for (name, elem) in self.tuple_fields(path)? {
            fields.push(RecordField {
                name: name.to_string(),
                ident: to_camel_case(name),
                tag: ether_tag(name),
                ty: elem.value_type_at(&path.field(name))?,
            });
        }
        Ok(RecordType { fields })
    }
}

/* Unsized integer and fixed-point types default to 256 bits in signatures */
fn bits(size: usize) -> usize {
    if size == 0 {
        256
    } else {
        size
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// A named function or event argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiArgument {
    pub name: String,
    pub ty: AbiType,
    pub indexed: bool,
}

impl AbiArgument {
    pub fn new(name: &str, ty: AbiType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            indexed: false,
        }
    }
}

/// Ordered argument list of a function, event or return tuple.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AbiArguments(pub Vec<AbiArgument>);

impl AbiArguments {
    pub fn new(args: Vec<AbiArgument>) -> Self {
        Self(args)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AbiArgument> {
        self.0.iter()
    }

    /// Argument types joined for a signature: `string,uint256[]`.
    pub fn canonical(&self) -> String {
        self.0
            .iter()
            .map(|arg| arg.ty.canonical())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Function signature, e.g. `transfer(address,uint256)`.
    pub fn signature(&self, name: &str) -> String {
        format!("{name}({})", self.canonical())
    }

    /// Value types of every argument, in order.
    pub fn value_types(&self) -> SchemaResult<Vec<ValueType>> {
        self.0
            .iter()
            .enumerate()
            .map(|(i, arg)| arg.ty.value_type_at(&Path::root().index(i)))
            .collect()
    }
}

impl<'a> IntoIterator for &'a AbiArguments {
    type Item = &'a AbiArgument;
    type IntoIter = std::slice::Iter<'a, AbiArgument>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn pair() -> AbiType {
        AbiType::tuple(
            vec!["name".to_string(), "amount".to_string()],
            vec![AbiType::new(AbiTag::String), AbiType::uint(256)],
        )
    }

    #[test]
    fn canonical_strings() {
        assert_eq!(AbiType::int(0).canonical(), "int256");
        assert_eq!(AbiType::fixed_bytes(32).canonical(), "bytes32");
        assert_eq!(AbiType::slice(pair()).canonical(), "(string,uint256)[]");
        assert_eq!(
            AbiType::slice(AbiType::array(AbiType::new(AbiTag::Bool), 2)).canonical(),
            "bool[2][]"
        );
    }

    #[test]
    fn tuple_record_uses_ether_tags() {
        let record = pair().tuple_type.expect("record derived");
        assert_eq!(record.field_names(), vec!["name", "amount"]);
        assert_eq!(record.fields[1].tag.to_string(), r#"abi:"amount" json:"amount""#);
        assert_eq!(record.fields[1].ty, ValueType::Int(IntKind::BigUint));
    }

    #[test]
    fn inconsistent_tuple_has_no_record() {
        let ty = AbiType::tuple(vec!["a".to_string()], vec![]);
        assert!(ty.tuple_type.is_none());
        assert_matches!(
            ty.value_type(),
            Err(SchemaError::InconsistentTuple { names: 1, types: 0, .. })
        );
    }

    #[test]
    fn slice_without_element_is_reported() {
        assert_matches!(
            AbiType::new(AbiTag::Slice).value_type(),
            Err(SchemaError::MissingElementType { .. })
        );
    }

    #[test]
    fn signature_joins_argument_types() {
        let args = AbiArguments::new(vec![
            AbiArgument::new("to", AbiType::new(AbiTag::Address)),
            AbiArgument::new("value", AbiType::uint(256)),
        ]);
        assert_eq!(args.signature("transfer"), "transfer(address,uint256)");
    }
}
