/* Schema <-> ABI descriptor conversion */

use crate::builder::ether_tag;
use crate::types::{AbiArgument, AbiArguments, AbiTag, AbiType};
use std::fmt;
use welder_reflect::{RecordField, RecordType, DEFAULT_MAX_DEPTH};
use welder_types::{
    check_depth, to_camel_case, Element, ElementType, Elements, Path, SchemaError, SchemaResult,
    TagFn,
};

/* Converter configuration */
#[derive(Clone)]
pub struct ConverterConfig {
    /* Maximum schema nesting depth */
    pub max_depth: usize,
    /* Tag attached to the fields of generated tuple records */
    pub tag: TagFn,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            tag: ether_tag,
        }
    }
}

impl fmt::Debug for ConverterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterConfig")
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

/* Converts schema trees into ABI argument lists and back */
#[derive(Debug, Clone, Default)]
pub struct AbiConverter {
    config: ConverterConfig,
}

impl AbiConverter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /* One argument per top-level node, named after the node */
    pub fn serialize(&self, elements: &[Element]) -> SchemaResult<AbiArguments> {
        tracing::debug!(count = elements.len(), "serializing schema");
        let args = elements
            .iter()
            .enumerate()
            .map(|(i, elem)| {
                let ty = self.encode_type(elem, &Path::root().index(i))?;
                Ok(AbiArgument::new(&elem.name, ty))
            })
            .collect::<SchemaResult<Vec<_>>>()?;
        Ok(AbiArguments(args))
    }

    /* One schema node per argument, named after the argument */
    pub fn deserialize(&self, args: &AbiArguments) -> SchemaResult<Elements> {
        tracing::debug!(count = args.len(), "deserializing descriptors");
        args.iter()
            .enumerate()
            .map(|(i, arg)| {
                let elem = self.decode_type(&arg.ty, &Path::root().index(i))?;
                Ok(elem.named(&arg.name))
            })
            .collect()
    }

    fn encode_type(&self, elem: &Element, path: &Path) -> SchemaResult<AbiType> {
        check_depth(path, self.config.max_depth)?;
        tracing::trace!(%path, kind = %elem.ty, size = elem.size, "encoding type");

        match &elem.ty {
            ElementType::String => Ok(AbiType::new(AbiTag::String)),
            ElementType::Bool => Ok(AbiType::new(AbiTag::Bool)),
            ElementType::Address => Ok(AbiType::new(AbiTag::Address)),
            ElementType::Int => Ok(AbiType::int(default_bits(elem.size))),
            ElementType::Uint => Ok(AbiType::uint(default_bits(elem.size))),
            ElementType::Bytes => match elem.size {
                0 => Ok(AbiType::new(AbiTag::Bytes)),
                1..=32 => Ok(AbiType::fixed_bytes(elem.size)),
                size => Err(SchemaError::InvalidSize {
                    kind: elem.ty.to_string(),
                    size,
                    path: path.clone(),
                }),
            },
            ElementType::Array => {
                let child = elem.array_child(path)?;
                let inner = self.encode_type(child, &path.element())?;
                if elem.size > 0 {
                    Ok(AbiType::array(inner, elem.size))
                } else {
                    Ok(AbiType::slice(inner))
                }
            }
            ElementType::Object => self.encode_tuple(elem, path),
            ElementType::Float | ElementType::Unknown(_) => Err(SchemaError::UnsupportedType {
                kind: elem.ty.to_string(),
                path: path.clone(),
            }),
        }
    }

    fn encode_tuple(&self, elem: &Element, path: &Path) -> SchemaResult<AbiType> {
        let children = elem.object_fields(path)?;
        let mut names = Vec::with_capacity(children.len());
        let mut elems = Vec::with_capacity(children.len());
        let mut fields = Vec::with_capacity(children.len());

        for child in children {
            let field_path = path.field(&child.name);
            let ty = self.encode_type(child, &field_path)?;
            fields.push(RecordField {
                name: child.name.clone(),
                ident: to_camel_case(&child.name),
                tag: (self.config.tag)(&child.name),
                ty: ty.value_type_at(&field_path)?,
            });
            names.push(child.name.clone());
            elems.push(ty);
        }

        Ok(AbiType {
            tuple_raw_names: names,
            tuple_elems: elems,
            tuple_type: Some(RecordType { fields }),
            ..AbiType::new(AbiTag::Tuple)
        })
    }

    fn decode_type(&self, ty: &AbiType, path: &Path) -> SchemaResult<Element> {
        check_depth(path, self.config.max_depth)?;
        tracing::trace!(%path, tag = %ty.tag, size = ty.size, "decoding type");

        match ty.tag {
            AbiTag::Int => Ok(Element::new(ElementType::Int).sized(ty.size)),
            AbiTag::Uint => Ok(Element::new(ElementType::Uint).sized(ty.size)),
            AbiTag::Bool => Ok(Element::new(ElementType::Bool)),
            AbiTag::String => Ok(Element::new(ElementType::String)),
            AbiTag::Address => Ok(Element::new(ElementType::Address)),
            AbiTag::Bytes => Ok(Element::new(ElementType::Bytes)),
            AbiTag::FixedBytes => Ok(Element::new(ElementType::Bytes).sized(ty.size)),
            AbiTag::Slice | AbiTag::Array => {
                let inner = self.decode_type(ty.element(path)?, &path.element())?;
                let size = if ty.tag == AbiTag::Array { ty.size } else { 0 };
                Ok(Element::array(inner).sized(size))
            }
            AbiTag::Tuple => {
                let children = ty
                    .tuple_fields(path)?
                    .map(|(name, elem)| {
                        self.decode_type(elem, &path.field(name))
                            .map(|child| child.named(name))
                    })
                    .collect::<SchemaResult<Elements>>()?;
                /* Same field rules as serialize: non-empty, named, unique */
                let object = Element::object(children);
                object.object_fields(path)?;
                Ok(object)
            }
            AbiTag::Hash | AbiTag::FixedPoint | AbiTag::Function => {
                Err(SchemaError::UnsupportedType {
                    kind: ty.tag.to_string(),
                    path: path.clone(),
                })
            }
        }
    }
}

/* Integers without an explicit width are 64 bits */
fn default_bits(size: usize) -> usize {
    if size == 0 {
        64
    } else {
        size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn depth_limit_applies_to_both_directions() {
        let converter = AbiConverter::new(ConverterConfig {
            max_depth: 2,
            ..ConverterConfig::default()
        });
        let deep = Element::array(Element::array(Element::array(Element::new(
            ElementType::Bool,
        ))));
        assert_matches!(
            converter.serialize(&[deep]),
            Err(SchemaError::TooDeep { limit: 2, .. })
        );

        let args = AbiArguments::new(vec![AbiArgument::new(
            "",
            AbiType::slice(AbiType::slice(AbiType::slice(AbiType::new(AbiTag::Bool)))),
        )]);
        assert_matches!(
            converter.deserialize(&args),
            Err(SchemaError::TooDeep { .. })
        );
    }

    #[test]
    fn oversized_fixed_bytes_are_rejected() {
        let err = AbiConverter::default()
            .serialize(&[Element::new(ElementType::Bytes).sized(33)])
            .unwrap_err();
        assert_matches!(err, SchemaError::InvalidSize { size: 33, .. });
        assert_eq!(err.to_string(), "bytes at $[0] has invalid size 33");
    }

    #[test]
    fn empty_tuple_is_an_empty_object() {
        let args = AbiArguments::new(vec![AbiArgument::new(
            "t",
            AbiType::tuple(vec![], vec![]),
        )]);
        assert_matches!(
            AbiConverter::default().deserialize(&args),
            Err(SchemaError::EmptyObject { .. })
        );
    }
}
