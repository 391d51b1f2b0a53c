use crate::errors::{SchemaError, SchemaResult};
use crate::path::Path;
use serde_derive::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Kind of a schema node.
///
/// The supported vocabulary is closed. Spellings outside it are kept as
/// `Unknown` so that consumers can report them instead of losing them.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone)]
#[serde(from = "String", into = "String")]
pub enum ElementType {
    String,
    Int,
    Uint,
    Float,
    Bool,
    Bytes,
    Address,
    Array,
    Object,
    Unknown(String),
}

impl ElementType {
    pub fn as_str(&self) -> &str {
        match self {
            ElementType::String => "string",
            ElementType::Int => "int",
            ElementType::Uint => "uint",
            ElementType::Float => "float",
            ElementType::Bool => "boolean",
            ElementType::Bytes => "bytes",
            ElementType::Address => "address",
            ElementType::Array => "array",
            ElementType::Object => "object",
            ElementType::Unknown(raw) => raw,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, ElementType::Array | ElementType::Object)
    }
}

impl From<String> for ElementType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "string" => ElementType::String,
            "int" => ElementType::Int,
            "uint" => ElementType::Uint,
            "float" => ElementType::Float,
            "boolean" | "bool" => ElementType::Bool,
            "bytes" => ElementType::Bytes,
            "address" => ElementType::Address,
            "array" => ElementType::Array,
            "object" => ElementType::Object,
            _ => ElementType::Unknown(raw),
        }
    }
}

impl From<ElementType> for String {
    fn from(ty: ElementType) -> Self {
        ty.as_str().to_string()
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered list of schema nodes, e.g. the arguments of a call.
pub type Elements = Vec<Element>;

/// A node of the schema tree.
///
/// `size` is a bit width for `int`/`uint`/`float`, a byte length for
/// `bytes` and an element count for `array`; zero means the default width
/// or a dynamically sized value.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct Element {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ElementType,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub size: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Elements,
}

fn is_zero(size: &usize) -> bool {
    *size == 0
}

impl Element {
    pub fn new(ty: ElementType) -> Self {
        Self {
            name: String::new(),
            ty,
            size: 0,
            children: Vec::new(),
        }
    }

    pub fn array(element: Element) -> Self {
        Self::new(ElementType::Array).with_children(vec![element])
    }

    pub fn object(fields: Elements) -> Self {
        Self::new(ElementType::Object).with_children(fields)
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn sized(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_children(mut self, children: Elements) -> Self {
        self.children = children;
        self
    }

    /// The element type of an `array` node.
    pub fn array_child(&self, path: &Path) -> SchemaResult<&Element> {
        match self.children.as_slice() {
            [child] => Ok(child),
            children => Err(SchemaError::Arity {
                path: path.clone(),
                found: children.len(),
            }),
        }
    }

    /// The fields of an `object` node: at least one, all named, names unique.
    pub fn object_fields(&self, path: &Path) -> SchemaResult<&[Element]> {
        if self.children.is_empty() {
            return Err(SchemaError::EmptyObject { path: path.clone() });
        }

        let mut seen = HashSet::with_capacity(self.children.len());
        for (index, child) in self.children.iter().enumerate() {
            if child.name.is_empty() {
                return Err(SchemaError::UnnamedField {
                    path: path.clone(),
                    index,
                });
            }
            if !seen.insert(child.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    path: path.clone(),
                    name: child.name.clone(),
                });
            }
        }

        Ok(&self.children)
    }
}

/// Fails when `path` is deeper than `limit`.
pub fn check_depth(path: &Path, limit: usize) -> SchemaResult<()> {
    if path.depth() > limit {
        return Err(SchemaError::TooDeep {
            path: path.clone(),
            limit,
        });
    }
    Ok(())
}
