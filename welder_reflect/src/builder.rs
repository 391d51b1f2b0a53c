/* Value type builder - turns schema nodes into synthesized types and values */

use crate::errors::{ReflectError, ReflectResult};
use crate::types::{FloatKind, IntKind, RecordField, RecordType, ValueType};
use crate::value::ReflectedValue;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use welder_types::{
    check_depth, json_tag, to_camel_case, Element, ElementType, Path, SchemaError, TagFn,
};

/* Nesting limit applied when the caller does not configure one */
pub const DEFAULT_MAX_DEPTH: usize = 64;

/* Cap on the slots a single zero value may allocate */
pub const DEFAULT_MAX_ELEMENTS: usize = 1 << 20;

/* Strategy that builds the type of one kind. It receives the builder so that
 * composite strategies can recurse through the full dispatch table. */
pub type BuildFn =
    Arc<dyn Fn(&Builder, &Element, &Path) -> ReflectResult<ValueType> + Send + Sync>;

/* Construction-time configuration for a Builder */
#[derive(Clone)]
pub struct BuilderOptions {
    /* Per-kind replacements for the default strategies */
    pub strategies: HashMap<ElementType, BuildFn>,
    /* Tag derivation for record fields */
    pub tag: TagFn,
    /* Maximum schema nesting depth */
    pub max_depth: usize,
    /* Maximum slots in one zero value, see ValueType::zero_len */
    pub max_elements: usize,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            strategies: HashMap::new(),
            tag: json_tag,
            max_depth: DEFAULT_MAX_DEPTH,
            max_elements: DEFAULT_MAX_ELEMENTS,
        }
    }
}

impl BuilderOptions {
    /* Register a strategy for a kind, replacing any earlier one */
    pub fn with_strategy<F>(mut self, kind: ElementType, strategy: F) -> Self
    where
        F: Fn(&Builder, &Element, &Path) -> ReflectResult<ValueType> + Send + Sync + 'static,
    {
        self.strategies.insert(kind, Arc::new(strategy));
        self
    }

    pub fn with_tag(mut self, tag: TagFn) -> Self {
        self.tag = tag;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_elements(mut self, max_elements: usize) -> Self {
        self.max_elements = max_elements;
        self
    }
}

impl fmt::Debug for BuilderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderOptions")
            .field("strategies", &self.strategies.keys().collect::<Vec<_>>())
            .field("max_depth", &self.max_depth)
            .field("max_elements", &self.max_elements)
            .finish()
    }
}

/* Builds synthesized types and zero values from schema nodes.
 * The strategy table is fixed at construction. */
#[derive(Clone, Debug)]
pub struct Builder {
    options: BuilderOptions,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new(BuilderOptions::default())
    }
}

impl Builder {
    pub fn new(options: BuilderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    /* Build the zero value of a single node */
    pub fn build(&self, elem: &Element) -> ReflectResult<ReflectedValue> {
        let path = Path::root();
        let ty = self.build_type(elem, &path)?;
        self.instantiate(ty, &path)
    }

    /* Build every top-level node in order, stopping at the first failure */
    pub fn builds(&self, elems: &[Element]) -> ReflectResult<Vec<ReflectedValue>> {
        tracing::debug!(count = elems.len(), "building values");
        elems
            .iter()
            .enumerate()
            .map(|(i, elem)| {
                let path = Path::root().index(i);
                let ty = self.build_type(elem, &path)?;
                self.instantiate(ty, &path)
            })
            .collect()
    }

    /* Allocate the zero value once its slot count is known to fit */
    fn instantiate(&self, ty: ValueType, path: &Path) -> ReflectResult<ReflectedValue> {
        match ty.zero_len() {
            Some(total) if total <= self.options.max_elements => Ok(ReflectedValue::new(ty)),
            _ => Err(SchemaError::TooLarge {
                path: path.clone(),
                limit: self.options.max_elements,
            }
            .into()),
        }
    }

    /* Build the type of a node at `path`, dispatching through the strategy table */
    pub fn build_type(&self, elem: &Element, path: &Path) -> ReflectResult<ValueType> {
        check_depth(path, self.options.max_depth)?;
        tracing::trace!(%path, kind = %elem.ty, "building value type");

        if let Some(strategy) = self.options.strategies.get(&elem.ty) {
            return strategy(self, elem, path);
        }

        match &elem.ty {
            ElementType::String => Ok(ValueType::String),
            ElementType::Bool => Ok(ValueType::Bool),
            ElementType::Int => Ok(ValueType::Int(IntKind::signed(elem.size))),
            ElementType::Uint => Ok(ValueType::Int(IntKind::unsigned(elem.size))),
            ElementType::Float => self.build_float(elem, path),
            ElementType::Bytes => Ok(ValueType::Bytes),
            ElementType::Address => Ok(ValueType::Address),
            ElementType::Array => self.build_array(elem, path),
            ElementType::Object => self.build_object(elem, path),
            ElementType::Unknown(kind) => Err(SchemaError::UnsupportedType {
                kind: kind.clone(),
                path: path.clone(),
            }
            .into()),
        }
    }

    fn build_float(&self, elem: &Element, path: &Path) -> ReflectResult<ValueType> {
        match elem.size {
            32 => Ok(ValueType::Float(FloatKind::F32)),
            0 | 64 => Ok(ValueType::Float(FloatKind::F64)),
            size => Err(SchemaError::InvalidSize {
                kind: elem.ty.to_string(),
                size,
                path: path.clone(),
            }
            .into()),
        }
    }

    /* Sequence of the child's type; fixed length when the node has a size */
    pub fn build_array(&self, elem: &Element, path: &Path) -> ReflectResult<ValueType> {
        let child = elem.array_child(path)?;
        let element = self.build_type(child, &path.element())?;
        let ty = ValueType::Sequence {
            element: Box::new(element),
            len: (elem.size > 0).then_some(elem.size),
        };
        if elem.size > 0 {
            match ty.zero_len() {
                Some(total) if total <= self.options.max_elements => {}
                _ => {
                    return Err(SchemaError::InvalidSize {
                        kind: elem.ty.to_string(),
                        size: elem.size,
                        path: path.clone(),
                    }
                    .into())
                }
            }
        }
        Ok(ty)
    }

    /* Record with one field per child, in child order */
    pub fn build_object(&self, elem: &Element, path: &Path) -> ReflectResult<ValueType> {
        let children = elem.object_fields(path)?;
        let mut fields = Vec::with_capacity(children.len());
        for child in children {
            let ty = self.build_type(child, &path.field(&child.name))?;
            fields.push(RecordField {
                name: child.name.clone(),
                ident: to_camel_case(&child.name),
                tag: (self.options.tag)(&child.name),
                ty,
            });
        }
        Ok(ValueType::Record(RecordType { fields }))
    }
}

/* Strategy that refuses a kind outright */
pub fn reject(reason: &'static str) -> BuildFn {
    Arc::new(move |_: &Builder, elem: &Element, path: &Path| {
        Err(ReflectError::Rejected {
            kind: elem.ty.to_string(),
            path: path.clone(),
            reason: reason.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn overrides_replace_defaults_only_for_their_kind() {
        let builder = Builder::new(
            BuilderOptions::default()
                .with_strategy(ElementType::String, |_, _, _| Ok(ValueType::Bytes)),
        );
        let string = builder.build(&Element::new(ElementType::String)).unwrap();
        assert_eq!(string.ty, ValueType::Bytes);
        let boolean = builder.build(&Element::new(ElementType::Bool)).unwrap();
        assert_eq!(boolean.ty, ValueType::Bool);
    }

    #[test]
    fn overrides_can_introduce_kinds() {
        let decimal = ElementType::Unknown("decimal".to_string());
        let builder = Builder::new(BuilderOptions::default().with_strategy(
            decimal.clone(),
            |_, _, _| Ok(ValueType::String),
        ));
        assert_eq!(
            builder.build(&Element::new(decimal)).unwrap().ty,
            ValueType::String
        );
    }

    #[test]
    fn rejecting_strategy_reports_the_kind() {
        let mut options = BuilderOptions::default();
        options
            .strategies
            .insert(ElementType::Float, reject("no floats"));
        let builder = Builder::new(options);
        let err = builder
            .builds(&[Element::new(ElementType::Float)])
            .unwrap_err();
        assert_matches!(err, ReflectError::Rejected { ref kind, .. } if kind == "float");
        assert_eq!(
            err.to_string(),
            "type 'float' at $[0] is not supported by this builder: no floats"
        );
    }

    #[test]
    fn float_widths() {
        let builder = Builder::default();
        assert_eq!(
            builder.build(&Element::new(ElementType::Float).sized(32)).unwrap().ty,
            ValueType::Float(FloatKind::F32)
        );
        assert_matches!(
            builder.build(&Element::new(ElementType::Float).sized(16)),
            Err(ReflectError::Schema(SchemaError::InvalidSize { size: 16, .. }))
        );
    }

    #[test]
    fn depth_limit_is_enforced() {
        let mut elem = Element::new(ElementType::Bool);
        for _ in 0..5 {
            elem = Element::array(elem);
        }
        let builder = Builder::new(BuilderOptions::default().with_max_depth(3));
        assert_matches!(
            builder.build(&elem),
            Err(ReflectError::Schema(SchemaError::TooDeep { limit: 3, .. }))
        );
        assert!(Builder::default().build(&elem).is_ok());
    }
}
