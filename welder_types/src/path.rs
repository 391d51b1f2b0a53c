use std::fmt;

/// One step from a parent node to a child node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Position in a top-level argument list or a JSON array.
    Index(usize),
    /// Named object field.
    Field(String),
    /// The element type of an array.
    Element,
}

/// Location of a node inside a schema tree, rendered as `$[1].pair[].base`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn index(&self, index: usize) -> Self {
        self.push(Segment::Index(index))
    }

    pub fn field(&self, name: &str) -> Self {
        self.push(Segment::Field(name.to_string()))
    }

    pub fn element(&self) -> Self {
        self.push(Segment::Element)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Nesting depth below the root.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    fn push(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            match segment {
                Segment::Index(index) => write!(f, "[{index}]")?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Element => write!(f, "[]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_locations() {
        let path = Path::root().index(1).field("pair").element().field("base");
        assert_eq!(path.to_string(), "$[1].pair[].base");
        assert_eq!(path.depth(), 4);
    }

    #[test]
    fn root_renders_as_dollar() {
        assert_eq!(Path::root().to_string(), "$");
    }
}
