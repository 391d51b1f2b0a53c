use std::fmt;

/// Ordered `key:"value"` pairs attached to a record field.
///
/// Decoders look fields up by one of the keys (`json` for structured input,
/// `abi` for the codec), so the mapping from a schema field name to its tag
/// must be a pure function of that name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldTag {
    entries: Vec<(String, String)>,
}

impl FieldTag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
            entry.1 = value.to_string();
        } else {
            self.entries.push((key.to_string(), value.to_string()));
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{key}:{value:?}")?;
        }
        Ok(())
    }
}

/// Derives the tag of a record field from its schema name.
pub type TagFn = fn(&str) -> FieldTag;

/// Default tagging: the field is addressable by its name in JSON input.
pub fn json_tag(name: &str) -> FieldTag {
    FieldTag::new().with("json", name)
}

/// Converts an under-score name to a camel-case identifier (`token_id` ->
/// `TokenId`).
pub fn to_camel_case(input: &str) -> String {
    input
        .split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
