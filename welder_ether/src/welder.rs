/* Ethereum welder: converter, builder and codec behind one handle */

use crate::builder::ether_builder;
use crate::converter::AbiConverter;
use crate::errors::{EtherError, EtherResult};
use crate::types::AbiArguments;
use serde_json::Value as JsonValue;
use welder_reflect::{Builder, Encoder, ReflectedValue, Value};
use welder_types::{Element, Elements, Path};

/* Turns a schema and structured input into values ready for a codec */
pub trait Welder {
    type Error;

    fn weld(&self, schema: &[Element], data: &[u8]) -> Result<Vec<ReflectedValue>, Self::Error>;
}

#[derive(Debug, Clone)]
pub struct EtherWelder {
    converter: AbiConverter,
    builder: Builder,
}

impl Default for EtherWelder {
    fn default() -> Self {
        Self::new(AbiConverter::default(), ether_builder())
    }
}

impl EtherWelder {
    pub fn new(converter: AbiConverter, builder: Builder) -> Self {
        Self { converter, builder }
    }

    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    pub fn converter(&self) -> &AbiConverter {
        &self.converter
    }

    pub fn serialize(&self, schema: &[Element]) -> EtherResult<AbiArguments> {
        Ok(self.converter.serialize(schema)?)
    }

    pub fn deserialize(&self, args: &AbiArguments) -> EtherResult<Elements> {
        Ok(self.converter.deserialize(args)?)
    }

    /* Weld the payload and pack it, optionally behind a function selector */
    pub fn encode(
        &self,
        schema: &[Element],
        data: &[u8],
        signature: Option<&str>,
    ) -> EtherResult<Vec<u8>> {
        let args = self.serialize(schema)?;
        let values: Vec<Value> = self
            .weld(schema, data)?
            .into_iter()
            .map(ReflectedValue::into_value)
            .collect();
        match signature {
            Some(signature) => args.encode_with_signature(signature, &values),
            None => args.encode(&values),
        }
    }

    /* Unpack codec output for a schema */
    pub fn decode(&self, schema: &[Element], data: &[u8]) -> EtherResult<Vec<ReflectedValue>> {
        self.serialize(schema)?.unpack(data)
    }
}

impl Welder for EtherWelder {
    type Error = EtherError;

    fn weld(&self, schema: &[Element], data: &[u8]) -> EtherResult<Vec<ReflectedValue>> {
        let mut values = self.builder.builds(schema)?;
        let payload: JsonValue = serde_json::from_slice(data)?;

        let entries = match payload {
            JsonValue::Array(entries) if entries.len() == values.len() => entries,
            JsonValue::Array(entries) => {
                return Err(EtherError::Payload {
                    expected: values.len(),
                    found: format!("{} entries", entries.len()),
                })
            }
            other => {
                return Err(EtherError::Payload {
                    expected: values.len(),
                    found: json_kind(&other).to_string(),
                })
            }
        };

        for (i, (value, entry)) in values.iter_mut().zip(entries.iter()).enumerate() {
            value.assign_json_at(entry, &Path::root().index(i))?;
        }
        tracing::debug!(count = values.len(), "welded payload");
        Ok(values)
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
