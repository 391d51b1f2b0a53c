//! Compiled-interface JSON form of ABI arguments.
//!
//! Arguments are written as `{"name", "type", "components", "indexed"}`
//! objects where `type` is a Solidity type string (`uint256`, `bytes32`,
//! `tuple[2][]`) and tuples list their fields under `components`.

use crate::errors::{EtherError, EtherResult};
use crate::types::{AbiArgument, AbiArguments, AbiTag, AbiType};
use serde::{Deserialize, Serialize};

/// One parameter of a JSON ABI entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct JsonAbiParam {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type")]
    pub ty: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<JsonAbiParam>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub indexed: bool,

    #[serde(rename = "internalType", default, skip_serializing_if = "Option::is_none")]
    pub internal_type: Option<String>,
}

/// A function, event or constructor entry of a JSON ABI document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct JsonAbiEntry {
    #[serde(rename = "type", default = "default_entry_kind")]
    pub kind: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub inputs: Vec<JsonAbiParam>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<JsonAbiParam>,
}

fn default_entry_kind() -> String {
    "function".to_string()
}

impl AbiArguments {
    /// Parse a JSON array of parameters.
    pub fn from_json(json: &str) -> EtherResult<Self> {
        let params: Vec<JsonAbiParam> = serde_json::from_str(json)?;
        Self::from_params(&params)
    }

    pub fn from_params(params: &[JsonAbiParam]) -> EtherResult<Self> {
        params
            .iter()
            .map(|param| {
                Ok(AbiArgument {
                    name: param.name.clone(),
                    ty: parse_type(&param.ty, &param.components)?,
                    indexed: param.indexed,
                })
            })
            .collect::<EtherResult<Vec<_>>>()
            .map(AbiArguments)
    }

    /// Inputs of the named entry of a full JSON ABI document.
    pub fn from_abi_inputs(abi: &str, name: &str) -> EtherResult<Self> {
        let entries: Vec<JsonAbiEntry> = serde_json::from_str(abi)?;
        let entry = entries
            .iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| EtherError::AbiTypeParse(format!("no ABI entry named '{name}'")))?;
        Self::from_params(&entry.inputs)
    }

    /// Parameters in compiled-interface form. Fails with `AbiTypeParse` for
    /// descriptors whose type string `from_json` would not read back, such
    /// as `int7`.
    pub fn to_params(&self) -> EtherResult<Vec<JsonAbiParam>> {
        self.iter()
            .map(|arg| {
                let mut param = to_param(&arg.name, &arg.ty)?;
                param.indexed = arg.indexed;
                Ok(param)
            })
            .collect()
    }

    pub fn to_json(&self) -> EtherResult<String> {
        Ok(serde_json::to_string(&self.to_params()?)?)
    }

    pub fn to_json_pretty(&self) -> EtherResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_params()?)?)
    }
}

fn to_param(name: &str, ty: &AbiType) -> EtherResult<JsonAbiParam> {
    Ok(JsonAbiParam {
        name: name.to_string(),
        ty: type_string(ty)?,
        components: components(ty)?,
        indexed: false,
        internal_type: None,
    })
}

/* Type string with tuples spelled `tuple`, e.g. `tuple[2][]` */
fn type_string(ty: &AbiType) -> EtherResult<String> {
    match (ty.tag, ty.elem.as_deref()) {
        (AbiTag::Slice, Some(elem)) => Ok(format!("{}[]", type_string(elem)?)),
        (AbiTag::Array, Some(elem)) => Ok(format!("{}[{}]", type_string(elem)?, ty.size)),
        (AbiTag::Tuple, _) => Ok("tuple".to_string()),
        _ => {
            /* Leaves must parse back */
            let leaf = ty.canonical();
            parse_type(&leaf, &[])?;
            Ok(leaf)
        }
    }
}

/* Fields of the innermost tuple of a (possibly nested) sequence */
fn components(ty: &AbiType) -> EtherResult<Vec<JsonAbiParam>> {
    match (ty.tag, ty.elem.as_deref()) {
        (AbiTag::Slice | AbiTag::Array, Some(elem)) => components(elem),
        (AbiTag::Tuple, _) => ty
            .tuple_raw_names
            .iter()
            .zip(ty.tuple_elems.iter())
            .map(|(name, elem)| to_param(name, elem))
            .collect(),
        _ => Ok(Vec::new()),
    }
}

/// Parse a Solidity type string. `components` describes the fields when
/// the innermost type is `tuple`.
pub fn parse_type(ty: &str, components: &[JsonAbiParam]) -> EtherResult<AbiType> {
    let invalid = || EtherError::AbiTypeParse(ty.to_string());

    if let Some(head) = ty.strip_suffix(']') {
        let open = head.rfind('[').ok_or_else(invalid)?;
        let elem = parse_type(&head[..open], components)?;
        let len = &head[open + 1..];
        if len.is_empty() {
            return Ok(AbiType::slice(elem));
        }
        let len = len.parse::<usize>().map_err(|_| invalid())?;
        return Ok(AbiType::array(elem, len));
    }

    match ty {
        "string" => return Ok(AbiType::new(AbiTag::String)),
        "bool" => return Ok(AbiType::new(AbiTag::Bool)),
        "address" => return Ok(AbiType::new(AbiTag::Address)),
        "bytes" => return Ok(AbiType::new(AbiTag::Bytes)),
        "function" => return Ok(AbiType::new(AbiTag::Function).sized(24)),
        "tuple" => {
            let names = components.iter().map(|c| c.name.clone()).collect();
            let elems = components
                .iter()
                .map(|c| parse_type(&c.ty, &c.components))
                .collect::<EtherResult<Vec<_>>>()?;
            return Ok(AbiType::tuple(names, elems));
        }
        _ => {}
    }

    if let Some(bits) = ty.strip_prefix("uint") {
        return int_width(bits).map(AbiType::uint).ok_or_else(invalid);
    }
    if let Some(bits) = ty.strip_prefix("int") {
        return int_width(bits).map(AbiType::int).ok_or_else(invalid);
    }
    if let Some(len) = ty.strip_prefix("bytes") {
        return match len.parse::<usize>() {
            Ok(n @ 1..=32) => Ok(AbiType::fixed_bytes(n)),
            _ => Err(invalid()),
        };
    }
    if let Some(rest) = ty.strip_prefix("ufixed").or_else(|| ty.strip_prefix("fixed")) {
        let bits = match rest.split_once('x') {
            Some((bits, _)) => int_width(bits),
            None if rest.is_empty() => Some(128),
            None => None,
        };
        return bits
            .map(|bits| AbiType::new(AbiTag::FixedPoint).sized(bits))
            .ok_or_else(invalid);
    }

    Err(invalid())
}

/* Empty means 256; otherwise a multiple of 8 in 8..=256 */
fn int_width(bits: &str) -> Option<usize> {
    if bits.is_empty() {
        return Some(256);
    }
    match bits.parse::<usize>() {
        Ok(n) if n > 0 && n <= 256 && n % 8 == 0 => Some(n),
        _ => None,
    }
}
