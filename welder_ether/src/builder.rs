/* Ethereum flavour of the value builder */

use welder_reflect::{reject, Builder, BuilderOptions, ValueType};
use welder_types::{ElementType, FieldTag};

/* Record fields are addressable by name both by the codec and in JSON */
pub fn ether_tag(name: &str) -> FieldTag {
    FieldTag::new().with("abi", name).with("json", name)
}

/* Builder options matching the codec's value representation. Sized bytes
 * become fixed-length arrays and floats have no ABI counterpart. */
pub fn ether_builder_options() -> BuilderOptions {
    let mut options = BuilderOptions::default()
        .with_tag(ether_tag)
        .with_strategy(ElementType::Bytes, |_, elem, _| {
            Ok(if elem.size == 0 {
                ValueType::Bytes
            } else {
                ValueType::FixedBytes(elem.size)
            })
        });
    options
        .strategies
        .insert(ElementType::Float, reject("floating point has no ABI encoding"));
    options
}

pub fn ether_builder() -> Builder {
    Builder::new(ether_builder_options())
}
