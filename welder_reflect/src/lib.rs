/* Value Synthesis Library
 *
 * This library builds concrete, schema-shaped value containers at runtime.
 * A schema node is turned into a ValueType (the synthesized "type") and a
 * zero-valued instance of it, which can then be filled from structured JSON
 * input and handed to an ABI codec through the Encoder/Decoder traits.
 */

pub mod builder;
pub mod codec;
pub mod decode;
pub mod errors;
pub mod types;
pub mod value;

pub use builder::{
    reject, BuildFn, Builder, BuilderOptions, DEFAULT_MAX_DEPTH, DEFAULT_MAX_ELEMENTS,
};
pub use codec::{Decoder, Encoder};
pub use errors::{ReflectError, ReflectResult};
pub use types::*;
pub use value::{PrimitiveValue, ReflectedValue, Value};
