//! Ethereum ABI bindings for welder schemas.
//!
//! [`AbiConverter`] maps schema trees to ABI argument descriptors and back,
//! [`ether_builder`] synthesizes values in the representation the codec
//! expects, and [`AbiArguments`] packs and unpacks them through `ethabi`.
//! [`EtherWelder`] ties the three together.

pub mod builder;
pub mod codec;
pub mod converter;
pub mod errors;
pub mod json_abi;
pub mod selector;
pub mod types;
pub mod welder;

pub use builder::{ether_builder, ether_builder_options, ether_tag};
pub use converter::{AbiConverter, ConverterConfig};
pub use errors::{EtherError, EtherResult};
pub use json_abi::{parse_type, JsonAbiEntry, JsonAbiParam};
pub use selector::{keccak256, selector};
pub use types::{AbiArgument, AbiArguments, AbiTag, AbiType};
pub use welder::{EtherWelder, Welder};
