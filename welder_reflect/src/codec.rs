/* Boundary to an external binary codec */

use crate::value::{ReflectedValue, Value};

/* Packs values matching a descriptor list into bytes */
pub trait Encoder {
    type Error;

    fn encode(&self, values: &[Value]) -> Result<Vec<u8>, Self::Error>;
}

/* Unpacks bytes into values shaped by a descriptor list */
pub trait Decoder {
    type Error;

    fn decode(&self, data: &[u8]) -> Result<Vec<ReflectedValue>, Self::Error>;
}
