//! Schema Type Definitions
//!
//! This crate contains the neutral schema model shared by the welder crates.
//! It provides pure data structures for describing nested data shapes, the
//! node paths used in diagnostics, field tagging, and the structural error
//! taxonomy. It performs no conversion or value construction itself.

pub mod errors;
pub mod path;
pub mod tag;
pub mod types;

// Re-export commonly used types at the crate root
pub use errors::*;
pub use path::*;
pub use tag::*;
pub use types::*;
