//! Small SQL helpers: identifiers are compile-time constants, values are always parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
