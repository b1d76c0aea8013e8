//! Row types and request parameter types for the four tables.

pub mod application;
pub mod pet;
pub mod shelter;

pub use application::*;
pub use pet::*;
pub use shelter::*;
