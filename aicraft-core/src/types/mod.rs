//! Core data types for the aicraft workflow engine.
//!
//! Tool inputs and results are dynamically typed JSON values; streams are
//! boxed, single-consumer sequences of those values.

pub mod value;

// Re-export all types for convenience
pub use value::*;
