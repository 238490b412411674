//! Core traits for the aicraft workflow engine.
//!
//! A tool is the only boundary the engine depends on: it receives an input
//! map and returns a final value, a live stream, or an error.

pub mod tool;

// Re-export all traits for convenience
pub use tool::*;
