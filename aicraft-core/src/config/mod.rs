//! Configuration types for aicraft workflows.
//!
//! Workflows are described declaratively as a list of task descriptors and
//! a list of agent descriptors. Descriptors are serializable and can be
//! loaded from JSON or TOML files with environment variable substitution.

pub mod loader;
pub mod workflow;

// Re-export all config types for convenience
pub use loader::*;
pub use workflow::*;
