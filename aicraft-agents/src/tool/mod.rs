//! Tool system: registry, closure-backed tools and built-in tools.
//!
//! The [`Tool`](aicraft_core::Tool) trait itself lives in `aicraft-core`;
//! this module provides the pieces the engine uses to find and build tools.

pub mod builtin;
pub mod function;
pub mod registry;

pub use function::FnTool;
pub use registry::ToolRegistry;
