//! # aicraft Core
//!
//! Core traits, types, and configuration for the aicraft workflow engine.
//!
//! This crate provides the foundational building blocks shared by every
//! other aicraft crate:
//!
//! - **Data model**: dynamically typed tool inputs, results and streams
//! - **Tool contract**: the [`Tool`] trait with its call context and output
//! - **Input accessors**: typed, validating lookups into input maps
//! - **Configuration**: serializable task, agent and workflow descriptors
//! - **Error handling**: a single error enum used from tools up to the engine
//!
//! ## Quick Start
//!
//! ```rust
//! use aicraft_core::prelude::*;
//!
//! let workflow = WorkflowConfig::new()
//!     .task(TaskConfig::new("t1", "Greet", "echo").with_input("text", "hello"))
//!     .agent(AgentConfig::new("a1", "Greeter").with_task("t1"));
//!
//! assert_eq!(workflow.tasks.len(), 1);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export commonly used types and traits
pub mod prelude;

// Core modules
pub mod config;
pub mod error;
pub mod inputs;
pub mod traits;
pub mod types;

// Re-export key types at crate root for convenience
pub use config::{AgentConfig, InputBinding, TaskConfig, WorkflowConfig};
pub use error::{CraftError, Result};
pub use types::{ExecutionMode, InputMap, Value, ValueStream};

// Re-export traits for convenience
pub use traits::*;

/// Version information for the aicraft core library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the aicraft core library.
pub const NAME: &str = env!("CARGO_PKG_NAME");
