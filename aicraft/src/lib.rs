//! # aicraft - Agent Workflows in Rust
//!
//! aicraft runs workflows made of agents and tasks. A task calls one tool
//! with an input map and yields a value, a stream of values, or an error.
//! An agent owns ordered tasks and names the agents it depends on. The
//! engine validates the dependency graph and schedules agents in passes,
//! either one at a time or concurrently.
//!
//! ## Quick Start
//!
//! ```rust
//! use aicraft::prelude::*;
//!
//! let workflow = WorkflowConfig::new()
//!     .task(TaskConfig::new("greet", "Greet", "echo").with_input("text", "hello"))
//!     .agent(AgentConfig::new("greeter", "Greeter").with_task("greet"));
//!
//! let mut engine = WorkflowEngine::new().with_registry(ToolRegistry::with_builtin_tools());
//! engine.initialize_workflow(workflow).unwrap();
//! assert_eq!(engine.execution_order().unwrap(), vec!["greeter".to_string()]);
//! ```
//!
//! ## Architecture
//!
//! - **aicraft-core**: errors, value types, the `Tool` contract and
//!   workflow configuration
//! - **aicraft-indexing**: chunking, text extraction and embedding similarity
//! - **aicraft-agents**: tool registry, tasks, agents and the workflow engine

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export all public APIs from sub-crates
pub use aicraft_agents as agents;
pub use aicraft_core as core;
pub use aicraft_indexing as indexing;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and traits
/// from all aicraft crates.
pub mod prelude {
    pub use aicraft_agents::prelude::*;
    pub use aicraft_indexing::prelude::*;
}

/// Version information for the aicraft framework.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
