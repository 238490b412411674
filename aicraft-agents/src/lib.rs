//! # aicraft Agents
//!
//! Tools, tasks, agents and the dependency-aware workflow engine.
//!
//! - **Tools**: a [`ToolRegistry`](tool::ToolRegistry), closure-backed
//!   [`FnTool`](tool::FnTool)s and local built-in tools
//! - **Tasks**: one tool call with inputs, bindings and a run-once status
//! - **Agents**: ordered tasks run sequentially or concurrently
//! - **Workflow engine**: validated agent graphs scheduled in passes
//!
//! ## Quick Start
//!
//! ```rust
//! use aicraft_agents::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let mut engine = WorkflowEngine::new().with_registry(ToolRegistry::with_builtin_tools());
//! engine.initialize_workflow(
//!     WorkflowConfig::new()
//!         .task(
//!             TaskConfig::new("chunk", "Chunk", "text_chunker")
//!                 .with_input("text", "a b c d e f g")
//!                 .with_input("chunkSize", 3)
//!                 .with_input("chunkOverlap", 1),
//!         )
//!         .agent(AgentConfig::new("chunker", "Chunker").with_task("chunk")),
//! )?;
//!
//! let report = engine.execute_workflow().await?;
//! assert!(report.is_success());
//! assert_eq!(
//!     engine.output("chunker", "chunk").await,
//!     Some(Value::from(vec!["a b c", "c d e", "e f g"]))
//! );
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod agent;
pub mod task;
pub mod tool;
pub mod workflow;

pub use agent::{Agent, SharedAgent};
pub use task::{Task, TaskContext, TaskStatus};
pub use tool::{FnTool, ToolRegistry};
pub use workflow::{
    AgentFailure, EngineConfig, SchedulerState, SchedulingMode, WorkflowEngine, WorkflowReport,
};

// Re-export the core error type so callers need a single import
pub use aicraft_core::{CraftError, Result};

/// Convenient imports for building and running workflows.
pub mod prelude {
    pub use aicraft_core::prelude::*;

    pub use crate::agent::{Agent, SharedAgent};
    pub use crate::task::{Task, TaskContext, TaskStatus};
    pub use crate::tool::{FnTool, ToolRegistry, builtin};
    pub use crate::workflow::{EngineConfig, SchedulingMode, WorkflowEngine, WorkflowReport};
}

/// Version information for the aicraft agents library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the aicraft agents library.
pub const NAME: &str = env!("CARGO_PKG_NAME");
