//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits
//! from the aicraft core library for easy importing.
//!
//! # Examples
//!
//! ```rust
//! use aicraft_core::prelude::*;
//!
//! let task = TaskConfig::new("t1", "Echo", "echo").with_input("text", "hi");
//! assert_eq!(task.inputs["text"], Value::from("hi"));
//! ```

// Re-export core error types
pub use crate::error::{CraftError, Result};

// Re-export data types
pub use crate::types::{ExecutionMode, InputMap, Value, ValueStream};

// Re-export the tool contract
pub use crate::traits::{Tool, ToolContext, ToolOutput};

// Re-export configuration types
pub use crate::config::{AgentConfig, InputBinding, TaskConfig, WorkflowConfig};

// Re-export commonly used external types
pub use async_trait::async_trait;
pub use tokio_util::sync::CancellationToken;
