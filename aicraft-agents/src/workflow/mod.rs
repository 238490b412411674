//! Workflow scheduling.
//!
//! [`WorkflowEngine`] owns tools, tasks and agents, validates the agent
//! dependency graph and drives scheduling passes. [`SchedulerState`] is the
//! shared record of which agents have executed.

pub mod config;
pub mod engine;
pub mod graph;
pub mod report;
pub mod state;

pub use config::{EngineConfig, SchedulingMode};
pub use engine::WorkflowEngine;
pub use graph::{BindingEdge, WorkflowGraph};
pub use report::WorkflowReport;
pub use state::{AgentFailure, SchedulerState};
