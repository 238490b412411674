//! Error types for the aicraft workflow engine.
//!
//! A single error enum is shared by tools, tasks, agents and the engine so
//! that a tool's error can travel up to the caller without being re-wrapped.

use thiserror::Error;

/// Core error type for aicraft.
///
/// Covers tool contract violations, workflow construction problems and
/// scheduling failures.
#[derive(Error, Debug)]
pub enum CraftError {
    /// A task was executed without a bound tool.
    #[error("Task '{task_id}' has no tool assigned")]
    UnboundTool {
        /// Id of the task missing its tool
        task_id: String,
    },

    /// A required tool input is missing or has the wrong type.
    #[error("Invalid input for tool '{tool}': {message}")]
    ToolInputInvalid {
        /// Tool that rejected its inputs
        tool: String,
        /// Detailed error message
        message: String,
    },

    /// The external operation behind a tool failed.
    #[error("Tool '{tool}' failed: {message}")]
    ToolExecutionFailed {
        /// Tool that failed
        tool: String,
        /// Detailed error message
        message: String,
    },

    /// Workflow construction referenced an unknown id.
    #[error("Unknown {kind} '{id}'")]
    UnresolvedReference {
        /// Kind of the referenced entity (tool, task, agent)
        kind: &'static str,
        /// The id that could not be resolved
        id: String,
    },

    /// The agent dependency graph contains a cycle.
    #[error("Cyclic dependency between agents: {}", agents.join(", "))]
    CyclicDependency {
        /// Agents that could not be ordered
        agents: Vec<String>,
    },

    /// A declarative input binding is malformed.
    #[error("Invalid input binding on task '{task_id}': {message}")]
    InvalidBinding {
        /// Task declaring the binding
        task_id: String,
        /// Detailed error message
        message: String,
    },

    /// An entity with the same id already exists.
    #[error("Duplicate {kind} id '{id}'")]
    DuplicateId {
        /// Kind of the entity (task, agent)
        kind: &'static str,
        /// The duplicated id
        id: String,
    },

    /// A task was executed a second time.
    #[error("Task '{task_id}' has already been executed")]
    TaskAlreadyExecuted {
        /// Id of the task
        task_id: String,
    },

    /// A scheduling pass made no progress.
    #[error("Scheduling stalled with pending agents: {}", pending.join(", "))]
    SchedulingStalled {
        /// Agents that never became eligible
        pending: Vec<String>,
    },

    /// Operation timeout errors
    #[error("Timeout: {operation}")]
    Timeout {
        /// Name of the operation that timed out
        operation: String,
    },

    /// The run was cancelled through its cancellation token.
    #[error("Operation cancelled")]
    Cancelled,

    /// Configuration validation errors
    #[error("Configuration error: {message}")]
    Configuration {
        /// Detailed error message
        message: String,
    },

    /// Input validation errors
    #[error("Validation error: {message}")]
    Validation {
        /// Detailed error message
        message: String,
    },

    /// I/O related errors (configuration files, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML configuration parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic errors from external dependencies
    #[error("External error: {source}")]
    External {
        /// The underlying error
        #[source]
        source: anyhow::Error,
    },
}

impl CraftError {
    /// Create an unbound tool error for a task.
    pub fn unbound_tool<S: Into<String>>(task_id: S) -> Self {
        Self::UnboundTool {
            task_id: task_id.into(),
        }
    }

    /// Create an invalid input error for a tool.
    pub fn tool_input<T: Into<String>, S: Into<String>>(tool: T, message: S) -> Self {
        Self::ToolInputInvalid {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create an execution failure for a tool.
    pub fn tool_failed<T: Into<String>, S: Into<String>>(tool: T, message: S) -> Self {
        Self::ToolExecutionFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create an unresolved reference error.
    pub fn unresolved<S: Into<String>>(kind: &'static str, id: S) -> Self {
        Self::UnresolvedReference {
            kind,
            id: id.into(),
        }
    }

    /// Create an invalid binding error.
    pub fn invalid_binding<T: Into<String>, S: Into<String>>(task_id: T, message: S) -> Self {
        Self::InvalidBinding {
            task_id: task_id.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate id error.
    pub fn duplicate<S: Into<String>>(kind: &'static str, id: S) -> Self {
        Self::DuplicateId {
            kind,
            id: id.into(),
        }
    }

    /// Create a new timeout error with an operation name.
    pub fn timeout<S: Into<String>>(operation: S) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Create a new configuration error with a message.
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new validation error with a message.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new external error from any error that implements `Into<anyhow::Error>`.
    pub fn external<E: Into<anyhow::Error>>(error: E) -> Self {
        Self::External {
            source: error.into(),
        }
    }

    /// Check if this error is retryable.
    ///
    /// Returns `true` for transient errors that might succeed on retry.
    /// The engine itself never retries; this is a hint for callers.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::ToolExecutionFailed { .. } | Self::Io(_)
        )
    }

    /// Check if this error stems from a malformed workflow definition.
    #[must_use]
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedReference { .. }
                | Self::CyclicDependency { .. }
                | Self::InvalidBinding { .. }
                | Self::DuplicateId { .. }
                | Self::Configuration { .. }
        )
    }

    /// Get the error category for logging.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnboundTool { .. } => "unbound_tool",
            Self::ToolInputInvalid { .. } => "tool_input_invalid",
            Self::ToolExecutionFailed { .. } => "tool_execution_failed",
            Self::UnresolvedReference { .. } => "unresolved_reference",
            Self::CyclicDependency { .. } => "cyclic_dependency",
            Self::InvalidBinding { .. } => "invalid_binding",
            Self::DuplicateId { .. } => "duplicate_id",
            Self::TaskAlreadyExecuted { .. } => "task_already_executed",
            Self::SchedulingStalled { .. } => "scheduling_stalled",
            Self::Timeout { .. } => "timeout",
            Self::Cancelled => "cancelled",
            Self::Configuration { .. } => "configuration",
            Self::Validation { .. } => "validation",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::Toml(_) => "toml",
            Self::External { .. } => "external",
        }
    }
}

/// Convert from `anyhow::Error` to `CraftError`.
impl From<anyhow::Error> for CraftError {
    fn from(error: anyhow::Error) -> Self {
        Self::External { source: error }
    }
}

/// Result type alias used throughout aicraft.
pub type Result<T> = std::result::Result<T, CraftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CraftError::unbound_tool("task_1");
        assert!(matches!(err, CraftError::UnboundTool { .. }));
        assert_eq!(err.to_string(), "Task 'task_1' has no tool assigned");
    }

    #[test]
    fn test_error_display() {
        let err = CraftError::CyclicDependency {
            agents: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "Cyclic dependency between agents: a, b");

        let err = CraftError::unresolved("tool", "pdf_extractor");
        assert_eq!(err.to_string(), "Unknown tool 'pdf_extractor'");
    }

    #[test]
    fn test_error_retryable() {
        assert!(CraftError::timeout("tool call").is_retryable());
        assert!(CraftError::tool_failed("embed", "503").is_retryable());
        assert!(!CraftError::tool_input("embed", "query").is_retryable());
        assert!(!CraftError::Cancelled.is_retryable());
    }

    #[test]
    fn test_error_classification() {
        assert!(CraftError::duplicate("task", "t1").is_construction_error());
        assert!(!CraftError::unbound_tool("t1").is_construction_error());
        assert_eq!(CraftError::Cancelled.category(), "cancelled");
        assert_eq!(
            CraftError::invalid_binding("t1", "bad").category(),
            "invalid_binding"
        );
    }
}
