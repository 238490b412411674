//! Task, agent and workflow descriptors.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{ExecutionMode, InputMap, Value};

/// Declarative reference to an upstream task result.
///
/// At scheduling time the engine reads `output[source_task]` from the
/// finished `source_agent` and writes it into the bound input key. When
/// `output_key` is set, only that field of an object result is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputBinding {
    /// Agent whose output map is read
    pub source_agent: String,
    /// Task whose result is read from that agent's output map
    pub source_task: String,
    /// Optional field to extract from an object result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_key: Option<String>,
}

impl InputBinding {
    /// Bind to the whole result of `source_task` owned by `source_agent`.
    pub fn new(source_agent: impl Into<String>, source_task: impl Into<String>) -> Self {
        Self {
            source_agent: source_agent.into(),
            source_task: source_task.into(),
            output_key: None,
        }
    }

    /// Only take the given field of an object result.
    #[must_use]
    pub fn field(mut self, output_key: impl Into<String>) -> Self {
        self.output_key = Some(output_key.into());
        self
    }

    /// Pick the bound value out of an upstream result.
    ///
    /// Returns `None` when `output_key` is set and the result is not an
    /// object containing it.
    pub fn select<'a>(&self, result: &'a Value) -> Option<&'a Value> {
        match &self.output_key {
            Some(key) => result.as_object().and_then(|object| object.get(key)),
            None => Some(result),
        }
    }
}

/// Task descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Unique task id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Id of the registered tool the task invokes
    pub tool_id: String,
    /// Literal input parameters
    #[serde(default)]
    pub inputs: InputMap,
    /// Inputs resolved from upstream agents, keyed by input name
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub bindings: HashMap<String, InputBinding>,
    /// Per-call timeout overriding the engine default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl TaskConfig {
    /// Create a task descriptor without inputs.
    pub fn new(id: impl Into<String>, name: impl Into<String>, tool_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tool_id: tool_id.into(),
            inputs: InputMap::new(),
            bindings: HashMap::new(),
            timeout_ms: None,
        }
    }

    /// Add a literal input.
    #[must_use]
    pub fn with_input(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inputs.insert(key.into(), value.into());
        self
    }

    /// Bind an input to an upstream task result.
    #[must_use]
    pub fn with_binding(mut self, key: impl Into<String>, binding: InputBinding) -> Self {
        self.bindings.insert(key.into(), binding);
        self
    }

    /// Set a per-call timeout in milliseconds.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// Agent descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Unique agent id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Agents that must finish before this one starts
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Owned task ids, in execution order
    #[serde(default, alias = "task_ids")]
    pub tasks: Vec<String>,
    /// How the owned tasks are run
    #[serde(default)]
    pub execution: ExecutionMode,
}

impl AgentConfig {
    /// Create an agent descriptor with no dependencies and no tasks.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            depends_on: Vec::new(),
            tasks: Vec::new(),
            execution: ExecutionMode::default(),
        }
    }

    /// Add a dependency.
    #[must_use]
    pub fn depends_on(mut self, agent_id: impl Into<String>) -> Self {
        self.depends_on.push(agent_id.into());
        self
    }

    /// Append an owned task.
    #[must_use]
    pub fn with_task(mut self, task_id: impl Into<String>) -> Self {
        self.tasks.push(task_id.into());
        self
    }

    /// Set the execution mode.
    #[must_use]
    pub fn with_execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }
}

/// Complete workflow definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Task descriptors
    #[serde(default)]
    pub tasks: Vec<TaskConfig>,
    /// Agent descriptors
    #[serde(default)]
    pub agents: Vec<AgentConfig>,
}

impl WorkflowConfig {
    /// Create an empty workflow definition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task descriptor.
    #[must_use]
    pub fn task(mut self, task: TaskConfig) -> Self {
        self.tasks.push(task);
        self
    }

    /// Add an agent descriptor.
    #[must_use]
    pub fn agent(mut self, agent: AgentConfig) -> Self {
        self.agents.push(agent);
        self
    }

    /// Find a task descriptor by id.
    pub fn get_task(&self, task_id: &str) -> Option<&TaskConfig> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    /// Find an agent descriptor by id.
    pub fn get_agent(&self, agent_id: &str) -> Option<&AgentConfig> {
        self.agents.iter().find(|agent| agent.id == agent_id)
    }
}
