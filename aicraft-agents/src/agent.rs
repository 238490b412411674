//! Agents: named owners of ordered tasks.
//!
//! An agent runs its tasks either one after another (fail-fast) or all at
//! once (collect every outcome, report one error). Each successful task
//! leaves one entry in the agent's output map; each stream is kept under
//! the id of the task that produced it.

use aicraft_core::{CraftError, ExecutionMode, Result, Value, ValueStream};
use futures::future::join_all;
use serde::de::DeserializeOwned;
use std::{collections::HashMap, fmt, sync::Arc};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::task::{Task, TaskContext};

/// Agent shared between the engine and spawned scheduling jobs.
pub type SharedAgent = Arc<Mutex<Agent>>;

/// A named unit owning an ordered list of tasks.
pub struct Agent {
    id: String,
    name: String,
    depends_on: Vec<String>,
    execution: ExecutionMode,
    tasks: Vec<Task>,
    output: HashMap<String, Value>,
    streams: HashMap<String, ValueStream>,
    last_stream: Option<String>,
}

impl Agent {
    /// Create an agent with no dependencies and no tasks.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            depends_on: Vec::new(),
            execution: ExecutionMode::default(),
            tasks: Vec::new(),
            output: HashMap::new(),
            streams: HashMap::new(),
            last_stream: None,
        }
    }

    /// Set the agents this one depends on.
    #[must_use]
    pub fn with_dependencies<I, S>(mut self, depends_on: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = depends_on.into_iter().map(Into::into).collect();
        self
    }

    /// Set how owned tasks are run.
    #[must_use]
    pub fn with_execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }

    /// Wrap the agent for sharing with the engine.
    pub fn into_shared(self) -> SharedAgent {
        Arc::new(Mutex::new(self))
    }

    /// Agent id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Agent name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Agents that must finish before this one
    pub fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    /// Execution mode for owned tasks
    pub fn execution(&self) -> ExecutionMode {
        self.execution
    }

    /// Append a task; insertion order is sequential execution order.
    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Owned tasks in insertion order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Find an owned task.
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == task_id)
    }

    /// Find an owned task for mutation.
    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id() == task_id)
    }

    /// Results of successful tasks keyed by task id.
    ///
    /// Tasks that only produced a stream are recorded as `null`.
    pub fn output(&self) -> &HashMap<String, Value> {
        &self.output
    }

    /// Result of one task.
    pub fn output_value(&self, task_id: &str) -> Option<&Value> {
        self.output.get(task_id)
    }

    /// Result of one task, deserialized into the shape the caller expects.
    ///
    /// Returns `Ok(None)` when the task has no result and a `Serialization`
    /// error when the result has a different shape.
    pub fn output_as<T: DeserializeOwned>(&self, task_id: &str) -> Result<Option<T>> {
        self.output
            .get(task_id)
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
            .map_err(CraftError::from)
    }

    /// Whether a stream produced by the given task is waiting.
    pub fn has_stream(&self, task_id: &str) -> bool {
        self.streams.contains_key(task_id)
    }

    /// Take the stream produced by the given task.
    pub fn take_stream(&mut self, task_id: &str) -> Option<ValueStream> {
        self.streams.remove(task_id)
    }

    /// Take the stream of the last task, in task order, that produced one.
    pub fn take_last_stream(&mut self) -> Option<ValueStream> {
        let task_id = self.last_stream.take()?;
        self.streams.remove(&task_id)
    }

    /// Run owned tasks according to the agent's execution mode.
    pub async fn execute(&mut self, context: &TaskContext) -> Result<()> {
        match self.execution {
            ExecutionMode::Sequential => self.execute_sequential(context).await,
            ExecutionMode::Concurrent => self.execute_concurrent(context).await,
        }
    }

    /// Run owned tasks strictly in insertion order.
    ///
    /// Stops at the first failure and returns its error; later tasks are
    /// never attempted.
    pub async fn execute_sequential(&mut self, context: &TaskContext) -> Result<()> {
        debug!(
            "Agent '{}' running {} tasks sequentially",
            self.id,
            self.tasks.len()
        );
        let Self {
            tasks,
            output,
            streams,
            last_stream,
            ..
        } = self;

        for task in tasks.iter_mut() {
            task.execute(context).await?;
            record_completion(task, output, streams, last_stream);
        }
        Ok(())
    }

    /// Run all owned tasks concurrently and wait for every one of them.
    ///
    /// Successful results are recorded even when other tasks fail. If any
    /// task failed, the error of the first failed task in task order is
    /// returned and the others are logged.
    pub async fn execute_concurrent(&mut self, context: &TaskContext) -> Result<()> {
        debug!(
            "Agent '{}' running {} tasks concurrently",
            self.id,
            self.tasks.len()
        );
        let Self {
            id,
            tasks,
            output,
            streams,
            last_stream,
            ..
        } = self;

        let outcomes = join_all(tasks.iter_mut().map(|task| task.execute(context))).await;

        let mut first_error = None;
        for (task, outcome) in tasks.iter_mut().zip(outcomes) {
            match outcome {
                Ok(()) => record_completion(task, output, streams, last_stream),
                Err(e) if first_error.is_none() => first_error = Some(e),
                Err(e) => warn!("Agent '{}': task '{}' also failed: {}", id, task.id(), e),
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}

/// Fold a completed task into the agent's output and stream maps.
fn record_completion(
    task: &mut Task,
    output: &mut HashMap<String, Value>,
    streams: &mut HashMap<String, ValueStream>,
    last_stream: &mut Option<String>,
) {
    let task_id = task.id().to_string();
    output.insert(
        task_id.clone(),
        task.result().cloned().unwrap_or(Value::Null),
    );
    if let Some(stream) = task.take_stream() {
        streams.insert(task_id.clone(), stream);
        *last_stream = Some(task_id);
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stream_ids: Vec<&String> = self.streams.keys().collect();
        stream_ids.sort();
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("depends_on", &self.depends_on)
            .field("execution", &self.execution)
            .field("tasks", &self.tasks)
            .field("output", &self.output)
            .field("streams", &stream_ids)
            .finish()
    }
}
