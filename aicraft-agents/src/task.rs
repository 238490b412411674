//! Task management and execution.
//!
//! A task binds one tool, an input map and declarative input bindings. It
//! runs at most once: the status moves from `Pending` through `Running` to
//! `Completed` or `Failed`, and any further `execute` call is rejected.

use aicraft_core::{
    CraftError, InputBinding, InputMap, Result, TaskConfig, Tool, ToolContext, Value, ValueStream,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Task status enumeration
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is pending execution
    #[default]
    Pending,
    /// Task is currently running
    Running,
    /// Task completed successfully
    Completed,
    /// Task failed with error
    Failed,
}

impl TaskStatus {
    /// Whether the task has finished, successfully or not.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Shared execution settings handed down from the engine to every task.
#[derive(Debug, Clone, Default)]
pub struct TaskContext {
    /// Cancellation signal shared by the whole run
    pub cancellation: CancellationToken,
    /// Default bound on a single tool call
    pub tool_timeout: Option<Duration>,
    /// Whether inputs are logged before each call
    pub verbose: bool,
}

impl TaskContext {
    /// Create a context with no timeout and a fresh cancellation token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Bound every tool call by the given duration.
    #[must_use]
    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = Some(timeout);
        self
    }

    /// Enable verbose input logging.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Core task structure
pub struct Task {
    id: String,
    name: String,
    tool_id: String,
    tool: Option<Arc<dyn Tool>>,
    inputs: InputMap,
    bindings: HashMap<String, InputBinding>,
    timeout: Option<Duration>,
    status: TaskStatus,
    result: Option<Value>,
    stream: Option<ValueStream>,
}

impl Task {
    /// Create a task bound to a tool.
    pub fn new(id: impl Into<String>, name: impl Into<String>, tool: Arc<dyn Tool>) -> Self {
        let tool_id = tool.id().to_string();
        Self {
            tool: Some(tool),
            ..Self::unbound(id, name, tool_id)
        }
    }

    /// Create a task with no tool attached.
    ///
    /// Executing it fails with `UnboundTool`; use [`Task::bind_tool`] first.
    pub fn unbound(
        id: impl Into<String>,
        name: impl Into<String>,
        tool_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tool_id: tool_id.into(),
            tool: None,
            inputs: InputMap::new(),
            bindings: HashMap::new(),
            timeout: None,
            status: TaskStatus::Pending,
            result: None,
            stream: None,
        }
    }

    /// Build a task from its descriptor and the resolved tool.
    pub fn from_config(config: TaskConfig, tool: Arc<dyn Tool>) -> Self {
        Self {
            inputs: config.inputs,
            bindings: config.bindings,
            timeout: config.timeout_ms.map(Duration::from_millis),
            ..Self::new(config.id, config.name, tool)
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

    /// Bound this task's tool call, overriding the engine default.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach a tool.
    pub fn bind_tool(&mut self, tool: Arc<dyn Tool>) {
        self.tool_id = tool.id().to_string();
        self.tool = Some(tool);
    }

    /// Task id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Task name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Id of the tool this task invokes
    pub fn tool_id(&self) -> &str {
        &self.tool_id
    }

    /// Current input map
    pub fn inputs(&self) -> &InputMap {
        &self.inputs
    }

    /// Set or overwrite one input.
    pub fn set_input(&mut self, key: impl Into<String>, value: Value) {
        self.inputs.insert(key.into(), value);
    }

    /// Declared input bindings
    pub fn bindings(&self) -> &HashMap<String, InputBinding> {
        &self.bindings
    }

    /// Current status
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Final value of a completed call, if the tool returned one
    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Whether a stream is waiting to be taken
    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }

    /// Move the stream out of the task.
    pub fn take_stream(&mut self) -> Option<ValueStream> {
        self.stream.take()
    }

    /// Run the bound tool once.
    ///
    /// # Errors
    ///
    /// - `TaskAlreadyExecuted` when the task is not pending; the tool is not
    ///   called again.
    /// - `UnboundTool` when no tool is attached; `result` stays unset.
    /// - `Timeout` when the call exceeds the task or context timeout.
    /// - `Cancelled` when the context's token fires first.
    /// - Any error returned by the tool, unchanged.
    pub async fn execute(&mut self, context: &TaskContext) -> Result<()> {
        if self.status != TaskStatus::Pending {
            return Err(CraftError::TaskAlreadyExecuted {
                task_id: self.id.clone(),
            });
        }

        let Some(tool) = self.tool.clone() else {
            self.status = TaskStatus::Failed;
            return Err(CraftError::unbound_tool(self.id.clone()));
        };

        self.status = TaskStatus::Running;
        debug!("Executing task '{}' with tool '{}'", self.id, self.tool_id);
        if context.verbose {
            debug!("Task '{}' inputs: {:?}", self.id, self.inputs);
        }

        let tool_context = ToolContext::new(self.id.clone())
            .with_cancellation(context.cancellation.clone())
            .with_verbose(context.verbose);
        let timeout = self.timeout.or(context.tool_timeout);
        let operation = format!("tool '{}' on task '{}'", self.tool_id, self.id);

        let inputs = &self.inputs;
        let call = async {
            let future = tool.execute(inputs, &tool_context);
            match timeout {
                Some(limit) => tokio::time::timeout(limit, future)
                    .await
                    .map_err(|_| CraftError::timeout(operation))?,
                None => future.await,
            }
        };

        let outcome = tokio::select! {
            biased;
            () = context.cancellation.cancelled() => Err(CraftError::Cancelled),
            outcome = call => outcome,
        };

        match outcome {
            Ok(output) => {
                self.result = output.value;
                self.stream = output.stream;
                self.status = TaskStatus::Completed;
                debug!("Task '{}' completed", self.id);
                Ok(())
            }
            Err(e) => {
                self.status = TaskStatus::Failed;
                debug!("Task '{}' failed: {}", self.id, e);
                Err(e)
            }
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("tool_id", &self.tool_id)
            .field("bound", &self.tool.is_some())
            .field("inputs", &self.inputs)
            .field("bindings", &self.bindings)
            .field("status", &self.status)
            .field("result", &self.result)
            .field("stream", &self.stream.as_ref().map(|_| "<stream>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::FnTool;
    use aicraft_core::ToolOutput;
    use futures::StreamExt;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_tool(calls: Arc<AtomicUsize>) -> Arc<dyn Tool> {
        Arc::new(FnTool::from_fn("count", move |_| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(ToolOutput::value(n))
        }))
    }

    #[tokio::test]
    async fn test_task_executes_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut task = Task::new("t1", "Count", counting_tool(Arc::clone(&calls)));
        assert_eq!(task.status(), TaskStatus::Pending);

        task.execute(&TaskContext::new()).await.unwrap();
        assert_eq!(task.status(), TaskStatus::Completed);
        assert_eq!(task.result(), Some(&json!(1)));

        let err = task.execute(&TaskContext::new()).await.unwrap_err();
        assert!(matches!(err, CraftError::TaskAlreadyExecuted { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(task.result(), Some(&json!(1)));
    }

    #[tokio::test]
    async fn test_unbound_task_never_sets_result() {
        let mut task = Task::unbound("t1", "Orphan", "missing_tool");
        let err = task.execute(&TaskContext::new()).await.unwrap_err();
        assert!(matches!(err, CraftError::UnboundTool { ref task_id } if task_id == "t1"));
        assert!(task.result().is_none());
        assert!(!task.has_stream());
        assert_eq!(task.status(), TaskStatus::Failed);
    }

    #[tokio::test]
    async fn test_tool_error_is_propagated_verbatim() {
        let tool = Arc::new(FnTool::from_fn("flaky", |_| {
            Err(CraftError::tool_failed("flaky", "connection reset"))
        }));
        let mut task = Task::new("t1", "Flaky", tool);

        let err = task.execute(&TaskContext::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "Tool 'flaky' failed: connection reset");
        assert!(task.result().is_none());
        assert_eq!(task.status(), TaskStatus::Failed);
    }

    #[tokio::test]
    async fn test_task_stream_and_inputs() {
        let tool = Arc::new(FnTool::from_fn("spell", |inputs| {
            let word = inputs["word"].as_str().unwrap_or_default().to_string();
            let letters: Vec<Value> = word.chars().map(|c| json!(c.to_string())).collect();
            Ok(ToolOutput::stream(futures::stream::iter(letters).boxed()))
        }));
        let mut task = Task::new("t1", "Spell", tool).with_input("word", "ok");

        task.execute(&TaskContext::new()).await.unwrap();
        assert!(task.result().is_none());
        let letters: Vec<Value> = task.take_stream().unwrap().collect().await;
        assert_eq!(letters, vec![json!("o"), json!("k")]);
        assert!(!task.has_stream());
    }

    #[tokio::test]
    async fn test_task_timeout() {
        let tool = Arc::new(FnTool::new("slow", |_inputs, _context| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(ToolOutput::empty())
        }));
        let mut task = Task::new("t1", "Slow", tool).with_timeout(Duration::from_millis(10));

        let err = task.execute(&TaskContext::new()).await.unwrap_err();
        assert!(matches!(err, CraftError::Timeout { .. }));
        assert_eq!(task.status(), TaskStatus::Failed);
    }

    #[tokio::test]
    async fn test_task_cancelled() {
        let tool = Arc::new(FnTool::new("slow", |_inputs, _context| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(ToolOutput::empty())
        }));
        let context = TaskContext::new();
        context.cancellation.cancel();
        let mut task = Task::new("t1", "Slow", tool);

        let err = task.execute(&context).await.unwrap_err();
        assert!(matches!(err, CraftError::Cancelled));
    }

    #[test]
    fn test_from_config() {
        let config = TaskConfig::new("t1", "Echo", "echo")
            .with_input("text", "hi")
            .with_binding("text", InputBinding::new("a0", "t0"))
            .with_timeout_ms(250);
        let tool: Arc<dyn Tool> = Arc::new(crate::tool::builtin::EchoTool::new());
        let task = Task::from_config(config, tool);

        assert_eq!(task.tool_id(), "echo");
        assert_eq!(task.inputs()["text"], json!("hi"));
        assert_eq!(task.bindings().len(), 1);
        assert_eq!(task.timeout, Some(Duration::from_millis(250)));
    }
}
