//! The tool capability contract.

use async_trait::async_trait;
use std::fmt;
use tokio_util::sync::CancellationToken;

use crate::types::{InputMap, Value, ValueStream};
use crate::Result;

/// A named external operation invoked by tasks.
///
/// Tools are stateless and immutable once registered. A call either
/// completes with a [`ToolOutput`] or fails; since the error path carries no
/// output, a failing call can never leak an open stream.
///
/// # Examples
///
/// ```rust
/// use aicraft_core::{InputMap, Result, Tool, ToolContext, ToolOutput, Value};
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct Shout;
///
/// #[async_trait]
/// impl Tool for Shout {
///     fn id(&self) -> &str {
///         "shout"
///     }
///
///     async fn execute(&self, inputs: &InputMap, _context: &ToolContext) -> Result<ToolOutput> {
///         let text = aicraft_core::inputs::require_str(inputs, "text", self.id())?;
///         Ok(ToolOutput::value(text.to_uppercase()))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let mut inputs = InputMap::new();
/// inputs.insert("text".to_string(), Value::from("hi"));
/// let output = Shout.execute(&inputs, &ToolContext::new("t1")).await?;
/// assert_eq!(output.value, Some(Value::from("HI")));
/// # Ok::<(), aicraft_core::CraftError>(())
/// # }).unwrap();
/// ```
#[async_trait]
pub trait Tool: Send + Sync + fmt::Debug {
    /// Unique identifier used for registration and lookup.
    fn id(&self) -> &str;

    /// Human-readable name. Defaults to the id.
    fn name(&self) -> &str {
        self.id()
    }

    /// Short description of what the tool does and which inputs it expects.
    fn description(&self) -> &str {
        ""
    }

    /// Whether the tool answers with a stream instead of a final value.
    fn supports_streaming(&self) -> bool {
        false
    }

    /// Run the tool against the given inputs.
    ///
    /// # Errors
    ///
    /// Returns `ToolInputInvalid` when a required input is absent or has the
    /// wrong type, and `ToolExecutionFailed` when the underlying operation
    /// fails.
    async fn execute(&self, inputs: &InputMap, context: &ToolContext) -> Result<ToolOutput>;
}

/// Per-call context handed to a tool.
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    /// Id of the task performing the call
    pub task_id: String,
    /// Cancellation signal; long-running tools should observe it
    pub cancellation: CancellationToken,
    /// Whether the workflow runs with verbose logging
    pub verbose: bool,
}

impl ToolContext {
    /// Create a context for the given task.
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            ..Self::default()
        }
    }

    /// Use the given cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Enable or disable verbose logging for the call.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Check whether the call has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

/// Successful result of a tool call.
///
/// Either part may be absent: synchronous tools return only a value,
/// streaming tools return only a stream, and some tools return both.
#[derive(Default)]
pub struct ToolOutput {
    /// Final value of the call
    pub value: Option<Value>,
    /// Live sequence of incremental values
    pub stream: Option<ValueStream>,
}

impl ToolOutput {
    /// Create an output carrying only a final value.
    pub fn value(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            stream: None,
        }
    }

    /// Create an output carrying only a stream.
    pub fn stream(stream: ValueStream) -> Self {
        Self {
            value: None,
            stream: Some(stream),
        }
    }

    /// Create an output with neither value nor stream.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Attach a stream to this output.
    #[must_use]
    pub fn with_stream(mut self, stream: ValueStream) -> Self {
        self.stream = Some(stream);
        self
    }

    /// Check whether the output carries a stream.
    #[must_use]
    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }
}

impl fmt::Debug for ToolOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolOutput")
            .field("value", &self.value)
            .field("stream", &self.stream.as_ref().map(|_| "<stream>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn test_tool_output_constructors() {
        let output = ToolOutput::value("done");
        assert_eq!(output.value, Some(Value::from("done")));
        assert!(!output.has_stream());

        let output = ToolOutput::empty();
        assert!(output.value.is_none());
        assert!(output.stream.is_none());
    }

    #[tokio::test]
    async fn test_tool_output_stream() {
        let stream = futures::stream::iter(vec![Value::from("a"), Value::from("b")]).boxed();
        let output = ToolOutput::value(2).with_stream(stream);
        assert!(output.has_stream());
        assert!(format!("{output:?}").contains("<stream>"));

        let collected: Vec<Value> = output.stream.unwrap().collect().await;
        assert_eq!(collected, vec![Value::from("a"), Value::from("b")]);
    }

    #[test]
    fn test_tool_context() {
        let token = CancellationToken::new();
        let context = ToolContext::new("task_1")
            .with_cancellation(token.clone())
            .with_verbose(true);
        assert_eq!(context.task_id, "task_1");
        assert!(context.verbose);
        assert!(!context.is_cancelled());

        token.cancel();
        assert!(context.is_cancelled());
    }
}
