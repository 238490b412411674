//! Closure-backed tools.

use aicraft_core::{InputMap, Result, Tool, ToolContext, ToolOutput};
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::{fmt, future::Future, sync::Arc};

type ToolFuture = BoxFuture<'static, Result<ToolOutput>>;
type ToolFn = dyn Fn(InputMap, ToolContext) -> ToolFuture + Send + Sync;

/// A tool backed by an async closure.
///
/// The closure receives an owned copy of the task's inputs and call context.
/// [`FnTool::from_fn`] covers the common synchronous case.
///
/// # Examples
///
/// ```rust
/// use aicraft_agents::tool::FnTool;
/// use aicraft_core::{inputs::require_str, Tool, ToolOutput};
///
/// let shout = FnTool::from_fn("shout", |inputs| {
///     let text = require_str(inputs, "text", "shout")?;
///     Ok(ToolOutput::value(text.to_uppercase()))
/// });
/// assert_eq!(shout.id(), "shout");
/// ```
#[derive(Clone)]
pub struct FnTool {
    id: String,
    name: String,
    description: String,
    streaming: bool,
    func: Arc<ToolFn>,
}

impl FnTool {
    /// Create a tool from an async closure.
    pub fn new<F, Fut>(id: impl Into<String>, func: F) -> Self
    where
        F: Fn(InputMap, ToolContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolOutput>> + Send + 'static,
    {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            streaming: false,
            func: Arc::new(move |inputs: InputMap, context: ToolContext| -> ToolFuture {
                Box::pin(func(inputs, context))
            }),
        }
    }

    /// Create a tool from a synchronous closure over the inputs.
    pub fn from_fn<F>(id: impl Into<String>, func: F) -> Self
    where
        F: Fn(&InputMap) -> Result<ToolOutput> + Send + Sync + 'static,
    {
        let func = Arc::new(func);
        Self::new(id, move |inputs: InputMap, _context: ToolContext| {
            let func = Arc::clone(&func);
            async move { func(&inputs) }
        })
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark the tool as producing streams.
    #[must_use]
    pub fn streaming(mut self) -> Self {
        self.streaming = true;
        self
    }
}

impl fmt::Debug for FnTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTool")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("streaming", &self.streaming)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Tool for FnTool {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn supports_streaming(&self) -> bool {
        self.streaming
    }

    async fn execute(&self, inputs: &InputMap, context: &ToolContext) -> Result<ToolOutput> {
        (self.func)(inputs.clone(), context.clone()).await
    }
}
