//! Echo tool implementation - simple tool for testing and debugging.

use aicraft_core::{
    InputMap, Result, Tool, ToolContext, ToolOutput,
    inputs::{optional_bool, require_str},
};
use async_trait::async_trait;
use tracing::debug;

/// Echo tool for testing and debugging
///
/// Returns its `text` input unchanged.
#[derive(Debug, Clone)]
pub struct EchoTool {
    id: String,
}

impl EchoTool {
    /// Create a new echo tool
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: "echo".to_string(),
        }
    }
}

impl Default for EchoTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for EchoTool {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "Echo"
    }

    fn description(&self) -> &str {
        "Echo back the `text` input. Useful for testing and debugging."
    }

    async fn execute(&self, inputs: &InputMap, context: &ToolContext) -> Result<ToolOutput> {
        let text = require_str(inputs, "text", &self.id)?;
        if optional_bool(inputs, "verbose") || context.verbose {
            debug!("Echoing for task '{}': {}", context.task_id, text);
        }
        Ok(ToolOutput::value(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aicraft_core::{CraftError, Value};
    use serde_json::json;

    #[tokio::test]
    async fn test_echo_tool() {
        let tool = EchoTool::new();
        let mut inputs = InputMap::new();
        inputs.insert("text".to_string(), json!("Hello, World!"));
        inputs.insert("verbose".to_string(), json!(true));

        let output = tool
            .execute(&inputs, &ToolContext::new("t1"))
            .await
            .unwrap();
        assert_eq!(output.value, Some(Value::from("Hello, World!")));
        assert!(!output.has_stream());
    }

    #[tokio::test]
    async fn test_echo_tool_invalid_args() {
        let tool = EchoTool::new();
        let mut inputs = InputMap::new();
        inputs.insert("wrong_field".to_string(), json!("test"));

        let err = tool
            .execute(&inputs, &ToolContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CraftError::ToolInputInvalid { .. }));
    }
}
