//! Streaming tool that emits the words of its input one by one.

use aicraft_core::{
    InputMap, Result, Tool, ToolContext, ToolOutput, Value,
    inputs::{require, require_str},
};
use async_trait::async_trait;
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 16;

/// Streams the whitespace-separated words of `text`.
///
/// The optional `delayMs` input pauses between words, which is handy for
/// exercising consumers that read while the producer is still running.
/// The producer stops early when the call is cancelled or the consumer
/// drops the stream; in every case the channel closes when it returns.
#[derive(Debug, Clone, Default)]
pub struct WordStreamTool;

impl WordStreamTool {
    /// Create a new word stream tool
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for WordStreamTool {
    fn id(&self) -> &str {
        "word_stream"
    }

    fn name(&self) -> &str {
        "Word Stream"
    }

    fn description(&self) -> &str {
        "Stream the words of `text`, optionally pausing `delayMs` milliseconds between them."
    }

    fn supports_streaming(&self) -> bool {
        true
    }

    async fn execute(&self, inputs: &InputMap, context: &ToolContext) -> Result<ToolOutput> {
        let text = require_str(inputs, "text", self.id())?;
        let delay = if inputs.contains_key("delayMs") {
            Some(Duration::from_millis(require::<u64>(
                inputs,
                "delayMs",
                self.id(),
            )?))
        } else {
            None
        };

        let words: Vec<String> = text.split_whitespace().map(ToString::to_string).collect();
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let cancellation = context.cancellation.clone();
        let task_id = context.task_id.clone();

        tokio::spawn(async move {
            for word in words {
                if cancellation.is_cancelled() || tx.send(Value::from(word)).await.is_err() {
                    debug!("Word stream for task '{}' stopped early", task_id);
                    return;
                }
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
            }
        });

        Ok(ToolOutput::stream(ReceiverStream::new(rx).boxed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aicraft_core::CraftError;
    use serde_json::json;

    #[tokio::test]
    async fn test_word_stream() {
        let tool = WordStreamTool::new();
        let mut inputs = InputMap::new();
        inputs.insert("text".to_string(), json!("streams  are\nlazy"));

        let output = tool
            .execute(&inputs, &ToolContext::new("t1"))
            .await
            .unwrap();
        assert!(output.value.is_none());

        let words: Vec<Value> = output.stream.unwrap().collect().await;
        assert_eq!(words, vec![json!("streams"), json!("are"), json!("lazy")]);
    }

    #[tokio::test]
    async fn test_word_stream_error_has_no_stream() {
        let tool = WordStreamTool::new();
        let result = tool
            .execute(&InputMap::new(), &ToolContext::default())
            .await;
        assert!(matches!(result, Err(CraftError::ToolInputInvalid { .. })));
    }

    #[tokio::test]
    async fn test_word_stream_stops_on_cancel() {
        let tool = WordStreamTool::new();
        let mut inputs = InputMap::new();
        inputs.insert("text".to_string(), json!("a b c d e f g h"));
        inputs.insert("delayMs".to_string(), json!(20));

        let context = ToolContext::new("t1");
        let output = tool.execute(&inputs, &context).await.unwrap();
        let mut stream = output.stream.unwrap();

        assert_eq!(stream.next().await, Some(json!("a")));
        context.cancellation.cancel();
        let rest: Vec<Value> = stream.collect().await;
        assert!(rest.len() < 7);
    }
}
