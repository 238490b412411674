//! Text tools: chunking, chunk extraction and description extraction.

use aicraft_core::{
    InputMap, Result, Tool, ToolContext, ToolOutput, Value,
    inputs::{optional_bool, require_str, require_usize},
};
use aicraft_indexing::text::{WordChunker, extract_descriptions, extract_relevant_text};
use async_trait::async_trait;
use tracing::debug;

/// Splits `text` into overlapping word chunks.
///
/// Inputs: `text` (string), `chunkSize` and `chunkOverlap` (non-negative
/// integers). Produces a list of strings.
#[derive(Debug, Clone, Default)]
pub struct TextChunkerTool;

impl TextChunkerTool {
    /// Create a new text chunker tool
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for TextChunkerTool {
    fn id(&self) -> &str {
        "text_chunker"
    }

    fn name(&self) -> &str {
        "Text Chunker"
    }

    fn description(&self) -> &str {
        "Split `text` into chunks of `chunkSize` words overlapping by `chunkOverlap` words."
    }

    async fn execute(&self, inputs: &InputMap, context: &ToolContext) -> Result<ToolOutput> {
        let text = require_str(inputs, "text", self.id())?;
        let chunk_size = require_usize(inputs, "chunkSize", self.id())?;
        let chunk_overlap = require_usize(inputs, "chunkOverlap", self.id())?;

        let chunker = WordChunker::from_defaults(chunk_size, chunk_overlap)?;
        let chunks = chunker.split_text(text);

        if optional_bool(inputs, "verbose") || context.verbose {
            for (i, chunk) in chunks.iter().enumerate() {
                debug!("Chunk {}: {}", i + 1, chunk);
            }
        }
        Ok(ToolOutput::value(chunks))
    }
}

/// Reads the `index`-th window of `chunkSize` words back out of `text`.
#[derive(Debug, Clone, Default)]
pub struct RelevantTextTool;

impl RelevantTextTool {
    /// Create a new relevant text tool
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for RelevantTextTool {
    fn id(&self) -> &str {
        "relevant_text"
    }

    fn name(&self) -> &str {
        "Relevant Text"
    }

    fn description(&self) -> &str {
        "Return words [index * chunkSize, index * chunkSize + chunkSize) of `text`."
    }

    async fn execute(&self, inputs: &InputMap, _context: &ToolContext) -> Result<ToolOutput> {
        let text = require_str(inputs, "text", self.id())?;
        let index = require_usize(inputs, "index", self.id())?;
        let chunk_size = require_usize(inputs, "chunkSize", self.id())?;

        Ok(ToolOutput::value(extract_relevant_text(
            text, index, chunk_size,
        )))
    }
}

/// Collects description lines from a model answer in `content`.
#[derive(Debug, Clone, Default)]
pub struct DescriptionExtractorTool;

impl DescriptionExtractorTool {
    /// Create a new description extractor tool
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for DescriptionExtractorTool {
    fn id(&self) -> &str {
        "description_extractor"
    }

    fn name(&self) -> &str {
        "Description Extractor"
    }

    fn description(&self) -> &str {
        "Collect the non-empty lines of `content`, skipping 'No images needed' answers."
    }

    async fn execute(&self, inputs: &InputMap, _context: &ToolContext) -> Result<ToolOutput> {
        let content = require_str(inputs, "content", self.id())?;
        let descriptions: Vec<Value> = extract_descriptions(content)
            .into_iter()
            .map(Value::from)
            .collect();
        Ok(ToolOutput::value(descriptions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aicraft_core::CraftError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn inputs(pairs: &[(&str, Value)]) -> InputMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_text_chunker() {
        let tool = TextChunkerTool::new();
        let inputs = inputs(&[
            ("text", json!("a b c d e f g")),
            ("chunkSize", json!(3)),
            ("chunkOverlap", json!(1)),
        ]);

        let output = tool
            .execute(&inputs, &ToolContext::default())
            .await
            .unwrap();
        assert_eq!(output.value, Some(json!(["a b c", "c d e", "e f g"])));
    }

    #[tokio::test]
    async fn test_text_chunker_rejects_bad_inputs() {
        let tool = TextChunkerTool::new();

        let missing = inputs(&[("text", json!("a b")), ("chunkSize", json!(3))]);
        let err = tool
            .execute(&missing, &ToolContext::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input for tool 'text_chunker': input 'chunkOverlap' is required and must be a non-negative integer"
        );

        let overlapping = inputs(&[
            ("text", json!("a b")),
            ("chunkSize", json!(2)),
            ("chunkOverlap", json!(2)),
        ]);
        let err = tool
            .execute(&overlapping, &ToolContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CraftError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_relevant_text() {
        let tool = RelevantTextTool::new();
        let inputs = inputs(&[
            ("text", json!("a b c d e f g")),
            ("index", json!(1)),
            ("chunkSize", json!(3)),
        ]);

        let output = tool
            .execute(&inputs, &ToolContext::default())
            .await
            .unwrap();
        assert_eq!(output.value, Some(json!("d e f")));
    }

    #[tokio::test]
    async fn test_description_extractor() {
        let tool = DescriptionExtractorTool::new();
        let inputs = inputs(&[(
            "content",
            json!("A diagram of the pipeline\nNo images needed here\n\n A chart of costs "),
        )]);

        let output = tool
            .execute(&inputs, &ToolContext::default())
            .await
            .unwrap();
        assert_eq!(
            output.value,
            Some(json!(["A diagram of the pipeline", "A chart of costs"]))
        );
    }
}
