//! Nearest-chunk selection by cosine similarity.

use aicraft_core::{
    CraftError, InputMap, Result, Tool, ToolContext, ToolOutput,
    inputs::{require_f64_matrix, require_f64_vec},
};
use aicraft_indexing::embedding::find_most_similar_chunk;
use async_trait::async_trait;

/// Picks the embedding closest to a query embedding.
///
/// Inputs: `queryEmbedding` (list of numbers) and `embeddings` (list of
/// number lists). Produces the index of the best candidate; ties keep the
/// first one.
#[derive(Debug, Clone, Default)]
pub struct NearestChunkTool;

impl NearestChunkTool {
    /// Create a new nearest chunk tool
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for NearestChunkTool {
    fn id(&self) -> &str {
        "nearest_chunk"
    }

    fn name(&self) -> &str {
        "Nearest Chunk"
    }

    fn description(&self) -> &str {
        "Return the index of the entry of `embeddings` most similar to `queryEmbedding`."
    }

    async fn execute(&self, inputs: &InputMap, _context: &ToolContext) -> Result<ToolOutput> {
        let query = require_f64_vec(inputs, "queryEmbedding", self.id())?;
        let candidates = require_f64_matrix(inputs, "embeddings", self.id())?;

        let index = find_most_similar_chunk(&query, &candidates).ok_or_else(|| {
            CraftError::tool_input(self.id(), "input 'embeddings' must not be empty")
        })?;
        Ok(ToolOutput::value(index))
    }
}
