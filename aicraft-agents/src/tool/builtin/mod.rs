//! Built-in tools backed by local computation.
//!
//! None of these tools reach the network; they wrap the text and embedding
//! helpers of `aicraft-indexing` so workflows can chunk, search and stream
//! text out of the box.

use aicraft_core::Tool;
use std::sync::Arc;

pub mod echo;
pub mod similarity;
pub mod stream;
pub mod text;

pub use echo::EchoTool;
pub use similarity::NearestChunkTool;
pub use stream::WordStreamTool;
pub use text::{DescriptionExtractorTool, RelevantTextTool, TextChunkerTool};

/// Instantiate every built-in tool.
#[must_use]
pub fn all() -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(EchoTool::new()),
        Arc::new(TextChunkerTool::new()),
        Arc::new(RelevantTextTool::new()),
        Arc::new(DescriptionExtractorTool::new()),
        Arc::new(NearestChunkTool::new()),
        Arc::new(WordStreamTool::new()),
    ]
}
