//! # aicraft Indexing
//!
//! Text and embedding helpers used by the built-in aicraft tools.
//!
//! - **Chunking**: overlapping word windows with a rough token bound
//! - **Extraction**: selecting a chunk's text back out of a document and
//!   collecting descriptions from model answers
//! - **Similarity**: cosine similarity and nearest-chunk selection
//! - **Flattening**: packing embeddings into a single `f32` buffer
//!
//! ## Quick Start
//!
//! ```rust
//! use aicraft_indexing::prelude::*;
//!
//! let chunks = split_text_into_chunks("a b c d e f g", 3, 1).unwrap();
//! assert_eq!(chunks.len(), 3);
//!
//! let best = find_most_similar_chunk(&[1.0, 0.0], &[vec![0.0, 1.0], vec![1.0, 0.0]]);
//! assert_eq!(best, Some(1));
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod embedding;
pub mod text;

/// Re-exports of commonly used types and functions.
pub mod prelude {
    pub use crate::embedding::{
        cosine_similarity, find_most_similar_chunk, flatten_embeddings, reconstruct_embeddings,
    };
    pub use crate::text::{
        estimate_tokens, extract_descriptions, extract_relevant_text, split_text_into_chunks,
        truncate_to_token_limit, ChunkingConfig, WordChunker,
    };
}

/// Version information for the aicraft indexing library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
