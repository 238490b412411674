//! Text processing utilities.
//!
//! Chunking and extraction operate on whitespace-separated words, so the
//! results are independent of line breaks and repeated spaces.

pub mod chunking;
pub mod extract;

pub use chunking::*;
pub use extract::*;
