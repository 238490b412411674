//! Extraction helpers for chunked text and model answers.

/// Prefix of lines a model writes when a passage needs no illustration.
pub const NO_IMAGES_PREFIX: &str = "No images needed";

/// Return the `index`-th window of `chunk_size` words.
///
/// The window covers words `[index * chunk_size, index * chunk_size + chunk_size)`,
/// clamped to the text. An index past the end yields an empty string.
#[must_use]
pub fn extract_relevant_text(text: &str, index: usize, chunk_size: usize) -> String {
    let start = index.saturating_mul(chunk_size);
    text.split_whitespace()
        .skip(start)
        .take(chunk_size)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collect the non-empty, trimmed lines of a model answer.
///
/// Lines starting with [`NO_IMAGES_PREFIX`] are dropped.
#[must_use]
pub fn extract_descriptions(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(NO_IMAGES_PREFIX))
        .map(ToString::to_string)
        .collect()
}
