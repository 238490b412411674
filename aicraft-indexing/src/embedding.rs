//! Embedding similarity and flattening.

use tracing::warn;

/// Calculate cosine similarity between two vectors.
///
/// Returns `0.0` when either vector has zero norm or the dimensions differ.
#[must_use]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        warn!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        );
        return 0.0;
    }

    let dot_product: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

/// Find the candidate most similar to the query.
///
/// Ties keep the first maximum. Returns `None` when there are no candidates.
#[must_use]
pub fn find_most_similar_chunk(query: &[f64], candidates: &[Vec<f64>]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let similarity = cosine_similarity(query, candidate);
        match best {
            Some((_, best_similarity)) if similarity <= best_similarity => {}
            _ => best = Some((index, similarity)),
        }
    }
    best.map(|(index, _)| index)
}

/// Flatten embeddings into one `f32` buffer plus the length of each vector.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn flatten_embeddings(embeddings: &[Vec<f64>]) -> (Vec<f32>, Vec<usize>) {
    let lengths = embeddings.iter().map(Vec::len).collect();
    let flattened = embeddings
        .iter()
        .flat_map(|vector| vector.iter().map(|&x| x as f32))
        .collect();
    (flattened, lengths)
}

/// Rebuild embeddings from a flattened buffer and per-vector lengths.
///
/// Stops at the first vector that would read past the end of the buffer.
#[must_use]
pub fn reconstruct_embeddings(flattened: &[f32], lengths: &[usize]) -> Vec<Vec<f64>> {
    let mut embeddings = Vec::with_capacity(lengths.len());
    let mut offset = 0;
    for &length in lengths {
        let Some(slice) = flattened.get(offset..offset + length) else {
            warn!(
                "Flattened buffer too short: need {} values, have {}",
                offset + length,
                flattened.len()
            );
            break;
        };
        embeddings.push(slice.iter().map(|&x| f64::from(x)).collect());
        offset += length;
    }
    embeddings
}
