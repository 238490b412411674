//! Integration tests for the aicraft-indexing crate.

use aicraft_indexing::prelude::*;
use pretty_assertions::assert_eq;

const DOCUMENT: &str = "Rust is a systems language. It has no garbage collector. \
    Ownership rules are checked at compile time. Async code runs on executors \
    such as tokio. Traits describe shared behaviour.";

const SHORT_WORDS: &str = "a bb c dd e ff g hh i jj k ll m nn o";

#[test]
fn test_chunks_cover_all_words() {
    let chunker = WordChunker::from_defaults(6, 2).unwrap();
    let chunks = chunker.split_text(SHORT_WORDS);
    assert!(chunks.len() > 1);

    // Consecutive chunks share exactly `chunk_overlap` words.
    for pair in chunks.windows(2) {
        let previous: Vec<&str> = pair[0].split_whitespace().collect();
        let next: Vec<&str> = pair[1].split_whitespace().collect();
        assert_eq!(&previous[previous.len() - 2..], &next[..2]);
    }

    let last_word = SHORT_WORDS.split_whitespace().last().unwrap();
    assert!(chunks.last().unwrap().ends_with(last_word));
}

#[test]
fn test_chunk_search_pipeline() {
    // Pick the chunk whose (toy) embedding is closest to the query and
    // read its text back with the non-overlapping window helper.
    let chunk_size = 5;
    let embeddings = vec![vec![0.1, 0.9], vec![0.95, 0.05], vec![0.5, 0.5]];
    let (flattened, lengths) = flatten_embeddings(&embeddings);
    let restored = reconstruct_embeddings(&flattened, &lengths);

    let index = find_most_similar_chunk(&[1.0, 0.0], &restored).unwrap();
    assert_eq!(index, 1);

    let text = extract_relevant_text(DOCUMENT, index, chunk_size);
    assert_eq!(text, "It has no garbage collector.");
}

#[test]
fn test_descriptions_from_answer() {
    let answer = "1. A crab holding a gear\nNo images needed\n\n2. A ferris wheel at night\n";
    let descriptions = extract_descriptions(answer);
    assert_eq!(
        descriptions,
        vec!["1. A crab holding a gear", "2. A ferris wheel at night"]
    );
}

#[test]
fn test_truncate_matches_first_chunk() {
    let first = split_text_into_chunks(DOCUMENT, 4, 1).unwrap().remove(0);
    assert_eq!(truncate_to_token_limit(DOCUMENT, 4), first);
    assert!(estimate_tokens(&first) <= 4);
}
