//! Sentence splitting and request batching
//!
//! The tagging service is called once per batch of sentences rather than
//! once per poem, which keeps request bodies small and the request count
//! within the service quota.

use unicode_segmentation::UnicodeSegmentation;

/// Sentences of `text` by Unicode sentence boundaries, trimmed, blanks dropped
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.unicode_sentences()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Join sentences into request inputs of at most `batch_size` sentences
pub fn batch_sentences(text: &str, batch_size: usize) -> Vec<String> {
    let batch_size = batch_size.max(1);
    split_sentences(text)
        .chunks(batch_size)
        .map(|chunk| chunk.join(" "))
        .collect()
}
