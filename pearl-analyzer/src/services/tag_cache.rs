//! Tag cache keyed by poem and content hash
//!
//! Holds the tokens the tagging service returned for each poem, together with
//! the SHA-256 of the text they were computed from. A lookup only hits when
//! the hash matches the current text; [`TagCache::invalidate_if_changed`]
//! evicts entries whose text has moved on.
//!
//! The cache is an ordinary value owned by the caller and passed into the
//! pipeline; there is no global instance.

use pearl_common::Token;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;

/// Hex-encoded SHA-256 of `text`
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Poem id plus hash of the text that was tagged
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub poem: String,
    pub content_hash: String,
}

impl CacheKey {
    pub fn for_text(poem: &str, text: &str) -> Self {
        Self {
            poem: poem.to_string(),
            content_hash: content_hash(text),
        }
    }
}

#[derive(Debug)]
struct CachedTags {
    content_hash: String,
    tokens: Arc<Vec<Token>>,
}

/// Tagging results per poem
#[derive(Debug, Default)]
pub struct TagCache {
    entries: HashMap<String, CachedTags>,
}

impl TagCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached tokens for `key`, only if the stored hash matches
    pub fn get(&self, key: &CacheKey) -> Option<Arc<Vec<Token>>> {
        self.entries
            .get(&key.poem)
            .filter(|entry| entry.content_hash == key.content_hash)
            .map(|entry| Arc::clone(&entry.tokens))
    }

    /// Store tokens for `key`, replacing any previous entry of the poem
    pub fn insert(&mut self, key: CacheKey, tokens: Vec<Token>) -> Arc<Vec<Token>> {
        let tokens = Arc::new(tokens);
        self.entries.insert(
            key.poem,
            CachedTags {
                content_hash: key.content_hash,
                tokens: Arc::clone(&tokens),
            },
        );
        tokens
    }

    /// Evict the poem's entry if it was computed from different text
    ///
    /// Returns `true` when an entry was evicted.
    pub fn invalidate_if_changed(&mut self, key: &CacheKey) -> bool {
        let stale = self
            .entries
            .get(&key.poem)
            .is_some_and(|entry| entry.content_hash != key.content_hash);
        if stale {
            self.entries.remove(&key.poem);
            tracing::info!(poem = %key.poem, "Poem text changed, cached tags invalidated");
        }
        stale
    }

    /// Drop one poem's entry; returns `true` if there was one
    pub fn invalidate(&mut self, poem: &str) -> bool {
        self.entries.remove(poem).is_some()
    }

    /// Drop everything; returns the number of evicted entries
    pub fn clear(&mut self) -> usize {
        let evicted = self.entries.len();
        self.entries.clear();
        evicted
    }
}
