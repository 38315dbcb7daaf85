//! Analysis run: corpus → tokens → profiles → comparison tables
//!
//! Poems are processed one after another. Each poem is served from the
//! [`TagCache`] when its text hash matches, otherwise tagged through the
//! [`Tagger`]. Any failure aborts the run; a report always covers every poem
//! of the corpus.

use chrono::{DateTime, Utc};
use pearl_common::{aggregate, ComparisonTable, Result, TagCategory, TagProfiles, Token};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::services::corpus::Corpus;
use crate::services::tag_cache::{CacheKey, TagCache};
use crate::types::{PoemInfo, Tagger};

/// Tokens and profiles of one poem
#[derive(Debug, Clone)]
pub struct PoemAnalysis {
    pub poem: PoemInfo,
    pub tokens: Arc<Vec<Token>>,
    pub profiles: TagProfiles,
    /// Tokens came from the cache rather than the service
    pub from_cache: bool,
}

impl PoemAnalysis {
    pub fn total_tokens(&self) -> usize {
        self.profiles.total()
    }
}

/// Result of a complete run
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub completed_at: DateTime<Utc>,
    pub poems: Vec<PoemAnalysis>,
    pub word_type: ComparisonTable,
    pub pos_tag: ComparisonTable,
}

/// Per-poem line of a [`RunSummary`]
#[derive(Debug, Clone, Serialize)]
pub struct PoemSummary {
    pub id: String,
    pub name: String,
    pub total_tokens: usize,
    pub from_cache: bool,
}

/// JSON summary returned after a run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub completed_at: DateTime<Utc>,
    pub poems: Vec<PoemSummary>,
    pub word_type_tags: usize,
    pub pos_tag_tags: usize,
}

impl AnalysisReport {
    pub fn table(&self, category: TagCategory) -> &ComparisonTable {
        match category {
            TagCategory::WordType => &self.word_type,
            TagCategory::PosTag => &self.pos_tag,
        }
    }

    pub fn poem(&self, id: &str) -> Option<&PoemAnalysis> {
        self.poems.iter().find(|p| p.poem.id == id)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            completed_at: self.completed_at,
            poems: self
                .poems
                .iter()
                .map(|p| PoemSummary {
                    id: p.poem.id.clone(),
                    name: p.poem.name.clone(),
                    total_tokens: p.total_tokens(),
                    from_cache: p.from_cache,
                })
                .collect(),
            word_type_tags: self.word_type.tags().len(),
            pos_tag_tags: self.pos_tag.tags().len(),
        }
    }
}

/// Run the whole pipeline over `corpus`
///
/// Newly tagged poems are added to `cache` only after their tokens passed
/// aggregation, so malformed results are never cached.
pub async fn run_analysis(
    corpus: &Corpus,
    tagger: &dyn Tagger,
    cache: &mut TagCache,
) -> Result<AnalysisReport> {
    let started = Instant::now();
    tracing::info!(poems = corpus.len(), tagger = tagger.name(), "Starting analysis run");

    let mut poems = Vec::with_capacity(corpus.len());

    for poem in corpus.poems() {
        let key = CacheKey::for_text(&poem.id, &poem.text);
        cache.invalidate_if_changed(&key);

        let (tokens, from_cache) = match cache.get(&key) {
            Some(tokens) => {
                tracing::info!(poem = %poem.id, tokens = tokens.len(), "Using cached tags");
                (tokens, true)
            }
            None => {
                tracing::info!(poem = %poem.id, "Tagging poem");
                let tokens = tagger.tag(&poem.text).await.map_err(|e| {
                    tracing::error!(poem = %poem.id, error = %e, "Tagging failed, aborting run");
                    e
                })?;
                (Arc::new(tokens), false)
            }
        };

        let profiles = aggregate(&poem.id, &tokens)?;

        let tokens = if from_cache {
            tokens
        } else {
            let tokens = Arc::try_unwrap(tokens).unwrap_or_else(|shared| (*shared).clone());
            cache.insert(key, tokens)
        };

        poems.push(PoemAnalysis {
            poem: poem.info(),
            tokens,
            profiles,
            from_cache,
        });
    }

    let word_type = build_table(&poems, TagCategory::WordType)?;
    let pos_tag = build_table(&poems, TagCategory::PosTag)?;

    tracing::info!(
        poems = poems.len(),
        word_types = word_type.tags().len(),
        pos_tags = pos_tag.tags().len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Analysis run complete"
    );

    Ok(AnalysisReport {
        completed_at: Utc::now(),
        poems,
        word_type,
        pos_tag,
    })
}

fn build_table(poems: &[PoemAnalysis], category: TagCategory) -> Result<ComparisonTable> {
    let profiles: Vec<_> = poems
        .iter()
        .map(|p| p.profiles.get(category).clone())
        .collect();
    ComparisonTable::build(&profiles)
}
