//! Per-poem tag frequency profiles
//!
//! The aggregator walks a poem's token sequence once and produces one
//! [`PoemTagProfile`] per [`TagCategory`]. Counts are kept in a `BTreeMap`
//! so iteration order is deterministic; [`PoemTagProfile::ranked`] gives the
//! display order (descending count, then tag).

use serde::Serialize;
use std::collections::BTreeMap;

use crate::comparison::percentage;
use crate::tags::{TagCategory, Token};
use crate::{Error, Result};

/// Frequency distribution of one tag category for one poem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoemTagProfile {
    poem: String,
    category: TagCategory,
    counts: BTreeMap<String, usize>,
    total: usize,
}

/// One (tag, count) entry of a ranked profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
    pub percentage: f64,
}

impl PoemTagProfile {
    /// Empty profile (zero counts, zero total)
    pub fn empty(poem: impl Into<String>, category: TagCategory) -> Self {
        Self {
            poem: poem.into(),
            category,
            counts: BTreeMap::new(),
            total: 0,
        }
    }

    /// Build a profile from precomputed counts; total is the sum of counts
    pub fn from_counts<I, S>(poem: impl Into<String>, category: TagCategory, counts: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let mut profile = Self::empty(poem, category);
        for (tag, count) in counts {
            let tag = tag.into();
            if tag.trim().is_empty() {
                return Err(Error::InvalidInput(format!(
                    "profile for {} has an empty {} label",
                    profile.poem, category
                )));
            }
            *profile.counts.entry(tag).or_insert(0) += count;
            profile.total += count;
        }
        Ok(profile)
    }

    fn record(&mut self, tag: &str) {
        *self.counts.entry(tag.to_string()).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn poem(&self) -> &str {
        &self.poem
    }

    pub fn category(&self) -> TagCategory {
        self.category
    }

    /// Number of tokens the profile was built from
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Occurrences of `tag` (0 when the poem never uses it)
    pub fn count(&self, tag: &str) -> usize {
        self.counts.get(tag).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Share of `tag` in percent, rounded to 2 decimals; 0 for an empty profile
    pub fn percentage(&self, tag: &str) -> f64 {
        percentage(self.count(tag), self.total)
    }

    /// Entries sorted by descending count, ties broken alphabetically
    pub fn ranked(&self) -> Vec<TagCount> {
        let mut entries: Vec<TagCount> = self
            .counts
            .iter()
            .map(|(tag, &count)| TagCount {
                tag: tag.clone(),
                count,
                percentage: percentage(count, self.total),
            })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        entries
    }
}

/// Word-type and POS-tag profiles of one poem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagProfiles {
    pub word_type: PoemTagProfile,
    pub pos_tag: PoemTagProfile,
}

impl TagProfiles {
    pub fn get(&self, category: TagCategory) -> &PoemTagProfile {
        match category {
            TagCategory::WordType => &self.word_type,
            TagCategory::PosTag => &self.pos_tag,
        }
    }

    pub fn poem(&self) -> &str {
        self.word_type.poem()
    }

    pub fn total(&self) -> usize {
        self.word_type.total()
    }
}

/// Count word-types and POS tags of one poem in a single pass
///
/// Fails with [`Error::InvalidInput`] on the first token with a missing label;
/// nothing is recovered or skipped.
pub fn aggregate(poem: &str, tokens: &[Token]) -> Result<TagProfiles> {
    let mut word_type = PoemTagProfile::empty(poem, TagCategory::WordType);
    let mut pos_tag = PoemTagProfile::empty(poem, TagCategory::PosTag);

    for (index, token) in tokens.iter().enumerate() {
        token.validate().map_err(|e| match e {
            Error::InvalidInput(reason) => {
                Error::InvalidInput(format!("{} token #{}: {}", poem, index, reason))
            }
            other => other,
        })?;
        word_type.record(&token.word_type);
        pos_tag.record(&token.pos_tag);
    }

    tracing::debug!(
        poem = %poem,
        tokens = tokens.len(),
        word_types = word_type.counts.len(),
        pos_tags = pos_tag.counts.len(),
        "Aggregated tag profile"
    );

    Ok(TagProfiles { word_type, pos_tag })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(word: &str, word_type: &str, pos: &str) -> Token {
        Token {
            word: word.to_string(),
            word_type: word_type.to_string(),
            pos_tag: pos.to_string(),
        }
    }

    #[test]
    fn test_aggregate_counts_both_categories() {
        let tokens = vec![
            token("雲", "noun", "N"),
            token("雲", "noun", "N"),
            token("飛", "verb", "V"),
        ];

        let profiles = aggregate("A", &tokens).unwrap();

        assert_eq!(profiles.word_type.count("noun"), 2);
        assert_eq!(profiles.word_type.count("verb"), 1);
        assert_eq!(profiles.word_type.total(), 3);
        assert_eq!(profiles.pos_tag.count("N"), 2);
        assert_eq!(profiles.word_type.percentage("noun"), 66.67);
        assert_eq!(profiles.word_type.percentage("verb"), 33.33);
    }

    #[test]
    fn test_counts_sum_to_token_length() {
        let tokens: Vec<Token> = ["a", "b", "c", "a", "d", "a", "b"]
            .iter()
            .map(|pos| token("w", "General Word", pos))
            .collect();

        let profiles = aggregate("poem", &tokens).unwrap();

        for category in TagCategory::ALL {
            let profile = profiles.get(category);
            assert_eq!(profile.counts().values().sum::<usize>(), tokens.len());
            assert_eq!(profile.total(), tokens.len());
        }
    }

    #[test]
    fn test_empty_tokens_give_zero_profile() {
        let profiles = aggregate("empty", &[]).unwrap();
        assert!(profiles.word_type.is_empty());
        assert_eq!(profiles.pos_tag.total(), 0);
        assert_eq!(profiles.word_type.percentage("noun"), 0.0);
        assert!(profiles.word_type.ranked().is_empty());
    }

    #[test]
    fn test_missing_label_is_invalid_input() {
        let tokens = vec![token("雲", "noun", "N"), token("飛", "", "V")];
        let err = aggregate("A", &tokens).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(
            err.to_string(),
            "Invalid input: A token #1: token \"飛\" is missing its word-type"
        );
    }

    #[test]
    fn test_ranked_orders_by_count_then_tag() {
        let tokens = vec![
            token("a", "Verb", "V"),
            token("b", "Noun", "N"),
            token("c", "Adj", "A"),
            token("d", "Noun", "N"),
            token("e", "Verb", "V"),
        ];
        let profiles = aggregate("p", &tokens).unwrap();

        let order: Vec<_> = profiles
            .word_type
            .ranked()
            .into_iter()
            .map(|e| e.tag)
            .collect();
        assert_eq!(order, vec!["Noun", "Verb", "Adj"]);
    }

    #[test]
    fn test_from_counts_rejects_empty_tag() {
        let result = PoemTagProfile::from_counts("p", TagCategory::PosTag, vec![("", 2usize)]);
        assert!(result.is_err());

        let profile =
            PoemTagProfile::from_counts("p", TagCategory::PosTag, vec![("N", 2usize), ("V", 1)])
                .unwrap();
        assert_eq!(profile.total(), 3);
    }
}
