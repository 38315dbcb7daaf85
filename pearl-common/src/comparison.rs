//! Cross-poem comparison table
//!
//! Merges the per-poem profiles of one [`TagCategory`] into a total table:
//! every (poem, tag) pair of the tag universe has an entry, zero counts
//! included, so the charts never see a missing key.
//!
//! **Rounding:** percentages are rounded half away from zero to 2 decimals
//! ([`round_percentage`]). **Tag order:** descending share summed over all
//! poems, ties alphabetical.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::profile::PoemTagProfile;
use crate::tags::TagCategory;
use crate::{Error, Result};

/// Decimal places kept in displayed percentages
pub const PERCENT_DECIMALS: i32 = 2;

/// Round a percentage to [`PERCENT_DECIMALS`] places, half away from zero
pub fn round_percentage(value: f64) -> f64 {
    let scale = 10f64.powi(PERCENT_DECIMALS);
    (value * scale).round() / scale
}

/// `count / total × 100`, rounded; 0 when `total` is 0
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_percentage(count as f64 / total as f64 * 100.0)
}

/// One (poem, tag) cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonEntry {
    pub poem: String,
    pub tag: String,
    pub count: usize,
    pub percentage: f64,
}

/// Token total of one poem in the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoemTotal {
    pub poem: String,
    pub total: usize,
}

/// Merged, percentage-normalised view of several poem profiles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonTable {
    category: TagCategory,
    poems: Vec<PoemTotal>,
    tags: Vec<String>,
    entries: Vec<ComparisonEntry>,
}

impl ComparisonTable {
    /// Build the table from one profile per poem
    ///
    /// Poems keep their input order. Fails with [`Error::EmptyCorpus`] when no
    /// profile has any tokens, and with [`Error::InvalidInput`] when poems
    /// repeat or categories are mixed.
    pub fn build(profiles: &[PoemTagProfile]) -> Result<Self> {
        let first = profiles.first().ok_or(Error::EmptyCorpus)?;
        let category = first.category();

        let mut seen = HashSet::new();
        for profile in profiles {
            if profile.category() != category {
                return Err(Error::InvalidInput(format!(
                    "cannot compare {} profile of {} with {} profiles",
                    profile.category(),
                    profile.poem(),
                    category
                )));
            }
            if !seen.insert(profile.poem()) {
                return Err(Error::InvalidInput(format!(
                    "poem {} appears more than once",
                    profile.poem()
                )));
            }
        }

        if profiles.iter().all(PoemTagProfile::is_empty) {
            return Err(Error::EmptyCorpus);
        }

        let universe: BTreeSet<&str> = profiles.iter().flat_map(|p| p.tags()).collect();
        let tags = order_by_share(profiles, universe);

        let mut entries = Vec::with_capacity(profiles.len() * tags.len());
        for profile in profiles {
            for tag in &tags {
                entries.push(ComparisonEntry {
                    poem: profile.poem().to_string(),
                    tag: tag.clone(),
                    count: profile.count(tag),
                    percentage: profile.percentage(tag),
                });
            }
        }

        let poems = profiles
            .iter()
            .map(|p| PoemTotal {
                poem: p.poem().to_string(),
                total: p.total(),
            })
            .collect();

        tracing::debug!(
            category = %category,
            poems = profiles.len(),
            tags = tags.len(),
            "Built comparison table"
        );

        Ok(Self {
            category,
            poems,
            tags,
            entries,
        })
    }

    pub fn category(&self) -> TagCategory {
        self.category
    }

    pub fn poems(&self) -> &[PoemTotal] {
        &self.poems
    }

    /// Tag universe in display order
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn entries(&self) -> &[ComparisonEntry] {
        &self.entries
    }

    pub fn contains_poem(&self, poem: &str) -> bool {
        self.poems.iter().any(|p| p.poem == poem)
    }

    /// Cell for (poem, tag), if both are in the table
    pub fn get(&self, poem: &str, tag: &str) -> Option<&ComparisonEntry> {
        self.entries.iter().find(|e| e.poem == poem && e.tag == tag)
    }

    /// Row of one poem across the tag universe
    pub fn row<'a>(&'a self, poem: &'a str) -> impl Iterator<Item = &'a ComparisonEntry> + 'a {
        self.entries.iter().filter(move |e| e.poem == poem)
    }

    /// Sum of a poem's percentages (100 ± rounding for non-empty poems)
    pub fn percentage_sum(&self, poem: &str) -> f64 {
        self.row(poem).map(|e| e.percentage).sum()
    }

    /// Restrict the table to `selected` poems, in the given order
    ///
    /// Tags that are zero for every selected poem are dropped; the remaining
    /// tags keep the full table's order.
    pub fn select(&self, selected: &[&str]) -> Result<Self> {
        if selected.is_empty() {
            return Err(Error::InvalidInput("select at least one poem".to_string()));
        }

        let mut poems = Vec::with_capacity(selected.len());
        for &name in selected {
            let total = self
                .poems
                .iter()
                .find(|p| p.poem == name)
                .ok_or_else(|| Error::InvalidInput(format!("unknown poem: {}", name)))?;
            if poems.iter().any(|p: &PoemTotal| p.poem == name) {
                continue;
            }
            poems.push(total.clone());
        }

        let tags: Vec<String> = self
            .tags
            .iter()
            .filter(|tag| {
                poems
                    .iter()
                    .any(|p| self.get(&p.poem, tag).map_or(0, |e| e.count) > 0)
            })
            .cloned()
            .collect();

        let mut entries = Vec::with_capacity(poems.len() * tags.len());
        for poem in &poems {
            for tag in &tags {
                if let Some(entry) = self.get(&poem.poem, tag) {
                    entries.push(entry.clone());
                }
            }
        }

        Ok(Self {
            category: self.category,
            poems,
            tags,
            entries,
        })
    }
}

/// Order tags by descending summed share across poems, then alphabetically
///
/// Shares are summed as rounded percentages in integer hundredths, so equal
/// sums compare equal and ties fall through to the tag name.
fn order_by_share(profiles: &[PoemTagProfile], universe: BTreeSet<&str>) -> Vec<String> {
    let mut share: BTreeMap<&str, u64> = universe.into_iter().map(|t| (t, 0)).collect();
    for profile in profiles.iter().filter(|p| !p.is_empty()) {
        for tag in profile.tags() {
            if let Some(sum) = share.get_mut(tag) {
                *sum += hundredths(profile.percentage(tag));
            }
        }
    }

    let mut ordered: Vec<(&str, u64)> = share.into_iter().collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ordered.into_iter().map(|(tag, _)| tag.to_string()).collect()
}

/// A rounded percentage as whole hundredths
fn hundredths(percentage: f64) -> u64 {
    (percentage * 10f64.powi(PERCENT_DECIMALS)).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(poem: &str, counts: &[(&str, usize)]) -> PoemTagProfile {
        PoemTagProfile::from_counts(poem, TagCategory::WordType, counts.iter().copied()).unwrap()
    }

    fn four_profiles() -> Vec<PoemTagProfile> {
        vec![
            profile("sggk", &[("Noun", 2), ("Verb", 1)]),
            profile("pearl", &[("Noun", 1), ("Color", 3)]),
            profile("patience", &[("Verb", 5)]),
            profile("cleanness", &[]),
        ]
    }

    #[test]
    fn test_round_percentage_half_away_from_zero() {
        assert_eq!(round_percentage(66.666), 66.67);
        assert_eq!(round_percentage(33.333), 33.33);
        assert_eq!(round_percentage(12.5), 12.5);
        assert_eq!(round_percentage(0.125), 0.13);
    }

    #[test]
    fn test_percentage_guards_zero_total() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
    }

    #[test]
    fn test_table_is_total_over_union() {
        let table = ComparisonTable::build(&four_profiles()).unwrap();

        let mut universe: Vec<_> = table.tags().to_vec();
        universe.sort();
        assert_eq!(universe, vec!["Color", "Noun", "Verb"]);
        assert_eq!(table.entries().len(), 4 * 3);

        let missing = table.get("patience", "Color").unwrap();
        assert_eq!(missing.count, 0);
        assert_eq!(missing.percentage, 0.0);
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let table = ComparisonTable::build(&four_profiles()).unwrap();
        for poem in ["sggk", "pearl", "patience"] {
            let sum = table.percentage_sum(poem);
            assert!((sum - 100.0).abs() <= 0.01 * table.tags().len() as f64, "{} sums to {}", poem, sum);
        }
        assert_eq!(table.percentage_sum("cleanness"), 0.0);
    }

    #[test]
    fn test_example_percentages() {
        let table = ComparisonTable::build(&four_profiles()).unwrap();
        assert_eq!(table.get("sggk", "Noun").unwrap().percentage, 66.67);
        assert_eq!(table.get("sggk", "Verb").unwrap().percentage, 33.33);
    }

    #[test]
    fn test_build_is_idempotent() {
        let profiles = four_profiles();
        let first = ComparisonTable::build(&profiles).unwrap();
        let second = ComparisonTable::build(&profiles).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_all_empty_is_empty_corpus() {
        let profiles = vec![profile("a", &[]), profile("b", &[]), profile("c", &[]), profile("d", &[])];
        assert!(matches!(ComparisonTable::build(&profiles), Err(Error::EmptyCorpus)));
        assert!(matches!(ComparisonTable::build(&[]), Err(Error::EmptyCorpus)));
    }

    #[test]
    fn test_duplicate_poem_rejected() {
        let profiles = vec![profile("a", &[("Noun", 1)]), profile("a", &[("Verb", 1)])];
        assert!(matches!(ComparisonTable::build(&profiles), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_equal_shares_tie_alphabetically() {
        // 10% + 20% and 30% are the same share; float sums would differ
        let profiles = vec![
            profile("a", &[("Verb", 1), ("X", 9)]),
            profile("b", &[("Verb", 2), ("Y", 8)]),
            profile("c", &[("Noun", 3), ("Z", 7)]),
        ];

        let table = ComparisonTable::build(&profiles).unwrap();

        assert_eq!(table.tags(), ["X", "Y", "Z", "Noun", "Verb"]);
    }

    #[test]
    fn test_mixed_categories_rejected() {
        let pos = PoemTagProfile::from_counts("b", TagCategory::PosTag, vec![("N", 1usize)]).unwrap();
        let profiles = vec![profile("a", &[("Noun", 1)]), pos];
        assert!(matches!(ComparisonTable::build(&profiles), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_tags_ordered_by_summed_share() {
        let table = ComparisonTable::build(&four_profiles()).unwrap();
        // Verb: 1/3 + 1 = 1.33, Noun: 2/3 + 1/4 = 0.92, Color: 3/4
        assert_eq!(table.tags(), &["Verb", "Noun", "Color"]);
    }

    #[test]
    fn test_select_drops_all_zero_tags() {
        let table = ComparisonTable::build(&four_profiles()).unwrap();
        let view = table.select(&["patience", "cleanness"]).unwrap();

        assert_eq!(view.tags(), &["Verb"]);
        assert_eq!(view.poems().len(), 2);
        assert_eq!(view.entries().len(), 2);
        assert_eq!(view.get("patience", "Verb").unwrap().percentage, 100.0);
    }

    #[test]
    fn test_select_rejects_unknown_or_empty() {
        let table = ComparisonTable::build(&four_profiles()).unwrap();
        assert!(table.select(&[]).is_err());
        assert!(table.select(&["beowulf"]).is_err());
    }
}
