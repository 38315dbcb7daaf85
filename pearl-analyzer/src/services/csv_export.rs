//! CSV exports of an analysis report
//!
//! - Token master file: one row per token, columns
//!   `Poem Name, Word Type, Word, POS_Tag`
//! - Comparison file: one row per (poem, tag), columns
//!   `Poem, Tag, Count, Percentage`

use pearl_common::ComparisonTable;
use serde::Serialize;

use crate::services::analysis::AnalysisReport;

#[derive(Debug, Serialize)]
struct TokenRecord<'a> {
    #[serde(rename = "Poem Name")]
    poem: &'a str,
    #[serde(rename = "Word Type")]
    word_type: &'a str,
    #[serde(rename = "Word")]
    word: &'a str,
    #[serde(rename = "POS_Tag")]
    pos_tag: &'a str,
}

#[derive(Debug, Serialize)]
struct ComparisonRecord<'a> {
    #[serde(rename = "Poem")]
    poem: &'a str,
    #[serde(rename = "Tag")]
    tag: &'a str,
    #[serde(rename = "Count")]
    count: usize,
    #[serde(rename = "Percentage")]
    percentage: f64,
}

fn into_string(wtr: csv::Writer<Vec<u8>>) -> Result<String, csv::Error> {
    let data = wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(data)
        .map_err(|e| csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Every token of every poem, in corpus and token order
pub fn tokens_csv(report: &AnalysisReport) -> Result<String, csv::Error> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    for poem in &report.poems {
        for token in poem.tokens.iter() {
            wtr.serialize(TokenRecord {
                poem: &poem.poem.id,
                word_type: &token.word_type,
                word: &token.word,
                pos_tag: &token.pos_tag,
            })?;
        }
    }

    // serialize() only writes headers with the first record
    if report.poems.iter().all(|p| p.tokens.is_empty()) {
        wtr.write_record(["Poem Name", "Word Type", "Word", "POS_Tag"])?;
    }

    wtr.flush()?;
    into_string(wtr)
}

/// Total comparison table, poem-major
pub fn comparison_csv(table: &ComparisonTable) -> Result<String, csv::Error> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    for entry in table.entries() {
        wtr.serialize(ComparisonRecord {
            poem: &entry.poem,
            tag: &entry.tag,
            count: entry.count,
            percentage: entry.percentage,
        })?;
    }

    if table.entries().is_empty() {
        wtr.write_record(["Poem", "Tag", "Count", "Percentage"])?;
    }

    wtr.flush()?;
    into_string(wtr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analysis::PoemAnalysis;
    use crate::types::PoemInfo;
    use chrono::Utc;
    use pearl_common::{aggregate, TagCategory, Token};
    use std::sync::Arc;

    fn report() -> AnalysisReport {
        let tokens = vec![
            Token::classified("Gawain", "ENTITY_person").unwrap(),
            Token::classified("rode", "ACTION_verb").unwrap(),
            Token::classified("green, bright", "COLOR").unwrap(),
        ];
        let profiles = aggregate("sggk", &tokens).unwrap();
        let poems = vec![PoemAnalysis {
            poem: PoemInfo {
                id: "sggk".to_string(),
                name: "Sir Gawain".to_string(),
            },
            tokens: Arc::new(tokens),
            profiles,
            from_cache: false,
        }];
        let word_type =
            ComparisonTable::build(&[poems[0].profiles.get(TagCategory::WordType).clone()]).unwrap();
        let pos_tag =
            ComparisonTable::build(&[poems[0].profiles.get(TagCategory::PosTag).clone()]).unwrap();

        AnalysisReport {
            completed_at: Utc::now(),
            poems,
            word_type,
            pos_tag,
        }
    }

    #[test]
    fn test_tokens_csv_has_master_headers() {
        let csv = tokens_csv(&report()).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines[0], "Poem Name,Word Type,Word,POS_Tag");
        assert_eq!(lines[1], "sggk,Person,Gawain,ENTITY_person");
        assert_eq!(lines[3], "sggk,Color,\"green, bright\",COLOR");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_comparison_csv_rows() {
        let report = report();
        let csv = comparison_csv(&report.word_type).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines[0], "Poem,Tag,Count,Percentage");
        assert_eq!(lines.len(), 1 + 3);
        assert!(lines.contains(&"sggk,Verb,1,33.33"));
    }
}
