//! Poem corpus loading and text cleaning
//!
//! Poems come either from one file per poem under `corpus.dir`, or are split
//! out of a single manuscript text by their opening lines. Either way each
//! poem's text is run through [`clean_poem_text`] before tagging.

use pearl_common::config::{CorpusConfig, PoemSource};
use pearl_common::{Error, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use crate::types::PoemText;

/// Opening marker and title line of a known manuscript poem
struct ManuscriptMarker {
    name: &'static str,
    opening: &'static str,
    title: &'static str,
}

const MANUSCRIPT_MARKERS: &[ManuscriptMarker] = &[
    ManuscriptMarker {
        name: "Pearl",
        opening: r"Pearl\s*I\sLovely pearl",
        title: r"^Pearl\s*I?\s*",
    },
    ManuscriptMarker {
        name: "Cleanness",
        opening: r"Cleanness\s*Whoever were to commend cleanness",
        title: r"^Cleanness\s*",
    },
    ManuscriptMarker {
        name: "Patience",
        opening: r"Patience\s*Patience is a virtue",
        title: r"^Patience\s*",
    },
    ManuscriptMarker {
        name: "Sir Gawain and the Green Knight",
        opening: r"Sir Gawain and the\s*Green Knight\s*I\s*After the siege",
        title: r"^Sir Gawain and the\s*Green Knight\s*I?\s*",
    },
];

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static pattern compiles"))
}

/// Strip line numbers, running footers and excess whitespace from poem text
pub fn clean_poem_text(raw: &str) -> String {
    static LINE_NUMBER: OnceLock<Regex> = OnceLock::new();
    static FOOTER: OnceLock<Regex> = OnceLock::new();
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();

    let text = regex(&LINE_NUMBER, r"\[\d+\]").replace_all(raw, "");
    let text = regex(&FOOTER, r"(?i).*? lines \[\d+–\d+\] {2}").replace_all(&text, "");
    let text: String = text
        .chars()
        .filter(|c| !('\u{E000}'..='\u{F8FF}').contains(c))
        .map(|c| if c == '\u{a0}' { ' ' } else { c })
        .collect();
    let text = regex(&WHITESPACE, r"\s{2,}").replace_all(&text, " ");

    text.trim().to_string()
}

/// Opening-line pattern for a poem title; unknown titles match the title itself
fn opening_pattern(name: &str) -> (String, String) {
    match MANUSCRIPT_MARKERS.iter().find(|m| m.name.eq_ignore_ascii_case(name)) {
        Some(marker) => (marker.opening.to_string(), marker.title.to_string()),
        None => {
            let words: Vec<String> = name.split_whitespace().map(regex::escape).collect();
            let flexible = words.join(r"\s*");
            (flexible.clone(), format!("^{}\\s*", flexible))
        }
    }
}

/// Remove page numbers, page headers and the title line from a manuscript section
fn clean_manuscript_section(section: &str, title_pattern: &str) -> Result<String> {
    static PAGE_NUMBER: OnceLock<Regex> = OnceLock::new();
    static PAGE_HEADER: OnceLock<Regex> = OnceLock::new();
    static BLANK_RUN: OnceLock<Regex> = OnceLock::new();
    static SPACE_RUN: OnceLock<Regex> = OnceLock::new();

    let text = regex(&PAGE_NUMBER, r"(?m)^\d+\s*$").replace_all(section, "");
    let text = regex(&PAGE_HEADER, r"(?m)^\d+\s+[A-Za-z\s]+lines\s*\[\d+.*?\]\s*$")
        .replace_all(&text, "");
    let text = regex(&BLANK_RUN, r"\n{3,}").replace_all(&text, "\n\n");
    let text = regex(&SPACE_RUN, r"[ \t]+").replace_all(&text, " ");

    let title = Regex::new(&format!("(?i){}", title_pattern))
        .map_err(|e| Error::Config(format!("Invalid title pattern: {}", e)))?;
    let text = title.replace(&text, "");

    Ok(text.trim().to_string())
}

/// Split a combined manuscript into the listed poems
///
/// Each poem runs from its opening marker to the next marker in text order.
/// Returns `(poem id, section text)` pairs in manuscript order; a poem whose
/// marker is not found is absent from the result.
pub fn split_manuscript(text: &str, poems: &[PoemSource]) -> Result<Vec<(String, String)>> {
    let mut starts = Vec::new();
    for poem in poems {
        let (opening, title) = opening_pattern(&poem.name);
        let marker = Regex::new(&format!("(?is){}", opening))
            .map_err(|e| Error::Config(format!("Invalid opening pattern for {}: {}", poem.id, e)))?;
        match marker.find(text) {
            Some(m) => starts.push((m.start(), poem.id.clone(), title)),
            None => tracing::warn!(poem = %poem.id, "Opening marker not found in manuscript"),
        }
    }
    starts.sort_by_key(|(start, _, _)| *start);

    let mut sections = Vec::with_capacity(starts.len());
    for (i, (start, id, title)) in starts.iter().enumerate() {
        let end = starts.get(i + 1).map_or(text.len(), |(next, _, _)| *next);
        let section = clean_manuscript_section(text[*start..end].trim(), title)?;
        tracing::debug!(poem = %id, words = section.split_whitespace().count(), "Separated poem");
        sections.push((id.clone(), section));
    }

    Ok(sections)
}

/// The poems of one analysis run, in configured order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    poems: Vec<PoemText>,
}

impl Corpus {
    pub fn new(poems: Vec<PoemText>) -> Self {
        Self { poems }
    }

    /// Load and clean every configured poem
    ///
    /// Fails if any poem cannot be read or is missing from the manuscript;
    /// a partial corpus would skew the comparison.
    pub fn load(config: &CorpusConfig) -> Result<Self> {
        let raw = match &config.manuscript {
            Some(manuscript) => Self::read_manuscript(&config.dir, manuscript, &config.poems)?,
            None => Self::read_poem_files(&config.dir, &config.poems)?,
        };

        let poems = raw
            .into_iter()
            .map(|(source, text)| {
                let text = clean_poem_text(&text);
                tracing::info!(poem = %source.id, chars = text.chars().count(), "Cleaned poem text");
                PoemText {
                    id: source.id.clone(),
                    name: source.name.clone(),
                    text,
                }
            })
            .collect();

        Ok(Self { poems })
    }

    fn read_poem_files<'a>(
        dir: &Path,
        poems: &'a [PoemSource],
    ) -> Result<Vec<(&'a PoemSource, String)>> {
        poems
            .iter()
            .map(|source| {
                let path = dir.join(&source.file);
                tracing::info!(poem = %source.id, path = %path.display(), "Reading poem");
                let text = std::fs::read_to_string(&path).map_err(|e| {
                    Error::Io(std::io::Error::new(
                        e.kind(),
                        format!("Failed to read {} from {}: {}", source.id, path.display(), e),
                    ))
                })?;
                Ok((source, text))
            })
            .collect()
    }

    fn read_manuscript<'a>(
        dir: &Path,
        manuscript: &Path,
        poems: &'a [PoemSource],
    ) -> Result<Vec<(&'a PoemSource, String)>> {
        let path = if manuscript.is_absolute() {
            manuscript.to_path_buf()
        } else {
            dir.join(manuscript)
        };
        tracing::info!(path = %path.display(), "Reading manuscript");
        let text = std::fs::read_to_string(&path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read manuscript {}: {}", path.display(), e),
            ))
        })?;

        let mut sections = split_manuscript(&text, poems)?;
        poems
            .iter()
            .map(|source| {
                let index = sections
                    .iter()
                    .position(|(id, _)| id == &source.id)
                    .ok_or_else(|| {
                        Error::InvalidInput(format!("{} not found in manuscript", source.name))
                    })?;
                let (_, section) = sections.swap_remove(index);
                Ok((source, section))
            })
            .collect()
    }

    pub fn poems(&self) -> &[PoemText] {
        &self.poems
    }

    pub fn get(&self, id: &str) -> Option<&PoemText> {
        self.poems.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.poems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poems.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANUSCRIPT: &str = "\
Pearl I Lovely pearl, that pleases a prince
well to set in gold so clear.
12
3 Pearl lines [1–40]
Cleanness Whoever were to commend cleanness
and rehearse it rightly.



Patience Patience is a virtue
that pleases often.
Sir Gawain and the
Green Knight I After the siege and the assault
was ceased at Troy.
";

    #[test]
    fn test_clean_removes_line_numbers_and_footers() {
        let raw = "Lovely pearl [11] that pleases\u{a0}a prince Pearl lines [1–40]  well to set   in gold\n\n";
        assert_eq!(clean_poem_text(raw), "well to set in gold");

        let raw = "Lovely [20]  pearl,\u{f0b7} that\n\n\npleases";
        assert_eq!(clean_poem_text(raw), "Lovely pearl, that pleases");
    }

    #[test]
    fn test_clean_empty_text() {
        assert_eq!(clean_poem_text("  [1]  "), "");
    }

    #[test]
    fn test_split_manuscript_finds_all_poems_in_order() {
        let poems = pearl_common::config::CorpusConfig::default().poems;
        let sections = split_manuscript(MANUSCRIPT, &poems).unwrap();

        let ids: Vec<_> = sections.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["pearl", "cleanness", "patience", "sggk"]);

        let pearl = &sections[0].1;
        assert!(pearl.starts_with("Lovely pearl"));
        assert!(!pearl.contains("12"));
        assert!(!pearl.contains("lines ["));

        assert!(sections[1].1.starts_with("Whoever were to commend"));
        assert!(!sections[1].1.contains("\n\n\n"));
        assert!(sections[2].1.starts_with("Patience is a virtue"));
        assert!(sections[3].1.starts_with("After the siege"));
    }

    #[test]
    fn test_split_manuscript_skips_missing_marker() {
        let poems = vec![
            PoemSource::new("pearl", "Pearl", "pearl.txt"),
            PoemSource::new("beowulf", "Beowulf", "beowulf.txt"),
        ];
        let sections = split_manuscript(MANUSCRIPT, &poems).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].0, "pearl");
    }

    #[test]
    fn test_load_from_poem_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "First [1] poem.").unwrap();
        std::fs::write(dir.path().join("b.txt"), "Second   poem.").unwrap();

        let config = CorpusConfig {
            dir: dir.path().to_path_buf(),
            manuscript: None,
            poems: vec![PoemSource::new("a", "A", "a.txt"), PoemSource::new("b", "B", "b.txt")],
        };

        let corpus = Corpus::load(&config).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get("a").unwrap().text, "First poem.");
        assert_eq!(corpus.get("b").unwrap().text, "Second poem.");
    }

    #[test]
    fn test_load_missing_file_aborts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "First poem.").unwrap();

        let config = CorpusConfig {
            dir: dir.path().to_path_buf(),
            manuscript: None,
            poems: vec![PoemSource::new("a", "A", "a.txt"), PoemSource::new("b", "B", "b.txt")],
        };

        assert!(matches!(Corpus::load(&config), Err(Error::Io(_))));
    }

    #[test]
    fn test_load_from_manuscript_keeps_config_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ms.txt"), MANUSCRIPT).unwrap();

        let config = CorpusConfig {
            dir: dir.path().to_path_buf(),
            manuscript: Some("ms.txt".into()),
            ..Default::default()
        };

        let corpus = Corpus::load(&config).unwrap();
        let ids: Vec<_> = corpus.poems().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["sggk", "pearl", "patience", "cleanness"]);
        assert_eq!(
            corpus.get("cleanness").unwrap().text,
            "Whoever were to commend cleanness\nand rehearse it rightly."
        );
    }

    #[test]
    fn test_load_manuscript_missing_poem_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ms.txt"), "Pearl I Lovely pearl only").unwrap();

        let config = CorpusConfig {
            dir: dir.path().to_path_buf(),
            manuscript: Some("ms.txt".into()),
            ..Default::default()
        };

        assert!(matches!(Corpus::load(&config), Err(Error::InvalidInput(_))));
    }
}
