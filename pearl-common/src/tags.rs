//! Token model and word-type classification
//!
//! A [`Token`] is one segmented unit returned by the tagging service,
//! carrying a coarse word-type and a fine-grained POS tag. Tokens are plain
//! value data; validation happens at construction ([`Token::new`]) and again
//! in the aggregator for tokens built field by field.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Word-type assigned when no POS prefix rule matches
pub const GENERAL_WORD: &str = "General Word";

/// One segmented word with its labels
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// Surface form of the segment
    pub word: String,
    /// Coarse lexical category (e.g. "Noun", "Verb")
    pub word_type: String,
    /// Fine-grained POS label (e.g. "ENTITY_noun")
    pub pos_tag: String,
}

impl Token {
    /// Build a token, rejecting missing labels
    pub fn new(
        word: impl Into<String>,
        word_type: impl Into<String>,
        pos_tag: impl Into<String>,
    ) -> Result<Self> {
        let token = Self {
            word: word.into(),
            word_type: word_type.into(),
            pos_tag: pos_tag.into(),
        };
        token.validate()?;
        Ok(token)
    }

    /// Build a token whose word-type is derived from the POS tag
    pub fn classified(word: impl Into<String>, pos_tag: impl Into<String>) -> Result<Self> {
        let pos_tag = pos_tag.into();
        let word_type = classify_word_type(&pos_tag);
        Self::new(word, word_type, pos_tag)
    }

    /// Check that both labels are present
    pub fn validate(&self) -> Result<()> {
        if self.word_type.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "token {:?} is missing its word-type",
                self.word
            )));
        }
        if self.pos_tag.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "token {:?} is missing its POS tag",
                self.word
            )));
        }
        Ok(())
    }

    /// Label of this token for the given category
    pub fn label(&self, category: TagCategory) -> &str {
        match category {
            TagCategory::WordType => &self.word_type,
            TagCategory::PosTag => &self.pos_tag,
        }
    }
}

/// Which label a profile or comparison is built over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
    /// Coarse word-type ("Word Type" in the UI)
    WordType,
    /// Fine-grained POS tag ("POS Tag" in the UI)
    PosTag,
}

impl TagCategory {
    pub const ALL: [TagCategory; 2] = [TagCategory::WordType, TagCategory::PosTag];

    /// Human-readable name used in charts and exports
    pub fn display_name(self) -> &'static str {
        match self {
            TagCategory::WordType => "Word Type",
            TagCategory::PosTag => "POS Tag",
        }
    }

    /// Query-string form
    pub fn as_str(self) -> &'static str {
        match self {
            TagCategory::WordType => "word_type",
            TagCategory::PosTag => "pos_tag",
        }
    }
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for TagCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "word_type" | "word type" | "word-type" => Ok(TagCategory::WordType),
            "pos_tag" | "pos tag" | "pos-tag" | "pos" => Ok(TagCategory::PosTag),
            other => Err(Error::InvalidInput(format!("unknown tag category: {}", other))),
        }
    }
}

/// POS prefix → word-type rules, checked in order
const WORD_TYPE_RULES: &[(&[&str], &str)] = &[
    (&["ACTION_verb", "VerbP", "MODAL"], "Verb"),
    (&["ENTITY_noun", "NOUN_common", "NOUN_prop"], "Noun"),
    (&["ENTITY_location"], "Location"),
    (&["ENTITY_person"], "Person"),
    (&["ENTITY_time"], "Time"),
    (&["QUANTITY_duration"], "Duration"),
    (&["QUANTITY_ordinal"], "Ordinal"),
    (&["ENTITY_food"], "Food"),
    (&["ENTITY_pronoun"], "Pronoun"),
];

/// Derive the coarse word-type from an Articut POS tag
pub fn classify_word_type(pos_tag: &str) -> &'static str {
    for (prefixes, word_type) in WORD_TYPE_RULES {
        if prefixes.iter().any(|p| pos_tag.starts_with(p)) {
            return word_type;
        }
    }

    if pos_tag.eq_ignore_ascii_case("COLOR") {
        return "Color";
    }

    GENERAL_WORD
}
