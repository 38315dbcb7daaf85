//! Core types and the tagging seam
//!
//! [`Tagger`] is the boundary to the external tagging service. The pipeline
//! only sees validated [`Token`]s; anything the service gets wrong surfaces as
//! an [`Error`] before aggregation starts.

use async_trait::async_trait;
use pearl_common::{Error, Result, Token};
use serde::Serialize;

/// Tagging client boundary
///
/// Returns the ordered tokens of `text`. An empty `Vec` means the service
/// found no tokens; service failures are [`Error::ExternalService`], malformed
/// records are [`Error::InvalidInput`].
#[async_trait]
pub trait Tagger: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    async fn tag(&self, text: &str) -> Result<Vec<Token>>;
}

/// Stand-in tagger used when the service cannot be configured
///
/// Cached results keep working; any poem that needs tagging fails with the
/// stored configuration error.
pub struct UnavailableTagger {
    reason: String,
}

impl UnavailableTagger {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Tagger for UnavailableTagger {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    async fn tag(&self, _text: &str) -> Result<Vec<Token>> {
        Err(Error::Config(self.reason.clone()))
    }
}

/// Identity of a poem in API responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoemInfo {
    pub id: String,
    pub name: String,
}

/// A cleaned poem ready for tagging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoemText {
    pub id: String,
    pub name: String,
    pub text: String,
}

impl PoemText {
    pub fn info(&self) -> PoemInfo {
        PoemInfo {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unavailable_tagger_reports_config_error() {
        let tagger = UnavailableTagger::new("no credentials");
        let err = tagger.tag("Lovely pearl").await.unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg == "no credentials"));
    }
}
