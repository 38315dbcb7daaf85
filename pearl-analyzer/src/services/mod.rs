//! Service modules for the tag comparison pipeline
//!
//! - `corpus`: poem loading, manuscript splitting, text cleaning
//! - `sentence_batcher`: sentence splitting and request batching
//! - `articut_client`: tagging service client
//! - `tag_cache`: tagging results keyed by content hash
//! - `analysis`: the run that ties them together
//! - `csv_export`: token and comparison CSV files

pub mod analysis;
pub mod articut_client;
pub mod corpus;
pub mod csv_export;
pub mod sentence_batcher;
pub mod tag_cache;

pub use analysis::{run_analysis, AnalysisReport, PoemAnalysis, RunSummary};
pub use articut_client::ArticutClient;
pub use corpus::{clean_poem_text, split_manuscript, Corpus};
pub use tag_cache::{content_hash, CacheKey, TagCache};
