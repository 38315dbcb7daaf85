//! # Pearl Common Library
//!
//! Shared code for the Pearl manuscript tag comparison:
//! - Token model and word-type classification
//! - Tag aggregation into per-poem profiles
//! - Cross-poem comparison tables
//! - Configuration loading
//! - Error types

pub mod comparison;
pub mod config;
pub mod error;
pub mod profile;
pub mod tags;

pub use comparison::{ComparisonEntry, ComparisonTable};
pub use error::{Error, Result};
pub use profile::{aggregate, PoemTagProfile, TagProfiles};
pub use tags::{TagCategory, Token};
