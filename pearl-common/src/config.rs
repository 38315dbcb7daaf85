//! Configuration loading and credential resolution
//!
//! Config file priority order:
//! 1. `PEARL_CONFIG` environment variable
//! 2. `<user config dir>/pearl/config.toml`
//! 3. `./pearl.toml`
//! 4. Compiled defaults
//!
//! A missing file is not an error: a warning is logged and the compiled
//! defaults are used. A file that exists but does not parse is an error.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{Error, Result};

pub const CONFIG_ENV_VAR: &str = "PEARL_CONFIG";
pub const USERNAME_ENV_VAR: &str = "PEARL_ARTICUT_USERNAME";
pub const API_KEY_ENV_VAR: &str = "PEARL_ARTICUT_API_KEY";

const DEFAULT_ENDPOINT: &str = "https://nlu.droidtown.co/Articut_EN/API/";

/// User-Agent sent to the tagging service
pub fn user_agent() -> String {
    format!("pearl-analyzer/{}", env!("CARGO_PKG_VERSION"))
}

/// Top-level TOML configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TomlConfig {
    /// HTTP listen address for the web UI
    pub bind_address: String,
    pub logging: LoggingConfig,
    pub articut: ArticutConfig,
    pub corpus: CorpusConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5731".to_string(),
            logging: LoggingConfig::default(),
            articut: ArticutConfig::default(),
            corpus: CorpusConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` overrides it
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Articut tagging service settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ArticutConfig {
    pub endpoint: String,
    pub username: Option<String>,
    pub api_key: Option<String>,
    /// Analysis level requested from the service
    pub level: String,
    pub version: String,
    /// Service quota
    pub requests_per_minute: u32,
    /// Sentences joined into one request
    pub batch_sentences: usize,
    pub timeout_secs: u64,
}

impl Default for ArticutConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            username: None,
            api_key: None,
            level: "lv2".to_string(),
            version: "latest".to_string(),
            requests_per_minute: 80,
            batch_sentences: 10,
            timeout_secs: 30,
        }
    }
}

/// Where the poem texts come from
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Directory holding the per-poem files
    pub dir: PathBuf,
    /// Combined manuscript text; when set, poems are split out of it
    /// instead of being read from `dir`
    pub manuscript: Option<PathBuf>,
    pub poems: Vec<PoemSource>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("poems"),
            manuscript: None,
            poems: vec![
                PoemSource::new("sggk", "Sir Gawain and the Green Knight", "sir_gawain.txt"),
                PoemSource::new("pearl", "Pearl", "pearl.txt"),
                PoemSource::new("patience", "Patience", "patience.txt"),
                PoemSource::new("cleanness", "Cleanness", "cleanness.txt"),
            ],
        }
    }
}

/// One poem of the corpus
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PoemSource {
    /// Short identifier used in tables and URLs
    pub id: String,
    /// Display title; also the title matched in a manuscript
    pub name: String,
    /// File name relative to `corpus.dir`
    pub file: PathBuf,
}

impl PoemSource {
    pub fn new(id: &str, name: &str, file: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            file: PathBuf::from(file),
        }
    }
}

impl TomlConfig {
    /// Parse and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        let config: TomlConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Locate and load the config file, falling back to defaults
    ///
    /// Returns the path that was loaded, if any.
    pub fn load_or_default() -> Result<(Self, Option<PathBuf>)> {
        match locate_config_file() {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Ok((Self::load(&path)?, Some(path)))
            }
            None => {
                warn!("No configuration file found, using built-in defaults");
                Ok((Self::default(), None))
            }
        }
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.articut.requests_per_minute == 0 {
            return Err(Error::Config("articut.requests_per_minute must be > 0".to_string()));
        }
        if self.articut.batch_sentences == 0 {
            return Err(Error::Config("articut.batch_sentences must be > 0".to_string()));
        }
        if self.corpus.poems.is_empty() {
            return Err(Error::Config("corpus.poems must list at least one poem".to_string()));
        }

        let mut ids = HashSet::new();
        for poem in &self.corpus.poems {
            if poem.id.trim().is_empty() {
                return Err(Error::Config("corpus poem id must not be empty".to_string()));
            }
            if !ids.insert(poem.id.as_str()) {
                return Err(Error::Config(format!("duplicate corpus poem id: {}", poem.id)));
            }
        }
        Ok(())
    }
}

/// Find the config file by priority; `None` when none exists
pub fn locate_config_file() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
        warn!("{} points to missing file {}", CONFIG_ENV_VAR, path.display());
    }

    if let Some(path) = dirs::config_dir().map(|d| d.join("pearl").join("config.toml")) {
        if path.exists() {
            return Some(path);
        }
    }

    let local = PathBuf::from("pearl.toml");
    if local.exists() {
        return Some(local);
    }

    None
}

/// Resolved Articut account
#[derive(Clone, PartialEq, Eq)]
pub struct ArticutCredentials {
    pub username: String,
    pub api_key: String,
}

impl std::fmt::Debug for ArticutCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticutCredentials")
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Validate credential value (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve Articut credentials
///
/// **Priority:** ENV → TOML, per field. Warns when both sources are set.
pub fn resolve_articut_credentials(config: &ArticutConfig) -> Result<ArticutCredentials> {
    let username = resolve_field("username", USERNAME_ENV_VAR, config.username.as_deref())?;
    let api_key = resolve_field("api_key", API_KEY_ENV_VAR, config.api_key.as_deref())?;
    Ok(ArticutCredentials { username, api_key })
}

fn resolve_field(name: &str, env_var: &str, toml_value: Option<&str>) -> Result<String> {
    let env_value = std::env::var(env_var).ok().filter(|v| is_valid_key(v));
    let toml_value = toml_value.filter(|v| is_valid_key(v));

    match (env_value, toml_value) {
        (Some(env), toml) => {
            if toml.is_some() {
                warn!(
                    "Articut {} found in environment and TOML. Using environment (highest priority).",
                    name
                );
            }
            info!("Articut {} loaded from environment variable", name);
            Ok(env)
        }
        (None, Some(toml)) => {
            info!("Articut {} loaded from TOML config", name);
            Ok(toml.to_string())
        }
        (None, None) => Err(Error::Config(format!(
            "Articut {} not configured. Set {} or articut.{} in the TOML config.",
            name, env_var, name
        ))),
    }
}
