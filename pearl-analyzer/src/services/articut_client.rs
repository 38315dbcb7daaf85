//! Articut API client
//!
//! Posts poem text to the Articut segmentation/POS service in sentence
//! batches and turns each returned word record into a validated [`Token`].
//!
//! **Rate limiting:** the service allows 80 requests per minute; the client
//! waits on a `governor` limiter before every request.
//!
//! **Response schema:**
//! ```json
//! { "status": true, "msg": "Success!",
//!   "result_obj": [[{"text": "Lovely", "pos": "MODIFIER"}, ...], ...] }
//! ```

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use pearl_common::config::{user_agent, ArticutConfig, ArticutCredentials};
use pearl_common::{Error, Result, Token};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::time::Duration;

use crate::services::sentence_batcher::batch_sentences;
use crate::types::Tagger;

/// Request body
#[derive(Debug, Serialize)]
struct ArticutRequest<'a> {
    username: &'a str,
    api_key: &'a str,
    input_str: &'a str,
    level: &'a str,
    version: &'a str,
}

/// Response body
#[derive(Debug, Deserialize)]
pub struct ArticutResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub msg: Option<String>,
    /// One inner list per sentence
    #[serde(default)]
    pub result_obj: Option<Vec<Vec<ArticutWord>>>,
}

/// One word record; both fields are required by [`parse_response`]
#[derive(Debug, Deserialize)]
pub struct ArticutWord {
    pub text: Option<String>,
    pub pos: Option<String>,
}

/// Validate a response and convert its records to tokens
///
/// `status: false` is a service failure; a record without `text` or `pos`
/// is malformed input. A successful response without `result_obj` yields no
/// tokens.
pub fn parse_response(response: ArticutResponse) -> Result<Vec<Token>> {
    if !response.status {
        let msg = response.msg.unwrap_or_else(|| "Unknown API Error".to_string());
        return Err(Error::ExternalService(format!("Articut API error: {}", msg)));
    }

    let sentences = response.result_obj.unwrap_or_default();
    let mut tokens = Vec::with_capacity(sentences.iter().map(Vec::len).sum());

    for (sentence_index, sentence) in sentences.into_iter().enumerate() {
        for (word_index, word) in sentence.into_iter().enumerate() {
            let text = word.text.ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Articut record {}:{} has no text",
                    sentence_index, word_index
                ))
            })?;
            let pos = word.pos.filter(|p| !p.trim().is_empty()).ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Articut record {}:{} ({:?}) has no POS tag",
                    sentence_index, word_index, text
                ))
            })?;
            tokens.push(Token::classified(text, pos)?);
        }
    }

    Ok(tokens)
}

fn preview(input: &str) -> String {
    input.chars().take(100).collect()
}

/// Articut API client
pub struct ArticutClient {
    http_client: reqwest::Client,
    endpoint: String,
    credentials: ArticutCredentials,
    level: String,
    version: String,
    batch_sentences: usize,
    rate_limiter: RateLimiter<
        governor::state::direct::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl ArticutClient {
    pub fn new(config: &ArticutConfig, credentials: ArticutCredentials) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(user_agent())
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| Error::ExternalService(e.to_string()))?;

        let per_minute = NonZeroU32::new(config.requests_per_minute).ok_or_else(|| {
            Error::Config("articut.requests_per_minute must be > 0".to_string())
        })?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            credentials,
            level: config.level.clone(),
            version: config.version.clone(),
            batch_sentences: config.batch_sentences,
            rate_limiter: RateLimiter::direct(Quota::per_minute(per_minute)),
        })
    }

    /// One API call for one input string
    pub async fn analyze(&self, input: &str) -> Result<Vec<Token>> {
        self.rate_limiter.until_ready().await;

        let body = ArticutRequest {
            username: &self.credentials.username,
            api_key: &self.credentials.api_key,
            input_str: input,
            level: &self.level,
            version: &self.version,
        };

        tracing::debug!(endpoint = %self.endpoint, chars = input.len(), "Querying Articut API");

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                Error::ExternalService(format!(
                    "Network error: {} for input '{}...'",
                    e,
                    preview(input)
                ))
            })?;

        let status = response.status();

        if status == 401 || status == 403 {
            return Err(Error::ExternalService(format!(
                "Articut rejected credentials (HTTP {})",
                status.as_u16()
            )));
        }

        if status == 429 {
            return Err(Error::ExternalService("Articut rate limit exceeded".to_string()));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::ExternalService(format!(
                "Articut HTTP {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let parsed: ArticutResponse = response
            .json()
            .await
            .map_err(|e| Error::ExternalService(format!("Unparseable Articut response: {}", e)))?;

        let tokens = parse_response(parsed).map_err(|e| {
            tracing::warn!(input = %preview(input), error = %e, "Articut call failed");
            e
        })?;

        Ok(tokens)
    }
}

#[async_trait]
impl Tagger for ArticutClient {
    fn name(&self) -> &'static str {
        "articut"
    }

    /// Tag `text` batch by batch; the first failing batch aborts the poem
    async fn tag(&self, text: &str) -> Result<Vec<Token>> {
        let batches = batch_sentences(text, self.batch_sentences);
        let total = batches.len();
        let mut tokens = Vec::new();

        for (i, batch) in batches.iter().enumerate() {
            tracing::info!(batch = i + 1, total, chars = batch.len(), "Processing Articut batch");
            tokens.extend(self.analyze(batch).await?);
        }

        tracing::info!(batches = total, tokens = tokens.len(), "Articut tagging complete");
        Ok(tokens)
    }
}
