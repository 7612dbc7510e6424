//! Oracle client: the single point of entry for all generative-AI calls in SwitchBuddy.
//!
//! ARCHITECTURAL RULE: No other module may call the model API directly.
//! Call sites declare a [`Template`] (prompt + typed input/output) and go through
//! [`OracleClient::invoke`].
//!
//! Model: claude-sonnet-4-5 (hardcoded, not configurable)

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all oracle calls.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Oracle returned empty content")]
    EmptyContent,

    #[error("Oracle returned no result for template '{0}'")]
    NoResult(&'static str),
}

/// A prompt template with compile-time input and output shapes.
pub trait Template {
    /// Stable name used in logs and errors.
    const NAME: &'static str;
    const SYSTEM: &'static str;
    type Input: Serialize + Sync;
    type Output: DeserializeOwned;

    fn render(input: &Self::Input) -> Result<String, OracleError>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct OracleResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl OracleResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// API keys used in rotation. A rate-limited key hands over to the next one.
#[derive(Debug)]
struct KeyRing {
    keys: Vec<String>,
    cursor: AtomicUsize,
}

impl KeyRing {
    fn current(&self) -> &str {
        &self.keys[self.cursor.load(Ordering::Relaxed) % self.keys.len()]
    }

    fn rotate(&self) {
        self.cursor.fetch_add(1, Ordering::Relaxed);
    }
}

/// Wraps the Messages API with retry, key rotation and typed template invocation.
#[derive(Clone)]
pub struct OracleClient {
    client: Client,
    keys: Arc<KeyRing>,
}

impl OracleClient {
    pub fn new(api_keys: Vec<String>) -> anyhow::Result<Self> {
        if api_keys.is_empty() {
            bail!("Oracle client needs at least one API key");
        }
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .context("Failed to build HTTP client")?,
            keys: Arc::new(KeyRing {
                keys: api_keys,
                cursor: AtomicUsize::new(0),
            }),
        })
    }

    /// Renders `T` with `input`, calls the model, and decodes the reply as `T::Output`.
    /// A JSON `null` reply is `NoResult`: callers surface it as a failure.
    pub async fn invoke<T: Template>(&self, input: &T::Input) -> Result<T::Output, OracleError> {
        let prompt = T::render(input)?;
        let system = format!("{} {}", T::SYSTEM, prompts::JSON_ONLY_SYSTEM);
        debug!("Invoking oracle template '{}'", T::NAME);
        let response = self.call(&prompt, &system).await?;
        let text = response.text().ok_or(OracleError::EmptyContent)?;
        parse_output::<T::Output>(text)?.ok_or(OracleError::NoResult(T::NAME))
    }

    /// Makes a raw call to the Messages API, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<OracleResponse, OracleError> {
        let request_body = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error: Option<OracleError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Oracle call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", self.keys.current())
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(OracleError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Oracle API returned {}: {}", status, body);
                if status.as_u16() == 429 {
                    self.keys.rotate();
                }
                last_error = Some(OracleError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(OracleError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let oracle_response: OracleResponse = response.json().await?;

            debug!(
                "Oracle call succeeded: input_tokens={}, output_tokens={}",
                oracle_response.usage.input_tokens, oracle_response.usage.output_tokens
            );

            return Ok(oracle_response);
        }

        Err(last_error.unwrap_or(OracleError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

/// Decodes model text as JSON, tolerating markdown fences. `null` decodes to `None`.
fn parse_output<U: DeserializeOwned>(text: &str) -> Result<Option<U>, OracleError> {
    Ok(serde_json::from_str(strip_json_fences(text))?)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start()),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Echo {
        key: String,
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_parse_output_null_is_none() {
        let parsed: Option<Echo> = parse_output("null").unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_parse_output_fenced_object() {
        let parsed: Option<Echo> = parse_output("```json\n{\"key\": \"v\"}\n```").unwrap();
        assert_eq!(
            parsed,
            Some(Echo {
                key: "v".to_string()
            })
        );
    }

    #[test]
    fn test_parse_output_schema_mismatch_is_error() {
        let parsed = parse_output::<Echo>("{\"other\": 1}");
        assert!(matches!(parsed, Err(OracleError::Parse(_))));
    }

    #[test]
    fn test_key_ring_rotates_and_wraps() {
        let ring = KeyRing {
            keys: vec!["a".to_string(), "b".to_string()],
            cursor: AtomicUsize::new(0),
        };
        assert_eq!(ring.current(), "a");
        ring.rotate();
        assert_eq!(ring.current(), "b");
        ring.rotate();
        assert_eq!(ring.current(), "a");
    }

    #[test]
    fn test_client_requires_a_key() {
        assert!(OracleClient::new(Vec::new()).is_err());
        assert!(OracleClient::new(vec!["sk-test".to_string()]).is_ok());
    }

    #[test]
    fn test_response_text_picks_first_text_block() {
        let response: OracleResponse = serde_json::from_str(
            r#"{
                "content": [
                    {"type": "tool_use", "text": null},
                    {"type": "text", "text": "{\"key\": \"v\"}"}
                ],
                "usage": {"input_tokens": 10, "output_tokens": 4}
            }"#,
        )
        .unwrap();
        assert_eq!(response.text(), Some("{\"key\": \"v\"}"));
    }
}
