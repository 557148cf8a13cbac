use crate::domain::error::DomainError;
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::warn;

/// External generative model that turns an uploaded product image into a
/// free-text recyclability verdict. The returned string is opaque prose and
/// must not be parsed by callers.
#[async_trait]
pub trait AnalysisOracle: Send + Sync {
    async fn analyze(
        &self,
        image: &[u8],
        content_type: &str,
        name: &str,
        description: &str,
    ) -> Result<String, DomainError>;
}

/// Client for a Gemini-style `generateContent` endpoint. One request per
/// upload; no retries and no caching.
pub struct GeminiOracleClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiOracleClient {
    pub fn new(
        base_url: String,
        model: String,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Internal(format!("oracle client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
        })
    }
}

#[async_trait]
impl AnalysisOracle for GeminiOracleClient {
    async fn analyze(
        &self,
        image: &[u8],
        content_type: &str,
        name: &str,
        description: &str,
    ) -> Result<String, DomainError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = json!({
            "contents": [{
                "parts": [
                    { "text": build_prompt(name, description) },
                    { "inline_data": {
                        "mime_type": content_type,
                        "data": BASE64.encode(image),
                    }},
                ],
            }],
        });

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("oracle request failed: {}", e);
                DomainError::OracleUnavailable
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "oracle returned error status");
            return Err(DomainError::OracleUnavailable);
        }

        let payload: Value = response.json().await.map_err(|e| {
            warn!("oracle response was not valid JSON: {}", e);
            DomainError::OracleUnavailable
        })?;

        extract_candidate_text(&payload).ok_or_else(|| {
            warn!("oracle response carried no usable text");
            DomainError::OracleUnavailable
        })
    }
}

fn build_prompt(name: &str, description: &str) -> String {
    format!(
        "You assess second-hand goods for a recycling marketplace. Look at the \
         attached product photo and reply with one short line covering whether \
         the item is recyclable, its dominant material category, and an \
         estimated resale value in USD, for example \
         \"Recyclable: Yes, Category: Plastic, Value: $0.50\". \
         Product name: {}. Description: {}",
        name, description
    )
}

/// Pulls the first non-empty text part out of the first candidate. The model
/// may interleave other part kinds, so every text part is considered.
fn extract_candidate_text(payload: &Value) -> Option<String> {
    payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}
