//! Model interaction: one HTTPS call to the Gemini generation endpoint.
//!
//! [`RiskModel`] is the seam between the pipeline and the outside world. The
//! production implementation is [`GeminiClient`]; tests inject a stub through
//! [`crate::config::AnalysisConfig::model_client`] so everything downstream
//! of the network runs deterministically.
//!
//! ## Single attempt, no cache
//!
//! One user action is one API call. No automatic retries — a 429 or timeout
//! surfaces immediately with an error kind the caller can act on — and no
//! caching of responses, even for identical input.

use crate::error::AnalyzerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Everything a model needs to produce an analysis.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    /// System instruction (task description, categories, output schema).
    pub system_prompt: String,
    /// User prompt with the delimited contract text.
    pub user_prompt: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Generation token cap.
    pub max_output_tokens: u32,
}

/// The external analyzer seam.
///
/// Implementations return the model's raw text output; parsing and schema
/// validation happen in [`crate::pipeline::validate`], so a stub only has to
/// hand back a JSON string.
#[async_trait]
pub trait RiskModel: Send + Sync {
    /// Perform one generation call and return the raw response text.
    async fn generate(&self, request: &ModelRequest) -> Result<String, AnalyzerError>;

    /// Identifier reported in stats and logs.
    fn name(&self) -> &str {
        "custom"
    }
}

/// Production client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Build a client with a per-request timeout.
    ///
    /// The timeout covers the whole call; expiry surfaces as
    /// [`AnalyzerError::Network`].
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, AnalyzerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AnalyzerError::Network {
                detail: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl RiskModel for GeminiClient {
    async fn generate(&self, request: &ModelRequest) -> Result<String, AnalyzerError> {
        let url = format!("{GEMINI_API_BASE}/{}:generateContent", self.model);
        let body = GenerateRequest::from(request);

        info!(model = %self.model, "sending analysis request");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnalyzerError::Network {
                        detail: "request timed out".into(),
                    }
                } else {
                    AnalyzerError::Network {
                        detail: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_error_status(status.as_u16(), &body_text, &self.model));
        }

        let parsed: GenerateResponse =
            response
                .json()
                .await
                .map_err(|e| AnalyzerError::MalformedResponse {
                    detail: format!("response body is not valid JSON: {e}"),
                })?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| AnalyzerError::MalformedResponse {
                detail: "response contains no candidate text".into(),
            })?;

        debug!(bytes = text.len(), "received model output");
        Ok(text)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// Map a non-success HTTP status to the analyzer error taxonomy.
///
/// Gemini reports a rejected key as 400 with `API_KEY_INVALID` in the body
/// rather than a clean 401, so the 400 body is inspected too.
fn map_error_status(status: u16, body: &str, model: &str) -> AnalyzerError {
    match status {
        401 | 403 => AnalyzerError::AuthFailure {
            model: model.to_string(),
            detail: truncate(body, 200),
        },
        429 => AnalyzerError::RateLimited {
            model: model.to_string(),
        },
        400 if body.contains("API_KEY_INVALID") || body.contains("API key not valid") => {
            AnalyzerError::AuthFailure {
                model: model.to_string(),
                detail: truncate(body, 200),
            }
        }
        _ => AnalyzerError::Unknown {
            status,
            detail: truncate(body, 200),
        },
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{cut}…")
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest {
    system_instruction: ContentBody,
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

impl From<&ModelRequest> for GenerateRequest {
    fn from(req: &ModelRequest) -> Self {
        Self {
            system_instruction: ContentBody {
                parts: vec![Part {
                    text: Some(req.system_prompt.clone()),
                }],
            },
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: Some(req.user_prompt.clone()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: req.temperature,
                max_output_tokens: req.max_output_tokens,
                response_mime_type: "application/json".to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContentBody {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ContentBody,
}
