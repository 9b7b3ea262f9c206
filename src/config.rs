//! Configuration for a contract analysis request.
//!
//! All behaviour is controlled through [`AnalysisConfig`], built via its
//! [`AnalysisConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to pass a complete request description into the pipeline and to
//! diff two runs to understand why their outputs differ.
//!
//! The API key is explicit configuration, never ambient globals: it is owned
//! by the config for the duration of one call and not cached anywhere else.
//! This keeps the analyzer testable and safe to parallelise later.

use crate::error::AnalysisError;
use crate::pipeline::model::RiskModel;
use std::fmt;
use std::sync::Arc;

/// Model identifiers the analyzer accepts.
///
/// Flash models are fast and fall inside the free tier; the pro model is more
/// thorough but rate-limited more aggressively.
pub const SUPPORTED_MODELS: [&str; 4] = [
    "gemini-2.0-flash",
    "gemini-1.5-flash-latest",
    "gemini-1.5-flash",
    "gemini-1.5-pro-latest",
];

/// Default model when the caller does not choose one.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Configuration for one analysis call.
///
/// Built via [`AnalysisConfig::builder()`].
///
/// # Example
/// ```rust
/// use clausecheck::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .api_key("AIza...")
///     .model("gemini-1.5-pro-latest")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    /// Google AI API key. Required unless a custom [`RiskModel`] is injected.
    pub api_key: String,

    /// Model identifier, one of [`SUPPORTED_MODELS`]. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Sampling temperature. Default: 0.2.
    ///
    /// Low temperature keeps the model faithful to the clause text it quotes.
    /// Higher values introduce paraphrasing that breaks the verbatim
    /// `clause_text` requirement.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 8192.
    ///
    /// A long contract can yield dozens of findings; setting this too low
    /// truncates the JSON mid-array and the whole response is rejected as
    /// malformed.
    pub max_output_tokens: u32,

    /// Per-call request timeout in seconds. Default: 60.
    ///
    /// The model call is the only blocking operation in the pipeline; when it
    /// exceeds this bound the request fails with a `Network` error.
    pub api_timeout_secs: u64,

    /// Custom system prompt. If None, uses [`crate::prompts::SYSTEM_PROMPT`].
    pub system_prompt: Option<String>,

    /// Pre-constructed model client. Takes precedence over `api_key`/`model`
    /// for issuing the call; tests inject a stub here so the rest of the
    /// pipeline runs deterministically without network access.
    pub model_client: Option<Arc<dyn RiskModel>>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.2,
            max_output_tokens: 8192,
            api_timeout_secs: 60,
            system_prompt: None,
            model_client: None,
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            // Never log the key itself.
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<set>" })
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("system_prompt", &self.system_prompt.as_ref().map(|_| "<override>"))
            .field("model_client", &self.model_client.as_ref().map(|_| "<dyn RiskModel>"))
            .finish()
    }
}

impl AnalysisConfig {
    /// Create a new builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnalysisConfig`].
#[derive(Debug)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_output_tokens(mut self, n: u32) -> Self {
        self.config.max_output_tokens = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn model_client(mut self, client: Arc<dyn RiskModel>) -> Self {
        self.config.model_client = Some(client);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// An injected `model_client` bypasses the API-key and model-name checks:
    /// the client owns its own transport and credentials.
    pub fn build(self) -> Result<AnalysisConfig, AnalysisError> {
        let c = &self.config;
        if c.model_client.is_none() {
            if c.api_key.trim().is_empty() {
                return Err(AnalysisError::InvalidConfig(
                    "API key is required (set GEMINI_API_KEY or pass --api-key)".into(),
                ));
            }
            if !SUPPORTED_MODELS.contains(&c.model.as_str()) {
                return Err(AnalysisError::InvalidConfig(format!(
                    "Unsupported model '{}'. Supported: {}",
                    c.model,
                    SUPPORTED_MODELS.join(", ")
                )));
            }
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyzerError;
    use crate::pipeline::model::ModelRequest;

    struct NullModel;

    #[async_trait::async_trait]
    impl RiskModel for NullModel {
        async fn generate(&self, _req: &ModelRequest) -> Result<String, AnalyzerError> {
            Ok(r#"{"risks": []}"#.to_string())
        }
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let err = AnalysisConfig::builder().build().unwrap_err();
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn unsupported_model_is_rejected() {
        let err = AnalysisConfig::builder()
            .api_key("k")
            .model("gpt-4o")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("gpt-4o"));
    }

    #[test]
    fn every_supported_model_builds() {
        for model in SUPPORTED_MODELS {
            AnalysisConfig::builder()
                .api_key("k")
                .model(model)
                .build()
                .unwrap();
        }
    }

    #[test]
    fn injected_client_needs_no_api_key() {
        let config = AnalysisConfig::builder()
            .model_client(Arc::new(NullModel))
            .build()
            .unwrap();
        assert!(config.model_client.is_some());
    }

    #[test]
    fn debug_never_prints_the_key() {
        let config = AnalysisConfig::builder().api_key("secret-key").build().unwrap();
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("secret-key"));
    }

    #[test]
    fn temperature_is_clamped() {
        let config = AnalysisConfig::builder()
            .api_key("k")
            .temperature(5.0)
            .build()
            .unwrap();
        assert_eq!(config.temperature, 2.0);
    }
}
