//! LLM providers: the only place that talks to a language model.
//!
//! Job analysis code depends on the `LlmProvider` trait, never on a concrete
//! backend. `AppState` carries an `Arc<dyn LlmProvider>` chosen at startup.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod mock;
pub mod prompts;

pub use mock::MockProvider;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Model used when ANTHROPIC_MODEL is not set.
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Provider output types
// ────────────────────────────────────────────────────────────────────────────

/// A skill as reported by the provider, before enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSkill {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub importance: String,
    #[serde(default)]
    pub years_required: Option<u32>,
    #[serde(default)]
    pub context: Option<String>,
}

/// Structured analysis of a job description as returned by a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobAnalysis {
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub key_requirements: Vec<String>,
    #[serde(default)]
    pub technical_skills: Vec<ExtractedSkill>,
    #[serde(default)]
    pub soft_skills: Vec<ExtractedSkill>,
    pub experience_level: String,
    pub industry: String,
    pub summary: String,
    pub difficulty_assessment: String,
    #[serde(default)]
    pub compensation_insights: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillList {
    #[serde(default)]
    pub skills: Vec<ExtractedSkill>,
}

/// Provider payload plus the token cost of producing it.
#[derive(Debug, Clone)]
pub struct LlmOutput<T> {
    pub data: T,
    pub tokens_used: u32,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider label recorded in cache and history rows.
    fn name(&self) -> &'static str;

    async fn analyze_job(
        &self,
        job_description: &str,
        company_context: Option<&str>,
    ) -> Result<LlmOutput<JobAnalysis>, LlmError>;

    async fn extract_skills(
        &self,
        text: &str,
        context_type: &str,
    ) -> Result<LlmOutput<Vec<ExtractedSkill>>, LlmError>;

    /// Runs a minimal extraction to verify the provider answers.
    async fn health_check(&self) -> bool {
        match self.extract_skills("Python programming", "health_check").await {
            Ok(_) => true,
            Err(e) => {
                warn!(provider = self.name(), "LLM health check failed: {e}");
                false
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Anthropic Messages API
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
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

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

enum Attempt {
    Done(LlmResponse),
    Retry(LlmError),
    Fatal(LlmError),
}

/// Delay before `attempt`: none for the first, then 1s, 2s, 4s...
fn retry_delay(attempt: u32) -> Option<Duration> {
    (attempt > 0).then(|| Duration::from_secs(1 << (attempt - 1).min(6)))
}

/// Prefers the API's own error message over the raw body.
fn api_error_message(body: String) -> String {
    match serde_json::from_str::<AnthropicError>(&body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body,
    }
}

/// Claude-backed provider with retry logic and structured JSON output.
#[derive(Clone)]
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicProvider {
    pub fn new(api_key: String, model: String, max_tokens: u32) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            model,
            max_tokens,
        })
    }

    /// Sends one Messages request, retrying 429 and 5xx answers up to
    /// `MAX_RETRIES` attempts with a doubling delay.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let body = AnthropicRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error = None;
        for attempt in 0..MAX_RETRIES {
            if let Some(delay) = retry_delay(attempt) {
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    model = %self.model,
                    "Retrying Anthropic request"
                );
                tokio::time::sleep(delay).await;
            }

            match self.send(&body).await {
                Attempt::Done(response) => {
                    debug!(
                        input_tokens = response.usage.input_tokens,
                        output_tokens = response.usage.output_tokens,
                        "Anthropic request succeeded"
                    );
                    return Ok(response);
                }
                Attempt::Fatal(e) => return Err(e),
                Attempt::Retry(e) => {
                    warn!(attempt, "Anthropic request failed: {e}");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    async fn send(&self, body: &AnthropicRequest<'_>) -> Attempt {
        let response = match self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Attempt::Retry(LlmError::Http(e)),
        };

        let status = response.status();
        if status.is_success() {
            return match response.json::<LlmResponse>().await {
                Ok(parsed) => Attempt::Done(parsed),
                Err(e) => Attempt::Fatal(LlmError::Http(e)),
            };
        }

        let text = response.text().await.unwrap_or_default();
        let error = LlmError::Api {
            status: status.as_u16(),
            message: api_error_message(text),
        };
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            Attempt::Retry(error)
        } else {
            Attempt::Fatal(error)
        }
    }

    /// Calls the LLM and deserializes the text response as JSON.
    /// The prompt must instruct the model to return valid JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<LlmOutput<T>, LlmError> {
        let response = self.call(prompt, system).await?;
        let tokens_used = response.usage.input_tokens + response.usage.output_tokens;

        let text = response.text().ok_or(LlmError::EmptyContent)?;
        let data = serde_json::from_str(strip_json_fences(text))?;

        Ok(LlmOutput { data, tokens_used })
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn analyze_job(
        &self,
        job_description: &str,
        company_context: Option<&str>,
    ) -> Result<LlmOutput<JobAnalysis>, LlmError> {
        let prompt = prompts::job_analysis_prompt(job_description, company_context);
        self.call_json::<JobAnalysis>(&prompt, prompts::JOB_ANALYSIS_SYSTEM)
            .await
    }

    async fn extract_skills(
        &self,
        text: &str,
        context_type: &str,
    ) -> Result<LlmOutput<Vec<ExtractedSkill>>, LlmError> {
        let prompt = prompts::skill_extraction_prompt(text, context_type);
        let output = self
            .call_json::<SkillList>(&prompt, prompts::SKILL_EXTRACTION_SYSTEM)
            .await?;
        Ok(LlmOutput {
            data: output.data.skills,
            tokens_used: output.tokens_used,
        })
    }
}

/// Models sometimes wrap JSON in a Markdown code block; returns the inner text.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
