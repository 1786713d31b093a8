use crate::llm::provider::ReviewProvider;
use crate::review::report::{FINDINGS_TOOL_NAME, ReviewReport, findings_schema};
use crate::utils::error::CritiqError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const OPENAI_BASE_URL: &str = "https://api.openai.com";
pub(crate) const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_CONTEXT_WINDOW: usize = 128_000;

pub struct OpenAiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

/// Request body for the Chat Completions API with function calling.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    functions: serde_json::Value,
    function_call: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response from the Chat Completions API.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    function_call: Option<FunctionCall>,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
    arguments: String,
}

/// Error response from the OpenAI API.
#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    error_type: Option<String>,
    message: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            api_key,
            model,
            base_url: OPENAI_BASE_URL.to_string(),
            client,
        }
    }

    pub fn from_env(model: Option<&str>) -> Result<Self, CritiqError> {
        let api_key =
            std::env::var("OPENAI_API_KEY").map_err(|_| CritiqError::missing_api_key("openai"))?;
        Ok(Self::new(
            api_key,
            model.unwrap_or(DEFAULT_MODEL).to_string(),
        ))
    }

    /// Point the provider at a different endpoint, e.g. a mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// The single function definition offered to the model.
    fn functions_definition() -> serde_json::Value {
        serde_json::json!([{
            "name": FINDINGS_TOOL_NAME,
            "description": "Report the details of any issues found during the review.",
            "parameters": findings_schema(),
        }])
    }
}

#[async_trait]
impl ReviewProvider for OpenAiProvider {
    async fn review(&self, prompt: &str) -> Result<Option<ReviewReport>, CritiqError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            functions: Self::functions_definition(),
            function_call: "auto",
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);

            return Err(CritiqError::RateLimited {
                provider: "openai".to_string(),
                retry_after,
            });
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(error) = serde_json::from_str::<OpenAiError>(&error_text) {
                return Err(CritiqError::Provider {
                    provider: "openai".to_string(),
                    message: format!(
                        "{}: {}",
                        error.error.error_type.as_deref().unwrap_or("error"),
                        error.error.message
                    ),
                });
            }

            return Err(CritiqError::Provider {
                provider: "openai".to_string(),
                message: format!("HTTP {}: {}", status, error_text),
            });
        }

        let response_body: ChatResponse = response.json().await?;

        let Some(call) = response_body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.function_call)
        else {
            return Ok(None);
        };

        if call.name != FINDINGS_TOOL_NAME {
            tracing::warn!("Model called unexpected function '{}'", call.name);
            return Ok(None);
        }

        let report: ReviewReport = serde_json::from_str(&call.arguments)?;
        Ok(Some(report))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Context window sizes for the models this provider is used with.
pub(crate) fn context_window_for(model: &str) -> usize {
    if model.starts_with("gpt-3.5") {
        16_385
    } else {
        DEFAULT_CONTEXT_WINDOW
    }
}
