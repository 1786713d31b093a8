use crate::llm::provider::ReviewProvider;
use crate::review::report::{FINDINGS_TOOL_NAME, ReviewReport, findings_schema};
use crate::utils::error::CritiqError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub(crate) const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
const DEFAULT_MAX_TOKENS: usize = 4096;
pub(crate) const CONTEXT_WINDOW: usize = 200_000;

pub struct AnthropicProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

/// Request body for the Anthropic Messages API with tool use.
#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: usize,
    messages: Vec<AnthropicMessage<'a>>,
    tools: serde_json::Value,
}

/// A message in the Anthropic format.
#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response from the Anthropic Messages API.
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

/// Content block in the Anthropic response.
#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    name: Option<String>,
    input: Option<serde_json::Value>,
}

/// Error response from the Anthropic API.
#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

impl AnthropicProvider {
    pub fn new(api_key: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            api_key,
            model,
            base_url: ANTHROPIC_BASE_URL.to_string(),
            client,
        }
    }

    pub fn from_env(model: Option<&str>) -> Result<Self, CritiqError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| CritiqError::missing_api_key("anthropic"))?;
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

    /// The single tool definition offered to the model.
    fn tools_definition() -> serde_json::Value {
        serde_json::json!([{
            "name": FINDINGS_TOOL_NAME,
            "description": "Report the details of any issues found during the review.",
            "input_schema": findings_schema(),
        }])
    }
}

#[async_trait]
impl ReviewProvider for AnthropicProvider {
    async fn review(&self, prompt: &str) -> Result<Option<ReviewReport>, CritiqError> {
        let request_body = AnthropicRequest {
            model: &self.model,
            max_tokens: DEFAULT_MAX_TOKENS,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
            tools: Self::tools_definition(),
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        // Handle rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);

            return Err(CritiqError::RateLimited {
                provider: "anthropic".to_string(),
                retry_after,
            });
        }

        // Handle other HTTP errors
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(error) = serde_json::from_str::<AnthropicError>(&error_text) {
                return Err(CritiqError::Provider {
                    provider: "anthropic".to_string(),
                    message: format!("{}: {}", error.error.error_type, error.error.message),
                });
            }

            return Err(CritiqError::Provider {
                provider: "anthropic".to_string(),
                message: format!("HTTP {}: {}", status, error_text),
            });
        }

        let response_body: AnthropicResponse = response.json().await?;

        // Find the findings tool call among the content blocks
        let call = response_body.content.into_iter().find(|block| {
            block.content_type == "tool_use" && block.name.as_deref() == Some(FINDINGS_TOOL_NAME)
        });

        let Some(input) = call.and_then(|block| block.input) else {
            return Ok(None);
        };

        let report: ReviewReport = serde_json::from_value(input)?;
        Ok(Some(report))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tools_definition_names_the_tool() {
        let tools = AnthropicProvider::tools_definition();
        assert_eq!(tools[0]["name"], FINDINGS_TOOL_NAME);
        assert_eq!(tools[0]["input_schema"]["type"], "object");
    }

    #[test]
    fn test_default_context_window() {
        assert_eq!(CONTEXT_WINDOW, 200_000);
    }

    #[test]
    fn test_with_base_url_overrides_endpoint() {
        let provider = AnthropicProvider::new("key".to_string(), DEFAULT_MODEL.to_string())
            .with_base_url("http://localhost:1234".to_string());
        assert_eq!(provider.base_url, "http://localhost:1234");
    }
}
