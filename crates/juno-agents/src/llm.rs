use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AgentError;

const API_BASE: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: usize = 1024;

/// Configuration for one model call. The credential is injected here
/// explicitly; the core never reads ambient state.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl LlmConfig {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self {
            api_key,
            model,
            timeout,
        }
    }
}

/// Thin client over the Anthropic messages endpoint.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Send a system prompt and user message, returning the model's text.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, AgentError> {
        debug!(model = %self.config.model, "Invoking model API");

        let request = MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: MAX_TOKENS,
            system: system.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: user.to_string(),
            }],
        };

        let response = tokio::time::timeout(self.config.timeout, async {
            self.http
                .post(format!("{API_BASE}/messages"))
                .header("x-api-key", &self.config.api_key)
                .header("anthropic-version", API_VERSION)
                .header("content-type", "application/json")
                .json(&request)
                .send()
                .await
        })
        .await
        .map_err(|_| AgentError::Timeout(self.config.timeout.as_secs()))??;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Model API call failed");
            return Err(AgentError::Api(format!("HTTP {status}: {body}")));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Api(format!("Malformed API response: {e}")))?;

        let text = parsed
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(AgentError::Api("Model returned empty response".to_string()));
        }

        Ok(text)
    }
}

/// The AI-backed path shared by every agent: role prompt, model call,
/// contract parse. Any error here makes the caller fall back to its
/// synthetic path.
pub async fn model_opinion(
    client: &LlmClient,
    kind: juno_models::AgentKind,
    request: &crate::agent::AnalysisRequest,
) -> Result<juno_models::Opinion, AgentError> {
    let system = crate::prompts::system_prompt(kind, &request.query);
    let user = crate::prompts::user_message(&request.query, &request.context);
    let raw = client.complete(&system, &user).await?;
    crate::parser::parse_opinion(&raw, kind)
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: usize,
    system: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_carries_injected_credential() {
        let config = LlmConfig::new(
            "test-key".to_string(),
            "claude-3-5-haiku-latest".to_string(),
            Duration::from_secs(5),
        );
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn response_text_blocks_deserialize() {
        let raw = r#"{"content": [{"type": "text", "text": "{\"score\": 1.0}"}]}"#;
        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.content[0].text.as_deref(), Some("{\"score\": 1.0}"));
    }
}
