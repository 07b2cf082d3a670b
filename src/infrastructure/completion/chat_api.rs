//! OpenAI-compatible chat completion adapter

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{CompletionError, Summarizer, TextRefiner};
use crate::domain::config::{DEFAULT_API_BASE_URL, DEFAULT_COMPLETION_MODEL};
use crate::domain::minutes::{ChatPrompt, RefinedText, SummaryText, Transcript};

// Request types for the chat completions endpoint

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

// Response types for the chat completions endpoint

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<Choice>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Chat client serving both the correction and the summary pass
#[derive(Clone)]
pub struct ChatCompletionClient {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl ChatCompletionClient {
    /// Create a new chat client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE_URL.to_string(),
            model: DEFAULT_COMPLETION_MODEL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Point at another OpenAI-compatible server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a custom model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn api_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request<'a>(&'a self, prompt: &'a ChatPrompt) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: prompt.system(),
                },
                Message {
                    role: "user",
                    content: prompt.user(),
                },
            ],
            temperature: prompt.temperature(),
        }
    }

    /// First choice's content, trimmed; `None` when absent or blank
    fn extract_text(response: &ChatResponse) -> Option<String> {
        let content = response
            .choices
            .as_ref()?
            .first()?
            .message
            .as_ref()?
            .content
            .as_deref()?
            .trim();

        if content.is_empty() {
            None
        } else {
            Some(content.to_string())
        }
    }

    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, CompletionError> {
        let body = self.build_request(prompt);

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(CompletionError::InvalidApiKey);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CompletionError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CompletionError::ApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let response: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::ParseError(e.to_string()))?;

        // Some gateways answer 200 with an error body
        if let Some(error) = response.error {
            return Err(CompletionError::ApiError(error.message));
        }

        Self::extract_text(&response).ok_or(CompletionError::EmptyResponse)
    }
}

#[async_trait]
impl TextRefiner for ChatCompletionClient {
    async fn refine(&self, transcript: &Transcript) -> Result<RefinedText, CompletionError> {
        let prompt = ChatPrompt::refinement(transcript.text());
        self.complete(&prompt).await.map(RefinedText::new)
    }
}

#[async_trait]
impl Summarizer for ChatCompletionClient {
    async fn summarize(&self, text: &RefinedText) -> Result<SummaryText, CompletionError> {
        let prompt = ChatPrompt::summary(text.text());
        self.complete(&prompt).await.map(SummaryText::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_request_has_system_then_user() {
        let client = ChatCompletionClient::new("k");
        let prompt = ChatPrompt::refinement("テスト");

        let request = client.build_request(&prompt);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert!(json["messages"][1]["content"]
            .as_str()
            .unwrap()
            .ends_with("テスト"));
        assert!((json["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn api_url_uses_base() {
        let client = ChatCompletionClient::new("k")
            .with_base_url("http://127.0.0.1:9/v1/")
            .with_model("gpt-4o-mini");
        assert_eq!(client.api_url(), "http://127.0.0.1:9/v1/chat/completions");
        assert_eq!(client.model, "gpt-4o-mini");
    }

    #[test]
    fn extract_text_from_response() {
        let response = ChatResponse {
            choices: Some(vec![Choice {
                message: Some(ChoiceMessage {
                    content: Some(" - 挨拶\n".to_string()),
                }),
            }]),
            error: None,
        };

        assert_eq!(
            ChatCompletionClient::extract_text(&response),
            Some("- 挨拶".to_string())
        );
    }

    #[test]
    fn extract_text_null_content() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(ChatCompletionClient::extract_text(&response).is_none());
    }

    #[test]
    fn extract_text_no_choices() {
        let response = ChatResponse {
            choices: None,
            error: None,
        };
        assert!(ChatCompletionClient::extract_text(&response).is_none());
    }
}
