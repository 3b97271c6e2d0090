use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument};

use super::errors::OpenAiError;
use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(base_url: String, api_key: String, model: String) -> Result<Self, OpenAiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a single user message and return the first choice's text.
    #[instrument(skip(self, prompt), fields(model = %self.model), level = "debug")]
    pub async fn complete(&self, prompt: &str) -> Result<String, OpenAiError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let completion: ChatCompletionResponse = resp.json().await?;
        let text = completion.first_content().ok_or(OpenAiError::NoChoices)?;

        debug!(chars = text.len(), "completion received");

        Ok(text)
    }
}
