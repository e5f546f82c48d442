use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client as HttpClient, header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION}};
use serde::{Deserialize, Serialize};

use super::ChatClient;
use crate::config::Config;
use crate::llm::LlmError;
use crate::models::chat::ChatMessage;

pub struct DeepSeekChatClient {
    http: HttpClient,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Deserialize)]
struct ChatCompletionMessage {
    content: Option<String>,
}

impl DeepSeekChatClient {
    pub fn new(api_key: &str, model: String, base_url: String) -> Result<Self, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| LlmError::InvalidApiKey(e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        // No timeout: a hung call hangs its session, same as the transport default.
        let http = HttpClient::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        Self::new(&config.api_key, config.model.clone(), config.base_url.clone())
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatClient for DeepSeekChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let req = ChatCompletionRequest {
            model: &self.model,
            messages,
        };

        debug!("Sending {} messages to {}", messages.len(), self.endpoint());
        let resp = self.http.post(self.endpoint()).json(&req).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(LlmError::Status { status, body });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;
        let content = parsed.choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyChoices)?
            .message.content
            .ok_or(LlmError::MissingContent)?;

        info!("Completion received from {} ({} chars)", self.model, content.len());
        Ok(content)
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> String {
        self.base_url.clone()
    }
}
