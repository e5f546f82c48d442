pub mod deepseek;

use async_trait::async_trait;
use std::sync::Arc;

use self::deepseek::DeepSeekChatClient;
use super::LlmError;
use crate::config::Config;
use crate::models::chat::ChatMessage;

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends the whole conversation and returns the top choice's text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> String;
}

pub fn new_client(config: &Config) -> Result<Arc<dyn ChatClient>, LlmError> {
    let client = DeepSeekChatClient::from_config(config)?;
    Ok(Arc::new(client))
}
