use clap::Parser;

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Completion API Args ---
    /// API key for the DeepSeek completion API. Required.
    #[arg(long, env = "DEEPSEEK_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API (default: https://api.deepseek.com/v1)
    #[arg(long, env = "DEEPSEEK_API_BASE_URL")] // No default here, Config applies it
    pub base_url: Option<String>,

    /// Model name for chat completion (default: deepseek-chat)
    #[arg(long, env = "DEEPSEEK_MODEL")]
    pub model: Option<String>,

    // --- Session Args ---
    /// Content of the system message that opens every conversation.
    #[arg(long, env = "SYSTEM_PROMPT")]
    pub system_prompt: Option<String>,

    /// Remove the unanswered user message when the completion call fails.
    #[arg(long, env = "ROLLBACK_ON_FAILURE", default_value = "false")]
    pub rollback_on_failure: bool,

    // --- Server Args ---
    /// Host address and port serving the chat page.
    #[arg(long, env = "HTTP_ADDR", default_value = "127.0.0.1:8501")]
    pub http_addr: String,

    /// Host address and port for the WebSocket chat endpoint.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,

    /// Title shown at the top of the chat page.
    #[arg(long, env = "PAGE_TITLE")]
    pub page_title: Option<String>,
}
