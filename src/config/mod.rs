use crate::cli::Args;
use crate::session::FailurePolicy;
use std::fmt;
use std::net::SocketAddr;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
pub const DEFAULT_PAGE_TITLE: &str = "Chatbot TP Final Base de Datos";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "Por favor, configura la variable de entorno DEEPSEEK_API_KEY con tu clave API de DeepSeek."
    )]
    MissingApiKey,
    #[error("Invalid {name} '{value}': {reason}")]
    InvalidAddress {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Effective process configuration, resolved once at startup.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub system_prompt: String,
    pub failure_policy: FailurePolicy,
    pub http_addr: SocketAddr,
    pub server_addr: SocketAddr,
    pub page_title: String,
}

// Keeps the key out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("system_prompt", &self.system_prompt)
            .field("failure_policy", &self.failure_policy)
            .field("http_addr", &self.http_addr)
            .field("server_addr", &self.server_addr)
            .field("page_title", &self.page_title)
            .finish()
    }
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let api_key = args.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?
            .to_string();

        let failure_policy = if args.rollback_on_failure {
            FailurePolicy::Rollback
        } else {
            FailurePolicy::KeepUserMessage
        };

        Ok(Self {
            api_key,
            base_url: non_empty_or(&args.base_url, DEFAULT_BASE_URL),
            model: non_empty_or(&args.model, DEFAULT_MODEL),
            system_prompt: non_empty_or(&args.system_prompt, DEFAULT_SYSTEM_PROMPT),
            failure_policy,
            http_addr: parse_addr("http address", &args.http_addr)?,
            server_addr: parse_addr("server address", &args.server_addr)?,
            page_title: non_empty_or(&args.page_title, DEFAULT_PAGE_TITLE),
        })
    }
}

fn non_empty_or(value: &Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.clone(),
        _ => default.to_string(),
    }
}

fn parse_addr(name: &'static str, value: &str) -> Result<SocketAddr, ConfigError> {
    value.parse::<SocketAddr>().map_err(|e| ConfigError::InvalidAddress {
        name,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
