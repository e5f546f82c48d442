pub mod models;
pub mod server;
pub mod websocket;
pub mod config;
pub mod llm;
pub mod cli;
pub mod session;

use config::Config;
use llm::chat::new_client as new_chat_client;
use log::info;
use server::Server;
use session::SessionFactory;
use std::error::Error;

pub async fn run(config: Config) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Failure Policy: {:?}", config.failure_policy);
    info!("Page Address: {}", config.http_addr);
    info!("WebSocket Address: {}", config.server_addr);
    info!("-------------------------");

    let chat_client = new_chat_client(&config)?;
    info!(
        "Chat client configured: Model={}, BaseURL={}",
        chat_client.get_model(),
        chat_client.get_base_url()
    );
    let sessions = SessionFactory::new(
        chat_client,
        config.system_prompt.clone(),
        config.failure_policy,
    );

    let server = Server::new(config, sessions);
    server.run().await?;

    Ok(())
}
