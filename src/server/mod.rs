pub mod page;
pub mod websocket;

use crate::config::Config;
use crate::session::SessionFactory;
use std::error::Error;

pub struct Server {
    config: Config,
    sessions: SessionFactory,
}

impl Server {
    pub fn new(config: Config, sessions: SessionFactory) -> Self {
        Self { config, sessions }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.start_http_server().await?;
        self.start_ws_server().await?;

        Ok(())
    }

    async fn start_http_server(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let html = page::render_page(&self.config.page_title, self.config.server_addr.port())?;
        page::start_http_server(self.config.http_addr, html).await
    }

    async fn start_ws_server(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        websocket::start_ws_server(self.config.server_addr, self.sessions.clone()).await
    }
}
