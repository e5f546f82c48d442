use crate::session::SessionFactory;
use crate::websocket::handle_connection;

use std::error::Error;
use std::net::SocketAddr;

use tokio::net::{ TcpListener, TcpStream };
use tokio_tungstenite::accept_async;

use log::{ info, error };

pub async fn start_ws_server(
    addr: SocketAddr,
    sessions: SessionFactory,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;
    info!("WS server listening on: {}", listener.local_addr()?);
    serve(listener, sessions).await
}

/// Accept loop. Every connection gets its own task and its own session.
pub async fn serve(
    listener: TcpListener,
    sessions: SessionFactory,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    loop {
        let (stream, peer) = listener.accept().await?;
        info!("Incoming connection from: {}", peer);
        let sessions = sessions.clone();

        tokio::spawn(async move {
            if let Err(e) = process_connection(peer, stream, sessions).await {
                error!("Failed to process connection for {}: {}", peer, e);
            }
        });
    }
}

async fn process_connection(
    peer: SocketAddr,
    stream: TcpStream,
    sessions: SessionFactory,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    match accept_async(stream).await {
        Ok(ws) => {
            handle_connection(peer, ws, sessions).await;
            Ok(())
        }
        Err(e) => {
            error!("Handshake failed for {}: {}", peer, e);
            Err(Box::new(e) as _)
        }
    }
}
