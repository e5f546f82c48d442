use crate::models::websocket::{ ClientMessage, ServerMessage };
use crate::session::{ ChatSession, SessionFactory };
use futures::{ Sink, SinkExt, StreamExt };
use log::{ debug, info, warn, error };
use std::net::SocketAddr;
use tokio::io::{ AsyncRead, AsyncWrite };
use tokio_tungstenite::{ tungstenite::protocol::Message, WebSocketStream };

const MAX_MESSAGE_SIZE: usize = 1 * 1024 * 1024;

/// Runs one chat session for the lifetime of a WebSocket connection.
///
/// Frames are handled one at a time; the next one is not read until the
/// current turn is finished.
pub async fn handle_connection<S>(
    peer: SocketAddr,
    websocket: WebSocketStream<S>,
    sessions: SessionFactory
)
    where S: AsyncRead + AsyncWrite + Unpin
{
    let (mut tx, mut rx) = websocket.split();
    let mut session = sessions.create();
    info!("Assigned session ID {} to {}", session.id(), peer);

    if send(&mut tx, &history_of(&session)).await.is_err() {
        error!("Failed to send initial history to {}", peer);
        return;
    }

    while let Some(msg) = rx.next().await {
        match msg {
            Ok(message) => {
                if message.len() > MAX_MESSAGE_SIZE {
                    warn!(
                        "Message from {} exceeds size limit ({} > {})",
                        peer,
                        message.len(),
                        MAX_MESSAGE_SIZE
                    );
                    let error_msg = ServerMessage::Error {
                        message: "Message too large".to_string(),
                    };
                    if send(&mut tx, &error_msg).await.is_err() {
                        error!("Failed to send size limit error to {}", peer);
                    }
                    break;
                }

                match message {
                    Message::Text(text) => {
                        let keep_going = match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(ClientMessage::Chat { content }) => {
                                run_turn(peer, &mut tx, &mut session, &content).await
                            }
                            Err(e) => {
                                error!("Failed to parse message from {}: {}", peer, e);
                                let error_msg = ServerMessage::Error {
                                    message: format!("Failed to parse message: {}", e),
                                };
                                send(&mut tx, &error_msg).await.is_ok()
                            }
                        };
                        if !keep_going {
                            error!("Error sending to {}, closing session", peer);
                            break;
                        }
                    }
                    Message::Close(_) => {
                        info!("Received close frame from {}", peer);
                        break;
                    }
                    Message::Ping(ping_data) => {
                        if tx.send(Message::Pong(ping_data)).await.is_err() {
                            error!("Failed to send pong to {}", peer);
                            break;
                        }
                    }
                    Message::Pong(_) => {}
                    Message::Binary(_) => {
                        warn!("Ignoring binary message from {}", peer);
                    }
                    Message::Frame(_) => {}
                }
            }
            Err(e) => {
                match e {
                    | tokio_tungstenite::tungstenite::Error::ConnectionClosed
                    | tokio_tungstenite::tungstenite::Error::Protocol(_)
                    | tokio_tungstenite::tungstenite::Error::Utf8 => {
                        info!("WebSocket connection closed or protocol error for {}: {}", peer, e);
                    }
                    tokio_tungstenite::tungstenite::Error::Io(ref io_err) if
                        io_err.kind() == std::io::ErrorKind::ConnectionReset
                    => {
                        info!("WebSocket connection reset by peer {}", peer);
                    }
                    _ => {
                        error!("Error receiving message from {}: {}", peer, e);
                    }
                }
                break;
            }
        }
    }
    info!(
        "WebSocket connection closed for {} (session {}, {} messages)",
        peer,
        session.id(),
        session.conversation().len()
    );
}

/// One exchange: processing notice, completion, refreshed history.
/// Returns `false` once the socket can no longer be written to.
async fn run_turn<T>(
    peer: SocketAddr,
    tx: &mut T,
    session: &mut ChatSession,
    content: &str
) -> bool
    where T: Sink<Message> + Unpin
{
    if !session.append_user_message(content) {
        // Nothing goes upstream; the page only needs to re-enable its input.
        debug!("Ignoring blank message from {}", peer);
        return send(tx, &history_of(session)).await.is_ok();
    }

    if send(tx, &ServerMessage::Processing).await.is_err() {
        return false;
    }

    if let Err(e) = session.answer_pending().await {
        error!("Completion failed for {} (session {}): {}", peer, session.id(), e);
        let error_msg = ServerMessage::Error {
            message: format!("Error processing message: {}", e),
        };
        if send(tx, &error_msg).await.is_err() {
            return false;
        }
    }

    send(tx, &history_of(session)).await.is_ok()
}

fn history_of(session: &ChatSession) -> ServerMessage {
    ServerMessage::History {
        messages: session.history(),
    }
}

async fn send<T>(tx: &mut T, msg: &ServerMessage) -> Result<(), ()>
    where T: Sink<Message> + Unpin
{
    let json = serde_json::to_string(msg).map_err(|e| {
        error!("Failed to serialize server message: {}", e);
    })?;
    tx.send(Message::Text(json)).await.map_err(|_| ())
}
