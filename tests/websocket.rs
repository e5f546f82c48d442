use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use deepseek_chat::llm::chat::ChatClient;
use deepseek_chat::llm::LlmError;
use deepseek_chat::models::chat::ChatMessage;
use deepseek_chat::server::websocket::serve;
use deepseek_chat::session::{FailurePolicy, SessionFactory};

type Client = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Echoes the last user message back, or fails when it says "fail".
struct EchoClient;

#[async_trait]
impl ChatClient for EchoClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let last = messages.last().map(|m| m.content().to_string()).unwrap_or_default();
        if last == "fail" {
            return Err(LlmError::EmptyChoices);
        }
        Ok(format!("echo: {}", last))
    }

    fn get_model(&self) -> String {
        "echo".to_string()
    }

    fn get_base_url(&self) -> String {
        "memory://".to_string()
    }
}

async fn start() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let sessions = SessionFactory::new(
        Arc::new(EchoClient),
        "You are a helpful assistant.",
        FailurePolicy::KeepUserMessage,
    );
    tokio::spawn(async move {
        let _ = serve(listener, sessions).await;
    });
    format!("ws://{}/", addr)
}

async fn next_json(ws: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

async fn chat(ws: &mut Client, content: &str) {
    let frame = json!({ "type": "chat", "content": content }).to_string();
    ws.send(Message::Text(frame)).await.unwrap();
}

#[tokio::test]
async fn turn_over_websocket() {
    let url = start().await;
    let (mut ws, _) = connect_async(url.as_str()).await.unwrap();

    assert_eq!(next_json(&mut ws).await, json!({ "type": "history", "messages": [] }));

    chat(&mut ws, "Hola").await;
    assert_eq!(next_json(&mut ws).await, json!({ "type": "processing" }));
    assert_eq!(
        next_json(&mut ws).await,
        json!({
            "type": "history",
            "messages": [
                { "role": "user", "content": "Hola" },
                { "role": "assistant", "content": "echo: Hola" }
            ]
        })
    );
}

#[tokio::test]
async fn failure_is_reported_and_user_turn_kept() {
    let url = start().await;
    let (mut ws, _) = connect_async(url.as_str()).await.unwrap();
    next_json(&mut ws).await;

    chat(&mut ws, "fail").await;
    assert_eq!(next_json(&mut ws).await["type"], "processing");

    let error = next_json(&mut ws).await;
    assert_eq!(error["type"], "error");
    assert!(error["message"].as_str().unwrap().contains("No response"));

    assert_eq!(
        next_json(&mut ws).await,
        json!({ "type": "history", "messages": [{ "role": "user", "content": "fail" }] })
    );
}

#[tokio::test]
async fn blank_and_garbage_frames() {
    let url = start().await;
    let (mut ws, _) = connect_async(url.as_str()).await.unwrap();
    next_json(&mut ws).await;

    chat(&mut ws, "   ").await;
    assert_eq!(next_json(&mut ws).await, json!({ "type": "history", "messages": [] }));

    ws.send(Message::Text("{not json".to_string())).await.unwrap();
    assert_eq!(next_json(&mut ws).await["type"], "error");
}

#[tokio::test]
async fn connections_do_not_share_history() {
    let url = start().await;
    let (mut a, _) = connect_async(url.as_str()).await.unwrap();
    let (mut b, _) = connect_async(url.as_str()).await.unwrap();
    next_json(&mut a).await;
    next_json(&mut b).await;

    chat(&mut a, "only a").await;
    next_json(&mut a).await;
    let history = next_json(&mut a).await;
    assert_eq!(history["messages"].as_array().unwrap().len(), 2);

    chat(&mut b, "only b").await;
    next_json(&mut b).await;
    let history = next_json(&mut b).await;
    assert_eq!(
        history["messages"][0],
        json!({ "role": "user", "content": "only b" })
    );
    assert_eq!(history["messages"].as_array().unwrap().len(), 2);
}
