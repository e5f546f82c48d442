use serde::{ Serialize, Deserialize };
use super::chat::ChatMessage;

#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "chat")] Chat {
        content: String,
    },
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "history")] History {
        messages: Vec<ChatMessage>,
    },
    #[serde(rename = "error")] Error {
        message: String,
    },
    #[serde(rename = "processing")]
    Processing,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_frame_parses() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"chat","content":"Hola"}"#).unwrap();
        let ClientMessage::Chat { content } = msg;
        assert_eq!(content, "Hola");
    }

    #[test]
    fn history_frame_shape() {
        let msg = ServerMessage::History {
            messages: vec![ChatMessage::user("Hola")],
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "history",
                "messages": [{ "role": "user", "content": "Hola" }]
            })
        );
    }

    #[test]
    fn processing_frame_is_tag_only() {
        let json = serde_json::to_string(&ServerMessage::Processing).unwrap();
        assert_eq!(json, r#"{"type":"processing"}"#);
    }
}
