use serde::{Deserialize, Serialize};

use crate::bot::InboundEvent;
use crate::chat::{ButtonAction, Content, Keyboard, KeyboardLayout};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    #[serde(rename = "auth")]
    Authenticate { token: String },
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "photo")]
    Photo {
        file_id: String,
        #[serde(default)]
        caption: Option<String>,
    },
    #[serde(rename = "voice")]
    Voice { file_id: String },
    #[serde(rename = "sticker")]
    Sticker { file_id: String },
    #[serde(rename = "button")]
    Button { action: ButtonAction },
    #[serde(rename = "ping")]
    Ping,
    #[serde(rename = "pong")]
    Pong,
}

impl ClientMessage {
    /// The bot event this message carries, if it carries one.
    pub fn into_event(self) -> Option<InboundEvent> {
        let content = match self {
            ClientMessage::Text { text } => Content::Text { text },
            ClientMessage::Photo { file_id, caption } => Content::Photo { file_id, caption },
            ClientMessage::Voice { file_id } => Content::Voice { file_id },
            ClientMessage::Sticker { file_id } => Content::Sticker { file_id },
            ClientMessage::Button { action } => return Some(InboundEvent::Button(action)),
            ClientMessage::Authenticate { .. } | ClientMessage::Ping | ClientMessage::Pong => {
                return None
            }
        };
        Some(InboundEvent::from_content(content))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    #[serde(rename = "auth_result")]
    AuthResult { success: bool, error: Option<String> },
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "keyboard")]
    Keyboard { content: Content, layout: KeyboardLayout },
    #[serde(rename = "photo")]
    Photo { file_id: String, caption: Option<String> },
    #[serde(rename = "voice")]
    Voice { file_id: String },
    #[serde(rename = "sticker")]
    Sticker { file_id: String },
    #[serde(rename = "error")]
    Error { message: String },
    #[serde(rename = "ping")]
    Ping,
    #[serde(rename = "pong")]
    Pong,
}

impl ServerMessage {
    pub fn from_content(content: Content) -> Self {
        match content {
            Content::Text { text } => ServerMessage::Text { text },
            Content::Photo { file_id, caption } => ServerMessage::Photo { file_id, caption },
            Content::Voice { file_id } => ServerMessage::Voice { file_id },
            Content::Sticker { file_id } => ServerMessage::Sticker { file_id },
        }
    }

    pub fn with_keyboard(content: Content, keyboard: Keyboard) -> Self {
        ServerMessage::Keyboard {
            content,
            layout: keyboard.layout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::MenuAction;
    use crate::chat::texts;
    use serde_json::json;

    #[test]
    fn test_client_messages_parse() {
        let msg: ClientMessage = serde_json::from_value(json!({ "type": "ping" })).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));

        let msg: ClientMessage =
            serde_json::from_value(json!({ "type": "photo", "payload": { "file_id": "AgAD" } })).unwrap();
        assert!(matches!(msg, ClientMessage::Photo { caption: None, .. }));

        let msg: ClientMessage =
            serde_json::from_value(json!({ "type": "button", "payload": { "action": "next" } })).unwrap();
        assert_eq!(msg.into_event(), Some(InboundEvent::Button(ButtonAction::Next)));
    }

    #[test]
    fn test_text_messages_become_bot_events() {
        let start = ClientMessage::Text { text: "/start".to_string() };
        assert_eq!(start.into_event(), Some(InboundEvent::Start));

        let menu = ClientMessage::Text { text: texts::MENU_PROFILE.to_string() };
        assert_eq!(menu.into_event(), Some(InboundEvent::Menu(MenuAction::ViewProfile)));

        let auth = ClientMessage::Authenticate { token: "t".to_string() };
        assert_eq!(auth.into_event(), None);
    }

    #[test]
    fn test_keyboard_message_shape() {
        let msg = ServerMessage::with_keyboard(Content::text(texts::MENU_PROMPT), Keyboard::MainMenu);
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["type"], "keyboard");
        assert_eq!(value["payload"]["content"]["text"], texts::MENU_PROMPT);
        assert_eq!(value["payload"]["layout"]["kind"], "reply");
        assert_eq!(value["payload"]["layout"]["rows"][0][0]["label"], texts::MENU_START);
    }
}
