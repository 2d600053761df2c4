use serde::{Deserialize, Serialize};

use crate::chat::texts;

/// Marks a text as a directive for the command layer rather than payload.
pub const COMMAND_PREFIX: char = '/';

/// A relayable piece of user content. Media is referenced by the platform's
/// file id; the server never touches the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Content {
    Text { text: String },
    Photo {
        file_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    Voice { file_id: String },
    Sticker { file_id: String },
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn is_directive(&self) -> bool {
        self.as_text()
            .map(|text| text.starts_with(COMMAND_PREFIX))
            .unwrap_or(false)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Content::Text { .. } => "text",
            Content::Photo { .. } => "photo",
            Content::Voice { .. } => "voice",
            Content::Sticker { .. } => "sticker",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonAction {
    Next,
    Stop,
}

/// Keyboards the core can ask the transport to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    /// Persistent reply keyboard shown to idle users.
    MainMenu,
    /// Inline controls shown while paired.
    ChatControls,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardKind {
    Reply,
    Inline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ButtonAction>,
}

impl Button {
    fn label(label: &str) -> Self {
        Self { label: label.to_string(), action: None }
    }

    fn action(label: &str, action: ButtonAction) -> Self {
        Self { label: label.to_string(), action: Some(action) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardLayout {
    pub kind: KeyboardKind,
    pub rows: Vec<Vec<Button>>,
    pub resize: bool,
    pub one_time: bool,
}

impl Keyboard {
    pub fn layout(&self) -> KeyboardLayout {
        match self {
            Keyboard::MainMenu => KeyboardLayout {
                kind: KeyboardKind::Reply,
                rows: vec![
                    vec![Button::label(texts::MENU_START), Button::label(texts::MENU_STOP)],
                    vec![Button::label(texts::MENU_PROFILE)],
                ],
                resize: true,
                one_time: false,
            },
            Keyboard::ChatControls => KeyboardLayout {
                kind: KeyboardKind::Inline,
                rows: vec![
                    vec![Button::action(texts::BUTTON_NEXT, ButtonAction::Next)],
                    vec![Button::action(texts::BUTTON_STOP, ButtonAction::Stop)],
                ],
                resize: false,
                one_time: false,
            },
        }
    }
}
