use crate::chat::content::{ButtonAction, Content, COMMAND_PREFIX};
use crate::chat::texts;

/// Presses on the persistent main-menu keyboard. The platform delivers
/// them as plain text equal to the button label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Start,
    Stop,
    ViewProfile,
}

impl MenuAction {
    pub fn from_label(text: &str) -> Option<Self> {
        match text {
            texts::MENU_START => Some(MenuAction::Start),
            texts::MENU_STOP => Some(MenuAction::Stop),
            texts::MENU_PROFILE => Some(MenuAction::ViewProfile),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Start,
    Stop,
    Next,
    /// `/about` with whatever followed it; `None` when nothing did.
    SetProfile(Option<String>),
    Button(ButtonAction),
    Menu(MenuAction),
    UnknownCommand(String),
    Content(Content),
}

impl InboundEvent {
    /// Classifies inbound content: commands and menu labels become their
    /// events, everything else is relayable content.
    pub fn from_content(content: Content) -> Self {
        let Some(text) = content.as_text() else {
            return InboundEvent::Content(content);
        };

        if let Some(action) = MenuAction::from_label(text) {
            return InboundEvent::Menu(action);
        }

        if let Some(command) = text.strip_prefix(COMMAND_PREFIX) {
            let (name, rest) = match command.split_once(char::is_whitespace) {
                Some((name, rest)) => (name, rest.trim()),
                None => (command, ""),
            };
            // "/start@pairchat_bot" addresses a specific bot in group chats
            let name = name.split('@').next().unwrap_or(name);

            return match name {
                "start" => InboundEvent::Start,
                "stop" => InboundEvent::Stop,
                "next" => InboundEvent::Next,
                "about" if rest.is_empty() => InboundEvent::SetProfile(None),
                "about" => InboundEvent::SetProfile(Some(rest.to_string())),
                other => InboundEvent::UnknownCommand(other.to_string()),
            };
        }

        InboundEvent::Content(content)
    }
}
