//! User-visible texts and keyboard labels.

pub const TERMS_NOTICE: &str = "⚠️ By using this bot you agree to the rules:\n\
    • Do not insult other participants\n\
    • Do not send illegal or inappropriate content\n\
    • The administration is not responsible for user messages\n\
    • You use the bot voluntarily and anonymously\n\n\
    ▶️ By pressing \"Start\" you automatically accept these rules.";

pub const ALREADY_IN_CHAT: &str =
    "⚠️ You are already in a chat. Press \"Stop\" to end the current conversation.";
pub const ALREADY_SEARCHING: &str = "⏳ You are already in the queue, please wait for a partner.";
pub const SEARCHING: &str = "⏳ Looking for a partner, please wait...";
pub const CONNECTED: &str = "🔗 You are connected! Start chatting:";
pub const PARTNER_PROFILE_PREFIX: &str = "👤 Partner's profile:\n";
pub const PARTNER_LEFT: &str = "🚫 Your partner left the chat.";
pub const LEFT_CHAT: &str = "✅ You left the chat.";
pub const LEFT_CHAT_WITH_HINT: &str = "✅ You left the chat. Type /start to find a new partner.";

pub const CHAT_CONTROLS_PROMPT: &str = "What would you like to do?";
pub const MENU_PROMPT: &str = "Menu ⬇️";

pub const PROFILE_SAVED: &str =
    "✅ Your profile is saved! It will be sent to your partner when you connect.";
pub const NO_PROFILE: &str =
    "ℹ️ You don't have a profile yet. Set one with the command:\n/about I love movies";
pub const ABOUT_USAGE: &str = "ℹ️ Usage: /about <a few words about yourself>";

pub const MENU_START: &str = "▶️ Start";
pub const MENU_STOP: &str = "⏹ Stop";
pub const MENU_PROFILE: &str = "👤 My profile";
pub const BUTTON_NEXT: &str = "🔁 Next";
pub const BUTTON_STOP: &str = "🚫 Leave";

pub fn partner_profile(profile: &str) -> String {
    format!("{}{}", PARTNER_PROFILE_PREFIX, profile)
}

pub fn own_profile(profile: &str) -> String {
    format!("👤 Your profile:\n{}", profile)
}

pub fn profile_too_long(max: usize) -> String {
    format!("❗ Please keep your profile short (up to {} characters).", max)
}
