//! Telegram Bot API types (the subset this service touches).

use serde::{Deserialize, Serialize};

/// Generic Bot API response envelope.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded.
    pub ok: bool,
    /// The method result when `ok` is true.
    pub result: Option<T>,
    /// Human-readable error when `ok` is false.
    pub description: Option<String>,
}

/// A sent chat message.
#[derive(Debug, Deserialize)]
pub struct Message {
    /// Platform-assigned message identifier.
    pub message_id: i64,
}

/// A single-use invite link into the access group.
#[derive(Debug, Deserialize)]
pub struct ChatInviteLink {
    /// The invite URL to hand to the member.
    pub invite_link: String,
}

/// An inbound bot update.
#[derive(Debug, Deserialize)]
pub struct Update {
    /// Monotonic update identifier.
    pub update_id: i64,
    /// Present for plain chat messages.
    pub message: Option<IncomingMessage>,
    /// Present for inline-button presses.
    pub callback_query: Option<CallbackQuery>,
}

/// An inbound chat message.
#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    /// The chat the message arrived in.
    pub chat: Chat,
    /// Message text, if any.
    pub text: Option<String>,
}

/// A chat reference.
#[derive(Debug, Deserialize)]
pub struct Chat {
    /// Chat identifier (equals the member ID for direct chats).
    pub id: i64,
}

/// An inline-button press.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Identifier to acknowledge the press with.
    pub id: String,
    /// The button's callback payload.
    pub data: Option<String>,
    /// The message the button was attached to.
    pub message: Option<IncomingMessage>,
}

/// Inline keyboard attached to an outgoing message.
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardMarkup {
    /// Button rows.
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    /// Build a keyboard with one button per row.
    #[must_use]
    pub fn rows(buttons: Vec<InlineKeyboardButton>) -> Self {
        Self {
            inline_keyboard: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }
}

/// A single inline button, either opening a URL or firing a callback.
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    /// Button label.
    pub text: String,
    /// URL to open, for link buttons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Callback payload, for action buttons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
}

impl InlineKeyboardButton {
    /// A button that opens a URL.
    #[must_use]
    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: Some(url.into()),
            callback_data: None,
        }
    }

    /// A button that fires a callback query.
    #[must_use]
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
            callback_data: Some(data.into()),
        }
    }
}

// Outgoing request payloads.

#[derive(Debug, Serialize)]
pub(crate) struct SendMessage<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    pub parse_mode: &'static str,
    pub disable_web_page_preview: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendPhoto<'a> {
    pub chat_id: i64,
    pub photo: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateChatInviteLink {
    pub chat_id: i64,
    pub expire_date: i64,
    pub member_limit: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMemberAction {
    pub chat_id: i64,
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct SetWebhook<'a> {
    pub url: &'a str,
    pub drop_pending_updates: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteWebhook {
    pub drop_pending_updates: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerCallbackQuery<'a> {
    pub callback_query_id: &'a str,
}
