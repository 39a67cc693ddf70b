//! Telegram Bot API client implementation.

use reqwest::Client;
use std::time::Duration;

use super::types::{
    AnswerCallbackQuery, ApiResponse, ChatInviteLink, ChatMemberAction, CreateChatInviteLink,
    DeleteWebhook, InlineKeyboardMarkup, Message, SendMessage, SendPhoto, SetWebhook,
};

/// Outbound call timeout. Calls past this are treated as failed.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Error type for Bot API operations.
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Bot API answered `ok: false`.
    #[error("Bot API error: {method} - {description}")]
    Api {
        /// The method that failed.
        method: String,
        /// Error description from the platform.
        description: String,
    },
}

/// Telegram Bot API client.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: Client,
    api_base: String,
    token: String,
}

impl TelegramClient {
    /// Create a new Bot API client.
    ///
    /// # Arguments
    ///
    /// * `token` - Bot token issued by the platform
    /// * `api_base` - API base URL (production default or a test double)
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    pub fn new(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Send a direct message, optionally with an inline keyboard.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<InlineKeyboardMarkup>,
    ) -> Result<Message, TelegramError> {
        self.call(
            "sendMessage",
            &SendMessage {
                chat_id,
                text,
                parse_mode: "Markdown",
                disable_web_page_preview: true,
                reply_markup,
            },
        )
        .await
    }

    /// Send a photo by platform file ID.
    pub async fn send_photo(&self, chat_id: i64, file_id: &str) -> Result<Message, TelegramError> {
        self.call(
            "sendPhoto",
            &SendPhoto {
                chat_id,
                photo: file_id,
            },
        )
        .await
    }

    /// Create an invite link limited to `member_limit` joins, expiring at
    /// `expire_date` (epoch seconds).
    pub async fn create_invite_link(
        &self,
        chat_id: i64,
        expire_date: i64,
        member_limit: u32,
    ) -> Result<ChatInviteLink, TelegramError> {
        self.call(
            "createChatInviteLink",
            &CreateChatInviteLink {
                chat_id,
                expire_date,
                member_limit,
            },
        )
        .await
    }

    /// Ban a member from a chat.
    pub async fn ban_member(&self, chat_id: i64, user_id: i64) -> Result<(), TelegramError> {
        self.call::<bool>("banChatMember", &ChatMemberAction { chat_id, user_id })
            .await
            .map(|_| ())
    }

    /// Lift a ban, restoring the member's ability to rejoin via invite.
    pub async fn unban_member(&self, chat_id: i64, user_id: i64) -> Result<(), TelegramError> {
        self.call::<bool>("unbanChatMember", &ChatMemberAction { chat_id, user_id })
            .await
            .map(|_| ())
    }

    /// Register the bot-update webhook URL with the platform.
    pub async fn set_webhook(&self, url: &str) -> Result<(), TelegramError> {
        self.call::<bool>(
            "setWebhook",
            &SetWebhook {
                url,
                drop_pending_updates: true,
            },
        )
        .await
        .map(|_| ())
    }

    /// Remove any previously registered webhook.
    pub async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<(), TelegramError> {
        self.call::<bool>(
            "deleteWebhook",
            &DeleteWebhook {
                drop_pending_updates,
            },
        )
        .await
        .map(|_| ())
    }

    /// Acknowledge an inline-button press so the client stops its spinner.
    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), TelegramError> {
        self.call::<bool>(
            "answerCallbackQuery",
            &AnswerCallbackQuery { callback_query_id },
        )
        .await
        .map(|_| ())
    }

    /// Invoke a Bot API method and unwrap the response envelope.
    ///
    /// The platform reports errors in-body (`ok: false` plus a description)
    /// regardless of HTTP status, so the envelope is decoded either way.
    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        payload: &impl serde::Serialize,
    ) -> Result<T, TelegramError> {
        let url = format!("{}/bot{}/{}", self.api_base, self.token, method);

        let response = self.client.post(&url).json(payload).send().await?;
        let envelope: ApiResponse<T> = response.json().await?;

        match envelope {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { description, .. } => Err(TelegramError::Api {
                method: method.to_string(),
                description: description.unwrap_or_else(|| "no description".into()),
            }),
        }
    }
}
