//! Bot-update webhook and conversation dispatch.
//!
//! Updates arrive on a path namespaced by the bot token; anything else on
//! that route is answered 404 without confirming the real path exists. The
//! body is parsed leniently and the platform is always acked, since it
//! retries anything but a 2xx and a malformed update will not improve on the
//! second delivery.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;

use groupgate_core::MemberId;

use crate::error::ApiError;
use crate::messages;
use crate::state::AppState;
use crate::telegram::{InlineKeyboardButton, InlineKeyboardMarkup, Update};

use super::checkout::checkout_url_for;

/// The one internal request shape both update paths map into, so the
/// conversation logic never sees raw platform payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    /// A member opened the bot chat.
    Start,
    /// A member asked for the free samples.
    ShowSamples,
    /// A member tapped the button shown when checkout creation failed.
    CheckoutFailed,
    /// Anything the bot does not understand.
    Unrecognized,
}

impl BotCommand {
    /// Map message text onto a command.
    #[must_use]
    pub fn from_message(text: &str) -> Self {
        if text.trim_start().starts_with("/start") {
            Self::Start
        } else {
            Self::Unrecognized
        }
    }

    /// Map an inline-button callback payload onto a command.
    #[must_use]
    pub fn from_callback(data: &str) -> Option<Self> {
        match data {
            messages::CB_SHOW_SAMPLES => Some(Self::ShowSamples),
            messages::CB_CHECKOUT_ERROR => Some(Self::CheckoutFailed),
            _ => None,
        }
    }
}

/// Bot-update webhook endpoint.
pub async fn telegram_webhook(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    body: String,
) -> Result<StatusCode, ApiError> {
    if token != state.config.telegram_token {
        return Err(ApiError::NotFound("no such route".into()));
    }

    let update: Update = match serde_json::from_str(&body) {
        Ok(update) => update,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable bot update, acking anyway");
            return Ok(StatusCode::OK);
        }
    };

    if let Some(message) = update.message {
        let command = message
            .text
            .as_deref()
            .map_or(BotCommand::Unrecognized, BotCommand::from_message);
        run_command(&state, message.chat.id, command).await;
    } else if let Some(callback) = update.callback_query {
        if let Err(e) = state.telegram.answer_callback_query(&callback.id).await {
            tracing::warn!(error = %e, "callback acknowledgement failed");
        }

        let command = callback.data.as_deref().and_then(BotCommand::from_callback);
        if let (Some(command), Some(message)) = (command, callback.message) {
            run_command(&state, message.chat.id, command).await;
        }
    }

    Ok(StatusCode::OK)
}

/// Execute a conversation command. Delivery failures are logged per message;
/// the flow continues so one dropped DM cannot wedge the conversation.
async fn run_command(state: &AppState, chat_id: i64, command: BotCommand) {
    match command {
        BotCommand::Start => {
            let keyboard = intro_keyboard(state, chat_id).await;
            send(state, chat_id, messages::INTRO_GREETING, Some(keyboard)).await;
            send(state, chat_id, messages::INTRO_DETAILS, None).await;
        }
        BotCommand::ShowSamples => {
            send(state, chat_id, messages::SAMPLES_HEADER, None).await;
            for file_id in &state.config.sample_photo_ids {
                if let Err(e) = state.telegram.send_photo(chat_id, file_id).await {
                    tracing::warn!(chat_id, error = %e, "sample photo delivery failed");
                }
            }
            let keyboard = post_samples_keyboard(state, chat_id).await;
            send(state, chat_id, messages::SAMPLES_FOOTER, Some(keyboard)).await;
        }
        BotCommand::CheckoutFailed => {
            send(state, chat_id, messages::CHECKOUT_ERROR, None).await;
        }
        BotCommand::Unrecognized => {
            send(state, chat_id, messages::FALLBACK, None).await;
        }
    }
}

async fn intro_keyboard(state: &AppState, chat_id: i64) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::rows(vec![
        InlineKeyboardButton::callback(messages::BTN_SHOW_SAMPLES, messages::CB_SHOW_SAMPLES),
        subscribe_button(state, chat_id, messages::BTN_SUBSCRIBE).await,
    ])
}

async fn post_samples_keyboard(state: &AppState, chat_id: i64) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::rows(vec![
        subscribe_button(state, chat_id, messages::BTN_SUBSCRIBE_CONFIRM).await,
        InlineKeyboardButton::callback(messages::BTN_SHOW_AGAIN, messages::CB_SHOW_SAMPLES),
    ])
}

/// A subscribe button carrying a fresh checkout URL; if session creation
/// fell back to the deep link the member still has somewhere to go.
async fn subscribe_button(state: &AppState, chat_id: i64, label: &str) -> InlineKeyboardButton {
    let url = checkout_url_for(state, MemberId::new(chat_id)).await;
    InlineKeyboardButton::url(label, url)
}

async fn send(state: &AppState, chat_id: i64, text: &str, keyboard: Option<InlineKeyboardMarkup>) {
    if let Err(e) = state.telegram.send_message(chat_id, text, keyboard).await {
        tracing::warn!(chat_id, error = %e, "message delivery failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_command_from_message() {
        assert_eq!(BotCommand::from_message("/start"), BotCommand::Start);
        assert_eq!(BotCommand::from_message("/start paid"), BotCommand::Start);
        assert_eq!(BotCommand::from_message("hello"), BotCommand::Unrecognized);
    }

    #[test]
    fn callbacks_map_to_commands() {
        assert_eq!(
            BotCommand::from_callback(messages::CB_SHOW_SAMPLES),
            Some(BotCommand::ShowSamples)
        );
        assert_eq!(
            BotCommand::from_callback(messages::CB_CHECKOUT_ERROR),
            Some(BotCommand::CheckoutFailed)
        );
        assert_eq!(BotCommand::from_callback("something_else"), None);
    }
}
