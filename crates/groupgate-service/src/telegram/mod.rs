//! Chat-platform (Telegram Bot API) integration.

pub mod client;
pub mod types;

pub use client::{TelegramClient, TelegramError};
pub use types::{
    CallbackQuery, Chat, ChatInviteLink, IncomingMessage, InlineKeyboardButton,
    InlineKeyboardMarkup, Message, Update,
};
