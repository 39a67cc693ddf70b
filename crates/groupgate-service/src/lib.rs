//! Groupgate HTTP service.
//!
//! This crate provides the long-running bot process, including:
//!
//! - Billing webhook ingestion and reconciliation into the subscription store
//! - Group-access actions (single-use invites, kick-once revocation)
//! - The chat conversation surface (intro, free samples, checkout)
//! - A periodic expiry sweeper as a backstop for lost webhook deliveries
//!
//! # Inbound authentication
//!
//! Billing webhooks are authenticated by provider signature over the raw
//! body; chat-platform updates by the bot token embedded in the route path.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Some handlers need async only for routing

pub mod access;
pub mod config;
pub mod error;
pub mod handlers;
pub mod messages;
pub mod reconciler;
pub mod routes;
pub mod state;
pub mod stripe;
pub mod sweeper;
pub mod telegram;

pub use access::AccessController;
pub use config::{ConfigError, ServiceConfig};
pub use error::ApiError;
pub use reconciler::BillingEvent;
pub use routes::create_router;
pub use state::AppState;
pub use stripe::{StripeClient, StripeError};
pub use sweeper::ExpirySweeper;
pub use telegram::{TelegramClient, TelegramError};
